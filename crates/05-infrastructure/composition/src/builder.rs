//! 绑定器构建器

use crate::runtime::SceneBinder;
use di_abstractions::{ManifestRegistry, SceneHost};
use di_impl::{FieldBinder, SceneRootCache};
use infrastructure_common::{
    BinderOptions, ConfigSource, InfrastructureError, PrefixTable, PrefixTableBuilder,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// 绑定器构建器
///
/// 使用建造者模式组装前缀表、场景根缓存和字段绑定器
pub struct BinderBuilder {
    /// 配置源列表
    config_sources: Vec<ConfigSource>,
    /// 显式指定的选项，优先于配置源
    options: Option<BinderOptions>,
    /// 代码中注册的前缀
    prefixes: PrefixTableBuilder,
    /// 是否包含内置 UI 组件前缀
    standard_prefixes: bool,
    /// 清单注册表
    manifests: Option<Arc<ManifestRegistry>>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl BinderBuilder {
    /// 创建新的绑定器构建器
    pub fn new() -> Self {
        Self {
            config_sources: Vec::new(),
            options: None,
            prefixes: PrefixTable::builder(),
            standard_prefixes: true,
            manifests: None,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 添加 TOML 配置文件
    pub fn add_config_toml<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加 TOML 配置文件: {}", path.display());
        self.config_sources.push(ConfigSource::Toml(path.to_path_buf()));
        Ok(self)
    }

    /// 添加 JSON 配置文件
    pub fn add_config_json<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加 JSON 配置文件: {}", path.display());
        self.config_sources.push(ConfigSource::Json(path.to_path_buf()));
        Ok(self)
    }

    /// 添加环境变量配置源
    pub fn add_config_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.config_sources.push(ConfigSource::Environment { prefix });
        self
    }

    /// 直接指定选项，配置源将被忽略
    pub fn with_options(mut self, options: BinderOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// 为具体类型注册前缀，优先于按类型名注册的前缀
    pub fn with_prefix<T: 'static>(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes = self.prefixes.with_prefix::<T>(prefix);
        self
    }

    /// 按类型名注册前缀
    pub fn with_named_prefix(
        mut self,
        type_name: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        self.prefixes = self.prefixes.with_named_prefix(type_name, prefix);
        self
    }

    /// 不使用内置 UI 组件前缀
    pub fn without_standard_prefixes(mut self) -> Self {
        self.standard_prefixes = false;
        self
    }

    /// 使用独立的清单注册表
    pub fn with_manifest_registry(mut self, manifests: Arc<ManifestRegistry>) -> Self {
        self.manifests = Some(manifests);
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 构建绑定器
    pub fn build(self, host: Arc<dyn SceneHost>) -> Result<SceneBinder, InfrastructureError> {
        // 只有在明确配置了日志时才初始化日志
        if self.logging_enabled {
            self.initialize_logging()?;
        }

        info!("开始构建场景绑定器");

        let options = match self.options {
            Some(options) => {
                if !self.config_sources.is_empty() {
                    debug!("已显式指定选项，忽略 {} 个配置源", self.config_sources.len());
                }
                options.validate()?;
                options
            }
            None => BinderOptions::load(&self.config_sources)?,
        };

        let base = if self.standard_prefixes {
            PrefixTable::builder().with_standard_ui()
        } else {
            PrefixTable::builder()
        };
        let prefixes = options.apply_prefixes(base.merge(self.prefixes)).build();
        debug!(prefixes = prefixes.len(), "前缀表构建完成");

        let cache = SceneRootCache::with_capacity(Arc::clone(&host), options.cache_capacity);
        let binder = FieldBinder::new(Arc::clone(&host), Arc::new(prefixes), Arc::clone(&cache))
            .with_options(options.clone())
            .with_manifest_registry(self.manifests.unwrap_or_else(ManifestRegistry::global));

        info!("场景绑定器构建完成");
        Ok(SceneBinder::new(host, cache, binder, options))
    }

    /// 初始化日志系统
    fn initialize_logging(&self) -> Result<(), InfrastructureError> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.logging_config.level)
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}

impl Default for BinderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }
}
