//! 绑定器配置

use crate::conventions::PrefixTableBuilder;
use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, error};

/// 配置节名称
pub const BINDER_CONFIG_SECTION: &str = "binder";

/// 绑定器选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderOptions {
    /// 字段名过短时是否中止整个解析过程
    pub fail_on_invalid_name: bool,
    /// 场景根缓存未命中时是否刷新一次后重试
    pub refresh_on_miss: bool,
    /// 每次解析过程中名称缓冲区的初始容量
    pub name_buffer_capacity: usize,
    /// 场景根缓存的初始容量
    pub cache_capacity: usize,
    /// 额外的类型名前缀
    pub prefixes: Vec<PrefixEntry>,
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self {
            fail_on_invalid_name: true,
            refresh_on_miss: true,
            name_buffer_capacity: 30,
            cache_capacity: 32,
            prefixes: Vec::new(),
        }
    }
}

/// 类型名前缀条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixEntry {
    /// 组件类型名（不含模块路径）
    pub type_name: String,
    /// 对象名前缀
    pub prefix: String,
}

impl PrefixEntry {
    /// 创建新的前缀条目
    pub fn new(type_name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            prefix: prefix.into(),
        }
    }
}

/// 配置源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// TOML 配置文件
    Toml(PathBuf),
    /// JSON 配置文件
    Json(PathBuf),
    /// 环境变量，例如前缀 `SCENE_BIND` 对应 `SCENE_BIND_BINDER__CACHE_CAPACITY`
    Environment { prefix: String },
}

impl BinderOptions {
    /// 从配置源加载选项，没有 `binder` 配置节时使用默认值
    pub fn load(sources: &[ConfigSource]) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();

        for source in sources {
            debug!("添加配置源: {:?}", source);
            builder = match source {
                ConfigSource::Toml(path) => builder.add_source(
                    config::File::from(path.as_path()).format(config::FileFormat::Toml),
                ),
                ConfigSource::Json(path) => builder.add_source(
                    config::File::from(path.as_path()).format(config::FileFormat::Json),
                ),
                ConfigSource::Environment { prefix } => builder.add_source(
                    config::Environment::with_prefix(prefix)
                        .prefix_separator("_")
                        .separator("__")
                        .try_parsing(true),
                ),
            };
        }

        let settings = builder.build().map_err(|e| {
            error!("配置构建失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;

        let options = match settings.get::<BinderOptions>(BINDER_CONFIG_SECTION) {
            Ok(options) => options,
            Err(config::ConfigError::NotFound(_)) => {
                debug!("未找到 {} 配置节，使用默认选项", BINDER_CONFIG_SECTION);
                Self::default()
            }
            Err(e) => {
                error!("配置绑定失败: path={}, error={}", BINDER_CONFIG_SECTION, e);
                return Err(ConfigError::ParseError {
                    source: Box::new(e),
                });
            }
        };

        options.validate()?;
        Ok(options)
    }

    /// 验证选项
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name_buffer_capacity == 0 {
            return Err(ConfigError::ValidationError {
                message: "name_buffer_capacity 必须大于 0".to_string(),
            });
        }

        if self.cache_capacity == 0 {
            return Err(ConfigError::ValidationError {
                message: "cache_capacity 必须大于 0".to_string(),
            });
        }

        if let Some(entry) = self.prefixes.iter().find(|e| e.type_name.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                message: format!("前缀 '{}' 的类型名为空", entry.prefix),
            });
        }

        Ok(())
    }

    /// 将配置中的前缀条目写入前缀表构建器
    pub fn apply_prefixes(&self, builder: PrefixTableBuilder) -> PrefixTableBuilder {
        self.prefixes.iter().fold(builder, |builder, entry| {
            builder.with_named_prefix(entry.type_name.clone(), entry.prefix.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::PrefixTable;
    use crate::metadata::TypeInfo;
    use std::io::Write;

    struct Minimap;

    #[test]
    fn test_default_options() {
        let options = BinderOptions::default();
        assert!(options.fail_on_invalid_name);
        assert!(options.refresh_on_miss);
        assert_eq!(options.name_buffer_capacity, 30);
        assert_eq!(options.cache_capacity, 32);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        let options = BinderOptions::load(&[]).unwrap();
        assert_eq!(options, BinderOptions::default());
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[binder]
refresh_on_miss = false
cache_capacity = 64

[[binder.prefixes]]
type_name = "Minimap"
prefix = "Minimap_"
"#
        )
        .unwrap();

        let options =
            BinderOptions::load(&[ConfigSource::Toml(file.path().to_path_buf())]).unwrap();
        assert!(!options.refresh_on_miss);
        assert!(options.fail_on_invalid_name);
        assert_eq!(options.cache_capacity, 64);
        assert_eq!(options.prefixes, vec![PrefixEntry::new("Minimap", "Minimap_")]);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "binder": {{ "fail_on_invalid_name": false }} }}"#).unwrap();

        let options =
            BinderOptions::load(&[ConfigSource::Json(file.path().to_path_buf())]).unwrap();
        assert!(!options.fail_on_invalid_name);
        assert_eq!(options.name_buffer_capacity, 30);
    }

    #[test]
    fn test_invalid_capacity_is_rejected() {
        let options = BinderOptions {
            cache_capacity: 0,
            ..BinderOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_empty_prefix_type_name_is_rejected() {
        let options = BinderOptions {
            prefixes: vec![PrefixEntry::new(" ", "Oops_")],
            ..BinderOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_apply_prefixes() {
        let options = BinderOptions {
            prefixes: vec![PrefixEntry::new("Minimap", "Minimap_")],
            ..BinderOptions::default()
        };
        let table = options.apply_prefixes(PrefixTable::builder()).build();
        assert_eq!(table.prefix_for(Some(&TypeInfo::of::<Minimap>())), "Minimap_");
    }
}
