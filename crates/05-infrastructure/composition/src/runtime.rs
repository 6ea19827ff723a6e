//! 场景绑定器运行时服务

use crate::builder::BinderBuilder;
use di_abstractions::{Bindable, BindingReport, BindingResolver, SceneHost};
use di_impl::{
    get_global_scene_root_cache, set_global_scene_root_cache, take_global_scene_root_cache,
    FieldBinder, SceneRootCache,
};
use infrastructure_common::{BinderOptions, InfrastructureError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// 场景绑定器
///
/// 持有宿主、前缀表、场景根缓存和字段绑定器。启动时订阅场景加载事件并
/// 安装为全局场景根缓存，关闭时取消订阅并清空全局槽位。
pub struct SceneBinder {
    /// 宿主场景图
    host: Arc<dyn SceneHost>,
    /// 场景根缓存
    cache: Arc<SceneRootCache>,
    /// 字段绑定器
    binder: FieldBinder,
    /// 绑定选项
    options: BinderOptions,
    /// 运行状态
    status: RwLock<ServiceStatus>,
    /// 统计信息
    metrics: RwLock<BinderMetrics>,
}

impl SceneBinder {
    /// 创建绑定器构建器
    pub fn builder() -> BinderBuilder {
        BinderBuilder::new()
    }

    /// 内部构造函数
    pub(crate) fn new(
        host: Arc<dyn SceneHost>,
        cache: Arc<SceneRootCache>,
        binder: FieldBinder,
        options: BinderOptions,
    ) -> Self {
        Self {
            host,
            cache,
            binder,
            options,
            status: RwLock::new(ServiceStatus::Created),
            metrics: RwLock::new(BinderMetrics::default()),
        }
    }

    /// 启动服务，重复调用无副作用
    pub fn start(&self) -> Result<(), InfrastructureError> {
        let mut status = self.status.write();
        if *status == ServiceStatus::Running {
            return Ok(());
        }

        info!("启动场景绑定器");
        self.cache.attach();
        let roots = self.cache.refresh();
        set_global_scene_root_cache(Arc::clone(&self.cache));

        *status = ServiceStatus::Running;
        self.metrics.write().start_time = Some(chrono::Utc::now());
        info!(roots, "场景绑定器启动完成");
        Ok(())
    }

    /// 关闭服务，取消订阅并清空全局场景根缓存
    pub fn shutdown(&self) -> Result<(), InfrastructureError> {
        let mut status = self.status.write();
        if *status != ServiceStatus::Running {
            return Ok(());
        }

        info!("关闭场景绑定器");
        self.cache.detach();

        match get_global_scene_root_cache() {
            Some(installed) if Arc::ptr_eq(&installed, &self.cache) => {
                take_global_scene_root_cache();
            }
            Some(_) => warn!("全局场景根缓存已被替换，保留现有缓存"),
            None => {}
        }

        if self.cache.is_attached() {
            return Err(InfrastructureError::ShutdownFailed {
                message: "场景根缓存仍在订阅场景加载事件".to_string(),
            });
        }

        *status = ServiceStatus::Stopped;
        self.metrics.write().stop_time = Some(chrono::Utc::now());
        info!("场景绑定器已关闭");
        Ok(())
    }

    /// 对单个对象执行一次绑定
    pub fn bind<T: Bindable>(&self, owner: &mut T) -> Result<BindingReport, InfrastructureError> {
        if self.status() == ServiceStatus::Stopped {
            warn!(
                owner = std::any::type_name::<T>(),
                "场景绑定器已关闭，场景根缓存不再随场景加载更新"
            );
        }

        let report = self.binder.resolve(owner)?;

        let mut metrics = self.metrics.write();
        metrics.binding_passes += 1;
        metrics.fields_bound += report.bound_count() as u64;
        metrics.warnings += report.warning_count() as u64;
        Ok(report)
    }

    /// 获取运行状态
    pub fn status(&self) -> ServiceStatus {
        *self.status.read()
    }

    /// 获取统计信息
    pub fn metrics(&self) -> BinderMetrics {
        self.metrics.read().clone()
    }

    /// 获取绑定选项
    pub fn options(&self) -> &BinderOptions {
        &self.options
    }

    /// 获取场景根缓存
    pub fn cache(&self) -> &Arc<SceneRootCache> {
        &self.cache
    }

    /// 获取字段绑定器
    pub fn binder(&self) -> &FieldBinder {
        &self.binder
    }

    /// 获取宿主场景图
    pub fn host(&self) -> &Arc<dyn SceneHost> {
        &self.host
    }
}

impl Drop for SceneBinder {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("场景绑定器关闭失败: {}", e);
        }
    }
}

/// 服务运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    /// 已创建
    Created,
    /// 运行中
    Running,
    /// 已停止
    Stopped,
}

/// 绑定器统计信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BinderMetrics {
    /// 启动时间
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    /// 停止时间
    pub stop_time: Option<chrono::DateTime<chrono::Utc>>,
    /// 绑定次数
    pub binding_passes: u64,
    /// 已注入的字段总数
    pub fields_bound: u64,
    /// 警告总数
    pub warnings: u64,
}

impl BinderMetrics {
    /// 计算运行时间
    pub fn uptime(&self) -> Option<chrono::Duration> {
        match (self.start_time, self.stop_time) {
            (Some(start), Some(stop)) => Some(stop - start),
            (Some(start), None) => Some(chrono::Utc::now() - start),
            _ => None,
        }
    }
}
