//! # 基础设施组合层
//!
//! 将前缀表、场景根缓存和字段绑定器组合成一个可启动、可关闭的绑定服务。
//!
//! ## 主要功能
//!
//! - **绑定器构建器**: 使用构建者模式组装配置源、前缀和日志
//! - **生命周期管理**: 启动时订阅场景加载事件，关闭时取消订阅
//!
//! ## 基本使用
//!
//! ```rust,ignore
//! use infrastructure_composition::SceneBinder;
//!
//! let binder = SceneBinder::builder()
//!     .add_config_toml("binder.toml")?
//!     .build(host)?;
//!
//! binder.start()?;
//! let report = binder.bind(&mut login_panel)?;
//! binder.shutdown()?;
//! ```

pub mod builder;
pub mod runtime;


// 重新导出主要类型
pub use builder::{BinderBuilder, LoggingConfig};
pub use runtime::{BinderMetrics, SceneBinder, ServiceStatus};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
