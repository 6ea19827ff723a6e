//! # Binding Abstractions
//!
//! 场景字段绑定的抽象层，定义宿主场景图、绑定清单与字段解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`SceneHost`] - 宿主场景图接口
//! - [`SceneLoadListener`] - 场景加载事件监听器
//! - [`BindingManifest`] - 类型的字段绑定清单
//! - [`Bindable`] - 可绑定类型
//! - [`BindingResolver`] - 字段解析器接口

pub mod binding;
pub mod events;
pub mod registry;
pub mod resolver;
pub mod scene;

pub use binding::*;
pub use events::*;
pub use registry::*;
pub use resolver::*;
pub use scene::*;
