//! # Infrastructure Common
//!
//! 场景字段绑定器的公共类型与约定。
//!
//! ## 核心组件
//!
//! - [`NameMangler`] - 字段名到游戏对象名的转换
//! - [`PrefixTable`] - 组件类型到命名前缀的映射
//! - [`BindingError`] - 绑定错误分类
//! - [`BinderOptions`] - 绑定器配置
//! - [`FieldInfo`] / [`FieldType`] - 字段元数据
//!
//! ## 设计原则
//!
//! - 显式的绑定清单替代运行时反射
//! - 约定优于配置
//! - 单个字段绑定失败不影响其他字段

pub mod configuration;
pub mod conventions;
pub mod errors;
pub mod metadata;

pub use configuration::*;
pub use conventions::*;
pub use errors::*;
pub use metadata::*;
