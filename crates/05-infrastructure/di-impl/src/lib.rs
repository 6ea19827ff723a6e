//! # 场景字段绑定具体实现
//!
//! 提供节点查找、搜索根解析、场景根缓存以及字段绑定器的实现
//!
//! - [`NodeFinder`] - 在搜索根中按名称查找节点
//! - [`SearchRootResolver`] - 收集对象自身节点和追加搜索根
//! - [`SceneRootCache`] - 已加载场景顶层节点的名称索引
//! - [`FieldBinder`] - 按绑定清单注入字段
//! - [`InMemorySceneHost`] - 内存场景图

pub mod binder;
pub mod finder;
pub mod memory;
pub mod scene_root_cache;
pub mod search_roots;

pub use binder::*;
pub use finder::*;
pub use memory::*;
pub use scene_root_cache::*;
pub use search_roots::*;
