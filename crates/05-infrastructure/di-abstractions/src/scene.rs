//! 宿主场景图抽象接口
//!
//! 绑定器只依赖宿主引擎提供的以下能力：枚举子节点、按名称查找直属子节点、
//! 按类型查询组件、枚举已加载场景的根节点、订阅场景加载事件。

use crate::events::{ListenerId, SceneLoadListener};
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// 场景节点句柄
///
/// 由宿主分配的不透明句柄，绑定器不拥有节点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef(u64);

impl NodeRef {
    /// 由宿主创建句柄
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// 原始句柄值
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node#{}", self.0)
    }
}

/// 场景句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneRef(u64);

impl SceneRef {
    /// 由宿主创建句柄
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// 原始句柄值
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// 已加载场景信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneInfo {
    /// 场景句柄
    pub handle: SceneRef,
    /// 场景名称
    pub name: String,
    /// 场景是否有效，无效场景在刷新缓存时被跳过
    pub is_valid: bool,
}

/// 场景加载模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadSceneMode {
    /// 关闭其他场景后加载
    Single,
    /// 叠加到已加载的场景上
    Additive,
}

/// 组件实例
pub type ComponentInstance = Arc<dyn Any + Send + Sync>;

/// 宿主场景图 trait
///
/// 所有方法都在引擎主线程上同步调用
pub trait SceneHost: Send + Sync {
    /// 节点名称，节点已销毁时返回 `None`
    fn node_name(&self, node: NodeRef) -> Option<String>;

    /// 直属子节点，按声明顺序
    fn children(&self, node: NodeRef) -> Vec<NodeRef>;

    /// 按名称精确查找直属子节点
    fn find_child(&self, node: NodeRef, name: &str) -> Option<NodeRef>;

    /// 查询节点上指定类型的组件
    fn component(&self, node: NodeRef, type_id: TypeId) -> Option<ComponentInstance>;

    /// 当前已加载的场景，按加载顺序
    fn loaded_scenes(&self) -> Vec<SceneInfo>;

    /// 场景的顶层节点
    fn root_nodes(&self, scene: SceneRef) -> Vec<NodeRef>;

    /// 订阅场景加载完成事件
    fn subscribe_scene_loaded(&self, listener: Arc<dyn SceneLoadListener>) -> ListenerId;

    /// 取消订阅，返回订阅是否存在
    fn unsubscribe_scene_loaded(&self, id: ListenerId) -> bool;

    /// 节点是否仍然存在
    fn is_alive(&self, node: NodeRef) -> bool {
        self.node_name(node).is_some()
    }
}
