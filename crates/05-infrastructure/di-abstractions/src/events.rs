//! 场景加载事件定义

use crate::scene::{LoadSceneMode, SceneRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 场景加载完成事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneLoadedEvent {
    /// 场景句柄
    pub scene: SceneRef,
    /// 场景名称
    pub scene_name: String,
    /// 加载模式
    pub mode: LoadSceneMode,
    /// 事件时间
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl SceneLoadedEvent {
    /// 创建场景加载事件
    pub fn new(scene: SceneRef, scene_name: impl Into<String>, mode: LoadSceneMode) -> Self {
        Self {
            scene,
            scene_name: scene_name.into(),
            mode,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 订阅句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(uuid::Uuid);

impl ListenerId {
    /// 生成新的订阅句柄
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 场景加载事件监听器 trait
pub trait SceneLoadListener: Send + Sync {
    /// 处理场景加载完成事件
    fn on_scene_loaded(&self, event: &SceneLoadedEvent);

    /// 获取监听器名称
    fn name(&self) -> &str;

    /// 是否启用
    fn is_enabled(&self) -> bool {
        true
    }
}
