//! 场景根节点缓存
//!
//! 缓存所有已加载场景的顶层节点，按名称索引。每次场景加载完成后整体重建，
//! 查找未命中时可以强制重建一次再查找。

use di_abstractions::{
    ListenerId, NodeRef, SceneHost, SceneLoadListener, SceneLoadedEvent,
};
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info};

/// 全局场景根缓存
static GLOBAL_SCENE_ROOT_CACHE: Lazy<RwLock<Option<Arc<SceneRootCache>>>> =
    Lazy::new(|| RwLock::new(None));

/// 获取全局场景根缓存
pub fn get_global_scene_root_cache() -> Option<Arc<SceneRootCache>> {
    GLOBAL_SCENE_ROOT_CACHE.read().clone()
}

/// 设置全局场景根缓存
pub fn set_global_scene_root_cache(cache: Arc<SceneRootCache>) {
    *GLOBAL_SCENE_ROOT_CACHE.write() = Some(cache);
}

/// 移除全局场景根缓存
pub fn take_global_scene_root_cache() -> Option<Arc<SceneRootCache>> {
    GLOBAL_SCENE_ROOT_CACHE.write().take()
}

/// 场景根缓存
pub struct SceneRootCache {
    host: Arc<dyn SceneHost>,
    roots: RwLock<HashMap<String, NodeRef>>,
    subscription: Mutex<Option<ListenerId>>,
    capacity: usize,
    refreshes: AtomicU64,
}

impl SceneRootCache {
    /// 默认初始容量
    pub const DEFAULT_CAPACITY: usize = 32;

    /// 创建缓存并立即构建一次
    pub fn new(host: Arc<dyn SceneHost>) -> Arc<Self> {
        Self::with_capacity(host, Self::DEFAULT_CAPACITY)
    }

    /// 使用指定初始容量创建缓存并立即构建一次
    pub fn with_capacity(host: Arc<dyn SceneHost>, capacity: usize) -> Arc<Self> {
        let cache = Arc::new(Self {
            host,
            roots: RwLock::new(HashMap::with_capacity(capacity)),
            subscription: Mutex::new(None),
            capacity,
            refreshes: AtomicU64::new(0),
        });
        cache.refresh();
        cache
    }

    /// 查找根节点，不触发重建
    pub fn try_get(&self, name: &str) -> Option<NodeRef> {
        self.roots.read().get(name).copied()
    }

    /// 查找根节点，未命中时重建一次再查找
    pub fn get_or_refresh(&self, name: &str) -> Option<NodeRef> {
        if let Some(node) = self.try_get(name) {
            return Some(node);
        }
        debug!(name, "场景根缓存未命中，重建后重试");
        self.refresh();
        self.try_get(name)
    }

    /// 根据当前已加载的场景重建缓存，返回缓存的根节点数量
    ///
    /// 重名时保留先出现的节点
    pub fn refresh(&self) -> usize {
        let mut rebuilt = HashMap::with_capacity(self.capacity);
        for scene in self.host.loaded_scenes() {
            if !scene.is_valid {
                debug!(scene = %scene.name, "跳过无效场景");
                continue;
            }
            for root in self.host.root_nodes(scene.handle) {
                if let Some(name) = self.host.node_name(root) {
                    rebuilt.entry(name).or_insert(root);
                }
            }
        }

        let count = rebuilt.len();
        *self.roots.write() = rebuilt;
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        debug!(roots = count, "场景根缓存已重建");
        count
    }

    /// 订阅场景加载事件，重复调用返回已有的订阅
    pub fn attach(self: &Arc<Self>) -> ListenerId {
        let mut subscription = self.subscription.lock();
        if let Some(id) = *subscription {
            return id;
        }
        let listener = Arc::new(SceneRootCacheListener {
            cache: Arc::downgrade(self),
        });
        let id = self.host.subscribe_scene_loaded(listener);
        *subscription = Some(id);
        info!(%id, "场景根缓存已订阅场景加载事件");
        id
    }

    /// 取消订阅，返回之前是否已订阅
    pub fn detach(&self) -> bool {
        let Some(id) = self.subscription.lock().take() else {
            return false;
        };
        self.host.unsubscribe_scene_loaded(id);
        info!(%id, "场景根缓存已取消订阅");
        true
    }

    /// 是否已订阅
    pub fn is_attached(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// 缓存的根节点数量
    pub fn len(&self) -> usize {
        self.roots.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.roots.read().is_empty()
    }

    /// 缓存的根节点名称
    pub fn names(&self) -> Vec<String> {
        self.roots.read().keys().cloned().collect()
    }

    /// 累计重建次数
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }
}

impl Drop for SceneRootCache {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for SceneRootCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRootCache")
            .field("roots", &self.len())
            .field("attached", &self.is_attached())
            .field("refreshes", &self.refresh_count())
            .finish()
    }
}

struct SceneRootCacheListener {
    cache: Weak<SceneRootCache>,
}

impl SceneLoadListener for SceneRootCacheListener {
    fn on_scene_loaded(&self, event: &SceneLoadedEvent) {
        if let Some(cache) = self.cache.upgrade() {
            debug!(scene = %event.scene_name, mode = ?event.mode, "场景加载，重建场景根缓存");
            cache.refresh();
        }
    }

    fn name(&self) -> &str {
        "SceneRootCache"
    }

    fn is_enabled(&self) -> bool {
        self.cache.strong_count() > 0
    }
}
