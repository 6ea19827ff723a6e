//! 内存场景图实现
//!
//! 用于测试和演示的宿主实现，支持场景、节点、组件以及场景加载事件的同步分发

use dashmap::DashMap;
use di_abstractions::{
    ComponentInstance, ListenerId, LoadSceneMode, NodeRef, SceneHost, SceneInfo,
    SceneLoadListener, SceneLoadedEvent, SceneRef,
};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

struct NodeRecord {
    name: String,
    parent: Option<NodeRef>,
    scene: Option<SceneRef>,
    children: Vec<NodeRef>,
    components: HashMap<TypeId, ComponentInstance>,
}

struct SceneRecord {
    name: String,
    valid: bool,
    roots: Vec<NodeRef>,
}

#[derive(Default)]
struct HostState {
    nodes: HashMap<NodeRef, NodeRecord>,
    scenes: HashMap<SceneRef, SceneRecord>,
    loaded: Vec<SceneRef>,
}

/// 内存场景图
pub struct InMemorySceneHost {
    state: RwLock<HostState>,
    listeners: DashMap<ListenerId, Arc<dyn SceneLoadListener>>,
    next_id: AtomicU64,
}

impl InMemorySceneHost {
    /// 创建空场景图
    pub fn new() -> Self {
        Self {
            state: RwLock::new(HostState::default()),
            listeners: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    fn next_raw(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// 创建未加载的场景
    pub fn create_scene(&self, name: impl Into<String>) -> SceneRef {
        let scene = SceneRef::new(self.next_raw());
        self.state.write().scenes.insert(
            scene,
            SceneRecord {
                name: name.into(),
                valid: true,
                roots: Vec::new(),
            },
        );
        scene
    }

    /// 在场景顶层创建节点
    pub fn spawn_root(&self, scene: SceneRef, name: impl Into<String>) -> NodeRef {
        let node = NodeRef::new(self.next_raw());
        let mut state = self.state.write();
        let attached = match state.scenes.get_mut(&scene) {
            Some(record) => {
                record.roots.push(node);
                Some(scene)
            }
            None => {
                warn!(scene = scene.raw(), "场景不存在，节点未挂接");
                None
            }
        };
        state.nodes.insert(node, NodeRecord::new(name.into(), None, attached));
        node
    }

    /// 在父节点下创建子节点，父节点不存在时新节点不挂接到任何场景
    pub fn spawn_child(&self, parent: NodeRef, name: impl Into<String>) -> NodeRef {
        let node = NodeRef::new(self.next_raw());
        let mut state = self.state.write();
        let (parent_ref, scene) = match state.nodes.get_mut(&parent) {
            Some(record) => {
                record.children.push(node);
                (Some(parent), record.scene)
            }
            None => {
                warn!(parent = %parent, "父节点不存在，节点未挂接");
                (None, None)
            }
        };
        state.nodes.insert(node, NodeRecord::new(name.into(), parent_ref, scene));
        node
    }

    /// 在节点上添加组件，同类型组件会被替换
    pub fn add_component<C>(&self, node: NodeRef, component: C) -> Arc<C>
    where
        C: Any + Send + Sync,
    {
        let component = Arc::new(component);
        match self.state.write().nodes.get_mut(&node) {
            Some(record) => {
                record.components.insert(
                    TypeId::of::<C>(),
                    Arc::clone(&component) as ComponentInstance,
                );
            }
            None => warn!(node = %node, "节点不存在，组件未添加"),
        }
        component
    }

    /// 销毁节点及其全部后代
    pub fn destroy_node(&self, node: NodeRef) -> bool {
        let mut state = self.state.write();
        let Some(record) = state.nodes.get(&node) else {
            return false;
        };
        let (parent, scene) = (record.parent, record.scene);

        match parent {
            Some(parent) => {
                if let Some(parent) = state.nodes.get_mut(&parent) {
                    parent.children.retain(|child| *child != node);
                }
            }
            None => {
                if let Some(scene) = scene.and_then(|s| state.scenes.get_mut(&s)) {
                    scene.roots.retain(|root| *root != node);
                }
            }
        }

        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if let Some(removed) = state.nodes.remove(&current) {
                pending.extend(removed.children);
            }
        }
        true
    }

    /// 加载场景并同步通知监听器
    ///
    /// 单场景模式会先卸载其他已加载的场景
    pub fn load_scene(&self, scene: SceneRef, mode: LoadSceneMode) -> bool {
        let scene_name = {
            let mut state = self.state.write();
            let Some(name) = state.scenes.get(&scene).map(|s| s.name.clone()) else {
                warn!(scene = scene.raw(), "场景不存在，无法加载");
                return false;
            };
            if mode == LoadSceneMode::Single {
                state.loaded.clear();
            }
            state.loaded.retain(|loaded| *loaded != scene);
            state.loaded.push(scene);
            name
        };

        debug!(scene = %scene_name, ?mode, "场景加载完成");
        self.dispatch(&SceneLoadedEvent::new(scene, scene_name, mode));
        true
    }

    /// 卸载场景
    pub fn unload_scene(&self, scene: SceneRef) -> bool {
        let mut state = self.state.write();
        let before = state.loaded.len();
        state.loaded.retain(|loaded| *loaded != scene);
        state.loaded.len() != before
    }

    /// 将场景标记为无效
    pub fn invalidate_scene(&self, scene: SceneRef) {
        if let Some(record) = self.state.write().scenes.get_mut(&scene) {
            record.valid = false;
        }
    }

    /// 当前订阅数量
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn dispatch(&self, event: &SceneLoadedEvent) {
        // 分发前释放所有锁，监听器可以回调宿主
        let listeners: Vec<Arc<dyn SceneLoadListener>> = self
            .listeners
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for listener in listeners.iter().filter(|l| l.is_enabled()) {
            debug!(listener = listener.name(), scene = %event.scene_name, "分发场景加载事件");
            listener.on_scene_loaded(event);
        }
    }
}

impl Default for InMemorySceneHost {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRecord {
    fn new(name: String, parent: Option<NodeRef>, scene: Option<SceneRef>) -> Self {
        Self {
            name,
            parent,
            scene,
            children: Vec::new(),
            components: HashMap::new(),
        }
    }
}

impl SceneHost for InMemorySceneHost {
    fn node_name(&self, node: NodeRef) -> Option<String> {
        self.state.read().nodes.get(&node).map(|r| r.name.clone())
    }

    fn children(&self, node: NodeRef) -> Vec<NodeRef> {
        self.state
            .read()
            .nodes
            .get(&node)
            .map(|r| r.children.clone())
            .unwrap_or_default()
    }

    fn find_child(&self, node: NodeRef, name: &str) -> Option<NodeRef> {
        let state = self.state.read();
        let found = state.nodes.get(&node)?.children.iter().copied().find(|child| {
            state
                .nodes
                .get(child)
                .is_some_and(|record| record.name == name)
        });
        found
    }

    fn component(&self, node: NodeRef, type_id: TypeId) -> Option<ComponentInstance> {
        self.state
            .read()
            .nodes
            .get(&node)?
            .components
            .get(&type_id)
            .cloned()
    }

    fn loaded_scenes(&self) -> Vec<SceneInfo> {
        let state = self.state.read();
        state
            .loaded
            .iter()
            .filter_map(|handle| {
                state.scenes.get(handle).map(|record| SceneInfo {
                    handle: *handle,
                    name: record.name.clone(),
                    is_valid: record.valid,
                })
            })
            .collect()
    }

    fn root_nodes(&self, scene: SceneRef) -> Vec<NodeRef> {
        self.state
            .read()
            .scenes
            .get(&scene)
            .map(|record| record.roots.clone())
            .unwrap_or_default()
    }

    fn subscribe_scene_loaded(&self, listener: Arc<dyn SceneLoadListener>) -> ListenerId {
        let id = ListenerId::new();
        debug!(listener = listener.name(), %id, "订阅场景加载事件");
        self.listeners.insert(id, listener);
        id
    }

    fn unsubscribe_scene_loaded(&self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Counter {
        hits: AtomicUsize,
    }

    impl SceneLoadListener for Counter {
        fn on_scene_loaded(&self, _event: &SceneLoadedEvent) {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &str {
            "Counter"
        }
    }

    #[test]
    fn test_hierarchy_queries() {
        let host = InMemorySceneHost::new();
        let scene = host.create_scene("Main");
        let root = host.spawn_root(scene, "Canvas");
        let a = host.spawn_child(root, "A");
        let b = host.spawn_child(root, "B");

        assert_eq!(host.node_name(root).as_deref(), Some("Canvas"));
        assert_eq!(host.children(root), vec![a, b]);
        assert_eq!(host.find_child(root, "B"), Some(b));
        assert_eq!(host.find_child(root, "Canvas"), None);
        assert_eq!(host.root_nodes(scene), vec![root]);

        let value = host.add_component(a, 7_u32);
        let found = host.component(a, TypeId::of::<u32>()).unwrap();
        assert_eq!(*found.downcast::<u32>().unwrap(), *value);
        assert!(host.component(b, TypeId::of::<u32>()).is_none());
    }

    #[test]
    fn test_load_modes_and_validity() {
        let host = InMemorySceneHost::new();
        let first = host.create_scene("First");
        let second = host.create_scene("Second");

        assert!(host.loaded_scenes().is_empty());
        assert!(host.load_scene(first, LoadSceneMode::Single));
        assert!(host.load_scene(second, LoadSceneMode::Additive));
        let names: Vec<_> = host.loaded_scenes().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["First", "Second"]);

        host.invalidate_scene(first);
        assert!(!host.loaded_scenes()[0].is_valid);

        assert!(host.load_scene(first, LoadSceneMode::Single));
        assert_eq!(host.loaded_scenes().len(), 1);
        assert!(host.unload_scene(first));
        assert!(!host.unload_scene(first));
        assert!(!host.load_scene(SceneRef::new(999), LoadSceneMode::Additive));
    }

    #[test]
    fn test_destroy_removes_subtree() {
        let host = InMemorySceneHost::new();
        let scene = host.create_scene("Main");
        let root = host.spawn_root(scene, "Root");
        let child = host.spawn_child(root, "Child");
        let grandchild = host.spawn_child(child, "Grandchild");

        assert!(host.destroy_node(child));
        assert!(!host.is_alive(child));
        assert!(!host.is_alive(grandchild));
        assert!(host.children(root).is_empty());

        assert!(host.destroy_node(root));
        assert!(host.root_nodes(scene).is_empty());
        assert!(!host.destroy_node(root));
    }

    #[test]
    fn test_listeners_receive_loads() {
        let host = InMemorySceneHost::new();
        let counter = Arc::new(Counter {
            hits: AtomicUsize::new(0),
        });
        let id = host.subscribe_scene_loaded(counter.clone());
        assert_eq!(host.listener_count(), 1);

        let scene = host.create_scene("Main");
        host.load_scene(scene, LoadSceneMode::Single);
        assert_eq!(counter.hits.load(Ordering::SeqCst), 1);

        assert!(host.unsubscribe_scene_loaded(id));
        assert!(!host.unsubscribe_scene_loaded(id));
        host.load_scene(scene, LoadSceneMode::Single);
        assert_eq!(counter.hits.load(Ordering::SeqCst), 1);
    }
}
