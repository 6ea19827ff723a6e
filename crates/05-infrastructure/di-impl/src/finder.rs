//! 按名称查找节点

use di_abstractions::{NodeRef, SceneHost};

/// 节点查找器
///
/// 对每个搜索根依次检查：根节点自身、根的直属子节点、先序遍历的后代节点
pub struct NodeFinder<'h> {
    host: &'h dyn SceneHost,
}

impl<'h> NodeFinder<'h> {
    /// 创建查找器
    pub fn new(host: &'h dyn SceneHost) -> Self {
        Self { host }
    }

    /// 在多个搜索根中查找，返回按根顺序的第一个命中
    pub fn find(&self, roots: &[NodeRef], name: &str) -> Option<NodeRef> {
        roots.iter().find_map(|root| self.find_in(*root, name))
    }

    /// 在单个搜索根中查找
    pub fn find_in(&self, root: NodeRef, name: &str) -> Option<NodeRef> {
        if self.is_named(root, name) {
            return Some(root);
        }
        // 仅搜索根的直属子节点优先，更深层按先序遍历
        if let Some(child) = self.host.find_child(root, name) {
            return Some(child);
        }
        self.find_pre_order(root, name)
    }

    fn find_pre_order(&self, node: NodeRef, name: &str) -> Option<NodeRef> {
        self.host.children(node).into_iter().find_map(|child| {
            if self.is_named(child, name) {
                Some(child)
            } else {
                self.find_pre_order(child, name)
            }
        })
    }

    fn is_named(&self, node: NodeRef, name: &str) -> bool {
        self.host.node_name(node).as_deref() == Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemorySceneHost;
    use di_abstractions::LoadSceneMode;

    #[test]
    fn test_self_match_precedes_children() {
        let host = InMemorySceneHost::new();
        let scene = host.create_scene("Main");
        let root = host.spawn_root(scene, "Panel");
        let child = host.spawn_child(root, "Panel");
        host.load_scene(scene, LoadSceneMode::Single);

        let finder = NodeFinder::new(&host);
        assert_eq!(finder.find(&[root], "Panel"), Some(root));
        assert_eq!(finder.find_in(child, "Panel"), Some(child));
    }

    #[test]
    fn test_direct_child_precedes_earlier_grandchild() {
        let host = InMemorySceneHost::new();
        let scene = host.create_scene("Main");
        let root = host.spawn_root(scene, "Root");
        let a = host.spawn_child(root, "A");
        let _nested = host.spawn_child(a, "Target");
        let direct = host.spawn_child(root, "Target");

        let finder = NodeFinder::new(&host);
        assert_eq!(finder.find(&[root], "Target"), Some(direct));
    }

    #[test]
    fn test_descendants_searched_in_pre_order() {
        let host = InMemorySceneHost::new();
        let scene = host.create_scene("Main");
        let root = host.spawn_root(scene, "Root");
        let a = host.spawn_child(root, "A");
        let a1 = host.spawn_child(a, "A1");
        let deep = host.spawn_child(a1, "Target");
        let b = host.spawn_child(root, "B");
        let _later = host.spawn_child(b, "Target");

        let finder = NodeFinder::new(&host);
        assert_eq!(finder.find(&[root], "Target"), Some(deep));
    }

    #[test]
    fn test_nested_levels_use_pre_order() {
        let host = InMemorySceneHost::new();
        let scene = host.create_scene("Main");
        let root = host.spawn_root(scene, "Root");
        let a = host.spawn_child(root, "A");
        let b = host.spawn_child(a, "B");
        let deep = host.spawn_child(b, "Target");
        let _shallow = host.spawn_child(a, "Target");

        let finder = NodeFinder::new(&host);
        assert_eq!(finder.find(&[root], "Target"), Some(deep));
    }

    #[test]
    fn test_first_root_wins() {
        let host = InMemorySceneHost::new();
        let scene = host.create_scene("Main");
        let first = host.spawn_root(scene, "First");
        let second = host.spawn_root(scene, "Second");
        let in_first = host.spawn_child(first, "Label");
        let _in_second = host.spawn_child(second, "Label");
        let only_second = host.spawn_child(second, "Icon");

        let finder = NodeFinder::new(&host);
        assert_eq!(finder.find(&[first, second], "Label"), Some(in_first));
        assert_eq!(
            finder.find(&[second, first], "Label").map(|n| n == in_first),
            Some(false)
        );
        assert_eq!(finder.find(&[first, second], "Icon"), Some(only_second));
        assert_eq!(finder.find(&[first, second], "Missing"), None);
        assert_eq!(finder.find(&[], "Label"), None);
    }
}
