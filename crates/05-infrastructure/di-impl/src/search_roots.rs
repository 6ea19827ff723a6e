//! 搜索根解析

use di_abstractions::{BindingManifest, NodeRef, SceneHost};
use tracing::warn;

/// 一次绑定过程使用的搜索根
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRoots {
    /// 按搜索顺序排列的根节点，首个总是对象自身的节点
    pub roots: Vec<NodeRef>,
    /// 被忽略的追加根字段名
    pub ignored: Vec<String>,
}

/// 搜索根解析器
pub struct SearchRootResolver<'h> {
    host: &'h dyn SceneHost,
}

impl<'h> SearchRootResolver<'h> {
    /// 创建解析器
    pub fn new(host: &'h dyn SceneHost) -> Self {
        Self { host }
    }

    /// 收集对象自身节点以及清单中声明的追加根
    ///
    /// 追加根按声明顺序排列，不去重
    pub fn resolve<T: 'static>(
        &self,
        owner: &T,
        owner_node: NodeRef,
        manifest: &BindingManifest<T>,
    ) -> SearchRoots {
        let mut result = SearchRoots {
            roots: vec![owner_node],
            ignored: Vec::new(),
        };

        for entry in manifest.auxiliary_roots() {
            let field = &entry.declaration.field;
            if !field.field_type.is_anchor() {
                warn!(
                    owner = %manifest.owner(),
                    field = %field.name,
                    declared = %field.field_type,
                    "搜索根字段不是节点类型，已忽略"
                );
                result.ignored.push(field.name.clone());
                continue;
            }

            match entry.slot.read_anchor(owner) {
                Some(node) if self.host.is_alive(node) => result.roots.push(node),
                Some(node) => {
                    warn!(
                        owner = %manifest.owner(),
                        field = %field.name,
                        node = %node,
                        "搜索根节点已销毁，已忽略"
                    );
                    result.ignored.push(field.name.clone());
                }
                None => {
                    warn!(owner = %manifest.owner(), field = %field.name, "搜索根字段为空，已忽略");
                    result.ignored.push(field.name.clone());
                }
            }
        }

        result
    }
}
