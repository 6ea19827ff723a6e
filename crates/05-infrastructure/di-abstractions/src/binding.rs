//! 绑定声明与绑定清单
//!
//! 每个需要绑定的类型通过 [`ManifestBuilder`] 显式列出字段的绑定声明，
//! 每条声明带有字段信息、绑定方式、可选的搜索名以及字段的读写访问器。
//!
//! ```rust,ignore
//! BindingManifest::<LoginPanel>::builder()
//!     .bind::<Button>("_loginButton", |panel, button| panel.login_button = Some(button))
//!     .bind::<Button>("_btn1", |panel, button| panel.btn1 = Some(button))
//!     .named("_loginButton")
//!     .bind_root::<Camera>("_mainCamera", |panel, camera| panel.main_camera = Some(camera))
//!     .bind_array::<Button>("_stageButtons", |panel, buttons| panel.stage_buttons = buttons)
//!     .search_root("_abc", |panel| panel.abc)
//!     .build()
//! ```

use crate::scene::{ComponentInstance, NodeRef};
use infrastructure_common::{ContainerKind, ElementType, FieldInfo, FieldType, TypeInfo};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 绑定方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// 在搜索根下查找单个对象
    Single,
    /// 在已加载场景的根对象中查找单个对象
    SceneRoot,
    /// 查找父对象并收集其直属子对象
    ListOfChildren,
    /// 追加搜索根
    AuxiliaryRoot,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Single => "Bind",
            Self::SceneRoot => "BindRoot",
            Self::ListOfChildren => "BindList",
            Self::AuxiliaryRoot => "BindParent",
        };
        f.write_str(name)
    }
}

/// 绑定声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDeclaration {
    /// 字段信息
    pub field: FieldInfo,
    /// 绑定方式
    pub kind: BindingKind,
    /// 替代字段名的搜索名，仍然经过前缀与大小写转换
    pub search_name: Option<String>,
}

impl BindingDeclaration {
    /// 创建新的绑定声明
    pub fn new(field: FieldInfo, kind: BindingKind) -> Self {
        Self {
            field,
            kind,
            search_name: None,
        }
    }

    /// 设置搜索名
    pub fn with_search_name(mut self, search_name: impl Into<String>) -> Self {
        self.search_name = Some(search_name.into());
        self
    }

    /// 名称转换的输入：搜索名优先，否则为字段名
    pub fn target_input(&self) -> &str {
        self.search_name.as_deref().unwrap_or(&self.field.name)
    }
}

/// 注入到字段中的值
pub enum Injection {
    Node(NodeRef),
    Component(ComponentInstance),
    NodeArray(Box<[NodeRef]>),
    NodeList(Vec<NodeRef>),
    ComponentArray(Box<[ComponentInstance]>),
    ComponentList(Vec<ComponentInstance>),
}

impl Injection {
    /// 按容器种类物化节点集合
    pub fn nodes(kind: ContainerKind, nodes: Vec<NodeRef>) -> Self {
        match kind {
            ContainerKind::Array => Self::NodeArray(nodes.into_boxed_slice()),
            ContainerKind::List => Self::NodeList(nodes),
        }
    }

    /// 按容器种类物化组件集合
    pub fn components(kind: ContainerKind, components: Vec<ComponentInstance>) -> Self {
        match kind {
            ContainerKind::Array => Self::ComponentArray(components.into_boxed_slice()),
            ContainerKind::List => Self::ComponentList(components),
        }
    }

    /// 元素数量，单值为 1
    pub fn len(&self) -> usize {
        match self {
            Self::Node(_) | Self::Component(_) => 1,
            Self::NodeArray(nodes) => nodes.len(),
            Self::NodeList(nodes) => nodes.len(),
            Self::ComponentArray(components) => components.len(),
            Self::ComponentList(components) => components.len(),
        }
    }

    /// 是否为空集合
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Injection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Component(_) => f.write_str("Component(<instance>)"),
            Self::NodeArray(nodes) => f.debug_tuple("NodeArray").field(nodes).finish(),
            Self::NodeList(nodes) => f.debug_tuple("NodeList").field(nodes).finish(),
            Self::ComponentArray(c) => write!(f, "ComponentArray(len={})", c.len()),
            Self::ComponentList(c) => write!(f, "ComponentList(len={})", c.len()),
        }
    }
}

/// 字段写入函数，值类型不符时返回 `false`
pub type FieldSetter<T> = Box<dyn Fn(&mut T, Injection) -> bool + Send + Sync>;

/// 锚点字段读取函数
pub type AnchorAccessor<T> = Box<dyn Fn(&T) -> Option<NodeRef> + Send + Sync>;

/// 字段访问器
pub struct FieldSlot<T> {
    setter: Option<FieldSetter<T>>,
    anchor: Option<AnchorAccessor<T>>,
}

impl<T: 'static> FieldSlot<T> {
    /// 可写字段
    pub fn setter<F>(setter: F) -> Self
    where
        F: Fn(&mut T, Injection) -> bool + Send + Sync + 'static,
    {
        Self {
            setter: Some(Box::new(setter)),
            anchor: None,
        }
    }

    /// 只读锚点字段
    pub fn anchor<F>(accessor: F) -> Self
    where
        F: Fn(&T) -> Option<NodeRef> + Send + Sync + 'static,
    {
        Self {
            setter: None,
            anchor: Some(Box::new(accessor)),
        }
    }

    /// 写入字段，返回是否成功
    pub fn inject(&self, owner: &mut T, injection: Injection) -> bool {
        match &self.setter {
            Some(setter) => setter(owner, injection),
            None => false,
        }
    }

    /// 读取锚点字段的当前值
    pub fn read_anchor(&self, owner: &T) -> Option<NodeRef> {
        self.anchor.as_ref().and_then(|accessor| accessor(owner))
    }
}

/// 绑定清单条目
pub struct BindingEntry<T> {
    /// 绑定声明
    pub declaration: BindingDeclaration,
    /// 字段访问器
    pub slot: FieldSlot<T>,
}

impl<T> fmt::Debug for BindingEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingEntry")
            .field("declaration", &self.declaration)
            .field("slot", &"<accessor>")
            .finish()
    }
}

/// 某个类型的绑定清单，每个类型只构建一次
pub struct BindingManifest<T> {
    owner: TypeInfo,
    entries: Vec<BindingEntry<T>>,
}

impl<T: 'static> BindingManifest<T> {
    /// 创建清单构建器
    pub fn builder() -> ManifestBuilder<T> {
        ManifestBuilder::new()
    }

    /// 所属类型
    pub fn owner(&self) -> &TypeInfo {
        &self.owner
    }

    /// 全部条目，按声明顺序
    pub fn entries(&self) -> &[BindingEntry<T>] {
        &self.entries
    }

    /// 追加搜索根条目
    pub fn auxiliary_roots(&self) -> impl Iterator<Item = &BindingEntry<T>> {
        self.entries
            .iter()
            .filter(|entry| entry.declaration.kind == BindingKind::AuxiliaryRoot)
    }

    /// 需要注入的字段条目
    pub fn field_bindings(&self) -> impl Iterator<Item = &BindingEntry<T>> {
        self.entries
            .iter()
            .filter(|entry| entry.declaration.kind != BindingKind::AuxiliaryRoot)
    }

    /// 按字段名查找条目
    pub fn find(&self, field_name: &str) -> Option<&BindingEntry<T>> {
        self.entries
            .iter()
            .find(|entry| entry.declaration.field.name == field_name)
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> fmt::Debug for BindingManifest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingManifest")
            .field("owner", &self.owner)
            .field("entries", &self.entries)
            .finish()
    }
}

/// 绑定清单构建器
pub struct ManifestBuilder<T> {
    owner: TypeInfo,
    entries: Vec<BindingEntry<T>>,
}

impl<T: 'static> ManifestBuilder<T> {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            owner: TypeInfo::of::<T>(),
            entries: Vec::new(),
        }
    }

    /// 添加任意绑定声明
    pub fn declare(mut self, declaration: BindingDeclaration, slot: FieldSlot<T>) -> Self {
        self.entries.push(BindingEntry { declaration, slot });
        self
    }

    /// 为上一条声明设置搜索名
    pub fn named(mut self, search_name: impl Into<String>) -> Self {
        if let Some(entry) = self.entries.last_mut() {
            entry.declaration.search_name = Some(search_name.into());
        }
        self
    }

    /// 在搜索根下绑定组件
    pub fn bind<C>(
        self,
        field: impl Into<String>,
        setter: impl Fn(&mut T, Arc<C>) + Send + Sync + 'static,
    ) -> Self
    where
        C: Any + Send + Sync,
    {
        self.declare(
            BindingDeclaration::new(
                FieldInfo::new(field, FieldType::component::<C>()),
                BindingKind::Single,
            ),
            component_slot(setter),
        )
    }

    /// 在搜索根下绑定节点
    pub fn bind_node(
        self,
        field: impl Into<String>,
        setter: impl Fn(&mut T, NodeRef) + Send + Sync + 'static,
    ) -> Self {
        self.declare(
            BindingDeclaration::new(FieldInfo::new(field, FieldType::node()), BindingKind::Single),
            node_slot(setter),
        )
    }

    /// 在场景根对象中绑定组件
    pub fn bind_root<C>(
        self,
        field: impl Into<String>,
        setter: impl Fn(&mut T, Arc<C>) + Send + Sync + 'static,
    ) -> Self
    where
        C: Any + Send + Sync,
    {
        self.declare(
            BindingDeclaration::new(
                FieldInfo::new(field, FieldType::component::<C>()),
                BindingKind::SceneRoot,
            ),
            component_slot(setter),
        )
    }

    /// 在场景根对象中绑定节点
    pub fn bind_root_node(
        self,
        field: impl Into<String>,
        setter: impl Fn(&mut T, NodeRef) + Send + Sync + 'static,
    ) -> Self {
        self.declare(
            BindingDeclaration::new(
                FieldInfo::new(field, FieldType::node()),
                BindingKind::SceneRoot,
            ),
            node_slot(setter),
        )
    }

    /// 将父对象直属子对象上的组件绑定为列表
    pub fn bind_list<C>(
        self,
        field: impl Into<String>,
        setter: impl Fn(&mut T, Vec<Arc<C>>) + Send + Sync + 'static,
    ) -> Self
    where
        C: Any + Send + Sync,
    {
        self.declare(
            list_declaration(field, ContainerKind::List, ElementType::component::<C>()),
            FieldSlot::setter(move |owner: &mut T, injection| match injection {
                Injection::ComponentList(items) => match downcast_all::<C>(items) {
                    Some(components) => {
                        setter(owner, components);
                        true
                    }
                    None => false,
                },
                _ => false,
            }),
        )
    }

    /// 将父对象直属子对象上的组件绑定为数组
    pub fn bind_array<C>(
        self,
        field: impl Into<String>,
        setter: impl Fn(&mut T, Box<[Arc<C>]>) + Send + Sync + 'static,
    ) -> Self
    where
        C: Any + Send + Sync,
    {
        self.declare(
            list_declaration(field, ContainerKind::Array, ElementType::component::<C>()),
            FieldSlot::setter(move |owner: &mut T, injection| match injection {
                Injection::ComponentArray(items) => match downcast_all::<C>(items.into_vec()) {
                    Some(components) => {
                        setter(owner, components.into_boxed_slice());
                        true
                    }
                    None => false,
                },
                _ => false,
            }),
        )
    }

    /// 将父对象的直属子节点绑定为列表
    pub fn bind_node_list(
        self,
        field: impl Into<String>,
        setter: impl Fn(&mut T, Vec<NodeRef>) + Send + Sync + 'static,
    ) -> Self {
        self.declare(
            list_declaration(field, ContainerKind::List, ElementType::Node),
            FieldSlot::setter(move |owner: &mut T, injection| match injection {
                Injection::NodeList(nodes) => {
                    setter(owner, nodes);
                    true
                }
                _ => false,
            }),
        )
    }

    /// 将父对象的直属子节点绑定为数组
    pub fn bind_node_array(
        self,
        field: impl Into<String>,
        setter: impl Fn(&mut T, Box<[NodeRef]>) + Send + Sync + 'static,
    ) -> Self {
        self.declare(
            list_declaration(field, ContainerKind::Array, ElementType::Node),
            FieldSlot::setter(move |owner: &mut T, injection| match injection {
                Injection::NodeArray(nodes) => {
                    setter(owner, nodes);
                    true
                }
                _ => false,
            }),
        )
    }

    /// 将预先赋值的锚点字段追加为搜索根
    pub fn search_root(
        self,
        field: impl Into<String>,
        accessor: impl Fn(&T) -> Option<NodeRef> + Send + Sync + 'static,
    ) -> Self {
        self.declare(
            BindingDeclaration::new(
                FieldInfo::new(field, FieldType::node()),
                BindingKind::AuxiliaryRoot,
            ),
            FieldSlot::anchor(accessor),
        )
    }

    /// 构建清单
    pub fn build(self) -> BindingManifest<T> {
        BindingManifest {
            owner: self.owner,
            entries: self.entries,
        }
    }
}

impl<T: 'static> Default for ManifestBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn list_declaration(
    field: impl Into<String>,
    kind: ContainerKind,
    element: ElementType,
) -> BindingDeclaration {
    BindingDeclaration::new(
        FieldInfo::new(field, FieldType::Collection(kind, element)),
        BindingKind::ListOfChildren,
    )
}

fn component_slot<T, C>(setter: impl Fn(&mut T, Arc<C>) + Send + Sync + 'static) -> FieldSlot<T>
where
    T: 'static,
    C: Any + Send + Sync,
{
    FieldSlot::setter(move |owner: &mut T, injection| match injection {
        Injection::Component(instance) => match instance.downcast::<C>() {
            Ok(component) => {
                setter(owner, component);
                true
            }
            Err(_) => false,
        },
        _ => false,
    })
}

fn node_slot<T: 'static>(setter: impl Fn(&mut T, NodeRef) + Send + Sync + 'static) -> FieldSlot<T> {
    FieldSlot::setter(move |owner: &mut T, injection| match injection {
        Injection::Node(node) => {
            setter(owner, node);
            true
        }
        _ => false,
    })
}

fn downcast_all<C: Any + Send + Sync>(items: Vec<ComponentInstance>) -> Option<Vec<Arc<C>>> {
    items
        .into_iter()
        .map(|instance| instance.downcast::<C>().ok())
        .collect()
}
