//! 元数据定义
//!
//! 提供字段和类型的元数据信息，绑定清单用它们描述字段的声明类型

use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 模块路径
    pub module_path: String,
}

impl TypeInfo {
    /// 创建新的类型信息
    pub fn new(type_id: TypeId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            module_path: name.clone(),
            name,
            id: type_id,
        }
    }

    /// 从类型获取类型信息
    pub fn of<T: 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>()
                .split("::")
                .last()
                .unwrap_or("Unknown")
                .to_string(),
            id: TypeId::of::<T>(),
            module_path: std::any::type_name::<T>().to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        self.name.split("::").last().unwrap_or(&self.name)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// 可注入的元素类型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 场景节点本身（任意节点）
    Node,
    /// 挂在节点上的组件
    Component(TypeInfo),
}

impl ElementType {
    /// 组件元素类型
    pub fn component<T: 'static>() -> Self {
        Self::Component(TypeInfo::of::<T>())
    }

    /// 组件的类型信息，节点类型返回 `None`
    pub fn type_info(&self) -> Option<&TypeInfo> {
        match self {
            Self::Node => None,
            Self::Component(info) => Some(info),
        }
    }

    /// 是否为节点类型
    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("Node"),
            Self::Component(info) => info.fmt(f),
        }
    }
}

/// 集合容器种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// 定长数组，物化为 `Box<[T]>`
    Array,
    /// 有序列表，物化为 `Vec<T>`
    List,
}

/// 字段的声明类型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 单个节点或组件
    Single(ElementType),
    /// 数组或列表
    Collection(ContainerKind, ElementType),
    /// 绑定器无法注入的其他类型
    Other(TypeInfo),
}

impl FieldType {
    /// 单个组件字段
    pub fn component<T: 'static>() -> Self {
        Self::Single(ElementType::component::<T>())
    }

    /// 锚点（节点）字段
    pub fn node() -> Self {
        Self::Single(ElementType::Node)
    }

    /// 其他类型字段
    pub fn other<T: 'static>() -> Self {
        Self::Other(TypeInfo::of::<T>())
    }

    /// 是否为锚点引用类型
    pub fn is_anchor(&self) -> bool {
        matches!(self, Self::Single(ElementType::Node))
    }

    /// 字段作为单值绑定时用于查找前缀的类型
    ///
    /// 集合类型本身不在前缀表中，返回 `None`
    pub fn type_info(&self) -> Option<&TypeInfo> {
        match self {
            Self::Single(element) => element.type_info(),
            Self::Collection(..) => None,
            Self::Other(info) => Some(info),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(element) => element.fmt(f),
            Self::Collection(ContainerKind::Array, element) => write!(f, "{element}[]"),
            Self::Collection(ContainerKind::List, element) => write!(f, "List<{element}>"),
            Self::Other(info) => info.fmt(f),
        }
    }
}

/// 字段信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldInfo {
    /// 字段声明名称
    pub name: String,
    /// 字段声明类型
    pub field_type: FieldType,
}

impl FieldInfo {
    /// 创建新的字段信息
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}
