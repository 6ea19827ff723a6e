//! 约定规范定义
//!
//! 字段名到游戏对象名的命名约定：
//!
//! - 字段名为 camelCase，开头的 `_` 或 `m_` 会被跳过（例如 `_loginButton`）
//! - 对象名为 `[前缀 + PascalCase 名称]`（例如 `Button_LoginButton`）
//! - 前缀为 `[引擎默认创建名称 + _]`（例如 `Text (TMP)_`、`Button_`）
//! - 节点类型和用户自定义组件不加前缀

use crate::errors::{BindingError, BindingResult};
use crate::metadata::{ElementType, TypeInfo};
use std::any::TypeId;
use std::collections::HashMap;

/// 引擎内置 UI 组件的默认前缀（类型名, 前缀）
pub const STANDARD_UI_PREFIXES: &[(&str, &str)] = &[
    ("Canvas", "Canvas_"),
    ("Text", "Text (Legacy)_"),
    ("TMP_Text", "Text (TMP)_"),
    ("TextMeshPro", "Text (TMP)_"),
    ("TextMeshProUGUI", "Text (TMP)_"),
    ("TMP_InputField", "InputField (TMP)_"),
    ("Button", "Button_"),
    ("Image", "Image_"),
    ("RawImage", "RawImage_"),
    ("Toggle", "Toggle_"),
    ("Slider", "Slider_"),
    ("TMP_Dropdown", "Dropdown_"),
];

/// 组件类型到命名前缀的映射表
///
/// 启动时构建一次，之后只读。先按 [`TypeId`] 精确匹配，再按类型名匹配，
/// 都没有则前缀为空。
///
/// 内置 UI 前缀和配置文件中的前缀按短类型名登记，因此与内置组件同名的
/// 自定义类型（例如自己的 `Image` 或 `Text`）同样会得到内置前缀。需要区分
/// 时用 [`PrefixTableBuilder::with_prefix`] 为该类型登记 `TypeId` 条目，
/// 或在构建时不使用内置前缀。
#[derive(Debug, Clone, Default)]
pub struct PrefixTable {
    by_type: HashMap<TypeId, String>,
    by_name: HashMap<String, String>,
}

impl PrefixTable {
    /// 创建前缀表构建器
    pub fn builder() -> PrefixTableBuilder {
        PrefixTableBuilder::default()
    }

    /// 空前缀表
    pub fn empty() -> Self {
        Self::default()
    }

    /// 包含内置 UI 组件前缀的前缀表
    pub fn standard() -> Self {
        Self::builder().with_standard_ui().build()
    }

    /// 获取类型对应的前缀，节点类型与未知类型返回空字符串
    pub fn prefix_for(&self, type_info: Option<&TypeInfo>) -> &str {
        let Some(info) = type_info else {
            return "";
        };

        self.by_type
            .get(&info.id)
            .or_else(|| self.by_name.get(info.short_name()))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// 获取元素类型对应的前缀
    pub fn prefix_for_element(&self, element: &ElementType) -> &str {
        self.prefix_for(element.type_info())
    }

    /// 前缀条目数量
    pub fn len(&self) -> usize {
        self.by_type.len() + self.by_name.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 前缀表构建器
#[derive(Debug, Default)]
pub struct PrefixTableBuilder {
    table: PrefixTable,
}

impl PrefixTableBuilder {
    /// 为具体类型注册前缀
    pub fn with_prefix<T: 'static>(mut self, prefix: impl Into<String>) -> Self {
        self.table.by_type.insert(TypeId::of::<T>(), prefix.into());
        self
    }

    /// 按类型名注册前缀（用于配置文件和宿主引擎的内置类型）
    pub fn with_named_prefix(
        mut self,
        type_name: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        self.table.by_name.insert(type_name.into(), prefix.into());
        self
    }

    /// 注册内置 UI 组件前缀
    pub fn with_standard_ui(self) -> Self {
        STANDARD_UI_PREFIXES
            .iter()
            .fold(self, |builder, (name, prefix)| {
                builder.with_named_prefix(*name, *prefix)
            })
    }

    /// 合并另一个构建器的条目，后者覆盖同名条目
    pub fn merge(mut self, other: PrefixTableBuilder) -> Self {
        self.table.by_type.extend(other.table.by_type);
        self.table.by_name.extend(other.table.by_name);
        self
    }

    /// 构建前缀表
    pub fn build(self) -> PrefixTable {
        self.table
    }
}

/// 字段名转换器
///
/// 将字段名和声明类型转换为要查找的游戏对象名称
#[derive(Debug, Clone, Copy)]
pub struct NameMangler<'a> {
    prefixes: &'a PrefixTable,
}

impl<'a> NameMangler<'a> {
    /// 创建新的字段名转换器
    pub fn new(prefixes: &'a PrefixTable) -> Self {
        Self { prefixes }
    }

    /// 转换字段名，返回新分配的字符串
    pub fn mangle(&self, field_name: &str, type_info: Option<&TypeInfo>) -> BindingResult<String> {
        let mut buffer = String::with_capacity(field_name.len() + 16);
        self.mangle_into(field_name, type_info, &mut buffer)?;
        Ok(buffer)
    }

    /// 转换字段名并写入缓冲区
    ///
    /// 缓冲区会先被清空，失败时保持为空
    pub fn mangle_into(
        &self,
        field_name: &str,
        type_info: Option<&TypeInfo>,
        buffer: &mut String,
    ) -> BindingResult<()> {
        buffer.clear();

        let mut rest = field_name.chars().skip(Self::convention_skip(field_name));
        let first = rest
            .next()
            .ok_or_else(|| BindingError::invalid_name(field_name))?;

        buffer.push_str(self.prefixes.prefix_for(type_info));
        // 只取大写映射的第一个字符，保持逐字符对应
        buffer.push(first.to_uppercase().next().unwrap_or(first));
        buffer.extend(rest);
        Ok(())
    }

    /// 需要跳过的约定前缀长度：`_` 跳过 1 个字符，`m_` 风格跳过 2 个字符
    fn convention_skip(field_name: &str) -> usize {
        let mut chars = field_name.chars();
        match (chars.next(), chars.next()) {
            (Some('_'), _) => 1,
            (Some(_), Some('_')) => 2,
            _ => 0,
        }
    }
}
