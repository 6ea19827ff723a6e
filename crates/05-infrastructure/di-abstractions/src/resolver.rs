//! 字段解析器抽象接口
//!
//! 一次绑定过程针对单个对象，遍历其绑定清单并逐个字段注入。
//! 每个字段的结果记录在 [`BindingReport`] 中，单个字段失败不会中止整个过程。

use crate::binding::BindingKind;
use crate::registry::Bindable;
use crate::scene::NodeRef;
use infrastructure_common::{BindingError, TypeInfo};
use serde::Serialize;

/// 单个字段的绑定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// 已注入
    Bound {
        /// 转换后的目标名称
        target: String,
        /// 注入的元素数量，单值为 1
        elements: usize,
    },
    /// 未注入，字段保持原值
    Unbound {
        /// 失败原因
        error: BindingError,
    },
}

impl FieldOutcome {
    /// 是否已注入
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound { .. })
    }

    /// 失败原因
    pub fn error(&self) -> Option<&BindingError> {
        match self {
            Self::Bound { .. } => None,
            Self::Unbound { error } => Some(error),
        }
    }
}

/// 字段绑定报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    /// 字段名
    pub field: String,
    /// 绑定方式
    pub kind: BindingKind,
    /// 绑定结果
    pub outcome: FieldOutcome,
    /// 列表绑定中因缺少组件而跳过的子对象名称
    pub skipped_children: Vec<String>,
}

impl FieldReport {
    /// 创建已注入的报告
    pub fn bound(
        field: impl Into<String>,
        kind: BindingKind,
        target: impl Into<String>,
        elements: usize,
    ) -> Self {
        Self {
            field: field.into(),
            kind,
            outcome: FieldOutcome::Bound {
                target: target.into(),
                elements,
            },
            skipped_children: Vec::new(),
        }
    }

    /// 创建未注入的报告
    pub fn unbound(field: impl Into<String>, kind: BindingKind, error: BindingError) -> Self {
        Self {
            field: field.into(),
            kind,
            outcome: FieldOutcome::Unbound { error },
            skipped_children: Vec::new(),
        }
    }

    /// 附加跳过的子对象
    pub fn with_skipped_children(mut self, skipped: Vec<String>) -> Self {
        self.skipped_children = skipped;
        self
    }

    /// 该字段产生的警告数量
    pub fn warning_count(&self) -> usize {
        let unbound = usize::from(!self.outcome.is_bound());
        unbound + self.skipped_children.len()
    }
}

/// 一次绑定过程的报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingReport {
    /// 被绑定的类型
    pub owner: TypeInfo,
    /// 本次使用的搜索根，按搜索顺序
    pub search_roots: Vec<NodeRef>,
    /// 被忽略的搜索根字段
    pub ignored_roots: Vec<String>,
    /// 各字段结果，按声明顺序
    pub fields: Vec<FieldReport>,
}

impl BindingReport {
    /// 创建空报告
    pub fn new(owner: TypeInfo) -> Self {
        Self {
            owner,
            search_roots: Vec::new(),
            ignored_roots: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// 已注入的字段数量
    pub fn bound_count(&self) -> usize {
        self.fields.iter().filter(|f| f.outcome.is_bound()).count()
    }

    /// 未注入的字段数量
    pub fn unbound_count(&self) -> usize {
        self.fields.len() - self.bound_count()
    }

    /// 警告总数
    pub fn warning_count(&self) -> usize {
        self.fields.iter().map(FieldReport::warning_count).sum::<usize>() + self.ignored_roots.len()
    }

    /// 按字段名查找结果
    pub fn field(&self, name: &str) -> Option<&FieldReport> {
        self.fields.iter().find(|f| f.field == name)
    }

    /// 是否全部字段都已注入且没有警告
    pub fn is_clean(&self) -> bool {
        self.warning_count() == 0
    }

    /// 报告摘要
    pub fn summary(&self) -> BindingSummary {
        BindingSummary {
            owner: self.owner.name.clone(),
            fields: self.fields.len(),
            bound: self.bound_count(),
            warnings: self.warning_count(),
            search_roots: self.search_roots.clone(),
        }
    }
}

/// 可序列化的报告摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingSummary {
    pub owner: String,
    pub fields: usize,
    pub bound: usize,
    pub warnings: usize,
    pub search_roots: Vec<NodeRef>,
}

/// 字段解析器 trait
///
/// 同步执行，绑定过程中不会让出执行权
pub trait BindingResolver: Send + Sync {
    /// 对单个对象执行一次绑定
    ///
    /// 仅当字段名无效且配置为中止时返回错误，其余失败记录在报告中
    fn resolve<T: Bindable>(&self, owner: &mut T) -> Result<BindingReport, BindingError>;
}
