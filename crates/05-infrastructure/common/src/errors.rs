//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 字段绑定错误类型
///
/// 分为三类：配置错误（字段名过短、容器类型不符）、解析未命中（找不到节点）、
/// 类型不匹配（节点存在但缺少组件）。除 [`BindingError::InvalidName`] 外都只产生警告。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("变量名 '{name}' 太短")]
    InvalidName { name: String },

    #[error("'{field}' 字段不是数组或列表类型 (声明类型: {declared})")]
    InvalidContainer { field: String, declared: String },

    #[error("'{field}' 字段的类型 {declared} 无法注入")]
    UnsupportedFieldType { field: String, declared: String },

    #[error("找不到 '{field}' 对应的游戏对象 '{target}'")]
    NodeNotFound { field: String, target: String },

    #[error("场景根对象中找不到 '{field}' 对应的游戏对象 '{target}'")]
    SceneRootNotFound { field: String, target: String },

    #[error("找不到 '{field}' 列表的父对象 '{target}'")]
    ParentNotFound { field: String, target: String },

    #[error("游戏对象 '{target}' 上没有 '{component}' 组件 (字段: {field})")]
    ComponentMissing {
        field: String,
        target: String,
        component: String,
    },

    #[error("'{field}' 字段拒绝了注入的值 (期望: {expected})")]
    InjectionRejected { field: String, expected: String },
}

impl BindingError {
    /// 创建字段名无效错误
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    /// 是否为配置错误（编程错误而非运行时缺失）
    pub fn is_configuration_fault(&self) -> bool {
        matches!(
            self,
            Self::InvalidName { .. } | Self::InvalidContainer { .. }
        )
    }

    /// 是否为解析未命中
    pub fn is_resolution_miss(&self) -> bool {
        matches!(
            self,
            Self::NodeNotFound { .. } | Self::SceneRootNotFound { .. } | Self::ParentNotFound { .. }
        )
    }

    /// 是否为类型不匹配
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            Self::ComponentMissing { .. }
                | Self::InjectionRejected { .. }
                | Self::UnsupportedFieldType { .. }
        )
    }

    /// 绑定失败后解析过程是否可以继续
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidName { .. })
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("绑定错误: {source}")]
    BindingError {
        #[from]
        source: BindingError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },

    #[error("基础设施关闭失败: {message}")]
    ShutdownFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type BindingResult<T> = Result<T, BindingError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
