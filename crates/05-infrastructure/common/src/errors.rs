//! 错误类型定义

use crate::metadata::{RoleIdentity, TypeName};
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },

    #[error("日志初始化失败: {message}")]
    LoggingInit { message: String },
}

/// 组件查找错误类型
///
/// 查找失败总是带着无法解析的角色标识；构造、注入或生命周期处理器失败时
/// 还带着原始原因。
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("组件未注册: {identity}")]
    NotFound { identity: RoleIdentity },

    #[error("组件创建失败: {identity}, 原因: {source}")]
    ConstructionFailed {
        identity: RoleIdentity,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("解析深度超过上限 {depth}: {identity}")]
    DepthExceeded { identity: RoleIdentity, depth: usize },

    #[error("组件类型不匹配: {implementation} 不能作为 {expected} 使用")]
    TypeMismatch {
        expected: String,
        implementation: TypeName,
    },

    #[error("组件管理器已释放，无法解析: {identity}")]
    ManagerReleased { identity: RoleIdentity },
}

impl LookupError {
    /// 创建未注册错误
    pub fn not_found(identity: RoleIdentity) -> Self {
        Self::NotFound { identity }
    }

    /// 包装构造期间的失败
    ///
    /// 循环依赖与深度超限描述的是整条解析链，原样向上传播。
    pub fn construction_failed(
        identity: &RoleIdentity,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let source = source.into();
        match source.downcast::<LookupError>() {
            Ok(inner) if inner.is_resolution_chain_error() => *inner,
            Ok(inner) => Self::ConstructionFailed {
                identity: identity.clone(),
                source: inner,
            },
            Err(source) => match source.downcast::<ComponentError>() {
                Ok(inner) => match *inner {
                    ComponentError::Lookup { source } if source.is_resolution_chain_error() => source,
                    other => Self::ConstructionFailed {
                        identity: identity.clone(),
                        source: Box::new(other),
                    },
                },
                Err(source) => Self::ConstructionFailed {
                    identity: identity.clone(),
                    source,
                },
            },
        }
    }

    /// 是否为描述整条解析链的错误
    pub fn is_resolution_chain_error(&self) -> bool {
        matches!(
            self,
            Self::CircularDependency { .. } | Self::DepthExceeded { .. }
        )
    }

    /// 是否为未注册错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// 出错的角色标识
    pub fn identity(&self) -> Option<&RoleIdentity> {
        match self {
            Self::NotFound { identity }
            | Self::ConstructionFailed { identity, .. }
            | Self::DepthExceeded { identity, .. }
            | Self::ManagerReleased { identity } => Some(identity),
            Self::CircularDependency { .. } | Self::TypeMismatch { .. } => None,
        }
    }
}

/// 组件自身抛出的错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件 {component} 没有注入点: {point}")]
    UnknownInjectionPoint { component: String, point: String },

    #[error("注入值类型不匹配: 期望 {expected}, 实际 {actual}")]
    InjectionTypeMismatch { expected: String, actual: String },

    #[error("组件初始化失败: {message}")]
    Initialization { message: String },

    #[error("组件销毁失败: {message}")]
    Disposal { message: String },

    #[error("组件查找失败: {source}")]
    Lookup {
        #[from]
        source: LookupError,
    },

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ComponentError {
    /// 创建初始化错误
    pub fn initialization(message: impl Into<String>) -> Self {
        Self::Initialization {
            message: message.into(),
        }
    }

    /// 创建销毁错误
    pub fn disposal(message: impl Into<String>) -> Self {
        Self::Disposal {
            message: message.into(),
        }
    }

    /// 创建未知注入点错误
    pub fn unknown_injection_point(component: impl Into<String>, point: impl Into<String>) -> Self {
        Self::UnknownInjectionPoint {
            component: component.into(),
            point: point.into(),
        }
    }
}

/// 组件注册错误类型
///
/// 主要由描述符生产者一侧的校验产生，注册表自身很少拒绝注册。
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("组件描述符无效: {identity}, 原因: {message}")]
    InvalidDescriptor { identity: String, message: String },

    #[error("描述符生产者 {producer} 失败: {message}")]
    ProducerFailed { producer: String, message: String },
}

impl RegistrationError {
    /// 创建描述符无效错误
    pub fn invalid(identity: impl ToString, message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            identity: identity.to_string(),
            message: message.into(),
        }
    }
}

/// 组件管理器关闭错误
///
/// 单个组件的销毁失败只记录日志；只有整体关闭未能干净完成时才返回该错误。
#[derive(Error, Debug)]
pub enum DisposalError {
    #[error("组件管理器未能干净关闭, {} 个组件销毁失败: {}", .failed.len(), .failed.join(", "))]
    Incomplete { failed: Vec<String> },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type LookupResult<T> = Result<T, LookupError>;
pub type ComponentResult<T> = Result<T, ComponentError>;
pub type RegistrationResult<T> = Result<T, RegistrationError>;
pub type DisposalResult<T> = Result<T, DisposalError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::RoleIdentity;

    struct Store;

    #[test]
    fn construction_failure_keeps_cause() {
        let outer = RoleIdentity::of::<Store>("default");
        let inner = LookupError::not_found(RoleIdentity::of::<String>("missing"));
        let error = LookupError::construction_failed(&outer, inner);

        match &error {
            LookupError::ConstructionFailed { identity, source } => {
                assert_eq!(identity, &outer);
                assert!(source.to_string().contains("missing"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(error.identity(), Some(&outer));
    }

    #[test]
    fn chain_errors_are_not_rewrapped() {
        let outer = RoleIdentity::of::<Store>("default");
        let cycle = LookupError::CircularDependency {
            dependency_chain: "a -> b -> a".to_string(),
        };
        let error = LookupError::construction_failed(&outer, cycle);
        assert!(matches!(error, LookupError::CircularDependency { .. }));
    }

    #[test]
    fn incomplete_disposal_lists_components() {
        let error = DisposalError::Incomplete {
            failed: vec!["a/default".to_string(), "b/default".to_string()],
        };
        let message = error.to_string();
        assert!(message.contains("2 个组件"));
        assert!(message.contains("a/default, b/default"));
    }
}
