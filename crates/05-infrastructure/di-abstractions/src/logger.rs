//! 组件日志器
//!
//! 依赖角色为 [`ComponentLogger`] 的注入点不走普通解析，
//! 而是直接得到一个以实现类型命名的日志器。

use infrastructure_common::{RoleType, TypeName};
use std::fmt::Display;
use tracing::Span;

/// 日志器角色
pub fn logger_role() -> RoleType {
    RoleType::of::<ComponentLogger>()
}

/// 以组件实现类型命名的日志器
#[derive(Debug, Clone)]
pub struct ComponentLogger {
    name: TypeName,
    span: Span,
}

impl ComponentLogger {
    /// 为指定实现类型创建日志器
    pub fn for_type(name: TypeName) -> Self {
        let span = tracing::info_span!("component", name = %name);
        Self { name, span }
    }

    /// 日志器名称（实现类型名）
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// 日志器所在的 span
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// 在组件 span 内记录 DEBUG 级别日志
    pub fn debug(&self, message: impl Display) {
        let _entered = self.span.enter();
        tracing::debug!(component = %self.name.short_name(), "{}", message);
    }

    /// 在组件 span 内记录 INFO 级别日志
    pub fn info(&self, message: impl Display) {
        let _entered = self.span.enter();
        tracing::info!(component = %self.name.short_name(), "{}", message);
    }

    /// 记录 WARN 级别日志
    pub fn warn(&self, message: impl Display) {
        let _entered = self.span.enter();
        tracing::warn!(component = %self.name.short_name(), "{}", message);
    }

    /// 记录 ERROR 级别日志
    pub fn error(&self, message: impl Display) {
        let _entered = self.span.enter();
        tracing::error!(component = %self.name.short_name(), "{}", message);
    }
}
