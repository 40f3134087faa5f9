//! 延迟提供者

use di_abstractions::{Component, ComponentInstance, ComponentProvider, ComponentResolver};
use infrastructure_common::{LookupError, LookupResult, RoleIdentity};
use std::fmt;
use std::sync::Weak;

use crate::manager::{ComponentManager, ManagerInner};

/// 通用延迟提供者
///
/// 未显式注册 `Provider<T>` 组件时注入该提供者。它只持有管理器的弱引用，
/// 每次调用 [`ComponentProvider::get`] 时才解析目标角色。
pub struct LazyProvider {
    manager: Weak<ManagerInner>,
    target: RoleIdentity,
}

impl LazyProvider {
    pub(crate) fn new(manager: Weak<ManagerInner>, target: RoleIdentity) -> Self {
        Self { manager, target }
    }

    /// 目标角色标识
    pub fn target(&self) -> &RoleIdentity {
        &self.target
    }
}

impl ComponentProvider for LazyProvider {
    fn get(&self) -> LookupResult<ComponentInstance> {
        let inner = self
            .manager
            .upgrade()
            .ok_or_else(|| LookupError::ManagerReleased {
                identity: self.target.clone(),
            })?;
        ComponentManager { inner }.resolve(&self.target.role_type, &self.target.hint)
    }
}

impl Component for LazyProvider {}

impl fmt::Debug for LazyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyProvider")
            .field("target", &self.target)
            .field("manager_alive", &(self.manager.strong_count() > 0))
            .finish()
    }
}
