//! 组件解析
//!
//! 解析顺序：单例缓存（无锁快路径）→ 加锁后再次检查缓存 → 本地描述符 → 父管理器。
//! 构造过程为：零参构造 → 按声明顺序注入依赖 → 依次运行生命周期处理器 → 发布实例。

use di_abstractions::{
    logger_role, ComponentDependency, ComponentDescriptor, ComponentInstance, ComponentLogger,
    ComponentProvider, ComponentResolver, Injected,
};
use indexmap::IndexMap;
use infrastructure_common::{
    ComponentError, LookupError, LookupResult, ManagerConfig, RoleIdentity, RoleType,
};
use std::cell::RefCell;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::manager::ComponentManager;
use crate::provider::LazyProvider;

thread_local! {
    /// 当前线程上正在构造的角色标识
    static RESOLUTION_STACK: RefCell<Vec<(Uuid, RoleIdentity)>> = RefCell::new(Vec::new());
}

/// 解析栈帧，离开作用域时出栈
struct ResolutionFrame;

impl ResolutionFrame {
    fn enter(manager_id: Uuid, identity: &RoleIdentity, config: &ManagerConfig) -> LookupResult<Self> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();

            if config.detect_cycles {
                if let Some(start) = stack
                    .iter()
                    .position(|(id, entry)| *id == manager_id && entry == identity)
                {
                    let dependency_chain = stack[start..]
                        .iter()
                        .map(|(_, entry)| entry.to_string())
                        .chain(std::iter::once(identity.to_string()))
                        .collect::<Vec<_>>()
                        .join(" -> ");
                    return Err(LookupError::CircularDependency { dependency_chain });
                }
            }

            if stack.len() >= config.max_resolution_depth {
                return Err(LookupError::DepthExceeded {
                    identity: identity.clone(),
                    depth: config.max_resolution_depth,
                });
            }

            stack.push((manager_id, identity.clone()));
            Ok(Self)
        })
    }
}

impl Drop for ResolutionFrame {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

impl ComponentManager {
    fn cached(&self, identity: &RoleIdentity) -> Option<ComponentInstance> {
        let instance = self
            .inner
            .instances
            .get(identity)
            .map(|entry| entry.value().clone());
        if instance.is_some() && self.inner.config.log_cache_hits {
            debug!("命中单例缓存: {}", identity);
        }
        instance
    }

    /// 在本地或父管理器中解析，不做提供者回退
    pub(crate) fn resolve_identity(&self, identity: &RoleIdentity) -> LookupResult<ComponentInstance> {
        if let Some(instance) = self.cached(identity) {
            return Ok(instance);
        }

        let guard = self.inner.lock.lock();
        if let Some(instance) = self.cached(identity) {
            return Ok(instance);
        }

        if let Some(descriptor) = self.local_descriptor(identity) {
            let instance = self.build(identity, &descriptor)?;
            if descriptor.is_singleton() && self.is_bound(identity, &descriptor) {
                self.inner
                    .instances
                    .insert(identity.clone(), instance.clone());
            }
            return Ok(instance);
        }
        drop(guard);

        match self.parent() {
            Some(parent) => {
                debug!("本地未注册，委托父管理器解析: {}", identity);
                parent.resolve_identity(identity)
            }
            None => Err(LookupError::not_found(identity.clone())),
        }
    }

    fn build(
        &self,
        identity: &RoleIdentity,
        descriptor: &ComponentDescriptor,
    ) -> LookupResult<ComponentInstance> {
        let _frame = ResolutionFrame::enter(self.inner.id, identity, &self.inner.config)?;
        let implementation = &descriptor.implementation;
        debug!("构造组件: {} ({})", identity, implementation.type_name());

        let failed = |error: ComponentError| {
            error!("组件创建失败: {}, 原因: {}", identity, error);
            LookupError::construction_failed(identity, error)
        };

        let mut component = implementation.construct().map_err(failed)?;

        for dependency in &descriptor.dependencies {
            let value = self
                .resolve_dependency(descriptor, dependency)
                .map_err(|error| LookupError::construction_failed(identity, error))?;
            component.inject(&dependency.name, value).map_err(failed)?;
        }

        let handlers = self.inner.handlers.read().clone();
        for handler in handlers {
            handler.handle(&mut *component, descriptor).map_err(failed)?;
        }

        implementation.publish(component).map_err(failed)
    }

    fn resolve_dependency(
        &self,
        descriptor: &ComponentDescriptor,
        dependency: &ComponentDependency,
    ) -> LookupResult<Injected> {
        if dependency.role_type == logger_role() {
            let name = descriptor.implementation.type_name().clone();
            return Ok(Injected::Logger(ComponentLogger::for_type(name)));
        }

        match &dependency.role_type {
            RoleType::Simple(_) => self
                .resolve(&dependency.role_type, dependency.hint())
                .map(Injected::Single),
            RoleType::ListOf(_) => {
                let element = dependency.role_type.element();
                let instances = if dependency.hints.is_empty() {
                    self.resolve_all(&element)?
                } else {
                    dependency
                        .hints
                        .iter()
                        .map(|hint| self.resolve(&element, hint))
                        .collect::<LookupResult<Vec<_>>>()?
                };
                Ok(Injected::List(instances))
            }
            RoleType::MapOf(_) => {
                let element = dependency.role_type.element();
                let instances = if dependency.hints.is_empty() {
                    self.resolve_all_as_map(&element)?
                } else {
                    dependency
                        .hints
                        .iter()
                        .map(|hint| Ok((hint.clone(), self.resolve(&element, hint)?)))
                        .collect::<LookupResult<IndexMap<_, _>>>()?
                };
                Ok(Injected::Map(instances))
            }
            RoleType::ProviderOf(_) => {
                let instance = self.resolve(&dependency.role_type, dependency.hint())?;
                let provider = instance.downcast::<dyn ComponentProvider>().ok_or_else(|| {
                    LookupError::TypeMismatch {
                        expected: std::any::type_name::<dyn ComponentProvider>().to_string(),
                        implementation: instance.implementation().clone(),
                    }
                })?;
                Ok(Injected::Provider(provider))
            }
        }
    }

    fn lazy_provider(&self, identity: &RoleIdentity) -> ComponentInstance {
        let target = RoleIdentity::new(identity.role_type.element(), identity.hint.clone());
        debug!("使用延迟提供者: {}", identity);
        let provider = LazyProvider::new(Arc::downgrade(&self.inner), target);
        ComponentInstance::new::<LazyProvider, dyn ComponentProvider>(Arc::new(provider), |c| c)
    }
}

impl ComponentResolver for ComponentManager {
    fn resolve(&self, role_type: &RoleType, hint: &str) -> LookupResult<ComponentInstance> {
        let identity = RoleIdentity::new(role_type.clone(), hint);
        match self.resolve_identity(&identity) {
            Err(LookupError::NotFound { identity: missing })
                if missing == identity && matches!(role_type, RoleType::ProviderOf(_)) =>
            {
                Ok(self.lazy_provider(&identity))
            }
            other => other,
        }
    }

    fn resolve_all(&self, role_type: &RoleType) -> LookupResult<Vec<ComponentInstance>> {
        Ok(self.resolve_all_as_map(role_type)?.into_values().collect())
    }

    fn resolve_all_as_map(
        &self,
        role_type: &RoleType,
    ) -> LookupResult<IndexMap<String, ComponentInstance>> {
        let mut instances = IndexMap::new();
        for descriptor in self.local_descriptors_of(role_type) {
            let identity = descriptor.identity();
            let instance = self.resolve_identity(&identity)?;
            instances.insert(identity.hint, instance);
        }

        if let Some(parent) = self.parent() {
            for (hint, instance) in parent.resolve_all_as_map(role_type)? {
                instances.entry(hint).or_insert(instance);
            }
        }
        Ok(instances)
    }
}
