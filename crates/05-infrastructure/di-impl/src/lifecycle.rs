//! 组件生命周期控制
//!
//! 负责初始化处理器以及单例的销毁、释放与管理器关闭。

use di_abstractions::{
    Component, ComponentDescriptor, ComponentEvent, ComponentInstance, ComponentRegistry,
    LifecycleHandler,
};
use infrastructure_common::{
    ComponentError, ComponentResult, Disposable, DisposalError, DisposalResult, RoleIdentity,
    RoleType, DEFAULT_DISPOSE_PRIORITY, DEFAULT_HINT,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::manager::ComponentManager;

/// 可初始化组件处理器
///
/// 依赖注入完成后调用组件的 [`infrastructure_common::Initializable::initialize`]。
#[derive(Debug, Default, Clone, Copy)]
pub struct InitializableLifecycleHandler;

impl LifecycleHandler for InitializableLifecycleHandler {
    fn name(&self) -> &str {
        "initializable"
    }

    fn handle(
        &self,
        component: &mut dyn Component,
        descriptor: &ComponentDescriptor,
    ) -> ComponentResult<()> {
        if let Some(initializable) = component.initializable() {
            debug!("初始化组件: {}", descriptor.identity());
            initializable.initialize()?;
        }
        Ok(())
    }
}

impl ComponentManager {
    /// 是否为管理器自身注册的实例
    fn is_self(&self, instance: &ComponentInstance) -> bool {
        instance
            .downcast::<ComponentManager>()
            .map_or(false, |manager| Arc::ptr_eq(&manager.inner, &self.inner))
    }

    /// 销毁单个实例，失败时记录日志并返回错误
    ///
    /// 调用方不得持有管理器锁：嵌套管理器的销毁会获取它自己的锁。
    pub(crate) fn teardown(
        &self,
        identity: &RoleIdentity,
        instance: &ComponentInstance,
    ) -> ComponentResult<()> {
        if self.is_self(instance) {
            return Ok(());
        }
        let Some(disposable) = instance.disposable() else {
            return Ok(());
        };

        info!("销毁组件: {}", identity);
        disposable.dispose().map_err(|error| {
            warn!("组件销毁失败: {}, 原因: {}", identity, error);
            error
        })
    }

    /// 移出缓存的单例并销毁，销毁失败只记录日志
    pub fn dispose_one(&self, identity: &RoleIdentity) {
        let evicted = {
            let _guard = self.inner.lock.lock();
            self.inner.instances.remove(identity).map(|(_, instance)| instance)
        };
        if let Some(instance) = evicted {
            let _ = self.teardown(identity, &instance);
        }
    }

    /// 按销毁优先级升序销毁全部单例，优先级相同时按绑定顺序
    ///
    /// 管理器自身注册的实例不参与。
    pub fn dispose_all(&self) {
        let _ = self.dispose_live_singletons();
    }

    /// 销毁全部单例，返回销毁失败的角色标识
    ///
    /// 在锁内把实例移出缓存，释放锁之后再逐个销毁。
    fn dispose_live_singletons(&self) -> Vec<String> {
        let mut live: Vec<(i32, RoleIdentity, ComponentInstance)> = {
            let _guard = self.inner.lock.lock();
            let identities: Vec<RoleIdentity> =
                self.inner.descriptors.read().keys().cloned().collect();

            identities
                .into_iter()
                .filter_map(|identity| {
                    let instance = self.inner.instances.get(&identity)?.value().clone();
                    if self.is_self(&instance) {
                        return None;
                    }
                    self.inner.instances.remove(&identity);
                    let priority = instance.dispose_priority().unwrap_or(DEFAULT_DISPOSE_PRIORITY);
                    Some((priority, identity, instance))
                })
                .collect()
        };
        live.sort_by_key(|(priority, _, _)| *priority);

        info!("销毁全部组件: {} 个", live.len());
        let mut failed = Vec::new();
        for (_, identity, instance) in live {
            if self.teardown(&identity, &instance).is_err() {
                failed.push(identity.to_string());
            }
        }
        failed
    }

    /// 释放实例：注销并以同一描述符重新注册，下次解析时重新构造
    ///
    /// 实例不在缓存中时不做任何事，返回 `false`。
    pub fn release<R: ?Sized>(&self, instance: &Arc<R>) -> bool {
        self.release_where(|cached| cached.is_same(instance))
    }

    /// 按已发布实例释放
    pub fn release_instance(&self, instance: &ComponentInstance) -> bool {
        self.release_where(|cached| cached.ptr_eq(instance))
    }

    fn release_where(&self, matches: impl Fn(&ComponentInstance) -> bool) -> bool {
        let released = {
            let _guard = self.inner.lock.lock();
            let identity = self
                .inner
                .instances
                .iter()
                .find(|entry| matches(entry.value()))
                .map(|entry| entry.key().clone());

            let Some(identity) = identity else {
                debug!("释放的实例不在缓存中，忽略");
                return false;
            };
            let Some((descriptor, instance)) = self.detach(&identity, None) else {
                return false;
            };
            self.inner
                .descriptors
                .write()
                .insert(identity.clone(), Arc::clone(&descriptor));
            (identity, descriptor, instance)
        };

        let (identity, descriptor, instance) = released;
        info!("释放组件: {}", identity);
        if let Some(instance) = instance {
            let _ = self.teardown(&identity, &instance);
        }
        self.notify(ComponentEvent::unregistered(Arc::clone(&descriptor), self.inner.id));
        self.notify(ComponentEvent::registered(descriptor, self.inner.id));
        true
    }

    /// 关闭管理器
    ///
    /// 销毁全部单例，移除自身注册并与父管理器解除关联。
    /// 即使部分组件销毁失败，关闭过程仍会完成，失败的组件在错误中列出。
    pub fn close(&self) -> DisposalResult<()> {
        let failed = self.dispose_live_singletons();

        let self_role = RoleType::of::<ComponentManager>();
        let self_bound = self
            .inner
            .instances
            .get(&RoleIdentity::new(self_role.clone(), DEFAULT_HINT))
            .map_or(false, |entry| self.is_self(entry.value()));
        if self_bound {
            self.unregister(&self_role, DEFAULT_HINT);
        }

        self.set_parent(None);
        info!("组件管理器已关闭: {}", self.inner.id);

        if failed.is_empty() {
            Ok(())
        } else {
            Err(DisposalError::Incomplete { failed })
        }
    }
}

impl Component for ComponentManager {
    fn disposable(&self) -> Option<&dyn Disposable> {
        Some(self)
    }
}

impl Disposable for ComponentManager {
    fn dispose(&self) -> Result<(), ComponentError> {
        self.dispose_all();
        Ok(())
    }
}
