//! 组件管理器
//!
//! 每个管理器持有自己的描述符表与单例缓存，可选地挂在一个父管理器之下。
//! 所有变更与构造都在同一把可重入锁内串行执行，同一线程上的递归构造不会死锁。

use dashmap::DashMap;
use di_abstractions::{
    Component, ComponentDescriptor, ComponentEvent, ComponentEventListener, ComponentEventType,
    ComponentInstance, ComponentRegistry, Implementation, LifecycleHandler,
};
use indexmap::IndexMap;
use infrastructure_common::{
    ManagerConfig, RegistrationError, RoleIdentity, RoleType, DEFAULT_HINT,
};
use parking_lot::{ReentrantMutex, RwLock};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::lifecycle::InitializableLifecycleHandler;

pub(crate) struct ManagerInner {
    pub(crate) id: Uuid,
    pub(crate) config: ManagerConfig,
    /// 串行化注册变更与组件构造
    pub(crate) lock: ReentrantMutex<()>,
    /// 按绑定顺序保存的描述符
    pub(crate) descriptors: RwLock<IndexMap<RoleIdentity, Arc<ComponentDescriptor>>>,
    /// 单例缓存
    pub(crate) instances: DashMap<RoleIdentity, ComponentInstance>,
    pub(crate) parent: RwLock<Option<ComponentManager>>,
    pub(crate) listener: RwLock<Option<Arc<dyn ComponentEventListener>>>,
    pub(crate) handlers: RwLock<Vec<Arc<dyn LifecycleHandler>>>,
}

/// 分层组件管理器
///
/// 句柄可以廉价克隆，所有克隆共享同一份注册表与缓存。
#[derive(Clone)]
pub struct ComponentManager {
    pub(crate) inner: Arc<ManagerInner>,
}

impl ComponentManager {
    /// 使用默认配置创建管理器
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::default())
    }

    /// 使用指定配置创建管理器
    pub fn with_config(config: ManagerConfig) -> Self {
        let mut handlers: Vec<Arc<dyn LifecycleHandler>> = Vec::new();
        if config.install_default_lifecycle_handlers {
            handlers.push(Arc::new(InitializableLifecycleHandler));
        }

        let id = Uuid::new_v4();
        debug!("创建组件管理器: {}", id);

        Self {
            inner: Arc::new(ManagerInner {
                id,
                config,
                lock: ReentrantMutex::new(()),
                descriptors: RwLock::new(IndexMap::new()),
                instances: DashMap::new(),
                parent: RwLock::new(None),
                listener: RwLock::new(None),
                handlers: RwLock::new(handlers),
            }),
        }
    }

    /// 创建以当前管理器为父的子管理器，沿用当前配置
    pub fn create_child(&self) -> Self {
        let child = Self::with_config(self.inner.config.clone());
        child.set_parent(Some(self.clone()));
        child
    }

    /// 管理器标识
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// 管理器配置
    pub fn config(&self) -> &ManagerConfig {
        &self.inner.config
    }

    /// 父管理器
    pub fn parent(&self) -> Option<ComponentManager> {
        self.inner.parent.read().clone()
    }

    /// 设置父管理器
    ///
    /// 不检测父链上的环，调用方负责保证层级无环。
    pub fn set_parent(&self, parent: Option<ComponentManager>) {
        if let Some(parent) = &parent {
            debug!("设置父管理器: {} -> {}", self.inner.id, parent.inner.id);
        }
        *self.inner.parent.write() = parent;
    }

    /// 设置注册变更监听器，传入 `None` 移除监听器
    pub fn set_listener(&self, listener: Option<Arc<dyn ComponentEventListener>>) {
        *self.inner.listener.write() = listener;
    }

    /// 追加生命周期处理器，按追加顺序执行
    pub fn add_lifecycle_handler(&self, handler: Arc<dyn LifecycleHandler>) {
        debug!("添加生命周期处理器: {}", handler.name());
        self.inner.handlers.write().push(handler);
    }

    /// 已安装的生命周期处理器名称
    pub fn lifecycle_handler_names(&self) -> Vec<String> {
        self.inner
            .handlers
            .read()
            .iter()
            .map(|handler| handler.name().to_string())
            .collect()
    }

    /// 以预构建实例注册组件
    pub fn register_instance<T, R>(
        &self,
        hint: &str,
        instance: Arc<T>,
        cast: fn(Arc<T>) -> Arc<R>,
    ) -> Result<Arc<ComponentDescriptor>, RegistrationError>
    where
        T: Component,
        R: ?Sized + Send + Sync + 'static,
    {
        let descriptor =
            ComponentDescriptor::new(RoleType::of::<R>(), Implementation::prebuilt(cast))
                .with_hint(hint);
        self.register(descriptor, Some(ComponentInstance::new(instance, cast)))
    }

    /// 把管理器自身注册为 `ComponentManager` 角色
    ///
    /// 缓存中的自身实例与管理器互相持有，需要通过 [`ComponentManager::close`]
    /// 或注销该绑定来解除。
    pub fn register_self(&self) -> Result<Arc<ComponentDescriptor>, RegistrationError> {
        self.register_instance::<ComponentManager, ComponentManager>(
            DEFAULT_HINT,
            Arc::new(self.clone()),
            |c| c,
        )
    }

    /// 仅当当前绑定的正是该描述符时注销
    pub fn unregister_descriptor(
        &self,
        descriptor: &Arc<ComponentDescriptor>,
    ) -> Option<Arc<ComponentDescriptor>> {
        let identity = descriptor.identity();
        let detached = self.detach(&identity, Some(descriptor));
        self.finish_unregister(&identity, detached)
    }

    /// 本地是否存在该角色标识的绑定（不查询父管理器）
    pub fn has_local(&self, role_type: &RoleType, hint: &str) -> bool {
        let identity = RoleIdentity::new(role_type.clone(), hint);
        self.inner.descriptors.read().contains_key(&identity)
    }

    /// 本地全部描述符，按绑定顺序
    pub fn descriptors(&self) -> Vec<Arc<ComponentDescriptor>> {
        self.inner.descriptors.read().values().cloned().collect()
    }

    /// 当前缓存的单例数量
    pub fn live_instance_count(&self) -> usize {
        self.inner.instances.len()
    }

    pub(crate) fn local_descriptor(&self, identity: &RoleIdentity) -> Option<Arc<ComponentDescriptor>> {
        self.inner.descriptors.read().get(identity).cloned()
    }

    pub(crate) fn local_descriptors_of(&self, role_type: &RoleType) -> Vec<Arc<ComponentDescriptor>> {
        self.inner
            .descriptors
            .read()
            .values()
            .filter(|descriptor| &descriptor.role_type == role_type)
            .cloned()
            .collect()
    }

    /// 描述符是否仍是该角色标识的当前绑定
    pub(crate) fn is_bound(&self, identity: &RoleIdentity, descriptor: &Arc<ComponentDescriptor>) -> bool {
        self.local_descriptor(identity)
            .map_or(false, |bound| Arc::ptr_eq(&bound, descriptor))
    }

    /// 在锁内移除绑定及其缓存实例
    ///
    /// 给出 `expected` 时，只有当前绑定正是该描述符才移除。
    pub(crate) fn detach(
        &self,
        identity: &RoleIdentity,
        expected: Option<&Arc<ComponentDescriptor>>,
    ) -> Option<(Arc<ComponentDescriptor>, Option<ComponentInstance>)> {
        let _guard = self.inner.lock.lock();
        let removed = {
            let mut descriptors = self.inner.descriptors.write();
            if let Some(expected) = expected {
                let bound = descriptors.get(identity)?;
                if !Arc::ptr_eq(bound, expected) {
                    debug!("描述符已被替换，跳过注销: {}", identity);
                    return None;
                }
            }
            descriptors.shift_remove(identity)?
        };
        let instance = self
            .inner
            .instances
            .remove(identity)
            .map(|(_, instance)| instance);
        Some((removed, instance))
    }

    /// 锁外销毁被移除的实例并发出注销通知
    fn finish_unregister(
        &self,
        identity: &RoleIdentity,
        detached: Option<(Arc<ComponentDescriptor>, Option<ComponentInstance>)>,
    ) -> Option<Arc<ComponentDescriptor>> {
        let (removed, instance) = detached?;
        if let Some(instance) = instance {
            let _ = self.teardown(identity, &instance);
        }
        info!("注销组件: {}", identity);
        self.notify(ComponentEvent::unregistered(Arc::clone(&removed), self.inner.id));
        Some(removed)
    }

    /// 绑定描述符；替换已有绑定时先销毁旧实例
    ///
    /// 替换在锁内完成，旧实例的销毁与通知在锁外进行。
    pub(crate) fn bind(&self, descriptor: Arc<ComponentDescriptor>, prebuilt: Option<ComponentInstance>) {
        let identity = descriptor.identity();
        let replaced = {
            let _guard = self.inner.lock.lock();
            let previous = self
                .inner
                .descriptors
                .write()
                .insert(identity.clone(), Arc::clone(&descriptor));
            let stale = self
                .inner
                .instances
                .remove(&identity)
                .map(|(_, instance)| instance);
            if let Some(instance) = prebuilt {
                self.inner.instances.insert(identity.clone(), instance);
            }
            previous.map(|previous| (previous, stale))
        };

        if let Some((previous, stale)) = replaced {
            info!("替换组件: {}", identity);
            if let Some(stale) = stale {
                let _ = self.teardown(&identity, &stale);
            }
            self.notify(ComponentEvent::unregistered(previous, self.inner.id));
        }

        info!(
            "注册组件: {} ({})",
            identity,
            descriptor.implementation.type_name().short_name()
        );
        self.notify(ComponentEvent::registered(descriptor, self.inner.id));
    }

    pub(crate) fn notify(&self, event: ComponentEvent) {
        let listener = self.inner.listener.read().clone();
        let Some(listener) = listener else {
            return;
        };
        match event.event_type {
            ComponentEventType::Registered => {
                listener.on_component_registered(&event);
            }
            ComponentEventType::Unregistered => {
                listener.on_component_unregistered(&event);
            }
        }
    }
}

impl Default for ComponentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComponentManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentManager")
            .field("id", &self.inner.id)
            .field("descriptors", &self.inner.descriptors.read().len())
            .field("instances", &self.inner.instances.len())
            .field("has_parent", &self.inner.parent.read().is_some())
            .finish()
    }
}

impl ComponentRegistry for ComponentManager {
    fn register(
        &self,
        descriptor: ComponentDescriptor,
        instance: Option<ComponentInstance>,
    ) -> Result<Arc<ComponentDescriptor>, RegistrationError> {
        descriptor.validate()?;
        let descriptor = Arc::new(descriptor);
        self.bind(Arc::clone(&descriptor), instance);
        Ok(descriptor)
    }

    fn unregister(&self, role_type: &RoleType, hint: &str) -> Option<Arc<ComponentDescriptor>> {
        let identity = RoleIdentity::new(role_type.clone(), hint);
        let detached = self.detach(&identity, None);
        self.finish_unregister(&identity, detached)
    }

    fn has(&self, role_type: &RoleType) -> bool {
        let local = self
            .inner
            .descriptors
            .read()
            .keys()
            .any(|identity| &identity.role_type == role_type);
        local || self.parent().map_or(false, |parent| parent.has(role_type))
    }

    fn has_hint(&self, role_type: &RoleType, hint: &str) -> bool {
        self.has_local(role_type, hint)
            || self
                .parent()
                .map_or(false, |parent| parent.has_hint(role_type, hint))
    }

    fn descriptor_of(&self, role_type: &RoleType, hint: &str) -> Option<Arc<ComponentDescriptor>> {
        let identity = RoleIdentity::new(role_type.clone(), hint);
        self.local_descriptor(&identity).or_else(|| {
            self.parent()
                .and_then(|parent| parent.descriptor_of(role_type, hint))
        })
    }

    fn descriptors_of(&self, role_type: &RoleType) -> Vec<Arc<ComponentDescriptor>> {
        let mut descriptors = self.local_descriptors_of(role_type);
        if let Some(parent) = self.parent() {
            for descriptor in parent.descriptors_of(role_type) {
                let shadowed = descriptors.iter().any(|local| local.hint == descriptor.hint);
                if !shadowed {
                    descriptors.push(descriptor);
                }
            }
        }
        descriptors
    }
}
