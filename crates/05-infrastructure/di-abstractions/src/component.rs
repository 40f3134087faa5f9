//! 组件基础接口定义
//!
//! 提供所有组件实现必须实现的基础 trait，以及注入值与已发布实例的表示。

use crate::logger::ComponentLogger;
use crate::provider::ComponentProvider;
use indexmap::IndexMap;
use infrastructure_common::{
    ComponentError, ComponentResult, Disposable, Initializable, TypeName,
};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 类型擦除辅助 trait，对所有 `Any + Send + Sync` 类型自动实现
pub trait AsAny: Any + Send + Sync {
    /// 转换为 `Any` 引用
    fn as_any(&self) -> &dyn Any;

    /// 转换为装箱的 `Any`
    fn into_any_box(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_box(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

/// 组件基础 trait
///
/// 运行时不支持构造函数注入：组件先由零参构造函数创建，
/// 再按描述符中的依赖列表逐个调用 [`Component::inject`] 填充注入点。
pub trait Component: AsAny {
    /// 向指定注入点注入依赖
    fn inject(&mut self, point: &str, value: Injected) -> ComponentResult<()> {
        let _ = value;
        Err(ComponentError::unknown_injection_point(
            std::any::type_name::<Self>(),
            point,
        ))
    }

    /// 可初始化能力
    fn initializable(&mut self) -> Option<&mut dyn Initializable> {
        None
    }

    /// 可销毁能力
    fn disposable(&self) -> Option<&dyn Disposable> {
        None
    }
}

/// 已发布的组件实例
///
/// 同时持有用于生命周期管理的 `Arc<dyn Component>` 与按角色类型转换后的句柄。
#[derive(Clone)]
pub struct ComponentInstance {
    component: Arc<dyn Component>,
    handle: Arc<dyn Any + Send + Sync>,
    implementation: TypeName,
}

impl ComponentInstance {
    /// 发布组件实例，`cast` 负责把实现类型转换为角色类型
    pub fn new<T, R>(component: Arc<T>, cast: fn(Arc<T>) -> Arc<R>) -> Self
    where
        T: Component,
        R: ?Sized + Send + Sync + 'static,
    {
        let handle: Arc<R> = cast(Arc::clone(&component));
        Self {
            component,
            handle: Arc::new(handle),
            implementation: TypeName::of::<T>(),
        }
    }

    /// 按角色类型获取实例
    pub fn downcast<R: ?Sized + 'static>(&self) -> Option<Arc<R>> {
        self.handle.downcast_ref::<Arc<R>>().cloned()
    }

    /// 组件对象
    pub fn component(&self) -> &Arc<dyn Component> {
        &self.component
    }

    /// 实现类型名
    pub fn implementation(&self) -> &TypeName {
        &self.implementation
    }

    /// 可销毁能力
    pub fn disposable(&self) -> Option<&dyn Disposable> {
        self.component.disposable()
    }

    /// 销毁优先级，不可销毁的组件返回 `None`
    pub fn dispose_priority(&self) -> Option<i32> {
        self.disposable().map(Disposable::dispose_priority)
    }

    /// 引用同一性比较
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.data_ptr() == other.data_ptr()
    }

    /// 是否与给定的 `Arc` 指向同一个对象
    pub fn is_same<R: ?Sized>(&self, instance: &Arc<R>) -> bool {
        self.data_ptr() == Arc::as_ptr(instance).cast::<()>()
    }

    fn data_ptr(&self) -> *const () {
        Arc::as_ptr(&self.component).cast::<()>()
    }
}

impl fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("implementation", &self.implementation)
            .field("ptr", &self.data_ptr())
            .finish()
    }
}

/// 注入值
pub enum Injected {
    /// 单个实例
    Single(ComponentInstance),
    /// 某角色的全部实例（本地优先，按绑定顺序）
    List(Vec<ComponentInstance>),
    /// 提示名到实例的映射
    Map(IndexMap<String, ComponentInstance>),
    /// 延迟提供者
    Provider(Arc<dyn ComponentProvider>),
    /// 以实现类型命名的日志器
    Logger(ComponentLogger),
}

impl Injected {
    /// 取出单个实例并转换为角色类型
    pub fn into_single<R: ?Sized + 'static>(self) -> ComponentResult<Arc<R>> {
        match self {
            Self::Single(instance) => cast_instance(&instance),
            other => Err(other.mismatch("single")),
        }
    }

    /// 取出实例列表
    pub fn into_list<R: ?Sized + 'static>(self) -> ComponentResult<Vec<Arc<R>>> {
        match self {
            Self::List(instances) => instances.iter().map(cast_instance).collect(),
            other => Err(other.mismatch("list")),
        }
    }

    /// 取出提示名映射
    pub fn into_map<R: ?Sized + 'static>(self) -> ComponentResult<IndexMap<String, Arc<R>>> {
        match self {
            Self::Map(instances) => instances
                .iter()
                .map(|(hint, instance)| Ok((hint.clone(), cast_instance(instance)?)))
                .collect(),
            other => Err(other.mismatch("map")),
        }
    }

    /// 取出提供者
    pub fn into_provider(self) -> ComponentResult<Arc<dyn ComponentProvider>> {
        match self {
            Self::Provider(provider) => Ok(provider),
            other => Err(other.mismatch("provider")),
        }
    }

    /// 取出日志器
    pub fn into_logger(self) -> ComponentResult<ComponentLogger> {
        match self {
            Self::Logger(logger) => Ok(logger),
            other => Err(other.mismatch("logger")),
        }
    }

    /// 注入值种类名称
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Single(_) => "single",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Provider(_) => "provider",
            Self::Logger(_) => "logger",
        }
    }

    fn mismatch(&self, expected: &str) -> ComponentError {
        ComponentError::InjectionTypeMismatch {
            expected: expected.to_string(),
            actual: self.kind().to_string(),
        }
    }
}

impl fmt::Debug for Injected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(instance) => f.debug_tuple("Single").field(instance).finish(),
            Self::List(instances) => f.debug_tuple("List").field(instances).finish(),
            Self::Map(instances) => f.debug_tuple("Map").field(instances).finish(),
            Self::Provider(_) => f.write_str("Provider(<provider>)"),
            Self::Logger(logger) => f.debug_tuple("Logger").field(logger).finish(),
        }
    }
}

fn cast_instance<R: ?Sized + 'static>(instance: &ComponentInstance) -> ComponentResult<Arc<R>> {
    instance
        .downcast::<R>()
        .ok_or_else(|| ComponentError::InjectionTypeMismatch {
            expected: std::any::type_name::<R>().to_string(),
            actual: instance.implementation().to_string(),
        })
}
