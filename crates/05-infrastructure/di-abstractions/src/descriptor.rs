//! 组件描述符
//!
//! 描述符是声明式的元数据：角色、提示名、实现、实例化策略、依赖列表与优先级。
//! 描述符由外部生产者创建，通过 `register` 交给注册表。

use crate::component::{AsAny, Component, ComponentInstance};
use infrastructure_common::{
    BindingKind, ComponentError, ComponentResult, InstantiationStrategy, RegistrationError,
    RoleIdentity, RoleType, TypeName, DEFAULT_HINT,
};
use std::fmt;
use std::sync::Arc;

/// 默认优先级，数值越小优先级越高
pub const DEFAULT_PRIORITY: i32 = 1000;

type ConstructFn = dyn Fn() -> ComponentResult<Box<dyn Component>> + Send + Sync;
type PublishFn = dyn Fn(Box<dyn Component>) -> ComponentResult<ComponentInstance> + Send + Sync;

/// 组件实现
///
/// 持有实现类型名、零参构造函数以及把构造完成的对象发布为角色实例的转换函数。
#[derive(Clone)]
pub struct Implementation {
    type_name: TypeName,
    construct: Arc<ConstructFn>,
    publish: Arc<PublishFn>,
}

impl Implementation {
    /// 使用 `Default` 作为零参构造函数
    pub fn of<T, R>(cast: fn(Arc<T>) -> Arc<R>) -> Self
    where
        T: Component + Default,
        R: ?Sized + Send + Sync + 'static,
    {
        Self::with_constructor(|| Ok(T::default()), cast)
    }

    /// 使用自定义的零参构造函数
    pub fn with_constructor<T, R, F>(constructor: F, cast: fn(Arc<T>) -> Arc<R>) -> Self
    where
        T: Component,
        R: ?Sized + Send + Sync + 'static,
        F: Fn() -> ComponentResult<T> + Send + Sync + 'static,
    {
        Self {
            type_name: TypeName::of::<T>(),
            construct: Arc::new(move || {
                let component: Box<dyn Component> = Box::new(constructor()?);
                Ok(component)
            }),
            publish: Arc::new(move |component: Box<dyn Component>| {
                let component = AsAny::into_any_box(component)
                    .downcast::<T>()
                    .map_err(|_| ComponentError::InjectionTypeMismatch {
                        expected: std::any::type_name::<T>().to_string(),
                        actual: "<unknown component>".to_string(),
                    })?;
                Ok(ComponentInstance::new(Arc::from(component), cast))
            }),
        }
    }

    /// 预构建实例的实现：只能以注册时提供的实例发布，不能重新构造
    pub fn prebuilt<T, R>(cast: fn(Arc<T>) -> Arc<R>) -> Self
    where
        T: Component,
        R: ?Sized + Send + Sync + 'static,
    {
        Self::with_constructor(
            || -> ComponentResult<T> {
                Err(ComponentError::initialization(format!(
                    "{} 只能以预构建实例注册",
                    std::any::type_name::<T>()
                )))
            },
            cast,
        )
    }

    /// 实现类型名
    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// 调用零参构造函数
    pub fn construct(&self) -> ComponentResult<Box<dyn Component>> {
        (self.construct)()
    }

    /// 发布构造、注入、初始化完成的组件
    pub fn publish(&self, component: Box<dyn Component>) -> ComponentResult<ComponentInstance> {
        (self.publish)(component)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("type_name", &self.type_name)
            .field("construct", &"<function>")
            .finish()
    }
}

/// 组件依赖
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDependency {
    /// 注入点名称
    pub name: String,
    /// 目标角色类型，其变体决定绑定方式
    pub role_type: RoleType,
    /// 提示名列表
    ///
    /// 单值与提供者绑定取第一个（为空时为 `"default"`）；
    /// 列表与映射绑定为空时注入全部绑定，否则只注入列出的提示名。
    pub hints: Vec<String>,
}

impl ComponentDependency {
    /// 创建新的依赖
    pub fn new(name: impl Into<String>, role_type: RoleType) -> Self {
        Self {
            name: name.into(),
            role_type,
            hints: Vec::new(),
        }
    }

    /// 单值依赖
    pub fn single<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new(name, RoleType::of::<T>())
    }

    /// 列表依赖
    pub fn list<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new(name, RoleType::list_of::<T>())
    }

    /// 映射依赖
    pub fn map<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new(name, RoleType::map_of::<T>())
    }

    /// 延迟提供者依赖
    pub fn provider<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new(name, RoleType::provider_of::<T>())
    }

    /// 设置单个提示名
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints = vec![hint.into()];
        self
    }

    /// 设置多个提示名
    pub fn with_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hints = hints.into_iter().map(Into::into).collect();
        self
    }

    /// 单值提示名
    pub fn hint(&self) -> &str {
        self.hints.first().map_or(DEFAULT_HINT, String::as_str)
    }

    /// 绑定方式
    pub fn binding_kind(&self) -> BindingKind {
        self.role_type.binding_kind()
    }
}

/// 组件描述符
#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    /// 角色类型
    pub role_type: RoleType,
    /// 提示名
    pub hint: String,
    /// 实现
    pub implementation: Implementation,
    /// 实例化策略
    pub instantiation_strategy: InstantiationStrategy,
    /// 依赖列表（按注入顺序）
    pub dependencies: Vec<ComponentDependency>,
    /// 角色类型优先级
    pub role_type_priority: i32,
    /// 提示名优先级
    pub role_hint_priority: i32,
    /// 是否必需
    pub mandatory: bool,
}

impl ComponentDescriptor {
    /// 创建新的组件描述符（单例，默认提示名）
    pub fn new(role_type: RoleType, implementation: Implementation) -> Self {
        Self {
            role_type,
            hint: DEFAULT_HINT.to_string(),
            implementation,
            instantiation_strategy: InstantiationStrategy::Singleton,
            dependencies: Vec::new(),
            role_type_priority: DEFAULT_PRIORITY,
            role_hint_priority: DEFAULT_PRIORITY,
            mandatory: false,
        }
    }

    /// 类型化创建：实现 `T` 以角色 `R` 发布
    pub fn of<R, T>(cast: fn(Arc<T>) -> Arc<R>) -> Self
    where
        R: ?Sized + Send + Sync + 'static,
        T: Component + Default,
    {
        Self::new(RoleType::of::<R>(), Implementation::of(cast))
    }

    /// 设置提示名
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// 设置实例化策略
    pub fn with_strategy(mut self, strategy: InstantiationStrategy) -> Self {
        self.instantiation_strategy = strategy;
        self
    }

    /// 设置为每次查找创建新实例
    pub fn per_lookup(self) -> Self {
        self.with_strategy(InstantiationStrategy::PerLookup)
    }

    /// 添加依赖
    pub fn with_dependency(mut self, dependency: ComponentDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// 设置角色类型优先级
    pub fn with_role_type_priority(mut self, priority: i32) -> Self {
        self.role_type_priority = priority;
        self
    }

    /// 设置提示名优先级
    pub fn with_role_hint_priority(mut self, priority: i32) -> Self {
        self.role_hint_priority = priority;
        self
    }

    /// 设置是否必需
    pub fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// 角色标识
    pub fn identity(&self) -> RoleIdentity {
        RoleIdentity::new(self.role_type.clone(), self.hint.clone())
    }

    /// 是否为单例
    pub fn is_singleton(&self) -> bool {
        self.instantiation_strategy == InstantiationStrategy::Singleton
    }

    /// 结构校验
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.role_type.type_name().is_empty() {
            return Err(RegistrationError::invalid(self.identity(), "角色类型名为空"));
        }
        if self.implementation.type_name().is_empty() {
            return Err(RegistrationError::invalid(self.identity(), "实现类型名为空"));
        }
        for dependency in &self.dependencies {
            if dependency.name.trim().is_empty() {
                return Err(RegistrationError::invalid(self.identity(), "依赖注入点名称为空"));
            }
            if dependency.role_type.type_name().is_empty() {
                return Err(RegistrationError::invalid(
                    self.identity(),
                    format!("依赖 {} 的角色类型名为空", dependency.name),
                ));
            }
        }
        Ok(())
    }
}
