//! 集中测试工程的共享测试组件

use di_abstractions::{
    logger_role, Component, ComponentDependency, ComponentDescriptor, ComponentLogger,
    ComponentResolver, Implementation, Injected,
};
use di_impl::ComponentManager;
use infrastructure_common::{
    ComponentError, ComponentResult, Disposable, Initializable, RoleType, DEFAULT_HINT,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// 问候服务角色
pub trait Greeter: Send + Sync {
    /// 生成问候语
    fn greet(&self, name: &str) -> String;
}

/// 英文问候
#[derive(Debug, Default)]
pub struct EnglishGreeter;

impl Greeter for EnglishGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Hello, {name}")
    }
}

impl Component for EnglishGreeter {}

/// 法文问候
#[derive(Debug, Default)]
pub struct FrenchGreeter;

impl Greeter for FrenchGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Bonjour, {name}")
    }
}

impl Component for FrenchGreeter {}

/// 依赖问候服务的欢迎服务
#[derive(Default)]
pub struct WelcomeService {
    greeter: Option<Arc<dyn Greeter>>,
    logger: Option<ComponentLogger>,
    ready: bool,
}

impl WelcomeService {
    /// 欢迎指定用户
    pub fn welcome(&self, name: &str) -> String {
        let message = self
            .greeter
            .as_ref()
            .map(|greeter| greeter.greet(name))
            .unwrap_or_default();
        if let Some(logger) = &self.logger {
            logger.debug(format!("welcome {name}"));
        }
        message
    }

    /// 是否已初始化
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// 注入的日志器
    pub fn logger(&self) -> Option<&ComponentLogger> {
        self.logger.as_ref()
    }
}

impl Initializable for WelcomeService {
    fn initialize(&mut self) -> Result<(), ComponentError> {
        self.ready = self.greeter.is_some();
        Ok(())
    }
}

impl Component for WelcomeService {
    fn inject(&mut self, point: &str, value: Injected) -> ComponentResult<()> {
        match point {
            "greeter" => self.greeter = Some(value.into_single()?),
            "logger" => self.logger = Some(value.into_logger()?),
            other => {
                return Err(ComponentError::unknown_injection_point(
                    "WelcomeService",
                    other,
                ))
            }
        }
        Ok(())
    }

    fn initializable(&mut self) -> Option<&mut dyn Initializable> {
        Some(self)
    }
}

/// 欢迎服务描述符，问候服务使用指定提示名
pub fn welcome_service(greeter_hint: &str) -> ComponentDescriptor {
    ComponentDescriptor::of::<WelcomeService, WelcomeService>(|c| c)
        .with_dependency(ComponentDependency::single::<dyn Greeter>("greeter").with_hint(greeter_hint))
        .with_dependency(ComponentDependency::new("logger", logger_role()))
}

/// 通过注入的组件管理器按需查找问候服务的组件
#[derive(Default)]
pub struct GreeterDirectory {
    manager: Option<Arc<ComponentManager>>,
}

impl GreeterDirectory {
    /// 按提示名查找问候服务
    pub fn find(&self, hint: &str) -> Option<Arc<dyn Greeter>> {
        self.manager
            .as_ref()?
            .lookup::<dyn Greeter>(hint)
            .ok()
    }
}

impl Component for GreeterDirectory {
    fn inject(&mut self, point: &str, value: Injected) -> ComponentResult<()> {
        match point {
            "manager" => {
                self.manager = Some(value.into_single()?);
                Ok(())
            }
            other => Err(ComponentError::unknown_injection_point(
                "GreeterDirectory",
                other,
            )),
        }
    }
}

/// 目录组件描述符，依赖管理器自身注册的 `ComponentManager` 角色
pub fn greeter_directory() -> ComponentDescriptor {
    ComponentDescriptor::of::<GreeterDirectory, GreeterDirectory>(|c| c).with_dependency(
        ComponentDependency::new("manager", RoleType::of::<ComponentManager>())
            .with_hint(DEFAULT_HINT),
    )
}

/// 记录销毁顺序的资源组件
pub struct TrackedResource {
    label: String,
    priority: i32,
    journal: Arc<Mutex<Vec<String>>>,
}

impl Disposable for TrackedResource {
    fn dispose(&self) -> Result<(), ComponentError> {
        self.journal.lock().push(self.label.clone());
        Ok(())
    }

    fn dispose_priority(&self) -> i32 {
        self.priority
    }
}

impl Component for TrackedResource {
    fn disposable(&self) -> Option<&dyn Disposable> {
        Some(self)
    }
}

/// 资源组件描述符，提示名即标签
pub fn tracked_resource(
    label: &str,
    priority: i32,
    journal: &Arc<Mutex<Vec<String>>>,
) -> ComponentDescriptor {
    let journal = Arc::clone(journal);
    let name = label.to_string();
    ComponentDescriptor::new(
        RoleType::of::<TrackedResource>(),
        Implementation::with_constructor(
            move || {
                Ok(TrackedResource {
                    label: name.clone(),
                    priority,
                    journal: Arc::clone(&journal),
                })
            },
            |c: Arc<TrackedResource>| c,
        ),
    )
    .with_hint(label)
}
