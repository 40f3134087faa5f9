//! # 示例应用程序
//!
//! 演示如何使用组件管理器：加载描述符、分层解析、依赖注入与关闭

use anyhow::Context;
use clap::Parser;
use di_abstractions::{
    logger_role, Component, ComponentDependency, ComponentDescriptor, ComponentLogger,
    ComponentRegistry, ComponentResolver, Injected,
};
use di_impl::{ComponentLoader, ComponentManager, LoggingEventListener, StaticDescriptorProducer};
use infrastructure_common::{
    init_logging, ComponentError, ComponentResult, Disposable, LoggingConfig, ManagerConfig,
    DEFAULT_HINT,
};
use std::sync::Arc;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "组件管理器示例应用")]
struct Args {
    /// 组件管理器配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 问候语言（提示名）
    #[arg(long, default_value = "default")]
    locale: String,

    /// 被问候的名字
    #[arg(long, default_value = "World")]
    name: String,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 使用 JSON 日志格式
    #[arg(long)]
    json: bool,
}

/// 问候服务角色
trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

#[derive(Default)]
struct EnglishGreeter;

impl Greeter for EnglishGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Hello, {name}!")
    }
}

impl Component for EnglishGreeter {}

#[derive(Default)]
struct FrenchGreeter;

impl Greeter for FrenchGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Bonjour, {name} !")
    }
}

impl Component for FrenchGreeter {}

#[derive(Default)]
struct GermanGreeter;

impl Greeter for GermanGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Hallo, {name}!")
    }
}

impl Component for GermanGreeter {}

/// 欢迎服务：依赖一个问候服务和组件日志器
#[derive(Default)]
struct WelcomeService {
    greeter: Option<Arc<dyn Greeter>>,
    logger: Option<ComponentLogger>,
}

impl WelcomeService {
    fn welcome(&self, name: &str) -> Option<String> {
        let message = self.greeter.as_ref()?.greet(name);
        if let Some(logger) = &self.logger {
            logger.info(format!("欢迎 {name}"));
        }
        Some(message)
    }
}

impl Disposable for WelcomeService {
    fn dispose(&self) -> Result<(), ComponentError> {
        if let Some(logger) = &self.logger {
            logger.info("欢迎服务已销毁");
        }
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

    fn disposable(&self) -> Option<&dyn Disposable> {
        Some(self)
    }
}

fn welcome_service(locale: &str) -> ComponentDescriptor {
    ComponentDescriptor::of::<WelcomeService, WelcomeService>(|c| c)
        .with_dependency(ComponentDependency::single::<dyn Greeter>("greeter").with_hint(locale))
        .with_dependency(ComponentDependency::new("logger", logger_role()))
}

fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

fn load_manager_config(args: &Args) -> anyhow::Result<ManagerConfig> {
    match &args.config {
        Some(path) => ManagerConfig::load(path).with_context(|| format!("加载配置失败: {path}")),
        None => {
            info!("未指定配置文件，使用默认配置");
            Ok(ManagerConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logging = if args.json {
        LoggingConfig::production()
    } else {
        LoggingConfig::default()
    };
    init_logging(&logging.with_level(parse_log_level(&args.log_level)))?;

    info!("启动组件管理器示例应用");

    let config = load_manager_config(&args)?;
    info!("组件管理器配置: {}", config.to_json());

    // 应用级管理器：通过加载器注册全部问候服务
    let application = ComponentManager::with_config(config);
    application.set_listener(Some(Arc::new(LoggingEventListener)));
    application.register_self()?;

    let loader = ComponentLoader::new()
        .with_producer(Arc::new(StaticDescriptorProducer::new(
            "builtin",
            vec![
                ComponentDescriptor::of::<dyn Greeter, EnglishGreeter>(|c| c),
                ComponentDescriptor::of::<dyn Greeter, FrenchGreeter>(|c| c).with_hint("fr"),
            ],
        )))
        .with_producer(Arc::new(StaticDescriptorProducer::new(
            "extra",
            vec![ComponentDescriptor::of::<dyn Greeter, GermanGreeter>(|c| c).with_hint("de")],
        )));
    loader.load_into(&application).await?;

    let greeters = application.lookup_map::<dyn Greeter>()?;
    for (hint, greeter) in &greeters {
        info!("可用问候服务 {}: {}", hint, greeter.greet(&args.name));
    }

    // 请求级子管理器：只注册依赖指定语言的欢迎服务
    let request = application.create_child();
    request.register(welcome_service(&args.locale), None)?;

    let service = request.lookup::<WelcomeService>(DEFAULT_HINT)?;
    match service.welcome(&args.name) {
        Some(message) => println!("{message}"),
        None => println!("没有可用的问候服务"),
    }

    request.close()?;
    application.close()?;

    info!("应用已关闭");
    Ok(())
}
