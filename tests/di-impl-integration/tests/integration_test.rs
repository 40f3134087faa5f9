//! 跨 crate 的组件管理器集成测试

use async_trait::async_trait;
use di_abstractions::{
    ComponentDescriptor, ComponentRegistry, ComponentResolver, DescriptorProducer,
};
use di_impl::{ComponentLoader, ComponentManager, LoggingEventListener, StaticDescriptorProducer};
use di_impl_integration_tests::{
    greeter_directory, tracked_resource, welcome_service, EnglishGreeter, FrenchGreeter, Greeter,
    GreeterDirectory, TrackedResource, WelcomeService,
};
use infrastructure_common::{
    init_logging, LoggingConfig, ManagerConfig, RegistrationError, RoleType, DEFAULT_HINT,
};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

fn english() -> ComponentDescriptor {
    ComponentDescriptor::of::<dyn Greeter, EnglishGreeter>(|c| c)
}

fn french() -> ComponentDescriptor {
    ComponentDescriptor::of::<dyn Greeter, FrenchGreeter>(|c| c)
}

/// 模拟注解扫描的生产者
struct ScannedProducer {
    locale: &'static str,
}

#[async_trait]
impl DescriptorProducer for ScannedProducer {
    async fn produce(&self) -> Result<Vec<ComponentDescriptor>, RegistrationError> {
        tokio::task::yield_now().await;
        match self.locale {
            "en" => Ok(vec![english().with_role_hint_priority(900)]),
            "fr" => Ok(vec![
                french().with_role_hint_priority(100),
                welcome_service(DEFAULT_HINT),
            ]),
            other => Err(RegistrationError::ProducerFailed {
                producer: "scanned".to_string(),
                message: format!("未知语言: {other}"),
            }),
        }
    }

    fn name(&self) -> &str {
        self.locale
    }
}

#[tokio::test]
async fn test_loader_feeds_manager_by_priority() -> anyhow::Result<()> {
    let _ = init_logging(&LoggingConfig::development());

    let manager = ComponentManager::new();
    manager.set_listener(Some(Arc::new(LoggingEventListener)));

    let loader = ComponentLoader::new()
        .with_producer(Arc::new(ScannedProducer { locale: "en" }))
        .with_producer(Arc::new(ScannedProducer { locale: "fr" }));
    let registered = loader.load_into(&manager).await?;
    assert_eq!(registered.len(), 2);

    let service = manager.lookup::<WelcomeService>(DEFAULT_HINT)?;
    assert!(service.is_ready());
    assert_eq!(service.welcome("Ada"), "Bonjour, Ada");
    assert_eq!(
        service.logger().map(|logger| logger.name().short_name()),
        Some("WelcomeService")
    );
    Ok(())
}

#[tokio::test]
async fn test_unknown_producer_fails() {
    let loader = ComponentLoader::new()
        .with_producer(Arc::new(StaticDescriptorProducer::new("static", vec![english()])))
        .with_producer(Arc::new(ScannedProducer { locale: "de" }));

    let error = loader.collect().await.unwrap_err();
    assert!(error.to_string().contains("未知语言: de"));
}

#[test]
fn test_request_scope_overrides_application_scope() -> anyhow::Result<()> {
    let application = ComponentManager::new();
    application.register(english(), None)?;
    application.register(welcome_service(DEFAULT_HINT), None)?;

    let request = application.create_child();
    request.register(french(), None)?;
    request.register(welcome_service(DEFAULT_HINT), None)?;

    let app_service = application.lookup::<WelcomeService>(DEFAULT_HINT)?;
    let request_service = request.lookup::<WelcomeService>(DEFAULT_HINT)?;
    assert_eq!(app_service.welcome("Ada"), "Hello, Ada");
    assert_eq!(request_service.welcome("Ada"), "Bonjour, Ada");

    request.close()?;
    assert!(request.parent().is_none());
    assert_eq!(
        application
            .lookup::<WelcomeService>(DEFAULT_HINT)?
            .welcome("Ada"),
        "Hello, Ada"
    );
    Ok(())
}

#[test]
fn test_self_registered_manager_is_injectable() -> anyhow::Result<()> {
    let manager = ComponentManager::new();
    manager.register_self()?;
    manager.register(greeter_directory(), None)?;
    manager.register(french().with_hint("fr"), None)?;

    let directory = manager.lookup::<GreeterDirectory>(DEFAULT_HINT)?;
    let greeter = directory.find("fr").expect("fr greeter");
    assert_eq!(greeter.greet("Ada"), "Bonjour, Ada");
    assert!(directory.find("de").is_none());

    manager.dispose_all();
    assert!(manager.has_hint(&RoleType::of::<ComponentManager>(), DEFAULT_HINT));
    assert_eq!(manager.live_instance_count(), 1);

    manager.close()?;
    assert_eq!(manager.live_instance_count(), 0);
    Ok(())
}

#[test]
fn test_dispose_order_across_scopes() -> anyhow::Result<()> {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let application = ComponentManager::new();
    application.register(tracked_resource("pool", 2000, &journal), None)?;

    let request = application.create_child();
    request.register(tracked_resource("session", 500, &journal), None)?;
    request.register(tracked_resource("cache", 1000, &journal), None)?;

    let resources = request.lookup_list::<TrackedResource>()?;
    assert_eq!(resources.len(), 3);

    request.close()?;
    assert_eq!(journal.lock().as_slice(), ["session", "cache"]);

    application.close()?;
    assert_eq!(journal.lock().as_slice(), ["session", "cache", "pool"]);
    Ok(())
}

#[test]
fn test_manager_config_from_file() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "detect_cycles = true")?;
    writeln!(file, "max_resolution_depth = 16")?;
    writeln!(file, "install_default_lifecycle_handlers = false")?;

    let config = ManagerConfig::load(file.path())?;
    assert_eq!(config.max_resolution_depth, 16);

    let manager = ComponentManager::with_config(config);
    manager.register(english(), None)?;
    manager.register(welcome_service(DEFAULT_HINT), None)?;

    let service = manager.lookup::<WelcomeService>(DEFAULT_HINT)?;
    assert!(!service.is_ready());
    assert_eq!(service.welcome("Ada"), "Hello, Ada");
    Ok(())
}
