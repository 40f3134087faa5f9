//! 描述符加载
//!
//! 从一个或多个描述符生产者收集描述符，按优先级为每个角色标识选出一个，
//! 再注册到组件管理器。

use async_trait::async_trait;
use di_abstractions::{overrides, ComponentDescriptor, ComponentRegistry, DescriptorProducer};
use indexmap::map::Entry;
use indexmap::IndexMap;
use infrastructure_common::{RegistrationError, RegistrationResult, RoleIdentity};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::manager::ComponentManager;

/// 组件加载器
#[derive(Default)]
pub struct ComponentLoader {
    producers: Vec<Arc<dyn DescriptorProducer>>,
}

impl ComponentLoader {
    /// 创建空的加载器
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加生产者
    pub fn with_producer(mut self, producer: Arc<dyn DescriptorProducer>) -> Self {
        self.add_producer(producer);
        self
    }

    /// 追加生产者
    pub fn add_producer(&mut self, producer: Arc<dyn DescriptorProducer>) {
        debug!("添加描述符生产者: {}", producer.name());
        self.producers.push(producer);
    }

    /// 收集描述符
    ///
    /// 每个角色标识只保留一个描述符：角色类型优先级、提示名优先级依次比较，
    /// 数值越小越优先，完全相同时后产出的生效。结果按首次产出的顺序排列。
    pub async fn collect(&self) -> RegistrationResult<Vec<ComponentDescriptor>> {
        let mut selected: IndexMap<RoleIdentity, ComponentDescriptor> = IndexMap::new();

        for producer in &self.producers {
            let descriptors = producer.produce().await.map_err(|error| {
                warn!("描述符生产者 {} 失败: {}", producer.name(), error);
                error
            })?;
            info!(
                "描述符生产者 {} 产出 {} 个描述符",
                producer.name(),
                descriptors.len()
            );

            for descriptor in descriptors {
                descriptor.validate()?;
                match selected.entry(descriptor.identity()) {
                    Entry::Occupied(mut entry) => {
                        if overrides(&descriptor, entry.get()) {
                            debug!("覆盖描述符: {}", entry.key());
                            entry.insert(descriptor);
                        } else {
                            debug!("忽略低优先级描述符: {}", entry.key());
                        }
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(descriptor);
                    }
                }
            }
        }

        Ok(selected.into_values().collect())
    }

    /// 收集并注册到组件管理器
    pub async fn load_into(
        &self,
        manager: &ComponentManager,
    ) -> RegistrationResult<Vec<Arc<ComponentDescriptor>>> {
        let descriptors = self.collect().await?;
        let registered = descriptors
            .into_iter()
            .map(|descriptor| manager.register(descriptor, None))
            .collect::<RegistrationResult<Vec<_>>>()?;
        info!("加载组件完成，注册了 {} 个组件", registered.len());
        Ok(registered)
    }
}

/// 产出固定描述符列表的生产者
#[derive(Debug, Clone)]
pub struct StaticDescriptorProducer {
    name: String,
    descriptors: Vec<ComponentDescriptor>,
}

impl StaticDescriptorProducer {
    /// 创建生产者
    pub fn new(name: impl Into<String>, descriptors: Vec<ComponentDescriptor>) -> Self {
        Self {
            name: name.into(),
            descriptors,
        }
    }
}

#[async_trait]
impl DescriptorProducer for StaticDescriptorProducer {
    async fn produce(&self) -> Result<Vec<ComponentDescriptor>, RegistrationError> {
        Ok(self.descriptors.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::{Component, ComponentResolver};
    use infrastructure_common::DEFAULT_HINT;

    trait Storage: Send + Sync {
        fn kind(&self) -> &'static str;
    }

    #[derive(Default)]
    struct DiskStorage;

    impl Storage for DiskStorage {
        fn kind(&self) -> &'static str {
            "disk"
        }
    }

    impl Component for DiskStorage {}

    #[derive(Default)]
    struct MemoryStorage;

    impl Storage for MemoryStorage {
        fn kind(&self) -> &'static str {
            "memory"
        }
    }

    impl Component for MemoryStorage {}

    struct FailingProducer;

    #[async_trait]
    impl DescriptorProducer for FailingProducer {
        async fn produce(&self) -> Result<Vec<ComponentDescriptor>, RegistrationError> {
            Err(RegistrationError::ProducerFailed {
                producer: "failing".to_string(),
                message: "index unreadable".to_string(),
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn disk() -> ComponentDescriptor {
        ComponentDescriptor::of::<dyn Storage, DiskStorage>(|c| c)
    }

    fn memory() -> ComponentDescriptor {
        ComponentDescriptor::of::<dyn Storage, MemoryStorage>(|c| c)
    }

    #[tokio::test]
    async fn lower_priority_value_wins() {
        let loader = ComponentLoader::new()
            .with_producer(Arc::new(StaticDescriptorProducer::new(
                "first",
                vec![disk().with_role_hint_priority(10)],
            )))
            .with_producer(Arc::new(StaticDescriptorProducer::new(
                "second",
                vec![memory().with_role_hint_priority(500)],
            )));

        let manager = ComponentManager::new();
        let registered = loader.load_into(&manager).await.unwrap();
        assert_eq!(registered.len(), 1);

        let storage = manager.lookup::<dyn Storage>(DEFAULT_HINT).unwrap();
        assert_eq!(storage.kind(), "disk");
    }

    #[tokio::test]
    async fn role_type_priority_is_compared_first() {
        let loader = ComponentLoader::new().with_producer(Arc::new(StaticDescriptorProducer::new(
            "mixed",
            vec![
                disk().with_role_type_priority(2000).with_role_hint_priority(1),
                memory().with_role_type_priority(100).with_role_hint_priority(9000),
            ],
        )));

        let descriptors = loader.collect().await.unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(
            descriptors[0].implementation.type_name().short_name(),
            "MemoryStorage"
        );
    }

    #[tokio::test]
    async fn ties_go_to_the_later_descriptor() {
        let loader = ComponentLoader::new()
            .with_producer(Arc::new(StaticDescriptorProducer::new("a", vec![disk()])))
            .with_producer(Arc::new(StaticDescriptorProducer::new("b", vec![memory()])));

        let descriptors = loader.collect().await.unwrap();
        assert_eq!(
            descriptors[0].implementation.type_name().short_name(),
            "MemoryStorage"
        );
    }

    #[tokio::test]
    async fn producer_failure_stops_loading() {
        let manager = ComponentManager::new();
        let loader = ComponentLoader::new()
            .with_producer(Arc::new(StaticDescriptorProducer::new("ok", vec![disk()])))
            .with_producer(Arc::new(FailingProducer));

        let error = loader.load_into(&manager).await.unwrap_err();
        assert!(matches!(error, RegistrationError::ProducerFailed { .. }));
        assert!(manager.descriptors().is_empty());
    }
}
