//! 注册变更事件的日志监听器

use di_abstractions::{ComponentEvent, ComponentEventListener};
use tracing::info;

/// 把注册变更事件写入日志的监听器
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEventListener;

impl ComponentEventListener for LoggingEventListener {
    fn on_component_registered(&self, event: &ComponentEvent) {
        info!(
            manager = %event.manager_id,
            implementation = %event.descriptor.implementation.type_name(),
            "组件已注册: {}",
            event.identity
        );
    }

    fn on_component_unregistered(&self, event: &ComponentEvent) {
        info!(
            manager = %event.manager_id,
            "组件已注销: {}",
            event.identity
        );
    }

    fn name(&self) -> &str {
        "logging"
    }
}
