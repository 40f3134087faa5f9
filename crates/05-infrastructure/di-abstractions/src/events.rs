//! 组件注册变更事件定义

use crate::descriptor::ComponentDescriptor;
use infrastructure_common::RoleIdentity;
use std::sync::Arc;

/// 组件注册变更事件
#[derive(Debug, Clone)]
pub struct ComponentEvent {
    /// 事件类型
    pub event_type: ComponentEventType,
    /// 角色标识
    pub identity: RoleIdentity,
    /// 相关的组件描述符
    pub descriptor: Arc<ComponentDescriptor>,
    /// 发出事件的组件管理器
    pub manager_id: uuid::Uuid,
    /// 事件时间
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ComponentEvent {
    /// 创建组件注册事件
    pub fn registered(descriptor: Arc<ComponentDescriptor>, manager_id: uuid::Uuid) -> Self {
        Self::new(ComponentEventType::Registered, descriptor, manager_id)
    }

    /// 创建组件注销事件
    pub fn unregistered(descriptor: Arc<ComponentDescriptor>, manager_id: uuid::Uuid) -> Self {
        Self::new(ComponentEventType::Unregistered, descriptor, manager_id)
    }

    fn new(
        event_type: ComponentEventType,
        descriptor: Arc<ComponentDescriptor>,
        manager_id: uuid::Uuid,
    ) -> Self {
        Self {
            event_type,
            identity: descriptor.identity(),
            descriptor,
            manager_id,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// 组件注册变更事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentEventType {
    /// 组件注册
    Registered,
    /// 组件注销
    Unregistered,
}

/// 组件事件监听器 trait
///
/// 未设置监听器是合法的，此时通知为空操作。
pub trait ComponentEventListener: Send + Sync {
    /// 处理组件注册事件
    fn on_component_registered(&self, event: &ComponentEvent);

    /// 处理组件注销事件
    fn on_component_unregistered(&self, event: &ComponentEvent);

    /// 获取监听器名称
    fn name(&self) -> &str {
        "anonymous"
    }
}
