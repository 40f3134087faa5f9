//! 组件描述符生产者抽象接口
//!
//! 注解扫描等发现过程不属于注册表本身：它们产出描述符，再交给注册表注册。

use crate::descriptor::ComponentDescriptor;
use async_trait::async_trait;
use infrastructure_common::RegistrationError;

/// 描述符生产者 trait
#[async_trait]
pub trait DescriptorProducer: Send + Sync {
    /// 产出组件描述符
    async fn produce(&self) -> Result<Vec<ComponentDescriptor>, RegistrationError>;

    /// 获取生产者名称
    fn name(&self) -> &str;
}

/// 判断候选描述符是否应覆盖已选中的描述符
///
/// 先比较角色类型优先级，再比较提示名优先级，数值越小越优先；
/// 完全相同时后出现的描述符生效，与注册表"最后注册生效"一致。
pub fn overrides(candidate: &ComponentDescriptor, selected: &ComponentDescriptor) -> bool {
    (candidate.role_type_priority, candidate.role_hint_priority)
        <= (selected.role_type_priority, selected.role_hint_priority)
}
