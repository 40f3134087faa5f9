//! 组件注册表抽象接口

use crate::component::ComponentInstance;
use crate::descriptor::ComponentDescriptor;
use infrastructure_common::{RegistrationError, RoleType};
use std::sync::Arc;

/// 组件注册表 trait
///
/// 维护角色标识到描述符的映射。同一注册表内每个角色标识至多绑定一个描述符，
/// 注册表本身不比较优先级：对同一角色标识最后一次 `register` 生效。
pub trait ComponentRegistry: Send + Sync {
    /// 注册组件描述符
    ///
    /// 替换已有绑定时先销毁旧的单例实例，再依次发出注销、注册通知。
    /// 提供 `instance` 时它立即成为缓存的单例。
    fn register(
        &self,
        descriptor: ComponentDescriptor,
        instance: Option<ComponentInstance>,
    ) -> Result<Arc<ComponentDescriptor>, RegistrationError>;

    /// 注销组件，返回被移除的描述符
    fn unregister(&self, role_type: &RoleType, hint: &str) -> Option<Arc<ComponentDescriptor>>;

    /// 角色是否存在任何绑定（包括父管理器）
    fn has(&self, role_type: &RoleType) -> bool;

    /// 角色标识是否存在绑定（本地找不到时查询父管理器）
    fn has_hint(&self, role_type: &RoleType, hint: &str) -> bool;

    /// 获取组件描述符
    fn descriptor_of(&self, role_type: &RoleType, hint: &str) -> Option<Arc<ComponentDescriptor>>;

    /// 获取角色的全部描述符，本地优先
    fn descriptors_of(&self, role_type: &RoleType) -> Vec<Arc<ComponentDescriptor>>;
}
