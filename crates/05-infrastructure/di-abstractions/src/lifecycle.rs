//! 生命周期处理器抽象接口

use crate::component::Component;
use crate::descriptor::ComponentDescriptor;
use infrastructure_common::ComponentResult;

/// 生命周期处理器 trait
///
/// 在依赖注入完成之后、实例返回之前，按注册顺序对新构造的组件调用。
/// 任一处理器失败都会中止构造。
pub trait LifecycleHandler: Send + Sync {
    /// 处理器名称
    fn name(&self) -> &str;

    /// 处理新构造的组件
    fn handle(
        &self,
        component: &mut dyn Component,
        descriptor: &ComponentDescriptor,
    ) -> ComponentResult<()>;
}
