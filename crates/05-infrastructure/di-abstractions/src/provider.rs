//! 延迟提供者抽象接口

use crate::component::ComponentInstance;
use infrastructure_common::{LookupError, LookupResult};
use std::sync::Arc;

/// 组件提供者 trait
///
/// 注入的是一次延迟查找而不是具体实例：只有调用 [`ComponentProvider::get`] 时才解析。
/// 显式注册在 `Provider<T>` 角色下的组件必须以 `dyn ComponentProvider` 发布。
pub trait ComponentProvider: Send + Sync {
    /// 执行查找
    fn get(&self) -> LookupResult<ComponentInstance>;
}

impl dyn ComponentProvider {
    /// 执行查找并转换为角色类型
    pub fn get_as<R: ?Sized + 'static>(&self) -> LookupResult<Arc<R>> {
        let instance = self.get()?;
        instance
            .downcast::<R>()
            .ok_or_else(|| LookupError::TypeMismatch {
                expected: std::any::type_name::<R>().to_string(),
                implementation: instance.implementation().clone(),
            })
    }
}
