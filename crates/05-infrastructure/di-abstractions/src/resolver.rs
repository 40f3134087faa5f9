//! 组件解析器抽象接口
//!
//! 提供按角色标识解析组件实例的能力

use crate::component::ComponentInstance;
use indexmap::IndexMap;
use infrastructure_common::{LookupError, LookupResult, RoleType};
use std::sync::Arc;

/// 组件解析器 trait
///
/// 负责按需构造组件、注入依赖并运行生命周期处理器
pub trait ComponentResolver: Send + Sync {
    /// 解析指定角色标识的组件
    fn resolve(&self, role_type: &RoleType, hint: &str) -> LookupResult<ComponentInstance>;

    /// 解析角色的全部绑定，本地绑定在前，父管理器中未被覆盖的绑定在后
    fn resolve_all(&self, role_type: &RoleType) -> LookupResult<Vec<ComponentInstance>>;

    /// 解析角色的全部绑定，以提示名为键
    fn resolve_all_as_map(
        &self,
        role_type: &RoleType,
    ) -> LookupResult<IndexMap<String, ComponentInstance>>;

    /// 类型化解析
    fn lookup<R: ?Sized + 'static>(&self, hint: &str) -> LookupResult<Arc<R>>
    where
        Self: Sized,
    {
        let instance = self.resolve(&RoleType::of::<R>(), hint)?;
        downcast_instance(&instance)
    }

    /// 类型化解析全部绑定
    fn lookup_list<R: ?Sized + 'static>(&self) -> LookupResult<Vec<Arc<R>>>
    where
        Self: Sized,
    {
        self.resolve_all(&RoleType::of::<R>())?
            .iter()
            .map(downcast_instance)
            .collect()
    }

    /// 类型化解析全部绑定，以提示名为键
    fn lookup_map<R: ?Sized + 'static>(&self) -> LookupResult<IndexMap<String, Arc<R>>>
    where
        Self: Sized,
    {
        self.resolve_all_as_map(&RoleType::of::<R>())?
            .iter()
            .map(|(hint, instance)| Ok((hint.clone(), downcast_instance(instance)?)))
            .collect()
    }
}

fn downcast_instance<R: ?Sized + 'static>(instance: &ComponentInstance) -> LookupResult<Arc<R>> {
    instance
        .downcast::<R>()
        .ok_or_else(|| LookupError::TypeMismatch {
            expected: std::any::type_name::<R>().to_string(),
            implementation: instance.implementation().clone(),
        })
}
