//! 角色元数据定义
//!
//! 提供角色类型（[`RoleType`]）与角色标识（[`RoleIdentity`]）。
//! 角色标识按限定类型名比较，而不是按 `TypeId` 比较：同一个逻辑角色可能经由
//! 不同的 crate 或动态模块到达注册表，这时只有名称是稳定的。

use std::borrow::Cow;
use std::fmt;

/// 默认提示名
pub const DEFAULT_HINT: &str = "default";

/// 限定类型名
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(Cow<'static, str>);

impl TypeName {
    /// 从类型获取限定类型名
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// 从名称创建（用于外部描述符生产者）
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// 完整名称
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        let name = self.0.strip_prefix("dyn ").unwrap_or(&self.0);
        let base = name.split('<').next().unwrap_or(name);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// 是否为空名称
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeName {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// 绑定方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// 注入单个实例
    Single,
    /// 注入该角色所有绑定组成的列表
    List,
    /// 注入以提示名为键的映射
    Map,
    /// 注入延迟查找的提供者
    Provider,
}

/// 角色类型
///
/// 列表、映射、提供者等参数化角色显式建模为标签联合，
/// 由依赖的绑定方式决定如何解析。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleType {
    /// 普通角色
    Simple(TypeName),
    /// 角色列表
    ListOf(TypeName),
    /// 提示名到实例的映射
    MapOf(TypeName),
    /// 延迟提供者
    ProviderOf(TypeName),
}

impl RoleType {
    /// 普通角色
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Simple(TypeName::of::<T>())
    }

    /// 角色列表
    pub fn list_of<T: ?Sized + 'static>() -> Self {
        Self::ListOf(TypeName::of::<T>())
    }

    /// 提示名映射
    pub fn map_of<T: ?Sized + 'static>() -> Self {
        Self::MapOf(TypeName::of::<T>())
    }

    /// 延迟提供者
    pub fn provider_of<T: ?Sized + 'static>() -> Self {
        Self::ProviderOf(TypeName::of::<T>())
    }

    /// 按名称创建普通角色
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Simple(TypeName::new(name))
    }

    /// 元素类型名
    pub fn type_name(&self) -> &TypeName {
        match self {
            Self::Simple(name) | Self::ListOf(name) | Self::MapOf(name) | Self::ProviderOf(name) => {
                name
            }
        }
    }

    /// 对应的绑定方式
    pub fn binding_kind(&self) -> BindingKind {
        match self {
            Self::Simple(_) => BindingKind::Single,
            Self::ListOf(_) => BindingKind::List,
            Self::MapOf(_) => BindingKind::Map,
            Self::ProviderOf(_) => BindingKind::Provider,
        }
    }

    /// 去掉参数化后的元素角色
    pub fn element(&self) -> Self {
        Self::Simple(self.type_name().clone())
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(name) => write!(f, "{name}"),
            Self::ListOf(name) => write!(f, "List<{name}>"),
            Self::MapOf(name) => write!(f, "Map<String, {name}>"),
            Self::ProviderOf(name) => write!(f, "Provider<{name}>"),
        }
    }
}

/// 角色标识：角色类型 + 提示名
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleIdentity {
    /// 角色类型
    pub role_type: RoleType,
    /// 提示名
    pub hint: String,
}

impl RoleIdentity {
    /// 创建新的角色标识，空提示名视为 `"default"`
    pub fn new(role_type: RoleType, hint: impl Into<String>) -> Self {
        let hint = hint.into();
        Self {
            role_type,
            hint: if hint.is_empty() { DEFAULT_HINT.to_string() } else { hint },
        }
    }

    /// 使用默认提示名
    pub fn default_of(role_type: RoleType) -> Self {
        Self::new(role_type, DEFAULT_HINT)
    }

    /// 类型化创建
    pub fn of<T: ?Sized + 'static>(hint: impl Into<String>) -> Self {
        Self::new(RoleType::of::<T>(), hint)
    }
}

impl fmt::Display for RoleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.role_type, self.hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter {}

    #[test]
    fn identity_equality_uses_names() {
        let by_type = RoleIdentity::of::<dyn Greeter>("default");
        let by_name = RoleIdentity::new(
            RoleType::named(std::any::type_name::<dyn Greeter>().to_string()),
            "",
        );
        assert_eq!(by_type, by_name);
        assert_ne!(by_type, RoleIdentity::of::<dyn Greeter>("french"));
        assert_ne!(
            by_type,
            RoleIdentity::new(RoleType::list_of::<dyn Greeter>(), "default")
        );
    }

    #[test]
    fn display_names_role_and_hint() {
        let identity = RoleIdentity::of::<dyn Greeter>("default");
        assert!(identity.to_string().ends_with("Greeter/default"));
        assert_eq!(identity.role_type.type_name().short_name(), "Greeter");

        let provider = RoleType::provider_of::<dyn Greeter>();
        assert!(provider.to_string().starts_with("Provider<"));
        assert_eq!(provider.binding_kind(), BindingKind::Provider);
        assert_eq!(provider.element(), RoleType::of::<dyn Greeter>());
    }
}
