//! # Infrastructure Common
//!
//! 这个 crate 提供了组件注册表与依赖注入运行时共用的基础类型。
//!
//! ## 核心内容
//!
//! - [`RoleType`] / [`RoleIdentity`] - 角色类型与角色标识
//! - [`LookupError`] / [`ComponentError`] / [`RegistrationError`] / [`DisposalError`] - 错误类型
//! - [`Initializable`] / [`Disposable`] - 组件生命周期能力
//! - [`ManagerConfig`] - 组件管理器配置
//! - [`LoggingConfig`] - 日志系统配置
//!
//! ## 设计原则
//!
//! - 角色标识按限定名比较，容忍跨模块的类型重复
//! - 构造期错误总是传播给调用者，销毁期错误只记录日志
//! - 所有解析都在请求时动态完成

pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod logging;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use logging::*;
pub use metadata::*;
