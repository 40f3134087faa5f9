//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件注册、解析与生命周期的核心接口。
//!
//! ## 核心接口
//!
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`ComponentResolver`] - 组件解析器接口
//! - [`Component`] - 组件实现接口（注入点、初始化、销毁能力）
//! - [`ComponentDescriptor`] - 组件描述符
//! - [`LifecycleHandler`] - 生命周期处理器接口
//! - [`ComponentEventListener`] - 注册变更事件监听器接口
//! - [`ComponentProvider`] - 延迟提供者接口
//! - [`DescriptorProducer`] - 描述符生产者接口

pub mod component;
pub mod descriptor;
pub mod discovery;
pub mod events;
pub mod lifecycle;
pub mod logger;
pub mod provider;
pub mod registry;
pub mod resolver;

pub use component::*;
pub use descriptor::*;
pub use discovery::*;
pub use events::*;
pub use lifecycle::*;
pub use logger::*;
pub use provider::*;
pub use registry::*;
pub use resolver::*;
