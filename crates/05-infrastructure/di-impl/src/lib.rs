//! # 依赖注入具体实现
//!
//! 提供分层组件管理器：组件注册、按需构造与依赖注入、单例缓存、
//! 父子管理器回退、多重绑定、生命周期销毁以及描述符加载。
//!
//! ## 快速开始
//!
//! ```ignore
//! use di_abstractions::{ComponentDescriptor, ComponentRegistry, ComponentResolver};
//! use di_impl::ComponentManager;
//!
//! let manager = ComponentManager::new();
//! manager.register(ComponentDescriptor::of::<dyn Greeter, EnglishGreeter>(|c| c), None)?;
//! let greeter = manager.lookup::<dyn Greeter>("default")?;
//! ```

mod events;
mod lifecycle;
mod loader;
mod manager;
mod provider;
mod resolver;

pub use events::LoggingEventListener;
pub use lifecycle::InitializableLifecycleHandler;
pub use loader::{ComponentLoader, StaticDescriptorProducer};
pub use manager::ComponentManager;
pub use provider::LazyProvider;
