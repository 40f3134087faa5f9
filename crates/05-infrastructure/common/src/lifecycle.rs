//! 组件生命周期管理

use crate::errors::ComponentError;
use serde::{Deserialize, Serialize};

/// 默认销毁优先级
pub const DEFAULT_DISPOSE_PRIORITY: i32 = 1000;

/// 组件实例化策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstantiationStrategy {
    /// 单例模式 - 首次解析时创建，之后共享同一个实例
    Singleton,
    /// 每次查找模式 - 每次解析都创建新实例，从不缓存
    PerLookup,
}

impl Default for InstantiationStrategy {
    fn default() -> Self {
        Self::Singleton
    }
}

/// 可初始化组件
///
/// 在依赖注入完成之后、实例交给调用者之前调用。
pub trait Initializable {
    /// 初始化组件
    fn initialize(&mut self) -> Result<(), ComponentError>;
}

/// 可销毁组件
pub trait Disposable: Send + Sync {
    /// 销毁组件，释放其持有的资源
    fn dispose(&self) -> Result<(), ComponentError>;

    /// 销毁优先级，数值越小越先销毁
    fn dispose_priority(&self) -> i32 {
        DEFAULT_DISPOSE_PRIORITY
    }
}
