use std::sync::Arc;

use crate::{storage::Querier, view::ViewSettings};

/// 应用程序上下文
///
/// [`AppState`] 封装了查询接口（通常是数据库连接池）与展示层设置，提供统一访问入口。
pub struct AppState<Q> {
    querier: Arc<Q>,
    settings: Arc<ViewSettings>,
}

impl<Q> Clone for AppState<Q> {
    fn clone(&self) -> Self {
        Self {
            querier: Arc::clone(&self.querier),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<Q: Querier> AppState<Q> {
    /// 创建一个新的 [`AppState`] 实例
    pub fn new(querier: Q, settings: ViewSettings) -> Self {
        Self {
            querier: Arc::new(querier),
            settings: Arc::new(settings),
        }
    }

    /// 获取查询对象
    pub fn querier(&self) -> &Q {
        &self.querier
    }

    /// 获取展示层设置
    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }
}
