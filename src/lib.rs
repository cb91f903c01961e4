pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod query;
pub mod seed;
pub mod slugify;
pub mod state;
pub mod storage;
pub mod view;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use crate::{config::Config, state::AppState, view::ViewSettings};

/// 初始化日志，日志级别由环境变量 `BLOG_LOG` 控制
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("BLOG_LOG"))
        .init();
}

/// 加载配置、连接数据库并启动 HTTP 服务
pub async fn run() -> error::Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    let pool = storage::init_db(&config).await?;
    tracing::info!(page_size = config.page_size, "database connected");

    let app = AppState::new(pool, ViewSettings::from(&config));

    api::run_server(app, &config.bind).await
}
