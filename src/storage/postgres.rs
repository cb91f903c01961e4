use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

use crate::{
    config::Config,
    error::{Error, Result},
};

/// 数据库连接池类型
pub type DBPool = sqlx::PgPool;

/// 根据 [`Config`] 初始化数据库连接池
pub async fn init_db(config: &Config) -> Result<DBPool> {
    let conn_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| Error::Config("`DATABASE_URL` not set".to_string()))?;

    Ok(new_db_pool(conn_url, config.max_connections).await?)
}

/// 根据连接 URL 创建新的数据库连接池
///
/// 连接池配置：
///
/// - 最大空闲时间 60 秒
/// - 最大生存时间 1500 秒（约 25 分钟）
/// - 获取连接超时 2 秒
/// - 获取前测试连接
/// - 最小连接数 2
pub async fn new_db_pool(
    conn_url: &str,
    max_connections: u32,
) -> std::result::Result<DBPool, sqlx::Error> {
    PgPoolOptions::new()
        .idle_timeout(Duration::from_secs(60))
        .max_lifetime(Duration::from_secs(1500))
        .max_connections(max_connections.max(2))
        .acquire_timeout(Duration::from_secs(2))
        .test_before_acquire(true)
        .min_connections(2)
        .connect(conn_url)
        .await
}

/// 执行 SQL 文件中的建表语句
///
/// 将文件内容按 `;` 分割，每条 SQL 单独执行
pub async fn migrate(db: &DBPool, file: &str) -> Result<()> {
    let content = std::fs::read_to_string(file)?;

    for sql in content.split(';').map(str::trim) {
        if sql.is_empty() {
            continue;
        }
        sqlx::query(sql).execute(db).await?;
    }
    Ok(())
}
