use std::io;

use axum::{http::StatusCode, response::IntoResponse};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not Found")]
    NotFound,

    /// 唯一约束或外键冲突（slug、用户名等），不做自动重试
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("site setup already exists")]
    Singleton,

    #[error("{0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Sqlx(sqlx::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// 保证站点设置唯一的索引名，与 `sql/01-CREATE_TABLE.sql` 一致
pub(crate) const SITE_SETUP_SINGLETON_INDEX: &str = "uniq_site_setup_singleton";

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match e {
            // 并发创建时存在性检查可能都通过，由唯一索引兜底
            sqlx::Error::Database(db) if db.constraint() == Some(SITE_SETUP_SINGLETON_INDEX) => {
                Error::Singleton
            }
            sqlx::Error::Database(db)
                if db.is_unique_violation() || db.is_foreign_key_violation() =>
            {
                Error::Constraint(db.message().to_string())
            }
            sqlx::Error::RowNotFound => Error::NotFound,
            e => Error::Sqlx(e),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::NotFound => (StatusCode::NOT_FOUND, "NOT FOUND").into_response(),
            Error::Constraint(msg) => (StatusCode::CONFLICT, msg).into_response(),
            Error::Singleton => (StatusCode::CONFLICT, "site setup already exists").into_response(),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            Error::Toml(e) => (StatusCode::BAD_REQUEST, e.message().to_string()).into_response(),
            Error::Sqlx(e) => {
                tracing::error!(%e, "sqlx error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            .into_response(),
            Error::Config(e) => {
                tracing::error!(%e, "config error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            .into_response(),
            Error::Io(e) => {
                tracing::error!(%e, "file io error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let resp = Error::NotFound.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_constraint_and_singleton_map_to_409() {
        let resp = Error::Constraint("duplicate slug".into()).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = Error::Singleton.into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    /// 唯一约束冲突，只携带约束名
    #[derive(Debug, thiserror::Error)]
    #[error("{message}")]
    struct FakeDbError {
        message: String,
        constraint: Option<&'static str>,
    }

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            &self.message
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }
    }

    fn unique_violation(constraint: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError {
            message: "duplicate key value violates unique constraint".into(),
            constraint: Some(constraint),
        }))
    }

    #[test]
    fn test_site_setup_index_violation_is_singleton() {
        let e: Error = unique_violation(SITE_SETUP_SINGLETON_INDEX).into();
        assert!(matches!(e, Error::Singleton));

        let e: Error = unique_violation("posts_slug_key").into();
        assert!(matches!(e, Error::Constraint(_)));
    }

    #[test]
    fn test_row_not_found_becomes_not_found() {
        let e: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(e, Error::NotFound));
    }
}
