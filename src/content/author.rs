use serde::{Deserialize, Serialize};

use super::{check_len, check_required};
use crate::error::Result;

/// 文章作者（创建者引用指向的用户）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    /// 姓名全称；没有名字时返回 `None`
    pub fn full_name(&self) -> Option<String> {
        if self.first_name.trim().is_empty() {
            return None;
        }
        Some(format!("{} {}", self.first_name, self.last_name).trim_end().to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorDraft {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl AuthorDraft {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    pub fn name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_required("username", &self.username)?;
        check_len("username", &self.username, 150)?;
        check_len("first_name", &self.first_name, 150)?;
        check_len("last_name", &self.last_name, 150)
    }
}
