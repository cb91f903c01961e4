use chrono::{DateTime, Local};
use sqlx::types::Json;

use crate::content::{Category, Post, Tag};

/// 文章查询行
///
/// 分类与标签以 JSONB 形式随文章一起查出，参见 [`Category`]、[`Tag`]。
#[derive(Debug, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,

    /// 可选分类，分类被删除后为空
    pub category: Option<Json<Category>>,
    /// 按标签 `id` 升序
    pub tags: Json<Vec<Tag>>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            content: row.content,
            cover: row.cover,
            is_published: row.is_published,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
            category: row.category.map(|c| c.0),
            tags: row.tags.0,
        }
    }
}

/// 站点设置查询行（不含菜单）
#[derive(Debug, sqlx::FromRow)]
pub struct SiteSetupRow {
    pub id: i64,
    pub title: String,
    pub description: String,
}
