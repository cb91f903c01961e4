use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::{
    Category, Sluggable, Tag, check_len, check_required, check_slug, page::TITLE_MAX_LEN,
    serialize_millis,
};
use crate::error::Result;

/// 文章
///
/// `id` 单调递增，公开列表以 `id` 倒序作为“最新优先”的唯一排序依据。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    /// 封面资源引用，文件存储本身不在本服务范围内
    pub cover: Option<String>,
    pub is_published: bool,
    #[serde(serialize_with = "serialize_millis")]
    pub created_at: DateTime<Local>,
    #[serde(serialize_with = "serialize_millis")]
    pub updated_at: DateTime<Local>,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
}

impl Post {
    /// 第一个 slug 匹配的标签
    pub fn tag_by_slug(&self, slug: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.slug == slug)
    }

    /// 标题、摘要或正文中是否包含 `needle`（不区分大小写）
    ///
    /// `needle` 必须已经转为小写。
    pub(crate) fn contains_text(&self, needle: &str) -> bool {
        [&self.title, &self.excerpt, &self.content]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostDraft {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub tags: Vec<i64>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: None,
            excerpt: String::new(),
            content: String::new(),
            cover: None,
            is_published: false,
            created_by: None,
            category: None,
            tags: Vec::new(),
        }
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    pub fn published(mut self, is_published: bool) -> Self {
        self.is_published = is_published;
        self
    }

    pub fn created_by(mut self, author_id: i64) -> Self {
        self.created_by = Some(author_id);
        self
    }

    pub fn category(mut self, category_id: i64) -> Self {
        self.category = Some(category_id);
        self
    }

    pub fn tags(mut self, tag_ids: impl IntoIterator<Item = i64>) -> Self {
        self.tags = tag_ids.into_iter().collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_required("title", &self.title)?;
        check_len("title", &self.title, TITLE_MAX_LEN)?;
        check_len("excerpt", &self.excerpt, 150)?;
        check_slug(self.slug.as_deref())
    }
}

impl Sluggable for PostDraft {
    fn slug_source(&self) -> &str {
        &self.title
    }

    fn slug_mut(&mut self) -> &mut Option<String> {
        &mut self.slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn post() -> Post {
        let now = Local::now();
        Post {
            id: 1,
            title: "Aprendendo Rust".into(),
            slug: "aprendendo-rust".into(),
            excerpt: "Um resumo curto".into(),
            content: "Ownership e BORROWING".into(),
            cover: None,
            is_published: true,
            created_at: now,
            updated_at: now,
            created_by: None,
            updated_by: None,
            category: None,
            tags: vec![
                Tag {
                    id: 1,
                    name: "Rust".into(),
                    slug: "rust".into(),
                },
                Tag {
                    id: 2,
                    name: "Iniciante".into(),
                    slug: "iniciante".into(),
                },
            ],
        }
    }

    #[test]
    fn test_contains_text_checks_all_fields() {
        let post = post();
        assert!(post.contains_text("aprendendo"));
        assert!(post.contains_text("resumo"));
        assert!(post.contains_text("borrowing"));
        assert!(!post.contains_text("python"));
    }

    #[test]
    fn test_tag_by_slug() {
        let post = post();
        assert_eq!(post.tag_by_slug("iniciante").map(|t| t.id), Some(2));
        assert!(post.tag_by_slug("go").is_none());
    }

    #[test]
    fn test_validate_title_limit() {
        assert!(PostDraft::new("ok").validate().is_ok());
        assert!(matches!(
            PostDraft::new("t".repeat(66)).validate(),
            Err(Error::Validation(_))
        ));
        assert!(matches!(PostDraft::new("").validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_serializes_timestamps_as_millis() {
        let post = post();
        let value = serde_json::to_value(&post).expect("serialize post");
        assert_eq!(
            value["created_at"].as_i64(),
            Some(post.created_at.timestamp_millis())
        );
        assert_eq!(value["tags"].as_array().map(Vec::len), Some(2));
    }
}
