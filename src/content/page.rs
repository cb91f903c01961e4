use serde::{Deserialize, Serialize};

use super::{Sluggable, check_len, check_required, check_slug};
use crate::error::Result;

pub(super) const TITLE_MAX_LEN: usize = 65;

/// 静态页面，只能通过 slug 访问
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Page {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub is_published: bool,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageDraft {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub content: String,
}

impl PageDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: None,
            is_published: false,
            content: content.into(),
        }
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn published(mut self, is_published: bool) -> Self {
        self.is_published = is_published;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_required("title", &self.title)?;
        check_len("title", &self.title, TITLE_MAX_LEN)?;
        check_slug(self.slug.as_deref())
    }
}

impl Sluggable for PageDraft {
    fn slug_source(&self) -> &str {
        &self.title
    }

    fn slug_mut(&mut self) -> &mut Option<String> {
        &mut self.slug
    }
}
