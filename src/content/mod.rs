mod author;
mod page;
mod post;
mod site;
mod taxonomy;

pub use self::{
    author::{Author, AuthorDraft},
    page::{Page, PageDraft},
    post::{Post, PostDraft},
    site::{MenuLink, MenuLinkDraft, SiteSetup, SiteSetupDraft},
    taxonomy::{Category, CategoryDraft, Tag, TagDraft},
};

use chrono::{DateTime, Local};
use serde::Serializer;

use crate::{
    error::{Error, Result},
    slugify::{DEFAULT_SUFFIX_LEN, generate_slug},
};

pub use crate::slugify::SLUG_MAX_LEN;

/// 首次保存前需要补全 slug 的草稿
///
/// slug 只在缺失（`None` 或空字符串）时生成一次，之后的编辑不会重新生成。
pub trait Sluggable {
    /// 生成 slug 所依据的文本（标题或名称）
    fn slug_source(&self) -> &str;

    fn slug_mut(&mut self) -> &mut Option<String>;

    /// 确保存在 slug，返回最终的 slug
    fn ensure_slug(&mut self) -> &str {
        if self.slug_mut().as_deref().is_none_or(str::is_empty) {
            let slug = generate_slug(self.slug_source(), DEFAULT_SUFFIX_LEN);
            *self.slug_mut() = Some(slug);
        }
        self.slug_mut().get_or_insert_default()
    }
}

/// 校验字段长度（按字符计）
pub(crate) fn check_len(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(Error::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub(crate) fn check_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn check_slug(slug: Option<&str>) -> Result<()> {
    match slug {
        Some(s) => check_len("slug", s, SLUG_MAX_LEN),
        None => Ok(()),
    }
}

/// 时间统一以毫秒时间戳输出
pub(crate) fn serialize_millis<S: Serializer>(
    dt: &DateTime<Local>,
    serializer: S,
) -> core::result::Result<S::Ok, S::Error> {
    serializer.serialize_i64(dt.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_slug_fills_missing_once() {
        let mut draft = TagDraft::new("Rust Lang");
        let first = draft.ensure_slug().to_string();

        assert!(first.starts_with("rust-lang"));
        assert_eq!(first.len(), "rust-lang".len() + DEFAULT_SUFFIX_LEN);

        // 再次调用不会重新生成
        assert_eq!(draft.ensure_slug(), first);
    }

    #[test]
    fn test_ensure_slug_keeps_explicit_slug() {
        let mut draft = TagDraft::new("Rust").slug("custom-slug");
        assert_eq!(draft.ensure_slug(), "custom-slug");
    }

    #[test]
    fn test_ensure_slug_treats_empty_as_missing() {
        let mut draft = CategoryDraft::new("Notícias").slug("");
        assert!(draft.ensure_slug().starts_with("noticias"));
    }

    #[test]
    fn test_check_len_counts_chars() {
        assert!(check_len("title", "ção", 3).is_ok());
        assert!(matches!(
            check_len("title", "abcd", 3),
            Err(Error::Validation(_))
        ));
    }
}
