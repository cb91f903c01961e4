use crate::content::Post;

/// 公开文章的查询条件
///
/// [`PostFilter`] 只描述“要哪些文章”，本身不执行任何查询；交给
/// [`Querier`](crate::storage::Querier) 求值。相同条件在数据不变时
/// 总是得到相同的、按 `id` 倒序排列的序列。
///
/// 所有条件都建立在 `is_published = true` 之上，未发布的文章不会出现在
/// 任何组合的结果中。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    author: Option<i64>,
    category: Option<String>,
    tag: Option<String>,
    search: Option<String>,
}

impl PostFilter {
    /// 所有已发布文章
    pub fn published() -> Self {
        Self::default()
    }

    /// 仅保留 `created_by == author_id` 的文章
    ///
    /// 作者是否存在由调用方预先确认。
    pub fn by_author(mut self, author_id: i64) -> Self {
        self.author = Some(author_id);
        self
    }

    /// 仅保留分类 slug 等于 `slug` 的文章
    pub fn by_category(mut self, slug: impl Into<String>) -> Self {
        self.category = Some(slug.into());
        self
    }

    /// 仅保留至少有一个标签 slug 等于 `slug` 的文章
    pub fn by_tag(mut self, slug: impl Into<String>) -> Self {
        self.tag = Some(slug.into());
        self
    }

    /// 标题、摘要或正文包含 `term`（不区分大小写）
    ///
    /// 空白的 `term` 不匹配任何文章。
    pub fn search(mut self, term: impl AsRef<str>) -> Self {
        self.search = Some(term.as_ref().trim().to_string());
        self
    }

    pub fn author(&self) -> Option<i64> {
        self.author
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// 条件本身已经保证结果为空（空白搜索词）
    pub fn matches_nothing(&self) -> bool {
        self.search.as_deref().is_some_and(str::is_empty)
    }

    /// 单篇文章是否满足条件
    pub fn matches(&self, post: &Post) -> bool {
        if !post.is_published || self.matches_nothing() {
            return false;
        }

        if let Some(author) = self.author {
            if post.created_by != Some(author) {
                return false;
            }
        }

        if let Some(slug) = self.category.as_deref() {
            if post.category.as_ref().is_none_or(|c| c.slug != slug) {
                return false;
            }
        }

        if let Some(slug) = self.tag.as_deref() {
            if post.tag_by_slug(slug).is_none() {
                return false;
            }
        }

        match self.search.as_deref() {
            Some(term) => post.contains_text(&term.to_lowercase()),
            None => true,
        }
    }

    /// 对任意文章序列应用条件，结果按 `id` 倒序
    pub fn apply<'a, I>(&'a self, posts: I) -> impl Iterator<Item = &'a Post> + 'a
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut matched: Vec<&Post> = posts.into_iter().filter(|p| self.matches(p)).collect();
        matched.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        matched.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;
    use crate::content::{Category, Tag};

    fn post(id: i64, published: bool) -> Post {
        let now = Local::now();
        Post {
            id,
            title: format!("Post {id}"),
            slug: format!("post-{id}"),
            excerpt: String::new(),
            content: String::new(),
            cover: None,
            is_published: published,
            created_at: now,
            updated_at: now,
            created_by: Some(id % 2),
            updated_by: None,
            category: (id % 3 == 0).then(|| Category {
                id: 1,
                name: "Rust".into(),
                slug: "rust".into(),
            }),
            tags: vec![Tag {
                id: id % 4,
                name: format!("tag {}", id % 4),
                slug: format!("tag-{}", id % 4),
            }],
        }
    }

    fn posts() -> Vec<Post> {
        (1..=12).map(|id| post(id, id != 6)).collect()
    }

    fn ids<'a>(it: impl Iterator<Item = &'a Post>) -> Vec<i64> {
        it.map(|p| p.id).collect()
    }

    #[test]
    fn test_published_orders_by_id_desc() {
        let posts = posts();
        let filter = PostFilter::published();
        assert_eq!(
            ids(filter.apply(&posts)),
            vec![12, 11, 10, 9, 8, 7, 5, 4, 3, 2, 1]
        );
    }

    #[test]
    fn test_filters_compose() {
        let posts = posts();

        let by_category = PostFilter::published().by_category("rust");
        assert_eq!(ids(by_category.apply(&posts)), vec![12, 9, 3]);

        let by_author = PostFilter::published().by_category("rust").by_author(1);
        assert_eq!(ids(by_author.apply(&posts)), vec![9, 3]);

        let by_tag = PostFilter::published().by_tag("tag-2");
        assert_eq!(ids(by_tag.apply(&posts)), vec![10, 2]);

        let missing = PostFilter::published().by_category("nonexistent-slug");
        assert_eq!(filter_count(&missing, &posts), 0);
    }

    fn filter_count(filter: &PostFilter, posts: &[Post]) -> usize {
        filter.apply(posts).count()
    }

    #[test]
    fn test_unpublished_never_matches() {
        let posts = posts();
        let filters = [
            PostFilter::published(),
            PostFilter::published().by_author(0),
            PostFilter::published().by_category("rust"),
            PostFilter::published().by_tag("tag-2"),
            PostFilter::published().search("post 6"),
            PostFilter::published().by_author(0).by_category("rust").by_tag("tag-2"),
        ];

        for filter in &filters {
            assert!(
                filter.apply(&posts).all(|p| p.is_published),
                "{filter:?} leaked an unpublished post"
            );
            assert!(!ids(filter.apply(&posts)).contains(&6), "{filter:?}");
        }
    }

    #[test]
    fn test_search_is_case_insensitive_or() {
        let mut posts = posts();
        posts[0].excerpt = "Tokio e ASYNC".into();
        posts[1].content = "falando de async await".into();
        posts[2].title = "Async em Rust".into();

        let filter = PostFilter::published().search("  aSyNc ");
        assert_eq!(filter.search_term(), Some("aSyNc"));
        assert_eq!(ids(filter.apply(&posts)), vec![3, 2, 1]);
    }

    #[test]
    fn test_blank_search_matches_nothing() {
        let posts = posts();
        for term in ["", "   ", "\t\n"] {
            let filter = PostFilter::published().search(term);
            assert!(filter.matches_nothing());
            assert_eq!(filter.apply(&posts).count(), 0);
        }
    }

    #[test]
    fn test_apply_is_restartable() {
        let posts = posts();
        let filter = PostFilter::published().by_tag("tag-1");
        assert_eq!(ids(filter.apply(&posts)), ids(filter.apply(&posts)));
    }
}
