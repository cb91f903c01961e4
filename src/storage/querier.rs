use std::future::Future;

use sqlx::{Postgres, QueryBuilder};

use super::{
    DBPool,
    models::{PostRow, SiteSetupRow},
};
use crate::{
    content::{Author, MenuLink, Page, Post, SiteSetup},
    error::Result,
    query::{PostFilter, Window},
};

/// 用于查询公开内容
///
/// 提供已发布文章的统计与分页获取、按 slug 获取文章和页面、作者与站点设置的接口。
/// 实现只读，不修改任何数据。
pub trait Querier: Send + Sync {
    /// 统计满足 [`PostFilter`] 的已发布文章数
    fn count_posts(&self, filter: &PostFilter) -> impl Future<Output = Result<u64>> + Send;

    /// 按 `id` 倒序获取满足 [`PostFilter`] 的已发布文章中 `window` 范围内的部分
    fn posts(
        &self,
        filter: &PostFilter,
        window: Window,
    ) -> impl Future<Output = Result<Vec<Post>>> + Send;

    /// 查询单个已发布文章
    ///
    /// 返回 [`Post`]，如果文章不存在或未发布则返回 `None`。
    fn published_post(&self, slug: &str) -> impl Future<Output = Result<Option<Post>>> + Send;

    /// 查询单个已发布页面
    fn published_page(&self, slug: &str) -> impl Future<Output = Result<Option<Page>>> + Send;

    fn author(&self, id: i64) -> impl Future<Output = Result<Option<Author>>> + Send;

    /// 查询站点设置及其菜单
    fn site_setup(&self) -> impl Future<Output = Result<Option<SiteSetup>>> + Send;
}

pub(super) const POST_SELECT: &str = r#"
    SELECT p.id, p.title, p.slug, p.excerpt, p.content, p.cover, p.is_published,
           p.created_at, p.updated_at, p.created_by, p.updated_by,
           CASE WHEN c.id IS NULL THEN NULL
                ELSE jsonb_build_object('id', c.id, 'name', c.name, 'slug', c.slug)
           END AS category,
           COALESCE(
               (SELECT jsonb_agg(jsonb_build_object('id', t.id, 'name', t.name, 'slug', t.slug)
                                 ORDER BY t.id)
                FROM post_tags pt
                INNER JOIN tags t ON t.id = pt.tag_id
                WHERE pt.post_id = p.id),
               '[]'::jsonb
           ) AS tags
    FROM posts p
    LEFT JOIN categories c ON p.category_id = c.id
"#;

/// 转义 LIKE 模式中的元字符，使搜索词按字面匹配
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// 追加 `WHERE` 子句
fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    builder.push(" WHERE p.is_published = TRUE");

    if let Some(author) = filter.author() {
        builder.push(" AND p.created_by = ").push_bind(author);
    }
    if let Some(slug) = filter.category() {
        builder.push(" AND c.slug = ").push_bind(slug.to_string());
    }
    if let Some(slug) = filter.tag() {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM post_tags pt \
                 INNER JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.slug = ",
            )
            .push_bind(slug.to_string())
            .push(")");
    }

    match filter.search_term() {
        Some("") => {
            builder.push(" AND FALSE");
        }
        Some(term) => {
            let pattern = format!("%{}%", escape_like(term));
            builder
                .push(" AND (p.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.excerpt ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.content ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        None => (),
    }
}

impl Querier for DBPool {
    async fn count_posts(&self, filter: &PostFilter) -> Result<u64> {
        let mut builder = QueryBuilder::new(
            "SELECT COUNT(*) FROM posts p LEFT JOIN categories c ON p.category_id = c.id",
        );
        push_conditions(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(self).await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn posts(&self, filter: &PostFilter, window: Window) -> Result<Vec<Post>> {
        let mut builder = QueryBuilder::new(POST_SELECT);
        push_conditions(&mut builder, filter);

        builder.push(" ORDER BY p.id DESC");
        builder
            .push(" LIMIT ")
            .push_bind(i64::try_from(window.limit).unwrap_or(i64::MAX));
        builder
            .push(" OFFSET ")
            .push_bind(i64::try_from(window.offset).unwrap_or(i64::MAX));

        let rows = builder.build_query_as::<PostRow>().fetch_all(self).await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn published_post(&self, slug: &str) -> Result<Option<Post>> {
        let sql = format!("{POST_SELECT} WHERE p.slug = $1 AND p.is_published = TRUE LIMIT 1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .fetch_optional(self)
            .await?;
        Ok(row.map(Post::from))
    }

    async fn published_page(&self, slug: &str) -> Result<Option<Page>> {
        let page = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, title, slug, is_published, content
            FROM pages
            WHERE slug = $1
            AND is_published = TRUE
            LIMIT 1
            "#,
        )
        .bind(slug)
        .fetch_optional(self)
        .await?;
        Ok(page)
    }

    async fn author(&self, id: i64) -> Result<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT id, username, first_name, last_name FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self)
        .await?;
        Ok(author)
    }

    async fn site_setup(&self) -> Result<Option<SiteSetup>> {
        let Some(row) = sqlx::query_as::<_, SiteSetupRow>(
            "SELECT id, title, description FROM site_setup ORDER BY id LIMIT 1",
        )
        .fetch_optional(self)
        .await?
        else {
            return Ok(None);
        };

        let menu = sqlx::query_as::<_, MenuLink>(
            r#"
            SELECT id, text, url_or_path, new_tab
            FROM menu_links
            WHERE site_setup_id = $1
            ORDER BY id
            "#,
        )
        .bind(row.id)
        .fetch_all(self)
        .await?;

        Ok(Some(SiteSetup {
            id: row.id,
            title: row.title,
            description: row.description,
            menu,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(filter: &PostFilter) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM posts p");
        push_conditions(&mut builder, filter);
        builder.sql().to_string()
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_off\\"), "100\\%\\_off\\\\");
        assert_eq!(escape_like("rust"), "rust");
    }

    #[test]
    fn test_conditions_always_gate_on_published() {
        let sql = sql_for(&PostFilter::published());
        assert!(sql.ends_with(" WHERE p.is_published = TRUE"));
    }

    #[test]
    fn test_conditions_bind_each_filter() {
        let filter = PostFilter::published()
            .by_author(7)
            .by_category("rust")
            .by_tag("async")
            .search("tokio");
        let sql = sql_for(&filter);

        assert!(sql.contains("p.created_by = $1"));
        assert!(sql.contains("c.slug = $2"));
        assert!(sql.contains("t.slug = $3"));
        assert!(sql.contains("p.title ILIKE $4 OR p.excerpt ILIKE $5 OR p.content ILIKE $6"));
    }

    #[test]
    fn test_blank_search_short_circuits_in_sql() {
        let sql = sql_for(&PostFilter::published().search("   "));
        assert!(sql.ends_with(" AND FALSE"));
        assert!(!sql.contains("ILIKE"));
    }
}
