use std::future::Future;

use super::{DBPool, models::PostRow, querier::POST_SELECT};
use crate::{
    content::{
        Author, AuthorDraft, Category, CategoryDraft, MenuLink, Page, PageDraft, Post, PostDraft,
        SiteSetup, SiteSetupDraft, Sluggable, Tag, TagDraft,
    },
    error::{Error, Result},
};

/// 管理端写入接口
///
/// 所有插入在首次保存时补全 slug（参见 [`Sluggable::ensure_slug`]），之后不再重新生成。
/// slug 或用户名冲突以 [`Error::Constraint`] 返回，不做重试。
pub trait Store: Send + Sync {
    fn insert_author(&self, draft: AuthorDraft) -> impl Future<Output = Result<Author>> + Send;

    fn insert_category(
        &self,
        draft: CategoryDraft,
    ) -> impl Future<Output = Result<Category>> + Send;

    fn insert_tag(&self, draft: TagDraft) -> impl Future<Output = Result<Tag>> + Send;

    fn insert_page(&self, draft: PageDraft) -> impl Future<Output = Result<Page>> + Send;

    /// 插入文章及其标签关联
    ///
    /// 引用不存在的分类、标签或作者时返回 [`Error::Constraint`]。
    fn insert_post(&self, draft: PostDraft) -> impl Future<Output = Result<Post>> + Send;

    /// 删除分类，引用它的文章保留，分类引用置空
    fn delete_category(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// 创建站点设置及菜单
    ///
    /// 站点设置全局唯一，已存在时返回 [`Error::Singleton`]。
    fn create_site_setup(
        &self,
        draft: SiteSetupDraft,
    ) -> impl Future<Output = Result<SiteSetup>> + Send;
}

impl Store for DBPool {
    async fn insert_author(&self, draft: AuthorDraft) -> Result<Author> {
        draft.validate()?;

        let author = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (username, first_name, last_name)
            VALUES ($1, $2, $3)
            RETURNING id, username, first_name, last_name
            "#,
        )
        .bind(draft.username)
        .bind(draft.first_name)
        .bind(draft.last_name)
        .fetch_one(self)
        .await?;

        tracing::debug!(id = author.id, username = %author.username, "author created");
        Ok(author)
    }

    async fn insert_category(&self, mut draft: CategoryDraft) -> Result<Category> {
        draft.validate()?;
        let slug = draft.ensure_slug().to_string();

        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
        )
        .bind(draft.name)
        .bind(slug)
        .fetch_one(self)
        .await?;

        tracing::debug!(id = category.id, slug = %category.slug, "category created");
        Ok(category)
    }

    async fn insert_tag(&self, mut draft: TagDraft) -> Result<Tag> {
        draft.validate()?;
        let slug = draft.ensure_slug().to_string();

        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
        )
        .bind(draft.name)
        .bind(slug)
        .fetch_one(self)
        .await?;

        tracing::debug!(id = tag.id, slug = %tag.slug, "tag created");
        Ok(tag)
    }

    async fn insert_page(&self, mut draft: PageDraft) -> Result<Page> {
        draft.validate()?;
        let slug = draft.ensure_slug().to_string();

        let page = sqlx::query_as::<_, Page>(
            r#"
            INSERT INTO pages (title, slug, is_published, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, slug, is_published, content
            "#,
        )
        .bind(draft.title)
        .bind(slug)
        .bind(draft.is_published)
        .bind(draft.content)
        .fetch_one(self)
        .await?;

        tracing::debug!(id = page.id, slug = %page.slug, "page created");
        Ok(page)
    }

    async fn insert_post(&self, mut draft: PostDraft) -> Result<Post> {
        draft.validate()?;
        let slug = draft.ensure_slug().to_string();

        let mut tx = self.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts
                (title, slug, excerpt, content, cover, is_published,
                 created_by, updated_by, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7, $8)
            RETURNING id
            "#,
        )
        .bind(draft.title)
        .bind(slug)
        .bind(draft.excerpt)
        .bind(draft.content)
        .bind(draft.cover)
        .bind(draft.is_published)
        .bind(draft.created_by)
        .bind(draft.category)
        .fetch_one(tx.as_mut())
        .await?;

        if !draft.tags.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO post_tags (post_id, tag_id)
                SELECT $1, UNNEST($2::BIGINT[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(id)
            .bind(draft.tags)
            .execute(tx.as_mut())
            .await?;
        }

        let sql = format!("{POST_SELECT} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_one(tx.as_mut())
            .await?;

        tx.commit().await?;

        tracing::debug!(id, slug = %row.slug, "post created");
        Ok(row.into())
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    async fn create_site_setup(&self, draft: SiteSetupDraft) -> Result<SiteSetup> {
        draft.validate()?;

        let mut tx = self.begin().await?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM site_setup)")
            .fetch_one(tx.as_mut())
            .await?;
        if exists {
            return Err(Error::Singleton);
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO site_setup (title, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .fetch_one(tx.as_mut())
        .await?;

        let mut menu = Vec::with_capacity(draft.menu.len());
        for link in draft.menu {
            let link = sqlx::query_as::<_, MenuLink>(
                r#"
                INSERT INTO menu_links (site_setup_id, text, url_or_path, new_tab)
                VALUES ($1, $2, $3, $4)
                RETURNING id, text, url_or_path, new_tab
                "#,
            )
            .bind(id)
            .bind(link.text)
            .bind(link.url_or_path)
            .bind(link.new_tab)
            .fetch_one(tx.as_mut())
            .await?;
            menu.push(link);
        }

        tx.commit().await?;

        tracing::debug!(id, "site setup created");
        Ok(SiteSetup {
            id,
            title: draft.title,
            description: draft.description,
            menu,
        })
    }
}
