use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Local;

use super::{Querier, Store};
use crate::{
    content::{
        Author, AuthorDraft, Category, CategoryDraft, MenuLink, Page, PageDraft, Post, PostDraft,
        SiteSetup, SiteSetupDraft, Sluggable, Tag, TagDraft,
    },
    error::{Error, Result},
    query::{PostFilter, Window},
};

/// 内存实现的 [`Querier`] 与 [`Store`]
///
/// 语义与 PostgreSQL 实现一致：各表 `id` 自增、slug 唯一、外键检查、
/// 删除分类时置空文章引用、站点设置唯一。用于测试与本地演示。
#[derive(Debug, Default)]
pub struct MemoryDb {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    seq: Sequences,
    authors: Vec<Author>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
    pages: Vec<Page>,
    posts: Vec<Post>,
    site_setup: Option<SiteSetup>,
}

#[derive(Debug, Default)]
struct Sequences {
    author: i64,
    category: i64,
    tag: i64,
    page: i64,
    post: i64,
    site_setup: i64,
    menu_link: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

fn unique<T>(rows: &[T], field: &str, value: &str, get: impl Fn(&T) -> &str) -> Result<()> {
    if rows.iter().any(|r| get(r) == value) {
        return Err(Error::Constraint(format!("duplicate {field}: {value}")));
    }
    Ok(())
}

impl MemoryDb {
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Querier for MemoryDb {
    async fn count_posts(&self, filter: &PostFilter) -> Result<u64> {
        let tables = self.read();
        Ok(filter.apply(&tables.posts).count() as u64)
    }

    async fn posts(&self, filter: &PostFilter, window: Window) -> Result<Vec<Post>> {
        let tables = self.read();
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);

        Ok(filter
            .apply(&tables.posts)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn published_post(&self, slug: &str) -> Result<Option<Post>> {
        let tables = self.read();
        Ok(tables
            .posts
            .iter()
            .find(|p| p.is_published && p.slug == slug)
            .cloned())
    }

    async fn published_page(&self, slug: &str) -> Result<Option<Page>> {
        let tables = self.read();
        Ok(tables
            .pages
            .iter()
            .find(|p| p.is_published && p.slug == slug)
            .cloned())
    }

    async fn author(&self, id: i64) -> Result<Option<Author>> {
        Ok(self.read().authors.iter().find(|a| a.id == id).cloned())
    }

    async fn site_setup(&self) -> Result<Option<SiteSetup>> {
        Ok(self.read().site_setup.clone())
    }
}

impl Store for MemoryDb {
    async fn insert_author(&self, draft: AuthorDraft) -> Result<Author> {
        draft.validate()?;

        let mut tables = self.write();
        unique(&tables.authors, "username", &draft.username, |a| a.username.as_str())?;

        let author = Author {
            id: next(&mut tables.seq.author),
            username: draft.username,
            first_name: draft.first_name,
            last_name: draft.last_name,
        };
        tables.authors.push(author.clone());
        Ok(author)
    }

    async fn insert_category(&self, mut draft: CategoryDraft) -> Result<Category> {
        draft.validate()?;
        let slug = draft.ensure_slug().to_string();

        let mut tables = self.write();
        unique(&tables.categories, "slug", &slug, |c| c.slug.as_str())?;

        let category = Category {
            id: next(&mut tables.seq.category),
            name: draft.name,
            slug,
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn insert_tag(&self, mut draft: TagDraft) -> Result<Tag> {
        draft.validate()?;
        let slug = draft.ensure_slug().to_string();

        let mut tables = self.write();
        unique(&tables.tags, "slug", &slug, |t| t.slug.as_str())?;

        let tag = Tag {
            id: next(&mut tables.seq.tag),
            name: draft.name,
            slug,
        };
        tables.tags.push(tag.clone());
        Ok(tag)
    }

    async fn insert_page(&self, mut draft: PageDraft) -> Result<Page> {
        draft.validate()?;
        let slug = draft.ensure_slug().to_string();

        let mut tables = self.write();
        unique(&tables.pages, "slug", &slug, |p| p.slug.as_str())?;

        let page = Page {
            id: next(&mut tables.seq.page),
            title: draft.title,
            slug,
            is_published: draft.is_published,
            content: draft.content,
        };
        tables.pages.push(page.clone());
        Ok(page)
    }

    async fn insert_post(&self, mut draft: PostDraft) -> Result<Post> {
        draft.validate()?;
        let slug = draft.ensure_slug().to_string();

        let mut tables = self.write();
        unique(&tables.posts, "slug", &slug, |p| p.slug.as_str())?;

        if let Some(author) = draft.created_by {
            if !tables.authors.iter().any(|a| a.id == author) {
                return Err(Error::Constraint(format!("unknown author: {author}")));
            }
        }

        let category = match draft.category {
            Some(id) => Some(
                tables
                    .categories
                    .iter()
                    .find(|c| c.id == id)
                    .cloned()
                    .ok_or_else(|| Error::Constraint(format!("unknown category: {id}")))?,
            ),
            None => None,
        };

        let mut tags = Vec::with_capacity(draft.tags.len());
        for id in &draft.tags {
            let tag = tables
                .tags
                .iter()
                .find(|t| t.id == *id)
                .ok_or_else(|| Error::Constraint(format!("unknown tag: {id}")))?;
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags.sort_by_key(|t: &Tag| t.id);

        let now = Local::now();
        let post = Post {
            id: next(&mut tables.seq.post),
            title: draft.title,
            slug,
            excerpt: draft.excerpt,
            content: draft.content,
            cover: draft.cover,
            is_published: draft.is_published,
            created_at: now,
            updated_at: now,
            created_by: draft.created_by,
            updated_by: draft.created_by,
            category,
            tags,
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        let mut tables = self.write();

        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        if tables.categories.len() == before {
            return Err(Error::NotFound);
        }

        for post in &mut tables.posts {
            if post.category.as_ref().is_some_and(|c| c.id == id) {
                post.category = None;
            }
        }
        Ok(())
    }

    async fn create_site_setup(&self, draft: SiteSetupDraft) -> Result<SiteSetup> {
        draft.validate()?;

        let mut tables = self.write();
        if tables.site_setup.is_some() {
            return Err(Error::Singleton);
        }

        let menu = draft
            .menu
            .into_iter()
            .map(|link| MenuLink {
                id: next(&mut tables.seq.menu_link),
                text: link.text,
                url_or_path: link.url_or_path,
                new_tab: link.new_tab,
            })
            .collect();

        let setup = SiteSetup {
            id: next(&mut tables.seq.site_setup),
            title: draft.title,
            description: draft.description,
            menu,
        };
        tables.site_setup = Some(setup.clone());
        Ok(setup)
    }
}
