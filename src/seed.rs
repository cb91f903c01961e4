//! 从 TOML 夹具文件批量写入内容。

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::{
    content::{AuthorDraft, CategoryDraft, PageDraft, PostDraft, SiteSetupDraft, TagDraft},
    error::{Error, Result},
    storage::Store,
};

/// 夹具文件中的文章
///
/// 作者以用户名引用，分类和标签以名称引用。
#[derive(Debug, Deserialize)]
pub struct PostFixture {
    #[serde(flatten)]
    pub draft: PostDraft,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub tag_names: Vec<String>,
}

/// 夹具文件
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub site_setup: Option<SiteSetupDraft>,
    pub authors: Vec<AuthorDraft>,
    pub categories: Vec<CategoryDraft>,
    pub tags: Vec<TagDraft>,
    pub pages: Vec<PageDraft>,
    pub posts: Vec<PostFixture>,
}

impl Fixture {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 文章按名称引用分类和标签、按用户名引用作者，这些键在文件内必须唯一
    pub fn validate(&self) -> Result<()> {
        ensure_distinct("category", self.categories.iter().map(|c| c.name.as_str()))?;
        ensure_distinct("tag", self.tags.iter().map(|t| t.name.as_str()))?;
        ensure_distinct("author", self.authors.iter().map(|a| a.username.as_str()))
    }
}

fn ensure_distinct<'a>(kind: &str, keys: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(Error::Validation(format!("duplicate {kind}: {key}")));
        }
    }
    Ok(())
}

/// 写入统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub authors: usize,
    pub categories: usize,
    pub tags: usize,
    pub pages: usize,
    pub posts: usize,
    pub site_setup: bool,
}

fn lookup(ids: &HashMap<String, i64>, kind: &str, key: &str) -> Result<i64> {
    ids.get(key)
        .copied()
        .ok_or_else(|| Error::Validation(format!("unknown {kind}: {key}")))
}

/// 按分类、标签、作者、页面、文章、站点设置的顺序写入夹具内容
///
/// 写入前先执行 [`Fixture::validate`]；任一写入失败即停止并返回错误，已写入的内容不回滚。
pub async fn load<S: Store>(store: &S, fixture: Fixture) -> Result<SeedReport> {
    fixture.validate()?;
    let mut report = SeedReport::default();

    let mut categories = HashMap::new();
    for draft in fixture.categories {
        let category = store.insert_category(draft).await?;
        categories.insert(category.name.clone(), category.id);
        report.categories += 1;
    }

    let mut tags = HashMap::new();
    for draft in fixture.tags {
        let tag = store.insert_tag(draft).await?;
        tags.insert(tag.name.clone(), tag.id);
        report.tags += 1;
    }

    let mut authors = HashMap::new();
    for draft in fixture.authors {
        let author = store.insert_author(draft).await?;
        authors.insert(author.username.clone(), author.id);
        report.authors += 1;
    }

    for draft in fixture.pages {
        store.insert_page(draft).await?;
        report.pages += 1;
    }

    for post in fixture.posts {
        let mut draft = post.draft;
        if let Some(username) = post.author.as_deref() {
            draft.created_by = Some(lookup(&authors, "author", username)?);
        }
        if let Some(name) = post.category_name.as_deref() {
            draft.category = Some(lookup(&categories, "category", name)?);
        }
        for name in &post.tag_names {
            draft.tags.push(lookup(&tags, "tag", name)?);
        }

        let created = store.insert_post(draft).await?;
        tracing::info!(id = created.id, slug = %created.slug, "post seeded");
        report.posts += 1;
    }

    if let Some(draft) = fixture.site_setup {
        store.create_site_setup(draft).await?;
        report.site_setup = true;
    }

    Ok(report)
}
