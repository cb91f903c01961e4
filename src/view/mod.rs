//! 展示适配层：把查询结果转换为模板渲染上下文。

mod title;

pub use self::title::{SEARCH_TITLE_MAX_CHARS, author_title, listing_title, search_title};

use serde::Serialize;

use crate::{
    config::Config,
    content::{Author, Page, Post, SiteSetup},
    error::{Error, Result},
    query::{self, PageMeta, Paginator, PostFilter},
    storage::Querier,
};

pub const INDEX_TEMPLATE: &str = "blog/pages/index.html";
pub const POST_TEMPLATE: &str = "blog/pages/post.html";
pub const PAGE_TEMPLATE: &str = "blog/pages/page.html";

/// 展示层设置
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub paginator: Paginator,
    /// 没有站点设置时首页使用的标题
    pub site_title: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ViewSettings {
    fn from(config: &Config) -> Self {
        Self {
            paginator: Paginator::new(config.page_size),
            site_title: config.site_title.clone(),
        }
    }
}

/// 文章列表的种类及其参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Index,
    Author(i64),
    Category(String),
    Tag(String),
    Search(String),
}

/// 已解析的列表参数
///
/// 作者已确认存在，搜索词已去除首尾空白且非空。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Index,
    Author(Author),
    Category(String),
    Tag(String),
    Search(String),
}

impl Listing {
    /// 解析列表参数
    ///
    /// 作者不存在或搜索词为空白时返回 [`Error::NotFound`]，不执行文章查询。
    pub async fn resolve<Q: Querier>(self, querier: &Q) -> Result<Resolved> {
        Ok(match self {
            Listing::Index => Resolved::Index,
            Listing::Author(id) => {
                let author = querier.author(id).await?.ok_or_else(|| {
                    tracing::debug!(id, "author not found");
                    Error::NotFound
                })?;
                Resolved::Author(author)
            }
            Listing::Category(slug) => Resolved::Category(slug),
            Listing::Tag(slug) => Resolved::Tag(slug),
            Listing::Search(term) => {
                let term = term.trim();
                if term.is_empty() {
                    return Err(Error::NotFound);
                }
                Resolved::Search(term.to_string())
            }
        })
    }
}

impl Resolved {
    pub fn filter(&self) -> PostFilter {
        let filter = PostFilter::published();
        match self {
            Resolved::Index => filter,
            Resolved::Author(author) => filter.by_author(author.id),
            Resolved::Category(slug) => filter.by_category(slug),
            Resolved::Tag(slug) => filter.by_tag(slug),
            Resolved::Search(term) => filter.search(term),
        }
    }

    /// 结果为空时是否视为“未找到”
    fn requires_results(&self) -> bool {
        matches!(
            self,
            Resolved::Category(_) | Resolved::Tag(_) | Resolved::Search(_)
        )
    }

    /// 标题推导是否需要序列中的第一篇文章
    fn titled_by_first(&self) -> bool {
        matches!(self, Resolved::Category(_) | Resolved::Tag(_))
    }

    fn search_value(&self) -> Option<String> {
        match self {
            Resolved::Search(term) => Some(term.clone()),
            _ => None,
        }
    }
}

/// 分页对象：当前页文章及分页元信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageObj {
    pub items: Vec<Post>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// 文章列表页渲染上下文
#[derive(Debug, Clone, Serialize)]
pub struct ListingContext {
    pub template: &'static str,
    pub page_title: String,
    pub page_obj: PageObj,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_value: Option<String>,
    pub site_setup: Option<SiteSetup>,
}

/// 文章详情页渲染上下文
#[derive(Debug, Clone, Serialize)]
pub struct PostContext {
    pub template: &'static str,
    pub page_title: String,
    pub post: Post,
    pub site_setup: Option<SiteSetup>,
}

/// 静态页面渲染上下文
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub template: &'static str,
    pub page_title: String,
    pub page: Page,
    pub site_setup: Option<SiteSetup>,
}

/// 生成文章列表页上下文
///
/// 所有列表（首页、作者、分类、标签、搜索）共用这一入口，差异只在 [`Listing`]。
pub async fn listing<Q: Querier>(
    querier: &Q,
    settings: &ViewSettings,
    listing: Listing,
    page: i64,
) -> Result<ListingContext> {
    let resolved = listing.resolve(querier).await?;
    let filter = resolved.filter();

    let (items, meta) = query::paginate(querier, &filter, settings.paginator, page).await?;
    if meta.count == 0 && resolved.requires_results() {
        tracing::debug!(?resolved, "empty listing");
        return Err(Error::NotFound);
    }

    let first = if resolved.titled_by_first() {
        query::first_post(querier, &filter).await?
    } else {
        None
    };

    let site_setup = querier.site_setup().await?;
    let site_title = site_setup
        .as_ref()
        .map_or(settings.site_title.as_str(), |s| s.title.as_str());
    let page_title =
        listing_title(&resolved, site_title, first.as_ref()).ok_or(Error::NotFound)?;

    Ok(ListingContext {
        template: INDEX_TEMPLATE,
        page_title,
        page_obj: PageObj { items, meta },
        search_value: resolved.search_value(),
        site_setup,
    })
}

/// 生成文章详情页上下文，未发布或不存在时返回 [`Error::NotFound`]
pub async fn post_detail<Q: Querier>(querier: &Q, slug: &str) -> Result<PostContext> {
    let post = querier.published_post(slug).await?.ok_or(Error::NotFound)?;

    Ok(PostContext {
        template: POST_TEMPLATE,
        page_title: post.title.clone(),
        post,
        site_setup: querier.site_setup().await?,
    })
}

/// 生成静态页面上下文，未发布或不存在时返回 [`Error::NotFound`]
pub async fn page_detail<Q: Querier>(querier: &Q, slug: &str) -> Result<PageContext> {
    let page = querier.published_page(slug).await?.ok_or(Error::NotFound)?;

    Ok(PageContext {
        template: PAGE_TEMPLATE,
        page_title: page.title.clone(),
        page,
        site_setup: querier.site_setup().await?,
    })
}
