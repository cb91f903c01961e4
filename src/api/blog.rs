use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use axum_extra::extract::Query;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    query::parse_page_number,
    state::AppState,
    storage::Querier,
    view::{self, Listing, ListingContext, PageContext, PostContext},
};

/// 配置博客公开路由。
///
/// 路由包括：
/// - `GET /`：首页文章列表
/// - `GET /post/{slug}`：单篇文章
/// - `GET /page/{slug}`：静态页面
/// - `GET /created_by/{author_id}`：作者文章列表
/// - `GET /category/{slug}`：分类文章列表
/// - `GET /tag/{slug}`：标签文章列表
/// - `GET /search?search=`：搜索结果
///
/// 列表路由都接受 `?page=` 分页参数。
pub fn setup_route<Q: Querier + 'static>() -> Router<AppState<Q>> {
    Router::new()
        .route("/", get(index::<Q>))
        .route("/post/{slug}", get(post::<Q>))
        .route("/page/{slug}", get(page::<Q>))
        .route("/created_by/{author_id}", get(created_by::<Q>))
        .route("/category/{slug}", get(category::<Q>))
        .route("/tag/{slug}", get(tag::<Q>))
        .route("/search", get(search::<Q>))
}

/// 分页参数，非整数页码视为第 1 页
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageParams {
    page: Option<String>,
}

impl PageParams {
    fn number(&self) -> i64 {
        parse_page_number(self.page.as_deref())
    }
}

/// 搜索参数
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    search: String,
    page: Option<String>,
}

async fn render_listing<Q: Querier>(
    app: &AppState<Q>,
    listing: Listing,
    page: i64,
) -> Result<Json<ListingContext>> {
    view::listing(app.querier(), app.settings(), listing, page)
        .await
        .map(Json)
}

async fn index<Q: Querier>(
    State(app): State<AppState<Q>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListingContext>> {
    render_listing(&app, Listing::Index, params.number()).await
}

async fn created_by<Q: Querier>(
    Path(author_id): Path<String>,
    State(app): State<AppState<Q>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListingContext>> {
    let author_id = author_id.parse().map_err(|_| Error::NotFound)?;
    render_listing(&app, Listing::Author(author_id), params.number()).await
}

async fn category<Q: Querier>(
    Path(slug): Path<String>,
    State(app): State<AppState<Q>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListingContext>> {
    render_listing(&app, Listing::Category(slug), params.number()).await
}

async fn tag<Q: Querier>(
    Path(slug): Path<String>,
    State(app): State<AppState<Q>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListingContext>> {
    render_listing(&app, Listing::Tag(slug), params.number()).await
}

async fn search<Q: Querier>(
    State(app): State<AppState<Q>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ListingContext>> {
    let page = parse_page_number(params.page.as_deref());
    render_listing(&app, Listing::Search(params.search), page).await
}

async fn post<Q: Querier>(
    Path(slug): Path<String>,
    State(app): State<AppState<Q>>,
) -> Result<Json<PostContext>> {
    view::post_detail(app.querier(), &slug).await.map(Json)
}

async fn page<Q: Querier>(
    Path(slug): Path<String>,
    State(app): State<AppState<Q>>,
) -> Result<Json<PageContext>> {
    view::page_detail(app.querier(), &slug).await.map(Json)
}
