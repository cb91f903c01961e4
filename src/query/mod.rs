//! 公开内容查询层：过滤、排序与分页。

mod filter;
mod paginator;

pub use self::{
    filter::PostFilter,
    paginator::{DEFAULT_PAGE_SIZE, PageMeta, Paginator, Window, parse_page_number},
};

use crate::{content::Post, error::Result, storage::Querier};

/// 按条件分页获取已发布文章
///
/// 先统计总数确定（钳制后的）页码，再取对应窗口。
pub async fn paginate<Q: Querier>(
    querier: &Q,
    filter: &PostFilter,
    paginator: Paginator,
    requested: i64,
) -> Result<(Vec<Post>, PageMeta)> {
    if filter.matches_nothing() {
        return Ok((Vec::new(), paginator.page(0, requested)));
    }

    let count = querier.count_posts(filter).await?;
    let meta = paginator.page(count, requested);

    let items = if count == 0 {
        Vec::new()
    } else {
        querier.posts(filter, meta.window()).await?
    };

    Ok((items, meta))
}

/// 条件序列中的第一篇（`id` 最大）文章
pub async fn first_post<Q: Querier>(querier: &Q, filter: &PostFilter) -> Result<Option<Post>> {
    if filter.matches_nothing() {
        return Ok(None);
    }
    Ok(querier.posts(filter, Window::FIRST).await?.into_iter().next())
}
