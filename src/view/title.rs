use super::Resolved;
use crate::content::{Author, Post};

/// 搜索词在标题中的最大显示长度（字符）
pub const SEARCH_TITLE_MAX_CHARS: usize = 30;

/// 作者列表页标题
///
/// 有名字时为 `"Posts de {名} {姓}"`，否则为 `" posts de {用户名}"`。
pub fn author_title(author: &Author) -> String {
    match author.full_name() {
        Some(name) => format!("Posts de {name}"),
        None => format!(" posts de {}", author.username),
    }
}

/// 搜索结果页标题，搜索词超长时截断
pub fn search_title(term: &str) -> String {
    let shown: String = term.chars().take(SEARCH_TITLE_MAX_CHARS).collect();
    format!("{shown} - Search")
}

/// 推导列表页标题
///
/// 纯函数：只依赖列表种类及其参数，以及（分类、标签列表需要的）序列中的第一篇文章。
/// 分类或标签列表没有第一篇文章时无法推导，返回 `None`。
pub fn listing_title(
    resolved: &Resolved,
    site_title: &str,
    first: Option<&Post>,
) -> Option<String> {
    match resolved {
        Resolved::Index => Some(site_title.to_string()),
        Resolved::Author(author) => Some(author_title(author)),
        Resolved::Category(slug) => {
            let category = first?.category.as_ref().filter(|c| &c.slug == slug)?;
            Some(format!("{} - Categoria", category.name))
        }
        Resolved::Tag(slug) => {
            let tag = first?.tag_by_slug(slug)?;
            Some(format!("{} - Tag", tag.name))
        }
        Resolved::Search(term) => Some(search_title(term)),
    }
}
