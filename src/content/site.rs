use serde::{Deserialize, Serialize};

use super::{check_len, check_required};
use crate::error::Result;

/// 菜单链接，归属于唯一的 [`SiteSetup`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuLink {
    pub id: i64,
    pub text: String,
    pub url_or_path: String,
    pub new_tab: bool,
}

/// 站点设置，全局至多存在一条
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSetup {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// 按 `id` 升序排列
    pub menu: Vec<MenuLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuLinkDraft {
    pub text: String,
    pub url_or_path: String,
    #[serde(default)]
    pub new_tab: bool,
}

impl MenuLinkDraft {
    pub fn new(text: impl Into<String>, url_or_path: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url_or_path: url_or_path.into(),
            new_tab: false,
        }
    }

    pub fn new_tab(mut self, new_tab: bool) -> Self {
        self.new_tab = new_tab;
        self
    }

    fn validate(&self) -> Result<()> {
        check_required("text", &self.text)?;
        check_len("text", &self.text, 50)?;
        check_required("url_or_path", &self.url_or_path)?;
        check_len("url_or_path", &self.url_or_path, 2048)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteSetupDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub menu: Vec<MenuLinkDraft>,
}

impl SiteSetupDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            menu: Vec::new(),
        }
    }

    pub fn link(mut self, link: MenuLinkDraft) -> Self {
        self.menu.push(link);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_required("title", &self.title)?;
        check_len("title", &self.title, 65)?;
        check_len("description", &self.description, 255)?;
        self.menu.iter().try_for_each(MenuLinkDraft::validate)
    }
}
