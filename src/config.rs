use std::{env, path::Path};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    query::DEFAULT_PAGE_SIZE,
};

/// 服务配置
///
/// 先读取 `BLOG_CONFIG` 指向的 TOML 文件（可选），再用环境变量
/// `DATABASE_URL`、`BLOG_BIND`、`BLOG_PAGE_SIZE` 覆盖。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// 每页文章数
    pub page_size: u32,
    /// 没有站点设置时首页使用的标题
    pub site_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            database_url: None,
            max_connections: 10,
            page_size: DEFAULT_PAGE_SIZE,
            site_title: "Blog".to_string(),
        }
    }
}

impl Config {
    /// 从 `BLOG_CONFIG` 与环境变量加载
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var("BLOG_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// 从 TOML 文件加载，未给出的字段使用默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = var("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(bind) = var("BLOG_BIND") {
            self.bind = bind;
        }
        if let Some(size) = var("BLOG_PAGE_SIZE") {
            self.page_size = size
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid BLOG_PAGE_SIZE: {size}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use super::*;

    #[test]
    fn test_from_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
            database_url = "postgres://blog@localhost/blog"
            site_title = "Meu Blog"
            "#
        )
        .expect("write config");

        let config = Config::from_file(file.path()).expect("load config");
        assert_eq!(config.site_title, "Meu Blog");
        assert_eq!(config.database_url.as_deref(), Some("postgres://blog@localhost/blog"));
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.bind, "0.0.0.0:3000");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://override"),
            ("BLOG_BIND", "127.0.0.1:8080"),
            ("BLOG_PAGE_SIZE", "12"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .expect("apply overrides");

        assert_eq!(config.database_url.as_deref(), Some("postgres://override"));
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.page_size, 12);
    }

    #[test]
    fn test_invalid_page_size_is_config_error() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|key| (key == "BLOG_PAGE_SIZE").then(|| "nine".to_string()))
            .expect_err("invalid page size");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_file_is_toml_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "page_size = \"many\"").expect("write config");

        let err = Config::from_file(file.path()).expect_err("malformed config");
        assert!(matches!(err, Error::Toml(_)));
    }
}
