use serde::{Deserialize, Serialize};

use super::{Sluggable, check_len, check_required, check_slug};
use crate::error::Result;

/// 名称的最大长度
const NAME_MAX_LEN: usize = 255;

/// 文章分类
///
/// 删除分类时，引用它的文章不会被删除，只是分类引用被置空。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// 文章标签，与文章多对多
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagDraft {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

macro_rules! taxonomy_draft {
    ($draft:ident) => {
        impl $draft {
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    name: name.into(),
                    slug: None,
                }
            }

            pub fn slug(mut self, slug: impl Into<String>) -> Self {
                self.slug = Some(slug.into());
                self
            }

            pub fn validate(&self) -> Result<()> {
                check_required("name", &self.name)?;
                check_len("name", &self.name, NAME_MAX_LEN)?;
                check_slug(self.slug.as_deref())
            }
        }

        impl Sluggable for $draft {
            fn slug_source(&self) -> &str {
                &self.name
            }

            fn slug_mut(&mut self) -> &mut Option<String> {
                &mut self.slug
            }
        }
    };
}

taxonomy_draft!(CategoryDraft);
taxonomy_draft!(TagDraft);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_validate_requires_name() {
        assert!(matches!(
            TagDraft::new("   ").validate(),
            Err(Error::Validation(_))
        ));
        assert!(CategoryDraft::new("Tecnologia").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_long_name() {
        let draft = CategoryDraft::new("x".repeat(NAME_MAX_LEN + 1));
        assert!(matches!(draft.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_category_deserializes_from_json() {
        let json = r#"{"id": 3, "name": "Rust", "slug": "rust-abcde"}"#;
        let category: Category = serde_json::from_str(json).expect("invalid category json");
        assert_eq!(category.id, 3);
        assert_eq!(category.slug, "rust-abcde");
    }
}
