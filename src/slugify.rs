use rand::{Rng, distr::Alphanumeric};

/// 默认随机后缀长度
pub const DEFAULT_SUFFIX_LEN: usize = 5;

/// slug 的最大长度（字符），与数据库列宽一致
pub const SLUG_MAX_LEN: usize = 255;

/// 由任意文本生成 slug
///
/// 文本先被规范化为小写、以 `-` 连接的 ASCII 形式，然后追加
/// `suffix_len` 个随机字母数字字符（62 个符号）。随机源为线程本地的
/// CSPRNG；不做唯一性检查，冲突由存储层的唯一约束兜底。
///
/// 规范化部分会被截断，保证结果不超过 [`SLUG_MAX_LEN`]。
pub fn generate_slug(text: &str, suffix_len: usize) -> String {
    generate_slug_with(&mut rand::rng(), text, suffix_len)
}

/// 与 [`generate_slug`] 相同，但使用调用方提供的随机源
pub fn generate_slug_with<R: Rng + ?Sized>(rng: &mut R, text: &str, suffix_len: usize) -> String {
    let mut slug = ::slug::slugify(text);

    let max_base = SLUG_MAX_LEN.saturating_sub(suffix_len);
    if let Some((end, _)) = slug.char_indices().nth(max_base) {
        slug.truncate(end);
        slug.truncate(slug.trim_end_matches('-').len());
    }

    slug.reserve(suffix_len);
    slug.extend((0..suffix_len).map(|_| char::from(rng.sample(Alphanumeric))));
    slug
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn split_suffix(slug: &str, len: usize) -> (&str, &str) {
        slug.split_at(slug.len() - len)
    }

    #[test]
    fn test_normalizes_and_appends_suffix() {
        let slug = generate_slug("Olá, Mundo!  Rust & Django", 5);
        let (base, suffix) = split_suffix(&slug, 5);

        assert_eq!(base, "ola-mundo-rust-django");
        assert_eq!(suffix.len(), 5);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_empty_text_yields_only_suffix() {
        let slug = generate_slug("", 8);
        assert_eq!(slug.len(), 8);
        assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));

        let slug = generate_slug("  !!!  ", 3);
        assert_eq!(slug.len(), 3);
    }

    #[test]
    fn test_long_text_is_truncated_to_max_len() {
        let slug = generate_slug(&"a".repeat(SLUG_MAX_LEN), 5);
        assert_eq!(slug.len(), SLUG_MAX_LEN);
        assert!(slug.starts_with(&"a".repeat(SLUG_MAX_LEN - 5)));

        // 汉字音译后会远长于原文
        let slug = generate_slug(&"中".repeat(65), 5);
        assert!(slug.len() <= SLUG_MAX_LEN);
        assert!(slug.starts_with("zhong-zhong"));
    }

    #[test]
    fn test_truncation_drops_trailing_hyphen() {
        // 第 250 个字符恰好是 `-`
        let text = format!("{} b", "a".repeat(SLUG_MAX_LEN - 6));
        let slug = generate_slug(&text, 5);
        let (base, _) = split_suffix(&slug, 5);
        assert_eq!(base, "a".repeat(SLUG_MAX_LEN - 6));
    }

    #[test]
    fn test_zero_suffix_is_plain_slug() {
        assert_eq!(generate_slug("Hello World", 0), "hello-world");
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = generate_slug_with(&mut StdRng::seed_from_u64(42), "Same Title", 5);
        let b = generate_slug_with(&mut StdRng::seed_from_u64(42), "Same Title", 5);
        assert_eq!(a, b);

        let c = generate_slug_with(&mut StdRng::seed_from_u64(7), "Same Title", 5);
        assert_eq!(split_suffix(&a, 5).0, split_suffix(&c, 5).0);
    }

    #[test]
    fn test_output_shape_for_assorted_inputs() {
        let inputs = [
            "Título com Acentuação",
            "--edges--",
            "under_score and\ttabs\nnewline",
            "ÆØÅ straße",
            "123 numbers 456",
            "!!!",
        ];

        for text in inputs {
            let slug = generate_slug(text, 5);
            let (base, suffix) = split_suffix(&slug, 5);

            assert!(
                base.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "unexpected char in {base:?} (from {text:?})"
            );
            assert!(!base.starts_with('-') && !base.ends_with('-'), "{base:?}");
            assert!(!base.contains("--"), "{base:?}");
            assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }
}
