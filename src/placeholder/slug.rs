use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid slug pattern"));
static DISALLOWED_KEEP_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\-/\\]").expect("valid slug pattern"));
static DASH_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid slug pattern"));

/// Controls how `slugify` treats non-ASCII text and path separators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlugOptions {
    /// Keep Unicode letters (NFKC) instead of folding to ASCII (NFKD, non-ASCII dropped).
    pub allow_unicode: bool,
    /// Let `/` and `\` through untouched.
    pub keep_separators: bool,
}

impl SlugOptions {
    pub fn for_path(keep_separators: bool) -> Self {
        Self {
            allow_unicode: false,
            keep_separators,
        }
    }
}

/// Normalizes `value` into a filesystem-safe token.
///
/// Lower-cases, removes everything that is not a word character, whitespace or
/// hyphen, collapses whitespace and hyphen runs into a single `-`, and trims
/// leading and trailing `-` and `_`.
pub fn slugify(value: &str, options: SlugOptions) -> String {
    let normalized: String = if options.allow_unicode {
        value.nfkc().collect()
    } else {
        value.nfkd().filter(char::is_ascii).collect()
    };
    let lowered = normalized.to_lowercase();

    let pattern = if options.keep_separators {
        &*DISALLOWED_KEEP_SEPARATORS
    } else {
        &*DISALLOWED
    };
    let cleaned = pattern.replace_all(&lowered, "");
    let collapsed = DASH_RUNS.replace_all(&cleaned, "-");

    collapsed.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Keeps at most `max` characters of `value`.
pub fn truncate_chars(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
