//! Placeholder expansion for filename, path and seed arguments.
//!
//! Filename-class values may embed `<token>` placeholders. `<prompt>`,
//! `<date>` and `<time>` are expanded first; every remaining token is looked
//! up among the bound arguments. The result is capped and slugified so it can
//! be used as part of an output file name.

mod slug;

pub use slug::*;

use crate::binding::{BindingKind, BindingSet, SEED_KEY};
use crate::directive::DirectiveOverrides;
use chrono::NaiveDateTime;
use rand::Rng;
use regex::{NoExpand, Regex};
use std::sync::LazyLock;

/// Seed values that request a freshly generated seed.
pub const SEED_SENTINELS: [&str; 4] = ["random", "0", "-1", "?"];
/// Upper bound (inclusive) of generated seeds.
pub const MAX_SEED: u64 = 999_999_999_999_999;
/// Characters of the prompt used for `<prompt>`.
pub const PROMPT_PLACEHOLDER_CHARS: usize = 100;
/// Maximum length of a rendered filename value before slugification.
pub const MAX_RENDERED_CHARS: usize = 200;

const MODEL_SUFFIXES: [&str; 2] = [".safetensors", ".sft"];

static PROMPT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<prompt>").expect("valid placeholder pattern"));
static DATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<date>").expect("valid placeholder pattern"));
static TIME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<time>").expect("valid placeholder pattern"));

pub fn is_seed_sentinel(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    SEED_SENTINELS.contains(&value.as_str())
}

/// Draws a seed in `[1, MAX_SEED]`.
pub fn generate_seed<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.random_range(1..=MAX_SEED)
}

/// Current value of every bound argument, taken before any graph write of an
/// iteration. Directive overrides win over startup values.
#[derive(Debug, Clone, Default)]
pub struct ValueSnapshot {
    values: Vec<(String, String)>,
}

impl ValueSnapshot {
    pub fn capture(bindings: &BindingSet, overrides: &DirectiveOverrides) -> Self {
        let values = bindings
            .names()
            .filter_map(|name| {
                overrides
                    .get(name)
                    .or_else(|| bindings.default_value(name))
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        Self { values }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                .collect(),
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Per-iteration inputs to placeholder expansion.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// The effective prompt text (after prepend, append and truncation).
    pub prompt: &'a str,
    /// The seed shared by every seed binding in this iteration.
    pub seed: u64,
    pub now: NaiveDateTime,
    pub values: &'a ValueSnapshot,
}

/// Produces the final string for a binding of `kind` holding `raw`.
pub fn resolve_value(kind: BindingKind, raw: &str, ctx: &RenderContext<'_>) -> String {
    match kind {
        BindingKind::Seed if is_seed_sentinel(raw) => ctx.seed.to_string(),
        BindingKind::FileName { keep_separators } => render(raw, keep_separators, ctx),
        BindingKind::Prompt | BindingKind::Seed | BindingKind::Plain => raw.to_string(),
    }
}

/// Expands placeholders in a filename or path value, then caps and slugifies it.
pub fn render(raw: &str, keep_separators: bool, ctx: &RenderContext<'_>) -> String {
    let options = SlugOptions::for_path(keep_separators);

    let prompt_slug = slugify(truncate_chars(ctx.prompt, PROMPT_PLACEHOLDER_CHARS), options);
    let value = PROMPT_TOKEN.replace_all(raw, NoExpand(&prompt_slug));

    let date = ctx.now.format("%Y%m%d").to_string();
    let value = DATE_TOKEN.replace_all(&value, NoExpand(&date));

    let time = ctx.now.format("%H%M%S").to_string();
    let value = TIME_TOKEN.replace_all(&value, NoExpand(&time));

    let expanded = expand_tokens(&value, ctx);
    slugify(truncate_chars(&expanded, MAX_RENDERED_CHARS), options)
}

/// Replaces each `<name>` token left to right. Unknown names become empty;
/// an unterminated `<` ends the scan and the rest is kept as is.
fn expand_tokens(input: &str, ctx: &RenderContext<'_>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('>') else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str(&lookup_token(&after_open[..close], ctx));
        rest = &after_open[close + 1..];
    }

    out.push_str(rest);
    out
}

fn lookup_token(token: &str, ctx: &RenderContext<'_>) -> String {
    let name = token.trim();
    if name.eq_ignore_ascii_case(SEED_KEY) {
        return match ctx.values.get(SEED_KEY) {
            Some(value) if !is_seed_sentinel(value) => strip_model_suffix(value).to_string(),
            _ => ctx.seed.to_string(),
        };
    }
    ctx.values
        .get(name)
        .map(|value| strip_model_suffix(value).to_string())
        .unwrap_or_default()
}

fn strip_model_suffix(value: &str) -> &str {
    for suffix in MODEL_SUFFIXES {
        let Some(cut) = value.len().checked_sub(suffix.len()) else {
            continue;
        };
        if value
            .get(cut..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
        {
            return &value[..cut];
        }
    }
    value
}
