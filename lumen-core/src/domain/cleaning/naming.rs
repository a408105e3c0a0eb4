// lumen-core/src/domain/cleaning/naming.rs

use regex::Regex;
use std::sync::OnceLock;

fn compile(pattern: &str) -> Regex {
    // Patterns are hardcoded: the fallback never matches anything.
    Regex::new(pattern).unwrap_or_else(|_| Regex::new("$^").unwrap_or_else(|_| unreachable!()))
}

fn re_separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"[\s\-]+"))
}

fn re_word_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"(.)([A-Z][a-z]+)"))
}

fn re_lower_upper() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"([a-z0-9])([A-Z])"))
}

fn re_invalid() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"[^0-9a-zA-Z_]+"))
}

/// `"Campaign ID"` -> `campaign_id`, `"clickThroughRate"` -> `click_through_rate`.
pub fn to_snake_case(name: &str) -> String {
    let name = re_separators().replace_all(name.trim(), "_");
    let name = re_word_boundary().replace_all(&name, "${1}_${2}");
    let name = re_lower_upper().replace_all(&name, "${1}_${2}");
    let name = re_invalid().replace_all(&name, "");
    name.to_lowercase()
}
