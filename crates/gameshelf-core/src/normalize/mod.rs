//! Name normalization - noise-token stripping and search-query variants

use regex::Regex;
use std::sync::LazyLock;

/// Edition suffixes stripped to produce progressively shorter variants.
/// Matched case-sensitively at the end of the cleaned name.
const EDITION_SUFFIXES: &[&str] = &[
    "Enhanced Edition",
    "Definitive Edition",
    "Anniversary",
    "Complete Edition",
    "Game of the Year Edition",
    "GOTY Edition",
    "Deluxe Edition",
];

// Release-group tags like "-RUNE" sit at the very end, so at most one match.
static RELEASE_GROUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-\w+$").unwrap());
static VERSION_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"v\d+(\.\d+)*").unwrap());
static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());

/// Clean a raw folder name into a search string.
///
/// Strips a trailing release-group tag, version markers, and parenthesized
/// segments, then turns `.`/`_` separators into spaces and collapses
/// whitespace. Re-cleaning an already-clean name is a no-op.
pub fn clean_name(raw: &str) -> String {
    let name = RELEASE_GROUP.replace(raw, "");
    let name = VERSION_MARKER.replace_all(&name, "");
    let name = PARENTHESIZED.replace_all(&name, "");
    let name = name.replace(['.', '_'], " ");
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Generate search-query variants for a raw folder name, most-specific
/// first.
///
/// Variant 1 is the cleaned name. Each edition suffix that matches the end
/// of the current variant yields a further-stripped variant, and if the
/// most-reduced variant still contains a space, a final variant inserts a
/// colon after the first word ("Halo Infinite" -> "Halo: Infinite") since
/// catalog titles often use colon-delimited subtitles. The list is
/// deduplicated; the processor tries entries in order.
pub fn query_variants(raw: &str) -> Vec<String> {
    let base = clean_name(raw);
    if base.is_empty() {
        return Vec::new();
    }

    let mut variants = vec![base.clone()];
    let mut current = base;
    for suffix in EDITION_SUFFIXES {
        if let Some(stripped) = current.strip_suffix(suffix) {
            let stripped = stripped.trim_end().to_string();
            if !stripped.is_empty() && stripped != current {
                push_unique(&mut variants, stripped.clone());
                current = stripped;
            }
        }
    }

    if let Some(colonized) = colonize(&current) {
        push_unique(&mut variants, colonized);
    }

    variants
}

fn push_unique(variants: &mut Vec<String>, candidate: String) {
    if !variants.contains(&candidate) {
        variants.push(candidate);
    }
}

fn colonize(name: &str) -> Option<String> {
    let space = name.find(' ')?;
    Some(format!("{}:{}", &name[..space], &name[space..]))
}
