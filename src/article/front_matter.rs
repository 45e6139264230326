// src/article/front_matter.rs
//! Line-anchored `key: value` field lookup over a post's front matter.
//!
//! Grammar accepted per line: `<key>:<ws><value>`, where `<value>` is either a
//! quoted scalar (`"..."` or `'...'`) or, for keys that allow it, the bare
//! remainder of the line. Lookups return `Option`; callers pick defaults.

use once_cell::sync::Lazy;
use regex::Regex;

static FIELD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<key>[A-Za-z_][A-Za-z0-9_-]*):[ \t]*(?P<value>.*?)[ \t]*$")
        .expect("front matter field regex")
});

static QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#).expect("quoted value regex")
});

/// Returns the header block when the document opens with a `---` fence,
/// otherwise the whole document.
pub fn header_region(raw: &str) -> &str {
    let mut lines = raw.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return raw;
    };
    if first.trim_end() != "---" {
        return raw;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == "---" {
            return &raw[start..offset];
        }
        offset += line.len();
    }
    // Unterminated fence: treat everything after the opener as header.
    &raw[start..]
}

/// Value of the first `key:` line whose value is quoted.
pub fn quoted_field(text: &str, key: &str) -> Option<String> {
    field_values(text, key).find_map(|value| {
        let caps = QUOTED.captures(value)?;
        caps.name("dq")
            .or_else(|| caps.name("sq"))
            .map(|m| m.as_str().to_string())
    })
}

/// Value of the first `key:` line, taken verbatim (quotes and all). Empty
/// values are skipped.
pub fn bare_field(text: &str, key: &str) -> Option<String> {
    field_values(text, key)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Quoted value if any `key:` line has one, else the bare value.
pub fn scalar_field(text: &str, key: &str) -> Option<String> {
    quoted_field(text, key).or_else(|| bare_field(text, key))
}

fn field_values<'a>(text: &'a str, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    text.lines().filter_map(move |line| {
        let caps = FIELD_LINE.captures(line)?;
        if caps.name("key")?.as_str() != key {
            return None;
        }
        caps.name("value").map(|m| m.as_str())
    })
}
