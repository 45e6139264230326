// src/permalink.rs
//! Filename → public URL mapping.
//!
//! Posts are named `YYYY-MM-DD-<slug>.<ext>`; the URL shape comes from a
//! template such as `{site}/blog/{year}/{month}/{day}/{slug}/`, which has to
//! match the site generator's own permalink setting.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PERMALINK: &str = "{site}/blog/{year}/{month}/{day}/{slug}/";
pub const POST_EXTENSIONS: &[&str] = &["md", "markdown"];

static POST_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})-(?P<slug>.+)\.(?P<ext>[A-Za-z]+)$")
        .expect("post filename regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown permalink placeholder {{{0}}}")]
    UnknownPlaceholder(String),
    #[error("unbalanced brace at byte {0} in permalink template")]
    UnbalancedBrace(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Site,
    Year,
    Month,
    Day,
    Slug,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "site" => Some(Self::Site),
            "year" => Some(Self::Year),
            "month" => Some(Self::Month),
            "day" => Some(Self::Day),
            "slug" => Some(Self::Slug),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Slug => "slug",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

/// Parsed permalink template. Validated once when configuration loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermalinkTemplate {
    segments: Vec<Segment>,
}

impl Default for PermalinkTemplate {
    fn default() -> Self {
        DEFAULT_PERMALINK
            .parse()
            .expect("built-in permalink template is valid")
    }
}

impl FromStr for PermalinkTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = s;
        let mut offset = 0;

        while let Some(pos) = rest.find(['{', '}']) {
            if rest.as_bytes()[pos] == b'}' {
                return Err(TemplateError::UnbalancedBrace(offset + pos));
            }
            literal.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let close = after
                .find('}')
                .ok_or(TemplateError::UnbalancedBrace(offset + pos))?;
            let name = &after[..close];
            if name.contains('{') {
                return Err(TemplateError::UnbalancedBrace(offset + pos));
            }
            let field = Placeholder::parse(name)
                .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Field(field));

            let consumed = pos + 1 + close + 1;
            offset += consumed;
            rest = &rest[consumed..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }
}

impl fmt::Display for PermalinkTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.segments {
            match seg {
                Segment::Literal(s) => f.write_str(s)?,
                Segment::Field(p) => write!(f, "{{{}}}", p.name())?,
            }
        }
        Ok(())
    }
}

/// Date and slug captured from a post filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSlug {
    pub year: String,
    pub month: String,
    pub day: String,
    pub slug: String,
}

impl PostSlug {
    /// `None` when the file name does not follow `YYYY-MM-DD-<slug>.<ext>`
    /// with a known post extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let caps = POST_FILENAME.captures(name)?;
        let ext = caps.name("ext")?.as_str();
        if !POST_EXTENSIONS.contains(&ext) {
            return None;
        }
        Some(Self {
            year: caps["year"].to_string(),
            month: caps["month"].to_string(),
            day: caps["day"].to_string(),
            slug: caps["slug"].to_string(),
        })
    }
}

impl PermalinkTemplate {
    pub fn render(&self, site_url: &str, post: &PostSlug) -> String {
        let site = site_url.trim_end_matches('/');
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Literal(s) => out.push_str(s),
                Segment::Field(Placeholder::Site) => out.push_str(site),
                Segment::Field(Placeholder::Year) => out.push_str(&post.year),
                Segment::Field(Placeholder::Month) => out.push_str(&post.month),
                Segment::Field(Placeholder::Day) => out.push_str(&post.day),
                Segment::Field(Placeholder::Slug) => out.push_str(&post.slug),
            }
        }
        out
    }
}

/// Public URL for a post file. Unrecognised file names map to the site root.
pub fn resolve_public_url(path: &Path, site_url: &str, template: &PermalinkTemplate) -> String {
    match PostSlug::from_path(path) {
        Some(post) => template.render(site_url, &post),
        None => site_url.to_string(),
    }
}
