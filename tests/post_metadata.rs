// tests/post_metadata.rs
//
// Front-matter extraction and permalink resolution through the public API.

use std::path::Path;

use post_publish_notifier::article::{DEFAULT_DESCRIPTION, DEFAULT_TITLE};
use post_publish_notifier::{resolve_public_url, ArticleMetadata, PermalinkTemplate};

const SITE: &str = "https://example.github.io";

#[test]
fn quoted_title_is_returned_verbatim() {
    for title in ["Flush+Reload Explained", "Rowhammer: a primer", "#1 - ASLR bypass", "   "] {
        let doc = format!("---\ntitle: \"{title}\"\n---\n");
        let got = ArticleMetadata::extract(&doc).title;
        if title.trim().is_empty() {
            assert_eq!(got, DEFAULT_TITLE);
        } else {
            assert_eq!(got, title);
        }
    }
}

#[test]
fn no_title_field_gives_default() {
    let doc = "---\nlayout: post\ndate: 2026-01-27\n---\nThe title: is mentioned mid-line.\n";
    assert_eq!(ArticleMetadata::extract(doc).title, DEFAULT_TITLE);
}

#[test]
fn excerpt_beats_description_regardless_of_order() {
    let a = "---\ndescription: \"from description\"\nexcerpt: \"from excerpt\"\n---\n";
    let b = "---\nexcerpt: \"from excerpt\"\ndescription: \"from description\"\n---\n";
    assert_eq!(ArticleMetadata::extract(a).description, "from excerpt");
    assert_eq!(ArticleMetadata::extract(b).description, "from excerpt");
}

#[test]
fn description_used_when_no_excerpt() {
    let doc = "title: T\ndescription: 'Single quoted summary'\n";
    let m = ArticleMetadata::extract(doc);
    assert_eq!(m.title, "T");
    assert_eq!(m.description, "Single quoted summary");
}

#[test]
fn no_summary_gives_default_description() {
    let doc = "---\ntitle: \"T\"\n---\n";
    assert_eq!(ArticleMetadata::extract(doc).description, DEFAULT_DESCRIPTION);
}

#[test]
fn dated_posts_resolve_under_blog() {
    let t = PermalinkTemplate::default();
    let cases = [
        ("_posts/2026-01-27-flush-reload.md", "https://example.github.io/blog/2026/01/27/flush-reload/"),
        ("2025-11-03-prime-probe.markdown", "https://example.github.io/blog/2025/11/03/prime-probe/"),
        ("/abs/path/_posts/1999-12-31-y2k-bugs-revisited.md", "https://example.github.io/blog/1999/12/31/y2k-bugs-revisited/"),
    ];
    for (path, want) in cases {
        assert_eq!(resolve_public_url(Path::new(path), SITE, &t), want, "{path}");
    }
}

#[test]
fn non_matching_names_resolve_to_site_root() {
    let t = PermalinkTemplate::default();
    for path in [
        "_posts/flush-reload.md",
        "_posts/2026-1-27-short-date.md",
        "_posts/2026-01-27-notes.txt",
        "_posts/2026-01-27-flush-reload",
        "README.md",
        "",
    ] {
        assert_eq!(resolve_public_url(Path::new(path), SITE, &t), SITE, "{path}");
    }
}

#[test]
fn resolution_is_idempotent() {
    let t = PermalinkTemplate::default();
    let p = Path::new("_posts/2026-01-27-flush-reload.md");
    let a = resolve_public_url(p, SITE, &t);
    let b = resolve_public_url(p, SITE, &t);
    assert_eq!(a.as_bytes(), b.as_bytes());
}
