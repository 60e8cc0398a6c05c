//! Page extraction.
//!
//! Turns one HTML document into a title, a meta description and a bounded
//! plain-text snippet of its main content.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use scraper::{ElementRef, Html, Selector};
use sitelens_core::{
    content::PAGE_CONTENT_LIMIT,
    text::{clean_text, join_fragments, truncate_chars},
};
use thiserror::Error;

/// Page extraction errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// The page could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for page extraction.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Elements whose text never contributes to a page snippet.
const CHROME_SELECTOR_STR: &str = "nav, footer, aside, script, style";

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));
static META_DESCRIPTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="description"]"#).expect("valid meta description selector")
});
static CHROME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(CHROME_SELECTOR_STR).expect("valid chrome selector"));
static MAIN_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("main").expect("valid main selector"));
static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid body selector"));

/// Metadata extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Document title or the file stem.
    pub title: String,

    /// Meta description, empty when absent.
    pub description: String,

    /// Main-content snippet, at most [`PAGE_CONTENT_LIMIT`] characters.
    pub content: String,
}

/// Read a file as text, replacing undecodable bytes instead of failing.
pub fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| HtmlError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Extract page metadata from a file.
pub fn extract(path: &Path) -> Result<PageInfo> {
    let source = read_lossy(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(extract_from_str(&source, &stem))
}

/// Extract page metadata from an HTML string.
///
/// `fallback_title` is used when the document has no non-empty `<title>`.
pub fn extract_from_str(source: &str, fallback_title: &str) -> PageInfo {
    let mut document = Html::parse_document(source);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| clean_text(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| clean_text(fallback_title));

    let description = document
        .select(&META_DESCRIPTION_SELECTOR)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(|c| c.trim().to_string())
        .unwrap_or_default();

    strip_chrome(&mut document);

    let node = document
        .select(&MAIN_SELECTOR)
        .next()
        .or_else(|| document.select(&BODY_SELECTOR).next())
        .unwrap_or_else(|| document.root_element());
    let mut content = element_text(node);

    if !description.is_empty() && !content.contains(&description) {
        content = if content.is_empty() {
            description.clone()
        } else {
            format!("{description} {content}")
        };
    }

    PageInfo {
        title,
        description,
        content: truncate_chars(&content, PAGE_CONTENT_LIMIT),
    }
}

/// Collapsed text of an element's subtree, text nodes joined by single spaces.
pub fn element_text(element: ElementRef<'_>) -> String {
    join_fragments(element.text())
}

/// Detach navigation, footer, aside, script and style subtrees.
fn strip_chrome(document: &mut Html) {
    let ids: Vec<_> = document.select(&CHROME_SELECTOR).map(|e| (*e).id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_body() {
        let info = extract_from_str(
            "<html><head><title> Home \n Page </title></head><body><p>Welcome</p></body></html>",
            "index",
        );
        assert_eq!(info.title, "Home Page");
        assert_eq!(info.description, "");
        assert_eq!(info.content, "Welcome");
    }

    #[test]
    fn test_title_falls_back_to_stem() {
        let info = extract_from_str("<body><p>x</p></body>", "about");
        assert_eq!(info.title, "about");

        let info = extract_from_str("<title>   </title><p>x</p>", "blank");
        assert_eq!(info.title, "blank");
    }

    #[test]
    fn test_chrome_is_removed() {
        let html = r#"<html><head><style>.a{color:red}</style><script>var x = 1;</script></head>
            <body>
              <nav>Home | About</nav>
              <aside>Sidebar</aside>
              <p>Real   content
                 here</p>
              <footer>Copyright</footer>
              <script>track();</script>
            </body></html>"#;
        let info = extract_from_str(html, "page");
        assert_eq!(info.content, "Real content here");
    }

    #[test]
    fn test_prefers_main() {
        let html = "<body><header>Header text</header><main><h1>Title</h1><p>Body</p></main><div>Outside</div></body>";
        let info = extract_from_str(html, "page");
        assert_eq!(info.content, "Title Body");
    }

    #[test]
    fn test_description_prepended_when_missing_from_body() {
        let html = r#"<head><meta name="description" content="  Pentest notes "></head><body><p>Burp tips</p></body>"#;
        let info = extract_from_str(html, "page");
        assert_eq!(info.description, "Pentest notes");
        assert_eq!(info.content, "Pentest notes Burp tips");
        assert!(info.content.starts_with(&info.description));
    }

    #[test]
    fn test_description_not_duplicated() {
        let html = r#"<head><meta name="description" content="Burp tips"></head><body><p>Some Burp tips inside</p></body>"#;
        let info = extract_from_str(html, "page");
        assert_eq!(info.content, "Some Burp tips inside");
    }

    #[test]
    fn test_description_only() {
        let html = r#"<head><meta name="description" content="Only meta"></head><body></body>"#;
        let info = extract_from_str(html, "page");
        assert_eq!(info.content, "Only meta");
    }

    #[test]
    fn test_content_is_capped() {
        let body = "word ".repeat(2000);
        let html = format!(r#"<head><meta name="description" content="lead"></head><body><p>{body}</p></body>"#);
        let info = extract_from_str(&html, "page");
        assert_eq!(info.content.chars().count(), PAGE_CONTENT_LIMIT);
        assert!(info.content.starts_with("lead word"));
    }

    #[test]
    fn test_malformed_markup_is_tolerated() {
        let info = extract_from_str("<body><p>Unclosed <b>bold<div>text", "broken");
        assert_eq!(info.content, "Unclosed bold text");
    }

    #[test]
    fn test_extract_reads_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin.html");
        let mut bytes = b"<title>Caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"</title><p>ok</p>");
        std::fs::write(&path, bytes).unwrap();

        let info = extract(&path).unwrap();
        assert!(info.title.starts_with("Caf"));
        assert_eq!(info.content, "ok");
    }

    #[test]
    fn test_extract_missing_file() {
        let err = extract(Path::new("/nonexistent/page.html")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/page.html"));
    }
}
