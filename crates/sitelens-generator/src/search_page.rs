//! Client-side search page scaffolding.
//!
//! Writes a self-contained `search.html` that loads the search index into lunr
//! in the browser. An existing page is never replaced, so sites can restyle it.

use std::{fs, path::Path};

use sitelens_core::Config;
use thiserror::Error;
use tracing::{debug, info};

use crate::search::SEARCH_INDEX_FILE;

/// File name of the search page, relative to the site root.
pub const SEARCH_PAGE_FILE: &str = "search.html";

/// Search page errors.
#[derive(Debug, Error)]
pub enum SearchPageError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for search page operations.
pub type Result<T> = std::result::Result<T, SearchPageError>;

/// Default search page.
///
/// `{{ title }}` is replaced by the HTML-escaped site title and
/// `{{ index_url }}` by the index file name.
pub const DEFAULT_SEARCH_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Search | {{ title }}</title>
  <style>
    body { font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif; margin: 2rem; }
    .search-box { max-width: 720px; margin: 0 auto 1.5rem; }
    #search-input { box-sizing: border-box; width: 100%; padding: 0.75rem 1rem; font-size: 1rem; }
    #search-results { max-width: 720px; margin: 0 auto; }
    .result { border: 1px solid #e5e7eb; border-radius: 12px; padding: 1rem; margin-bottom: 1rem; }
    .result h3 { margin: 0 0 0.25rem; font-size: 1.1rem; }
    .muted { color: #6b7280; font-size: 0.9rem; }
  </style>
  <script src="https://unpkg.com/lunr/lunr.min.js"></script>
</head>
<body>
  <div class="search-box">
    <h1>Search</h1>
    <input id="search-input" type="search" placeholder="Type to search" autofocus>
    <div id="results-count" class="muted"></div>
  </div>
  <div id="search-results"></div>
  <script>
  (function () {
    const input = document.getElementById('search-input');
    const resultsEl = document.getElementById('search-results');
    const countEl = document.getElementById('results-count');

    function el(tag, className, text) {
      const node = document.createElement(tag);
      if (className) node.className = className;
      if (text !== undefined) node.textContent = text;
      return node;
    }

    fetch('{{ index_url }}', { cache: 'no-store' })
      .then(function (r) { return r.json(); })
      .then(function (docs) {
        const byUrl = new Map(docs.map(function (d) { return [d.url, d]; }));
        const idx = lunr(function () {
          this.ref('url');
          this.field('title');
          this.field('content');
          this.field('tags');
          docs.forEach(function (d) { this.add(d); }, this);
        });

        function render(refs) {
          resultsEl.replaceChildren();
          countEl.textContent = refs.length
            ? refs.length + (refs.length === 1 ? ' result' : ' results')
            : 'No results';
          refs.forEach(function (ref) {
            const doc = byUrl.get(ref);
            if (!doc) return;
            const item = el('div', 'result');
            const heading = el('h3');
            const link = el('a', '', doc.title || doc.url);
            link.href = doc.url;
            heading.appendChild(link);
            item.appendChild(heading);
            item.appendChild(el('div', 'muted', doc.url));
            item.appendChild(el('div', '', (doc.content || '').slice(0, 180)));
            resultsEl.appendChild(item);
          });
        }

        function all() { return docs.map(function (d) { return d.url; }); }

        function fallback(q) {
          const ql = q.toLowerCase();
          return docs.filter(function (d) {
            return [d.title, d.content, d.tags].some(function (f) {
              return (f || '').toLowerCase().includes(ql);
            });
          }).map(function (d) { return d.url; });
        }

        render(all());

        input.addEventListener('input', function () {
          const q = input.value.trim();
          if (!q) { render(all()); return; }
          try {
            render(idx.search(q + '*').map(function (r) { return r.ref; }));
          } catch (e) {
            render(fallback(q));
          }
        });
      })
      .catch(function (err) {
        resultsEl.textContent = 'Failed to load search index: ' + err;
      });
  })();
  </script>
</body>
</html>
"##;

/// Search page generator.
#[derive(Debug)]
pub struct SearchPageGenerator {
    config: Config,
}

impl SearchPageGenerator {
    /// Create a new search page generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Render the default page for this site.
    pub fn render(&self) -> String {
        DEFAULT_SEARCH_TEMPLATE
            .replace("{{ title }}", &escape_html(&self.config.site.title))
            .replace("{{ index_url }}", SEARCH_INDEX_FILE)
    }

    /// Write `root/search.html` unless a file already exists there.
    ///
    /// Returns whether the page was created.
    pub fn ensure(&self, root: &Path) -> Result<bool> {
        let path = root.join(SEARCH_PAGE_FILE);
        if path.exists() {
            debug!(path = %path.display(), "search page exists, leaving it alone");
            return Ok(false);
        }

        info!(path = %path.display(), "creating search page");
        fs::write(&path, self.render())?;
        Ok(true)
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn generator(title: &str) -> SearchPageGenerator {
        let mut config = Config::with_base_url("https://ex.com");
        config.site.title = title.to_string();
        SearchPageGenerator::new(config)
    }

    #[test]
    fn test_render() {
        let html = generator("Vali's <Notes>").render();

        assert!(html.contains("<title>Search | Vali's &lt;Notes&gt;</title>"));
        assert!(html.contains("fetch('search_index.json'"));
        assert!(html.contains("lunr.min.js"));
        assert!(html.contains("id=\"search-input\""));
        assert!(html.contains("id=\"search-results\""));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_creates_missing_page() {
        let dir = TempDir::new().unwrap();

        assert!(generator("Blog").ensure(dir.path()).unwrap());

        let html = fs::read_to_string(dir.path().join(SEARCH_PAGE_FILE)).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SEARCH_PAGE_FILE);
        fs::write(&path, "custom").unwrap();

        assert!(!generator("Blog").ensure(dir.path()).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "custom");
    }
}
