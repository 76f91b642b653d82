use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{FileprocError, Result};

static GITHUB_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://github\.com/(?P<owner>[^/]+)/(?P<repo>[^/]+)(?:/(?P<kind>blob|tree)/(?P<branch>[^/]+)/(?P<path>.+))?/?$")
        .unwrap()
});

static TAG_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<script.*?</script>|<style.*?</style>|<[^>]+>").unwrap());
static WHITESPACE_COLLAPSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Resolves a GitHub repo/blob/tree URL (or a generic HTTP(S) URL) to a raw
/// fetchable URL, trying `main` then `master` for repo-root README lookups
/// (§4.3 "URL ingestion").
#[derive(Debug, Clone)]
pub enum ResolvedUrl {
    /// A single raw URL to fetch as-is (blob, or already-resolved README).
    Raw(String),
    /// A repo/subdirectory root: try each candidate in order, first 200 wins.
    Candidates(Vec<String>),
}

pub fn resolve_github_url(url: &str) -> Option<ResolvedUrl> {
    let caps = GITHUB_URL.captures(url)?;
    let owner = &caps["owner"];
    let repo = &caps["repo"];

    match caps.name("kind").map(|m| m.as_str()) {
        Some("blob") => {
            let branch = &caps["branch"];
            let path = &caps["path"];
            Some(ResolvedUrl::Raw(format!(
                "https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{path}"
            )))
        }
        Some("tree") => {
            let branch = &caps["branch"];
            let path = &caps["path"];
            Some(ResolvedUrl::Raw(format!(
                "https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{path}/README.md"
            )))
        }
        _ => Some(ResolvedUrl::Candidates(vec![
            format!("https://raw.githubusercontent.com/{owner}/{repo}/main/README.md"),
            format!("https://raw.githubusercontent.com/{owner}/{repo}/master/README.md"),
        ])),
    }
}

/// Fetches a URL (GitHub-aware) and returns plain text ready for ingestion.
/// Generic (non-GitHub, non-raw-text) responses are HTML-stripped.
pub async fn fetch_as_text(client: &reqwest::Client, url: &str) -> Result<String> {
    if let Some(resolved) = resolve_github_url(url) {
        return fetch_resolved(client, resolved).await;
    }

    let resp = client.get(url).send().await?.error_for_status()?;
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body = resp.text().await?;

    if content_type.contains("html") {
        Ok(strip_html(&body))
    } else {
        Ok(body)
    }
}

async fn fetch_resolved(client: &reqwest::Client, resolved: ResolvedUrl) -> Result<String> {
    match resolved {
        ResolvedUrl::Raw(url) => Ok(client.get(&url).send().await?.error_for_status()?.text().await?),
        ResolvedUrl::Candidates(candidates) => {
            for url in &candidates {
                if let Ok(resp) = client.get(url).send().await {
                    if let Ok(resp) = resp.error_for_status() {
                        return Ok(resp.text().await?);
                    }
                }
            }
            Err(FileprocError::UnsupportedUrl(format!(
                "no README found among: {}",
                candidates.join(", ")
            )))
        }
    }
}

pub fn strip_html(html: &str) -> String {
    let no_tags = TAG_STRIP.replace_all(html, " ");
    WHITESPACE_COLLAPSE.replace_all(&no_tags, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_repo_root_to_main_and_master_candidates() {
        match resolve_github_url("https://github.com/rust-lang/rust").unwrap() {
            ResolvedUrl::Candidates(c) => {
                assert_eq!(c.len(), 2);
                assert!(c[0].ends_with("/main/README.md"));
                assert!(c[1].ends_with("/master/README.md"));
            }
            _ => panic!("expected candidates"),
        }
    }

    #[test]
    fn resolves_blob_to_raw_path() {
        match resolve_github_url("https://github.com/rust-lang/rust/blob/main/README.md").unwrap() {
            ResolvedUrl::Raw(url) => assert_eq!(url, "https://raw.githubusercontent.com/rust-lang/rust/main/README.md"),
            _ => panic!("expected raw"),
        }
    }

    #[test]
    fn resolves_tree_to_subpath_readme() {
        match resolve_github_url("https://github.com/rust-lang/rust/tree/main/src/tools").unwrap() {
            ResolvedUrl::Raw(url) => {
                assert_eq!(url, "https://raw.githubusercontent.com/rust-lang/rust/main/src/tools/README.md")
            }
            _ => panic!("expected raw"),
        }
    }

    #[test]
    fn non_github_url_is_none() {
        assert!(resolve_github_url("https://example.com/page").is_none());
    }

    #[test]
    fn strips_script_style_and_tags() {
        let html = "<html><head><style>.a{}</style></head><body><script>alert(1)</script><p>Hello <b>World</b></p></body></html>";
        assert_eq!(strip_html(html), "Hello World");
    }
}
