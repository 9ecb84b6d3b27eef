//! Link resolver: turn a version string into a candidate download URL.
//!
//! Builds the search URL from the configured template, fetches the result
//! page and takes the first anchor matching a fixed predicate. There is no
//! ranking and no check that the link serves the requested version; the
//! search page's structure is outside our control.

use scraper::{Html, Selector};
use url::Url;

use crate::config::VERSION_PLACEHOLDER;
use crate::error::{PipelineError, Result};
use crate::http::Transport;

/// Which anchors qualify as the download link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSelector {
    /// Any `<a>` with a non-empty `href`.
    AnyHref,
    /// `<a>` whose `href` contains the marker substring.
    HrefContains(String),
}

impl LinkSelector {
    fn matches(&self, href: &str) -> bool {
        match self {
            LinkSelector::AnyHref => true,
            LinkSelector::HrefContains(marker) => href.contains(marker.as_str()),
        }
    }
}

/// A download URL picked from the search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub url: String,
}

/// Substitute the form-encoded `version` into `template`.
///
/// # Examples
///
/// `search_url("https://s.example/?q=GD+{version}", "2.2 beta")` → `"https://s.example/?q=GD+2.2+beta"`
pub fn search_url(template: &str, version: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(version.as_bytes()).collect();
    template.replace(VERSION_PLACEHOLDER, &encoded)
}

/// Returns the first anchor href in document order accepted by `selector`.
///
/// Relative hrefs are joined onto `base` when one is given; hrefs that do
/// not form a valid absolute URL are skipped. Unparseable markup simply
/// yields no anchors.
pub fn select_link(html: &str, selector: &LinkSelector, base: Option<&Url>) -> Option<ResolvedLink> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").ok()?;

    document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty() && selector.matches(href))
        .find_map(|href| absolutize(href, base))
        .map(|url| ResolvedLink { url })
}

fn absolutize(href: &str, base: Option<&Url>) -> Option<String> {
    match Url::parse(href) {
        Ok(u) => Some(u.into()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            base.and_then(|b| b.join(href).ok()).map(Into::into)
        }
        Err(_) => None,
    }
}

/// Search for `version` and return the first matching link, if any.
///
/// Transport failures propagate unchanged; a page without a matching
/// anchor is `Ok(None)`.
pub fn resolve_link<T: Transport + ?Sized>(
    transport: &mut T,
    template: &str,
    selector: &LinkSelector,
    version: &str,
) -> Result<Option<ResolvedLink>> {
    let url = search_url(template, version);
    let base = Url::parse(&url).map_err(|e| PipelineError::InvalidUrl {
        url: url.clone(),
        reason: e.to_string(),
    })?;
    tracing::debug!("searching {}", url);

    let page = transport.get_page(&url)?;
    let link = select_link(&page, selector, Some(&base));
    match &link {
        Some(l) => tracing::info!("resolved download link {}", l.url),
        None => tracing::info!("no candidate link on search page for version {}", version),
    }
    Ok(link)
}
