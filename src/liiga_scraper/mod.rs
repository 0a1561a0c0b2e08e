pub(crate) mod dom;
pub(crate) mod driver;
pub(crate) mod games;
pub(crate) mod schedule;
pub(crate) mod season;
pub(crate) mod stats;
pub(crate) mod tables;
pub(crate) mod values;

use ::scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::error::{LiigaError, Result};

pub(crate) const DEFAULT_BASE_URL: &str = "https://liiga.fi";
const PLAYER_HREF_PREFIX: &str = "/pelaajat/";

/// Fetch a URL and parse the response body as an HTML document.
pub(crate) async fn get_document(client: &reqwest::Client, url: &str) -> Result<Html> {
    debug!(url, "fetching page");

    let response = client.get(url).send().await.map_err(|e| LiigaError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LiigaError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    let body = response.text().await.map_err(|e| LiigaError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })?;

    Ok(Html::parse_document(&body))
}

/// Extract trimmed text content from the first element matching `selector`
/// inside `element`. Returns an empty string if nothing matches.
pub(crate) fn select_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|e| dom::full_text(&e))
        .unwrap_or_default()
}

/// Resolve a link found on `page` into an absolute URL.
pub(crate) fn join_url(page: &str, link: &str) -> Result<String> {
    Ok(Url::parse(page)?.join(link)?.to_string())
}

/// Site-assigned player id from a `/pelaajat/...` link.
pub(crate) fn player_id(href: &str) -> String {
    href.strip_prefix(PLAYER_HREF_PREFIX)
        .unwrap_or(href)
        .trim_matches('/')
        .to_string()
}

/// Direct `td` children of a table row.
pub(crate) fn row_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "td")
        .collect()
}
