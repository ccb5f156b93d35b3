//! ARC player-bests parser.
//!
//! ARC pages its listings HAL-style:
//!
//! ```json
//! { "_links": { "_next": "https://.../player_bests?profile_id=x&page=2" }, "_items": [...] }
//! ```
//!
//! Items are handed on undecoded; pages are fetched only as the consumer
//! pulls past the end of the previous one.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{ImportContext, ParserResult};
use crate::error::{FatalImportError, ImportResult};
use crate::fetch::JsonFetch;
use crate::game::Game;
use crate::paginate::{Page, paginate};
use crate::validate::{Schema, ValidateOptions, format_validation_error, validate};

/// IIDX version the ARC endpoint is queried for.
pub const ARC_IIDX_VERSION: u32 = 27;

#[derive(Debug, Deserialize)]
struct ArcPage {
    #[serde(rename = "_links")]
    links: ArcLinks,
    #[serde(rename = "_items")]
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ArcLinks {
    #[serde(rename = "_next")]
    next: Option<String>,
}

fn page_schema() -> Schema {
    Schema::object([
        (
            "_links",
            Schema::object([("_next", Schema::String.nullable())]),
        ),
        ("_items", Schema::array(Schema::Any)),
    ])
}

/// First page of a profile's player bests.
pub fn first_page_url(base_url: &str, profile_id: &str) -> String {
    format!(
        "{}/api/v1/iidx/{}/player_bests?profile_id={}",
        base_url.trim_end_matches('/'),
        ARC_IIDX_VERSION,
        urlencoding::encode(profile_id)
    )
}

fn fetch_page(fetch: &dyn JsonFetch, url: &str) -> ImportResult<Page<Value, String>> {
    let doc = fetch.fetch_json(url).map_err(|e| {
        FatalImportError::server(format!("Failed to fetch ARC page {}: {}", url, e))
    })?;

    if let Some(err) = validate(&doc, &page_schema(), ValidateOptions::allow_excess_keys()) {
        return Err(FatalImportError::server(format_validation_error(
            &err,
            "Invalid ARC response",
        )));
    }

    let page: ArcPage = serde_json::from_value(doc)
        .map_err(|e| FatalImportError::server(format!("Invalid ARC response: {}", e)))?;

    Ok(Page::new(page.items, page.links.next))
}

/// Lazily iterate a profile's ARC player bests.
///
/// Nothing is fetched until the iterable is first pulled.
pub fn parse_arc_iidx<'a>(
    profile_id: &str,
    fetch: &'a dyn JsonFetch,
    base_url: &str,
) -> ParserResult<'a, Value> {
    let start = first_page_url(base_url, profile_id);
    debug!(url = %start, "Iterating ARC player bests");

    let items = paginate(start, move |url: &String| fetch_page(fetch, url));

    ParserResult::new(Game::Iidx, ImportContext::empty(), items)
}
