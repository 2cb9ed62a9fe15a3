//! Store page and product grid handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use tracing::instrument;

use asn_store_core::{FilterState, Region, SortMode};

use crate::error::Result;
use crate::render::{HtmlSurface, NoticeTemplate};
use crate::state::{AppState, SharedSession};

/// Stylesheet content hash, for cache busting.
const STYLESHEET_HASH: &str = env!("STYLESHEET_HASH");

/// Category dropdown entry.
#[derive(Clone)]
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
}

/// Sort dropdown entry.
#[derive(Clone)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Full store page. Regions arrive pre-rendered from the same fragments the
/// HTMX routes return.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub search: String,
    pub categories: Vec<CategoryOption>,
    pub sort_options: Vec<SortOption>,
    pub search_debounce_ms: u128,
    pub stylesheet_hash: &'static str,
    pub product_grid: String,
    pub cart_count: String,
    pub cart_items: String,
    pub cart_subtotal: String,
    pub checkout_form: String,
    pub notice: String,
}

/// Product filter query parameters. Unknown sort values mean catalog order.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sort: String,
}

impl From<FilterQuery> for FilterState {
    fn from(query: FilterQuery) -> Self {
        Self::new(query.search, query.category, SortMode::parse(&query.sort))
    }
}

/// Display the store page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<IndexTemplate> {
    let mut session = state.session()?;
    session.refresh();
    let timing = state.config().timing;
    let filter = session.filter().clone();

    let categories = session
        .catalog()
        .categories()
        .into_iter()
        .map(|name| CategoryOption {
            selected: name == filter.category,
            name: name.to_string(),
        })
        .collect();

    let sort_options = SortMode::ALL
        .iter()
        .map(|mode| SortOption {
            value: mode.as_str(),
            label: mode.label(),
            selected: *mode == filter.sort,
        })
        .collect();

    let notice = match state.current_notice()? {
        Some((notice, left)) => NoticeTemplate::new(Some(notice), left, false),
        None => NoticeTemplate::new(None, timing.notice_ttl, false),
    };

    Ok(IndexTemplate {
        search: filter.search,
        categories,
        sort_options,
        search_debounce_ms: timing.search_debounce.as_millis(),
        stylesheet_hash: STYLESHEET_HASH,
        product_grid: fragment(&state, &session, Region::ProductGrid)?,
        cart_count: fragment(&state, &session, Region::CartBadge)?,
        cart_items: fragment(&state, &session, Region::CartLines)?,
        cart_subtotal: fragment(&state, &session, Region::CartSubtotal)?,
        checkout_form: fragment(&state, &session, Region::CheckoutForm)?,
        notice: notice.render()?,
    })
}

/// Apply search, category and sort, then return the product grid.
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Html<String>> {
    let mut session = state.session()?;
    session.set_filter(query.into());
    tracing::debug!(visible = session.visible_products().len(), "filter applied");

    Ok(Html(fragment(&state, &session, Region::ProductGrid)?))
}

fn fragment(state: &AppState, session: &SharedSession, region: Region) -> Result<String> {
    let mut surface = HtmlSurface::inline(state.config().timing.notice_ttl);
    session.render(region, &mut surface)?;
    Ok(surface.into_html())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_conversion() {
        let query = FilterQuery {
            search: "shoe".to_string(),
            category: "Footwear".to_string(),
            sort: "price-desc".to_string(),
        };
        let filter = FilterState::from(query);
        assert_eq!(filter.search, "shoe");
        assert_eq!(filter.category, "Footwear");
        assert_eq!(filter.sort, SortMode::PriceDescending);
    }

    #[test]
    fn test_unknown_sort_falls_back_to_catalog_order() {
        let query = FilterQuery {
            sort: "cheapest".to_string(),
            ..FilterQuery::default()
        };
        assert_eq!(FilterState::from(query).sort, SortMode::None);
    }
}
