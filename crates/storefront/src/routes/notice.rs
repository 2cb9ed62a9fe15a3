//! Notice polling handler.

use askama::Template;
use axum::{extract::State, response::Html};
use tracing::instrument;

use crate::error::Result;
use crate::render::NoticeTemplate;
use crate::state::AppState;

/// The notice still showing, or an empty placeholder once it has expired.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Html<String>> {
    let template = match state.current_notice()? {
        Some((notice, left)) => NoticeTemplate::new(Some(notice), left, false),
        None => NoticeTemplate::new(None, state.config().timing.notice_ttl, false),
    };
    Ok(Html(template.render()?))
}
