//! Route handlers, one module per endpoint group.

pub mod draw;
pub mod health;
pub mod jobs;
pub mod listing;

use axum::http::{header, HeaderMap};

use genart_core::domain::JobId;

use crate::state::ApiConfig;

/// `http://{host}/new/load/{id}`, host taken from the request when present
pub(crate) fn polling_url(headers: &HeaderMap, config: &ApiConfig, id: &JobId) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or(&config.public_host);
    format!("http://{}/new/load/{}", host, id)
}
