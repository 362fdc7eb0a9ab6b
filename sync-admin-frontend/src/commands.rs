//! Browser bindings
//!
//! `fetch` transport for the sync endpoints and readers for the JSON the
//! hosting page embeds.

use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::config::AdminConfig;
use crate::stats::DashboardStats;
use crate::trigger::{SyncAction, SyncError, SyncTransport};

const CONFIG_META_NAME: &str = "sync-admin-config";
const DASHBOARD_DATA_ID: &str = "dashboard-data";

/// Best-effort text of a JS exception
fn js_error_text(e: &JsValue) -> String {
    if let Some(err) = e.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

/// POSTs to the configured endpoints with `window.fetch`
#[derive(Clone)]
pub struct FetchTransport {
    config: AdminConfig,
}

impl FetchTransport {
    pub fn new(config: AdminConfig) -> Self {
        FetchTransport { config }
    }
}

impl SyncTransport for FetchTransport {
    async fn post(&self, action: SyncAction) -> Result<Value, SyncError> {
        post_json(&self.config.endpoint_url(action)).await
    }
}

/// POST without a body; non-2xx answers and non-JSON bodies are errors
pub async fn post_json(url: &str) -> Result<Value, SyncError> {
    let network = |e: JsValue| SyncError::Network(js_error_text(&e));

    let headers = Headers::new().map_err(network)?;
    headers.set("Content-Type", "application/json").map_err(network)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_headers(&headers);

    let request = Request::new_with_str_and_init(url, &opts).map_err(network)?;
    let window = web_sys::window().ok_or_else(|| SyncError::Network("no window".to_string()))?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;

    let text = match response.text() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .map(|v| v.as_string().unwrap_or_default())
            .map_err(|e| js_error_text(&e)),
        Err(e) => Err(js_error_text(&e)),
    };
    settle_response(response.status(), text)
}

/// Maps a settled response to the trigger's result.
///
/// The status is checked before the body so error pages that are not JSON
/// still report their status.
pub fn settle_response(status: u16, text: Result<String, String>) -> Result<Value, SyncError> {
    if !(200..300).contains(&status) {
        let body = text.unwrap_or_else(|e| format!("<unreadable body: {}>", e));
        return Err(SyncError::Status { status, body });
    }
    let text = text.map_err(SyncError::Body)?;
    serde_json::from_str(&text).map_err(|e| SyncError::Body(e.to_string()))
}

/// Panel configuration from the page, or defaults.
///
/// The error is returned alongside the fallback so it can be logged once the
/// logger, which itself depends on the configuration, is up.
pub fn load_config() -> (AdminConfig, Option<String>) {
    let raw = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector(&format!("meta[name=\"{}\"]", CONFIG_META_NAME)).ok().flatten())
        .and_then(|meta| meta.get_attribute("content"));

    match raw {
        None => (AdminConfig::default(), None),
        Some(raw) => match AdminConfig::from_json(&raw) {
            Ok(config) => (config, None),
            Err(e) => (AdminConfig::default(), Some(e.to_string())),
        },
    }
}

/// Dashboard figures from `<script id="dashboard-data">`, or defaults
pub fn load_stats() -> DashboardStats {
    let raw = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(DASHBOARD_DATA_ID))
        .and_then(|el| el.text_content());

    let Some(raw) = raw else {
        tracing::warn!(id = DASHBOARD_DATA_ID, "dashboard data missing, using defaults");
        return DashboardStats::default();
    };

    DashboardStats::from_json(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "dashboard data unreadable, using defaults");
        DashboardStats::default()
    })
}
