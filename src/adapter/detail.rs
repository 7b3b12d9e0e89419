//! Single pin detail
//!
//! The pin page embeds its GraphQL response in a
//! `<script data-relay-response="true">` tag. There is no cursor: one
//! request, one object.

use super::envelope::lookup;
use crate::error::{Error, Result};
use crate::http::{RequestSpec, Transport};
use crate::retry::RetryingFetcher;
use crate::types::JsonValue;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

/// Where the pin object sits inside the embedded response
pub const PIN_QUERY_PATH: &str = "response.data.v3GetPinQuery.data";

static RELAY_SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[data-relay-response="true"]"#).unwrap());

/// Full record of one pin, scraped from its page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinDetail {
    pin_id: String,
}

impl PinDetail {
    pub fn new(pin_id: impl Into<String>) -> Result<Self> {
        let pin_id = pin_id.into();
        if pin_id.trim().is_empty() {
            return Err(Error::invalid_value("pin_id", "must not be empty"));
        }
        Ok(Self { pin_id })
    }

    pub fn pin_id(&self) -> &str {
        &self.pin_id
    }

    /// Identity used in events and errors
    pub fn label(&self) -> String {
        format!("pin {}", self.pin_id)
    }

    pub fn build_request(&self) -> RequestSpec {
        RequestSpec::get(format!("/pin/{}/", self.pin_id))
    }

    /// Fetch the page under the fetcher's retry ladder and extract the pin
    ///
    /// A page without the embedded pin is a terminal [`Error::Parse`].
    pub async fn fetch<T>(&self, fetcher: &RetryingFetcher, transport: &T) -> Result<JsonValue>
    where
        T: Transport + ?Sized,
    {
        let label = self.label();
        let request = self.build_request();
        let html = fetcher
            .attempt(&label, || transport.send_text(&request))
            .await?;
        extract(&html)
    }
}

/// Pull the pin object out of a pin page
///
/// Relay scripts that are not JSON or do not carry the pin query are skipped.
pub fn extract(html: &str) -> Result<JsonValue> {
    let document = Html::parse_document(html);

    for script in document.select(&RELAY_SCRIPT) {
        let text: String = script.text().collect();
        let data: JsonValue = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                debug!("Skipping undecodable relay script: {e}");
                continue;
            }
        };
        if let Some(pin) = lookup(&data, PIN_QUERY_PATH) {
            return Ok(pin.clone());
        }
    }

    Err(Error::parse(PIN_QUERY_PATH, "pin data not found"))
}
