//! The seam between request building and the network.

use serde_json::Value;

use crate::Error;

/// Anything that can send a request to a named endpoint and hand back the
/// decoded JSON body.
///
/// [`Client`](crate::Client) is the HTTP implementation. Callers that need a
/// different session strategy (or a scripted fake in tests) implement this
/// directly; nothing above the transport knows about status codes.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Posts `payload` to `endpoint` (e.g. `"mappedData"`) and returns the body.
    async fn post_json(&self, endpoint: &str, payload: &Value) -> Result<Value, Error>;

    /// Fetches `endpoint` (e.g. `"availableMetrics"`) with a plain GET.
    async fn get_json(&self, endpoint: &str) -> Result<Value, Error>;
}
