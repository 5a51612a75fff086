//! In-memory transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use calcbench_api::{Error, Transport};
use serde_json::Value;

/// Replays canned responses in order and records every request. GET
/// requests are recorded with a `null` payload.
///
/// Once the script runs out every further request fails with
/// [`Error::RequestFailed`].
pub(crate) struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<Value, Error>>>,
    requests: RefCell<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: Vec<Result<Value, Error>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<(String, Value)> {
        self.requests.borrow().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    async fn post_json(&self, endpoint: &str, payload: &Value) -> Result<Value, Error> {
        self.requests
            .borrow_mut()
            .push((endpoint.to_string(), payload.clone()));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(Error::RequestFailed))
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value, Error> {
        self.post_json(endpoint, &Value::Null).await
    }
}
