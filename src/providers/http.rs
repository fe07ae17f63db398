use log::debug;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

use crate::error::AnalysisError;

pub(crate) fn build_client(timeout: Option<Duration>) -> Result<Client, AnalysisError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| AnalysisError::Configuration(format!("failed to build HTTP client: {}", e)))
}

/// Send a request and decode a JSON body from a 2xx response
pub(crate) async fn send_json(request: RequestBuilder) -> Result<Value, AnalysisError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        debug!("Provider returned {}: {}", status, body);
        return Err(AnalysisError::Transport {
            status: Some(status.as_u16()),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| AnalysisError::Transport {
        status: Some(status.as_u16()),
        body: format!("response body is not JSON ({}): {}", e, body),
    })
}
