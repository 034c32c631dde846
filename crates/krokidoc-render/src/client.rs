//! HTTP transport to the Kroki service.
//!
//! One blocking POST per diagram. The JSON body is
//! `{"diagram_source": .., "diagram_type": .., "output_format": ..}` and the
//! response body is the rendered artifact.

use std::time::Duration;

use krokidoc_cache::DiagramKey;
use ureq::{Agent, Body};

use crate::error::RenderErrorKind;

/// Create HTTP agent with the specified timeout.
///
/// Status codes are inspected by [`send_render_request`], so the agent does
/// not turn them into errors.
pub(crate) fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Send a diagram to Kroki and return the response body for streaming.
///
/// Handles HTTP errors by reading the response body for error details.
pub(crate) fn send_render_request(
    agent: &Agent,
    service_url: &str,
    key: &DiagramKey<'_>,
) -> Result<Body, RenderErrorKind> {
    tracing::debug!(
        "POST {service_url} ({} {})",
        key.diagram_type,
        key.output_format
    );

    let response = agent
        .post(service_url)
        .send_json(key)
        .map_err(|e| RenderErrorKind::Http(e.to_string()))?;

    let status = response.status();
    let mut body = response.into_body();

    if !status.is_success() {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| String::from("(unable to read error body)"));
        return Err(RenderErrorKind::Status {
            status: status.as_u16(),
            body: error_body,
        });
    }

    Ok(body)
}
