//! HTTP transport against the orchestration service.

use std::time::Duration;

use reqwest::blocking::Client;

use runtail_protocol::{
    Cursor, EntityRef, LogChunk, ProtocolError, StatusRecord, CURSOR_HEADER, CURSOR_PARAM,
    LIMIT_PARAM,
};

use super::{Transport, TransportError};

/// Request timeout for both operations.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport performing one HTTP GET per operation.
///
/// Status is read as JSON from the entity path; chunks are read as plain text
/// from the `log_chunk` sub-resource, with the request cursor sent as a query
/// parameter and the next cursor returned in the [`CURSOR_HEADER`] response
/// header.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport against the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    /// The normalized service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn check_status(response: &reqwest::blocking::Response) -> Result<(), TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(TransportError::Http {
            status_code: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
        })
    }
}

impl Transport for HttpTransport {
    fn fetch_status(&self, entity: &EntityRef) -> Result<StatusRecord, TransportError> {
        let response = self
            .client
            .get(self.url(&entity.status_path()))
            .header("Accept", "application/json")
            .send()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Self::check_status(&response)?;

        let body = response
            .text()
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        serde_json::from_str::<StatusRecord>(&body)
            .map_err(|e| TransportError::Decode(format!("invalid status record: {}", e)))
    }

    fn fetch_log_chunk(
        &self,
        entity: &EntityRef,
        cursor: Option<&Cursor>,
        limit: Option<usize>,
    ) -> Result<LogChunk, TransportError> {
        let mut request = self
            .client
            .get(self.url(&entity.log_chunk_path()))
            .header("Accept", "text/plain");

        if let Some(cursor) = cursor {
            request = request.query(&[(CURSOR_PARAM, cursor.as_str())]);
        }
        if let Some(limit) = limit {
            request = request.query(&[(LIMIT_PARAM, limit.to_string().as_str())]);
        }

        let response = request
            .send()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Self::check_status(&response)?;

        let next_cursor = response
            .headers()
            .get(CURSOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(Cursor::new)
            .ok_or(ProtocolError::MissingCursor)?;

        let text = response
            .text()
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        Ok(LogChunk {
            text,
            cursor: next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slashes_trimmed() {
        let transport = HttpTransport::new("http://orchestra.example/service_proxy///").unwrap();
        assert_eq!(transport.base_url(), "http://orchestra.example/service_proxy");
    }

    #[test]
    fn test_resource_urls() {
        let transport = HttpTransport::new("http://orchestra.example/service_proxy").unwrap();
        let entity = EntityRef::step("run-001", 1);
        assert_eq!(
            transport.url(&entity.log_chunk_path()),
            "http://orchestra.example/service_proxy/run/run-001/step/1/log_chunk"
        );
    }
}
