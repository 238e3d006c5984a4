//! HTTP client for the link-listing endpoint.

use std::time::Duration;

use wikigraph_core::BuildConfig;

use crate::api::{parse_response, ApiResponse, LinkApi};

/// [`LinkApi`] backed by a blocking `ureq` agent.
///
/// The agent keeps a connection pool, so one instance should serve a whole
/// build.
#[derive(Debug, Clone)]
pub struct HttpLinkApi {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpLinkApi {
    /// Create a client for `endpoint`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration, user_agent: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build();
        Self {
            agent,
            endpoint: endpoint.into(),
        }
    }

    /// Create a client from the endpoint, timeout and user agent of `config`.
    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(&config.endpoint, config.timeout(), &config.user_agent)
    }

    /// The endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LinkApi for HttpLinkApi {
    fn query_links(
        &self,
        title: &str,
        page_size: usize,
        continuation: Option<&str>,
    ) -> ApiResponse {
        let mut request = self
            .agent
            .get(&self.endpoint)
            .query("action", "query")
            .query("format", "json")
            .query("prop", "links")
            .query("titles", title)
            .query("pllimit", &page_size.to_string());
        if let Some(token) = continuation {
            request = request.query("plcontinue", token);
        }

        match request.call() {
            Ok(response) => match response.into_string() {
                Ok(body) => parse_response(&body),
                Err(e) => ApiResponse::TransportError(format!("failed to read body: {}", e)),
            },
            Err(ureq::Error::Status(code, _)) => {
                ApiResponse::TransportError(format!("HTTP status {}", code))
            }
            Err(e) => ApiResponse::TransportError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_endpoint_is_transport_error() {
        // Port 9 on loopback is the discard service; nothing listens in CI.
        let api = HttpLinkApi::new(
            "http://127.0.0.1:9/w/api.php",
            Duration::from_millis(500),
            "wikigraph-test",
        );
        assert!(matches!(
            api.query_links("Physics", 10, None),
            ApiResponse::TransportError(_)
        ));
    }

    #[test]
    fn from_config_uses_endpoint() {
        let config = BuildConfig::new().endpoint("http://localhost:1/api.php");
        assert_eq!(HttpLinkApi::from_config(&config).endpoint(), "http://localhost:1/api.php");
    }
}
