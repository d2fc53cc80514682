//! Chat Adapter Engine
//!
//! One engine serves every registered provider: the `ProviderSpec` chosen
//! at registry-resolution time supplies the endpoint, credential source,
//! catalog, and wire strategies, and the engine applies them. An adapter
//! is stateless beyond its immutable credential and base URL, so one
//! instance is safe for concurrent reuse; rotating a credential means
//! constructing a new adapter.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::ai::provider::registry::ProviderSpec;
use crate::ai::provider::{CompletionResponse, ProviderAdapter};
use crate::ai::stream::decode_sse;
use crate::constants::gateway::DEFAULT_TIMEOUT_SECS;
use crate::types::{CompletionRequest, RepoWikiError, Result};

/// Construction-time options for an adapter.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Explicit API key; takes precedence over the provider's env var.
    pub api_key: Option<String>,
    /// Override of the provider's default base URL.
    pub base_url: Option<String>,
    /// Connect+read timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AdapterConfig {
    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Provider adapter driven by a registry spec.
pub struct ChatAdapter {
    spec: &'static ProviderSpec,
    api_key: SecretString,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for ChatAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatAdapter")
            .field("provider", &self.spec.id)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ChatAdapter {
    /// Build an adapter, resolving the credential fail-fast.
    pub fn new(spec: &'static ProviderSpec, config: AdapterConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .or_else(|| std::env::var(spec.credential_env).ok())
            .ok_or_else(|| {
                RepoWikiError::Config(format!(
                    "{} API key not found. Set {} or pass a key explicitly",
                    spec.display_name, spec.credential_env
                ))
            })?;

        let base_url = match config.base_url {
            Some(url) => validate_base_url(&url)?,
            None => spec.default_base_url.trim_end_matches('/').to_string(),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                RepoWikiError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            spec,
            api_key: SecretString::from(api_key),
            base_url,
            client,
        })
    }

    /// Pick the model for a request: caller's choice, or the catalog's
    /// first entry. An off-catalog model is attempted anyway, permissive
    /// on purpose, since catalogs lag behind provider releases.
    fn resolve_model(&self, request: &CompletionRequest) -> String {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.spec.default_model().to_string());

        if !self.spec.knows_model(&model) {
            warn!(
                "Model {} may not be supported by {}, attempting the call anyway",
                model, self.spec.id
            );
        }
        model
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.spec.wire.endpoint_path())
    }

    /// Wire body for a request; exposed for tests.
    pub(crate) fn build_body(&self, request: &CompletionRequest) -> Result<Value> {
        let model = self.resolve_model(request);
        self.spec
            .wire
            .build_body(&model, request, self.spec.fixed_extras)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ProviderAdapter for ChatAdapter {
    async fn chat_completion(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = self.resolve_model(&request);
        info!(
            "Dispatching completion to {} (model: {}, stream: {})",
            self.spec.id, model, request.stream
        );

        let body = self
            .spec
            .wire
            .build_body(&model, &request, self.spec.fixed_extras)?;
        let url = self.endpoint();

        debug!("POST {}", url);

        let http_request = self
            .spec
            .auth
            .apply(self.client.post(&url), &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body);

        let response = http_request
            .send()
            .await
            .map_err(|e| RepoWikiError::from_transport(self.spec.id, e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            error!(
                "{} API request failed: {} - {}",
                self.spec.id, status, body_text
            );
            return Err(RepoWikiError::Provider {
                provider: self.spec.id.to_string(),
                status: status.as_u16(),
                body: body_text,
            });
        }

        if request.stream {
            Ok(CompletionResponse::Stream(decode_sse(response)))
        } else {
            // The upstream body is passed through verbatim, no reshaping.
            let value = response
                .json::<Value>()
                .await
                .map_err(|e| RepoWikiError::from_transport(self.spec.id, e))?;
            Ok(CompletionResponse::Full(value))
        }
    }

    fn id(&self) -> &str {
        self.spec.id
    }

    fn default_model(&self) -> &str {
        self.spec.default_model()
    }
}

/// Validate an overridden base URL: http/https only, trailing slash
/// trimmed so endpoint paths join cleanly.
fn validate_base_url(base_url: &str) -> Result<String> {
    let url = url::Url::parse(base_url)
        .map_err(|e| RepoWikiError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(RepoWikiError::Config(format!(
            "Base URL must use http or https scheme, got: {}",
            url.scheme()
        )));
    }

    Ok(base_url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::ProviderRegistry;
    use crate::ai::provider::wire::{AuthScheme, WireShape};
    use crate::types::ChatMessage;

    // A spec whose env var is never set, so credential resolution is
    // deterministic regardless of the test environment.
    static UNCONFIGURED_SPEC: ProviderSpec = ProviderSpec {
        id: "testprov",
        display_name: "Test Provider",
        credential_env: "REPOWIKI_TEST_UNSET_API_KEY",
        default_base_url: "https://api.example.com/v1",
        models: &["test-model-a", "test-model-b"],
        auth: AuthScheme::Bearer,
        wire: WireShape::OpenAi,
        fixed_extras: &[],
    };

    fn adapter() -> ChatAdapter {
        ChatAdapter::new(&UNCONFIGURED_SPEC, AdapterConfig::with_api_key("sk-test")).unwrap()
    }

    #[test]
    fn test_missing_credential_fails_at_construction() {
        let err = ChatAdapter::new(&UNCONFIGURED_SPEC, AdapterConfig::default()).unwrap_err();
        match err {
            RepoWikiError::Config(msg) => {
                assert!(msg.contains("REPOWIKI_TEST_UNSET_API_KEY"));
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_key_beats_env() {
        // No env var set; the explicit key alone must be enough.
        let adapter = adapter();
        assert_eq!(adapter.id(), "testprov");
        assert_eq!(adapter.base_url(), "https://api.example.com/v1");
    }

    #[test]
    fn test_base_url_override_trims_trailing_slash() {
        let adapter = ChatAdapter::new(
            &UNCONFIGURED_SPEC,
            AdapterConfig::with_api_key("sk-test").with_base_url("http://localhost:8080/v1/"),
        )
        .unwrap();
        assert_eq!(adapter.base_url(), "http://localhost:8080/v1");
        assert_eq!(adapter.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let err = ChatAdapter::new(
            &UNCONFIGURED_SPEC,
            AdapterConfig::with_api_key("sk-test").with_base_url("ftp://example.com"),
        )
        .unwrap_err();
        assert!(matches!(err, RepoWikiError::Config(_)));
    }

    #[test]
    fn test_default_model_is_first_catalog_entry() {
        let adapter = adapter();
        let request = CompletionRequest::new(vec![ChatMessage::user("hi")]);
        let body = adapter.build_body(&request).unwrap();
        assert_eq!(body["model"], "test-model-a");
    }

    #[test]
    fn test_off_catalog_model_still_attempted() {
        let adapter = adapter();
        let request =
            CompletionRequest::new(vec![ChatMessage::user("hi")]).with_model("brand-new-model");
        let body = adapter.build_body(&request).unwrap();
        assert_eq!(body["model"], "brand-new-model");
    }

    #[test]
    fn test_registry_adapter_wires_spec() {
        let registry = ProviderRegistry::builtin();
        let adapter = registry
            .adapter("deepseek", AdapterConfig::with_api_key("sk-test"))
            .unwrap();
        assert_eq!(adapter.id(), "deepseek");
        assert_eq!(adapter.default_model(), "deepseek-chat");
        assert_eq!(adapter.base_url(), "https://api.deepseek.com/v1");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", adapter());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("sk-test"));
    }
}

#[cfg(test)]
mod transport_tests {
    use super::*;
    use crate::ai::provider::{ProviderAdapter, ProviderRegistry};
    use crate::types::ChatMessage;
    use futures::StreamExt;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-shot HTTP server answering a single request with a canned
    /// response, returning its base URL.
    async fn canned_server(status_line: &str, headers: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "{}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
            status_line,
            body.len(),
            headers,
            body
        );
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 8192];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    fn deepseek_adapter(base_url: String) -> ChatAdapter {
        ProviderRegistry::builtin()
            .adapter(
                "deepseek",
                AdapterConfig::with_api_key("sk-test").with_base_url(base_url),
            )
            .unwrap()
    }

    #[tokio::test]
    async fn test_non_streaming_body_passes_through_unchanged() {
        let upstream = r#"{"id":"x","choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        let base = canned_server(
            "HTTP/1.1 200 OK",
            "Content-Type: application/json\r\n",
            upstream,
        )
        .await;

        let adapter = deepseek_adapter(base);
        let request = CompletionRequest::new(vec![ChatMessage::user("hi")])
            .with_model("deepseek-chat");

        let response = adapter.chat_completion(request).await.unwrap();
        let body = response.into_full().expect("non-streaming result");
        assert_eq!(body, serde_json::from_str::<Value>(upstream).unwrap());
    }

    #[tokio::test]
    async fn test_non_2xx_surfaces_status_and_raw_body() {
        let base = canned_server(
            "HTTP/1.1 429 Too Many Requests",
            "Content-Type: text/plain\r\n",
            "rate limited, slow down",
        )
        .await;

        let adapter = deepseek_adapter(base);
        let request = CompletionRequest::new(vec![ChatMessage::user("hi")]);

        let err = adapter.chat_completion(request).await.unwrap_err();
        match err {
            RepoWikiError::Provider {
                provider,
                status,
                body,
            } => {
                assert_eq!(provider, "deepseek");
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited, slow down");
            }
            other => panic!("expected Provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_streaming_response_decodes_chunks() {
        let sse = "data: {\"a\":1}\ndata: not-json\ndata: {\"b\":2}\ndata: [DONE]\n";
        let base = canned_server(
            "HTTP/1.1 200 OK",
            "Content-Type: text/event-stream\r\n",
            sse,
        )
        .await;

        let adapter = deepseek_adapter(base);
        let request = CompletionRequest::new(vec![ChatMessage::user("hi")]).streaming();

        let response = adapter.chat_completion(request).await.unwrap();
        let stream = response.into_stream().expect("streaming result");
        let chunks: Vec<Value> = stream.map(|item| item.unwrap()).collect().await;
        assert_eq!(
            chunks,
            vec![serde_json::json!({"a":1}), serde_json::json!({"b":2})]
        );
    }

    #[tokio::test]
    async fn test_timeout_is_a_transport_error() {
        // Accept the connection but never answer.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                drop(socket);
            }
        });

        let adapter = ProviderRegistry::builtin()
            .adapter(
                "deepseek",
                AdapterConfig {
                    api_key: Some("sk-test".to_string()),
                    base_url: Some(format!("http://{}", addr)),
                    timeout_secs: 1,
                },
            )
            .unwrap();

        let request = CompletionRequest::new(vec![ChatMessage::user("hi")]);
        let err = adapter.chat_completion(request).await.unwrap_err();
        assert!(matches!(err, RepoWikiError::Transport(_)));
    }
}
