//! StreamElements speech client
//!
//! The service is a single GET endpoint taking `voice` and `text` query
//! parameters and returning the encoded audio as the response body.

use crate::error::{Error, Result};
use crate::tts::voices::{is_stream_elements_voice, STREAM_ELEMENTS_VOICES};
use crate::tts::{SpeakOptions, TtsProvider, TtsVoice};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const STREAM_ELEMENTS_ENDPOINT: &str = "https://api.streamelements.com/kappa/v2/speech";
pub const DEFAULT_VOICE: &str = "Conchita";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct StreamElementsConfig {
    pub endpoint: String,
    pub default_voice: String,
    pub timeout: Duration,
}

impl Default for StreamElementsConfig {
    fn default() -> Self {
        Self {
            endpoint: STREAM_ELEMENTS_ENDPOINT.to_string(),
            default_voice: DEFAULT_VOICE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct StreamElementsProvider {
    http_client: reqwest::Client,
    config: StreamElementsConfig,
}

impl StreamElementsProvider {
    pub fn new(config: StreamElementsConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Tts(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            "StreamElements provider ready (endpoint: {}, default voice: {})",
            config.endpoint, config.default_voice
        );

        Ok(Self {
            http_client,
            config,
        })
    }

    fn resolve_voice<'a>(&'a self, opts: &'a SpeakOptions) -> &'a str {
        opts.voice_name
            .as_deref()
            .unwrap_or(&self.config.default_voice)
    }
}

#[async_trait]
impl TtsProvider for StreamElementsProvider {
    fn name(&self) -> &str {
        "streamelements"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn voices(&self) -> Vec<TtsVoice> {
        STREAM_ELEMENTS_VOICES
            .iter()
            .map(|name| TtsVoice::named(*name))
            .collect()
    }

    fn default_voice(&self) -> &str {
        &self.config.default_voice
    }

    fn has_voice(&self, name: &str) -> bool {
        is_stream_elements_voice(name)
    }

    async fn generate_audio_file(
        &self,
        text: &str,
        path: &Path,
        opts: &SpeakOptions,
    ) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("Text must not be empty".to_string()));
        }

        let voice = self.resolve_voice(opts);
        info!(
            "Requesting speech from StreamElements (voice: {}, {} chars)",
            voice,
            text.chars().count()
        );

        let response = self
            .http_client
            .get(&self.config.endpoint)
            .query(&[("voice", voice), ("text", text)])
            .send()
            .await
            .map_err(|e| Error::Tts(format!("StreamElements request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Tts(format!("StreamElements returned {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Tts(format!("Failed to read StreamElements response: {}", e)))?;

        tokio::fs::write(path, &body).await?;
        debug!("Wrote {} bytes to {}", body.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;

    /// Serve `router` on an ephemeral local port, returning its base URL
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/speech", addr)
    }

    fn provider(endpoint: String) -> StreamElementsProvider {
        StreamElementsProvider::new(StreamElementsConfig {
            endpoint,
            timeout: Duration::from_secs(5),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_blank_text_rejected_without_request() {
        // Unroutable endpoint: any request would fail with Tts, not InvalidInput
        let provider = provider("http://127.0.0.1:1/speech".to_string());
        let dir = tempfile::tempdir().unwrap();

        let result = provider
            .generate_audio_file("   ", &dir.path().join("x.wav"), &SpeakOptions::default())
            .await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(!dir.path().join("x.wav").exists());
    }

    #[tokio::test]
    async fn test_writes_response_body_with_trimmed_text() {
        let router = Router::new().route(
            "/speech",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                format!("{}|{}", params["voice"], params["text"])
            }),
        );
        let provider = provider(serve(router).await);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");

        provider
            .generate_audio_file("  hola mundo \n", &path, &SpeakOptions::default())
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Conchita|hola mundo");

        let opts = SpeakOptions {
            voice_name: Some("Brian".to_string()),
        };
        provider.generate_audio_file("hi", &path, &opts).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Brian|hi");
    }

    #[tokio::test]
    async fn test_error_status_is_tts_error() {
        let router = Router::new().route(
            "/speech",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let provider = provider(serve(router).await);
        let dir = tempfile::tempdir().unwrap();

        let result = provider
            .generate_audio_file("hello", &dir.path().join("x.wav"), &SpeakOptions::default())
            .await;

        assert!(matches!(result, Err(Error::Tts(_))));
    }

    #[tokio::test]
    async fn test_voice_catalogue() {
        let provider = provider(STREAM_ELEMENTS_ENDPOINT.to_string());
        assert_eq!(provider.name(), "streamelements");
        assert!(provider.is_available());
        assert_eq!(provider.default_voice(), "Conchita");
        assert_eq!(provider.voices().len(), STREAM_ELEMENTS_VOICES.len());
        assert!(provider.has_voice("Brian"));
        assert!(!provider.has_voice("Nobody"));
    }
}
