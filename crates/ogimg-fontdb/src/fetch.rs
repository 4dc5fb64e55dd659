//! Talking to the font endpoints over HTTP

use async_trait::async_trait;
use ogimg_core::FontError;
use std::time::Duration;

/// The two requests a font fetch needs
///
/// Kept behind a trait so tests can count calls or fail on demand without
/// a network.
#[async_trait]
pub trait FontFetcher: Send + Sync {
    /// GET a text document, announcing `user_agent`
    async fn fetch_text(&self, url: &str, user_agent: &str) -> Result<String, FontError>;

    /// GET raw bytes
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FontError>;
}

/// reqwest-backed fetcher with a per-request timeout
pub struct HttpFontFetcher {
    client: reqwest::Client,
}

impl HttpFontFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FontError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FontError::Network {
                url: String::new(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    async fn get(
        &self,
        url: &str,
        user_agent: Option<&str>,
    ) -> Result<reqwest::Response, FontError> {
        let mut request = self.client.get(url);
        if let Some(user_agent) = user_agent {
            request = request.header(reqwest::header::USER_AGENT, user_agent);
        }

        let response = request.send().await.map_err(|e| network_error(url, &e))?;

        if !response.status().is_success() {
            return Err(FontError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl FontFetcher for HttpFontFetcher {
    async fn fetch_text(&self, url: &str, user_agent: &str) -> Result<String, FontError> {
        let response = self.get(url, Some(user_agent)).await?;
        response.text().await.map_err(|e| network_error(url, &e))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FontError> {
        let response = self.get(url, None).await?;
        let bytes = response.bytes().await.map_err(|e| network_error(url, &e))?;
        Ok(bytes.to_vec())
    }
}

fn network_error(url: &str, err: &reqwest::Error) -> FontError {
    let message = if err.is_timeout() {
        "timed out".to_string()
    } else {
        err.to_string()
    };

    FontError::Network {
        url: url.to_string(),
        message,
    }
}
