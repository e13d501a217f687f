//! HTTP logo downloads

use std::time::Duration;

use reqwest::blocking::Client;
use tracker_core::{FetchError, LogoFetcher};

const TIMEOUT: Duration = Duration::from_secs(15);

/// Blocking HTTP client for logo images.
#[derive(Debug, Clone)]
pub struct HttpLogoFetcher {
    client: Client,
}

impl HttpLogoFetcher {
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .user_agent(concat!("policy-tracker/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl LogoFetcher for HttpLogoFetcher {
    fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().map_err(transport)?;
        tracing::debug!(url = %url, bytes = body.len(), "Downloaded logo");
        Ok(body.to_vec())
    }
}
