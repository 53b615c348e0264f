use crate::config::SasbdbSettings;
use crate::error::Result;
use ihmval::core::models::scattering::SasSummary;
use ihmval::engine::error::RemoteFetchError;
use ihmval::engine::scattering::ScatteringSource;
use reqwest::blocking::{Client, Response};
use tracing::debug;

/// Blocking HTTP client for the SASBDB REST API.
///
/// Must not be created or dropped on an async worker thread; the commands
/// construct it inside `spawn_blocking`.
#[derive(Debug)]
pub struct SasbdbClient {
    client: Client,
    base_url: String,
}

impl SasbdbClient {
    pub fn new(settings: &SasbdbSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("ihmval/", env!("CARGO_PKG_VERSION")))
            .build()?;
        debug!(base_url = %settings.base_url, "SASBDB client initialized.");
        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    pub fn summary_url(&self, code: &str) -> String {
        format!("{}/{}/", self.base_url, code)
    }

    fn get(&self, url: &str) -> std::result::Result<Response, reqwest::Error> {
        self.client.get(url).send()?.error_for_status()
    }
}

fn remote_error(resource: &str, e: reqwest::Error) -> RemoteFetchError {
    let reason = match e.status() {
        Some(status) => format!("HTTP {}", status),
        None if e.is_timeout() => "request timed out".to_string(),
        None => e.to_string(),
    };
    RemoteFetchError {
        resource: resource.to_string(),
        reason,
    }
}

impl ScatteringSource for SasbdbClient {
    fn fetch_summary(&self, code: &str) -> std::result::Result<SasSummary, RemoteFetchError> {
        let url = self.summary_url(code);
        debug!(%url, "Requesting SASBDB summary.");
        self.get(&url)
            .and_then(|response| response.json::<SasSummary>())
            .map_err(|e| remote_error(code, e))
    }

    fn fetch_profile(&self, url: &str) -> std::result::Result<String, RemoteFetchError> {
        debug!(%url, "Requesting intensity profile.");
        self.get(url)
            .and_then(|response| response.text())
            .map_err(|e| remote_error(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client(base_url: &str) -> SasbdbClient {
        SasbdbClient::new(&SasbdbSettings {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    #[test]
    fn summary_url_appends_code_and_trailing_slash() {
        let client = client("https://www.sasbdb.org/rest-api/entry/summary");
        assert_eq!(
            client.summary_url("SASDA12"),
            "https://www.sasbdb.org/rest-api/entry/summary/SASDA12/"
        );
    }

    #[test]
    fn unreachable_host_is_a_remote_fetch_error() {
        let client = client("http://127.0.0.1:1");
        let err = client.fetch_summary("SASDA12").unwrap_err();
        assert_eq!(err.resource, "SASDA12");
        assert!(!err.reason.is_empty());
    }
}
