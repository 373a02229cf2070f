//! Country resolution for client addresses.
//!
//! Public addresses are looked up against an external geolocation HTTP API
//! (ip-api.com format); loopback and private ranges short-circuit without a
//! network call. Every failure path degrades to the `Unknown` sentinel, so
//! resolution never surfaces an error to ingestion.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use crate::geo::ip;

/// Sentinel for addresses in loopback or private ranges.
pub const COUNTRY_LOCAL: &str = "Local";
/// Sentinel for failed or inconclusive lookups.
pub const COUNTRY_UNKNOWN: &str = "Unknown";

#[async_trait]
pub trait CountryResolver: Send + Sync {
    /// Resolve an address to a country name, or a sentinel value.
    /// Never fails; degraded lookups return [`COUNTRY_UNKNOWN`].
    async fn resolve(&self, ip: &str) -> String;
}

/// Resolver backed by an external geolocation API.
///
/// No caching and no retry: every public-address lookup is a fresh request,
/// bounded by the client timeout.
pub struct HttpCountryResolver {
    client: reqwest::Client,
    api_url: String,
}

impl HttpCountryResolver {
    /// `api_url` uses `{ip}` as the address placeholder, e.g.
    /// `http://ip-api.com/json/{ip}?fields=status,country`.
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }

    async fn fetch_country(&self, ip: &str) -> Option<String> {
        let url = self.api_url.replace("{ip}", ip);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(ip = %ip, error = %err, "geolocation request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(ip = %ip, status = %response.status(), "geolocation request rejected");
            return None;
        }

        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                warn!(ip = %ip, error = %err, "geolocation response was not valid JSON");
                return None;
            }
        };

        // ip-api.com answers {"status":"success","country":"..."} and
        // {"status":"fail",...} for reserved or unroutable addresses.
        if body["status"].as_str() != Some("success") {
            return None;
        }

        body["country"].as_str().map(String::from)
    }
}

#[async_trait]
impl CountryResolver for HttpCountryResolver {
    async fn resolve(&self, ip: &str) -> String {
        if ip::is_local(ip) {
            return COUNTRY_LOCAL.to_string();
        }

        match self.fetch_country(ip).await {
            Some(country) => country,
            None => COUNTRY_UNKNOWN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_addresses_skip_the_network() {
        // The unroutable api_url would hang if a request were attempted;
        // the short timeout keeps a regression from stalling the suite.
        let resolver =
            HttpCountryResolver::new("http://192.0.2.1/{ip}", Duration::from_millis(200)).unwrap();

        assert_eq!(resolver.resolve("127.0.0.1").await, COUNTRY_LOCAL);
        assert_eq!(resolver.resolve("::1").await, COUNTRY_LOCAL);
        assert_eq!(resolver.resolve("192.168.0.10").await, COUNTRY_LOCAL);
    }

    #[tokio::test]
    async fn test_unreachable_api_degrades_to_unknown() {
        let resolver =
            HttpCountryResolver::new("http://192.0.2.1/{ip}", Duration::from_millis(200)).unwrap();

        assert_eq!(resolver.resolve("203.0.113.9").await, COUNTRY_UNKNOWN);
    }
}
