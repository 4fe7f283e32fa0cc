//! Network-backed location provider
//!
//! Resolves the machine's public IP to coordinates through an HTTP JSON
//! endpoint. Accepts both the ip-api.com shape (`status`, `lat`, `lon`) and
//! the `latitude`/`longitude` shape used by most other services.

use async_trait::async_trait;
use geofix_core::{LocationFix, LocationProvider, Priority, ProviderError};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const DEFAULT_URL: &str = "http://ip-api.com/json";

#[derive(Debug, Deserialize)]
struct IpLocationResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(alias = "latitude")]
    lat: Option<f64>,
    #[serde(alias = "longitude")]
    lon: Option<f64>,
}

pub struct IpLocationProvider {
    client: reqwest::Client,
    url: String,
}

impl IpLocationProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    async fn lookup(&self) -> Result<Option<LocationFix>, ProviderError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ProviderError::Request(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;
        parse_response(&body)
    }
}

/// Decode a geolocation response body.
///
/// A reply without coordinates is "no fix", not an error; an explicit
/// `"status": "fail"` is an error.
pub fn parse_response(body: &str) -> Result<Option<LocationFix>, ProviderError> {
    let data: IpLocationResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Request(e.to_string()))?;

    if data.status.as_deref() == Some("fail") {
        let reason = data.message.unwrap_or_else(|| "lookup failed".into());
        return Err(ProviderError::Unavailable(reason));
    }

    Ok(match (data.lat, data.lon) {
        (Some(lat), Some(lon)) => Some(LocationFix::new(lat, lon)),
        _ => None,
    })
}

#[async_trait]
impl LocationProvider for IpLocationProvider {
    async fn current_location(
        &self,
        priority: Priority,
        cancel: CancellationToken,
    ) -> Result<Option<LocationFix>, ProviderError> {
        // Passive may only reuse fixes other requests computed; there are none here
        if priority == Priority::Passive {
            return Ok(None);
        }
        debug!(url = %self.url, ?priority, "ip lookup");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProviderError::Cancelled),
            result = self.lookup() => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ip_api_success() {
        let body = r#"{"status":"success","country":"United States","lat":37.422,"lon":-122.084}"#;
        assert_eq!(
            parse_response(body).ok().flatten(),
            Some(LocationFix::new(37.422, -122.084))
        );
    }

    #[test]
    fn test_parse_latitude_longitude_shape() {
        let body = r#"{"ip":"203.0.113.7","latitude":50.4501,"longitude":30.5234}"#;
        assert_eq!(
            parse_response(body).ok().flatten(),
            Some(LocationFix::new(50.4501, 30.5234))
        );
    }

    #[test]
    fn test_parse_fail_status() {
        let body = r#"{"status":"fail","message":"reserved range"}"#;
        assert!(matches!(
            parse_response(body),
            Err(ProviderError::Unavailable(ref m)) if m == "reserved range"
        ));
    }

    #[test]
    fn test_parse_missing_coordinates_is_no_fix() {
        assert!(matches!(parse_response(r#"{"status":"success"}"#), Ok(None)));
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(matches!(
            parse_response("<html>"),
            Err(ProviderError::Request(_))
        ));
    }

    #[tokio::test]
    async fn test_passive_priority_skips_network() {
        let provider = IpLocationProvider::new("http://127.0.0.1:9/unreachable");
        let result = provider
            .current_location(Priority::Passive, CancellationToken::new())
            .await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_cancelled_before_lookup() {
        let provider = IpLocationProvider::new("http://10.255.255.1/slow");
        let token = CancellationToken::new();
        token.cancel();
        let result = provider
            .current_location(Priority::HighAccuracy, token)
            .await;
        assert!(matches!(result, Err(ProviderError::Cancelled)));
    }
}
