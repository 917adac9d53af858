//! Open Food Facts client
//!
//! One unauthenticated GET per lookup:
//! `{base}/api/v0/product/{barcode}.json`

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::barcode::Barcode;
use crate::build_info;

pub const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Lookup errors
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Food database returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response is not JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// HTTP client for the food database
#[derive(Clone)]
pub struct FoodDatabaseClient {
    http_client: reqwest::Client,
    base_url: reqwest::Url,
    timeout: Duration,
}

impl FoodDatabaseClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|e| LookupError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(LookupError::InvalidBaseUrl(base_url.to_string()));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(build_info::user_agent())
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            timeout,
        })
    }

    /// Product URL for a barcode; the code is percent-encoded as one segment
    pub fn product_url(&self, barcode: &Barcode) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "v0", "product"])
                .push(&format!("{}.json", barcode.as_str()));
        }
        url
    }

    /// Fetch the raw product payload
    pub async fn fetch_product(&self, barcode: &Barcode) -> Result<Value, LookupError> {
        let url = self.product_url(barcode);
        tracing::debug!(barcode = %barcode, url = %url, "Querying food database");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Status {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        serde_json::from_slice(&bytes).map_err(|e| LookupError::InvalidJson(e.to_string()))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> LookupError {
        if e.is_timeout() {
            LookupError::Timeout(self.timeout)
        } else {
            LookupError::Network(e.to_string())
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and return the request line seen
    pub(crate) async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_product_url() {
        let client = FoodDatabaseClient::new(DEFAULT_BASE_URL, Duration::from_secs(1)).unwrap();
        let url = client.product_url(&Barcode::parse("3017620422003").unwrap());
        assert_eq!(
            url.as_str(),
            "https://world.openfoodfacts.org/api/v0/product/3017620422003.json"
        );
    }

    #[test]
    fn test_product_url_encodes_qr_text() {
        let client = FoodDatabaseClient::new("http://localhost:9000/", Duration::from_secs(1)).unwrap();
        let url = client.product_url(&Barcode::parse("a b/c").unwrap());
        assert_eq!(url.as_str(), "http://localhost:9000/api/v0/product/a%20b%2Fc.json");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            FoodDatabaseClient::new("not a url", Duration::from_secs(1)),
            Err(LookupError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_product_ok() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"status":1,"product":{"product_name":"Nutella","nutriments":{}}}"#,
        )
        .await;
        let client = FoodDatabaseClient::new(&base, Duration::from_secs(5)).unwrap();

        let payload = client
            .fetch_product(&Barcode::parse("3017620422003").unwrap())
            .await
            .unwrap();
        assert_eq!(payload["product"]["product_name"], "Nutella");

        let request_line = server.await.unwrap();
        assert_eq!(request_line, "GET /api/v0/product/3017620422003.json HTTP/1.1");
    }

    #[tokio::test]
    async fn test_fetch_product_http_error() {
        let (base, _server) = serve_once("HTTP/1.1 503 Service Unavailable", "{}").await;
        let client = FoodDatabaseClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client
            .fetch_product(&Barcode::parse("1").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_product_not_json() {
        let (base, _server) = serve_once("HTTP/1.1 200 OK", "<html>oops</html>").await;
        let client = FoodDatabaseClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client
            .fetch_product(&Barcode::parse("1").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_fetch_product_connection_refused() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            FoodDatabaseClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();
        let err = client
            .fetch_product(&Barcode::parse("1").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Network(_) | LookupError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_fetch_product_times_out() {
        // Accept the connection and never answer
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let client =
            FoodDatabaseClient::new(&format!("http://{}", addr), Duration::from_secs(1)).unwrap();
        let err = client
            .fetch_product(&Barcode::parse("3017620422003").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Timeout(d) if d == Duration::from_secs(1)));
        assert_eq!(crate::error::SmartFoodError::from(err).kind(), "network_error");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
