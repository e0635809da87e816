//! HTTP vehicle bridge
//!
//! Talks to an out-of-process vehicle data provider over HTTP/JSON:
//!
//! - `GET  {base}/vehicle/snapshot`   → `VehicleSnapshot`
//! - `POST {base}/vehicle/drive-mode` ← `{"mode": "D"}`, acknowledged with the
//!   applied mode
//!
//! The client timeout is the only timeout; the poll loop does not add one.

use std::time::Duration;

use async_trait::async_trait;

use super::{BridgeError, DriveModeRequest, VehicleBridge};
use crate::telemetry::{DriveMode, VehicleSnapshot};

/// Default transport timeout for bridge requests in milliseconds
pub const DEFAULT_BRIDGE_TIMEOUT_MS: u64 = 2000;

const SNAPSHOT_PATH: &str = "/vehicle/snapshot";
const DRIVE_MODE_PATH: &str = "/vehicle/drive-mode";

/// Vehicle bridge backed by an HTTP endpoint
pub struct HttpBridge {
    /// HTTP client for bridge requests
    client: reqwest::Client,
    /// Base URL without a trailing slash
    base_url: String,
}

impl HttpBridge {
    /// Create a bridge client for `base_url` (http:// or https://)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BridgeError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(BridgeError::InvalidUrl {
                url: base_url.to_string(),
                reason: "empty".to_string(),
            });
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(BridgeError::InvalidUrl {
                url: base_url.to_string(),
                reason: "expected an http:// or https:// scheme".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("vehicle-console/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL polled for snapshots
    pub fn snapshot_url(&self) -> String {
        format!("{}{}", self.base_url, SNAPSHOT_PATH)
    }

    /// URL that drive mode commands are posted to
    pub fn drive_mode_url(&self) -> String {
        format!("{}{}", self.base_url, DRIVE_MODE_PATH)
    }

    /// Read the response body, turning a non-success status into an error
    async fn read_body(response: reqwest::Response) -> Result<String, BridgeError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BridgeError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl VehicleBridge for HttpBridge {
    async fn get_snapshot(&self) -> Result<VehicleSnapshot, BridgeError> {
        let response = self.client.get(self.snapshot_url()).send().await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn set_drive_mode(&self, mode: DriveMode) -> Result<DriveMode, BridgeError> {
        let response = self
            .client
            .post(self.drive_mode_url())
            .json(&DriveModeRequest { mode })
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        // Providers may echo `"D"`, `{"mode":"D"}` or nothing at all
        let acknowledged = serde_json::from_str::<DriveMode>(&body)
            .or_else(|_| serde_json::from_str::<DriveModeRequest>(&body).map(|r| r.mode))
            .unwrap_or(mode);
        Ok(acknowledged)
    }

    fn describe(&self) -> String {
        format!("http bridge at {}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn timeout() -> Duration {
        Duration::from_millis(DEFAULT_BRIDGE_TIMEOUT_MS)
    }

    /// Serve a single canned HTTP response and return the base URL
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let bridge = HttpBridge::new("http://127.0.0.1:7878/", timeout()).unwrap();
        assert_eq!(bridge.base_url(), "http://127.0.0.1:7878");
        assert_eq!(bridge.snapshot_url(), "http://127.0.0.1:7878/vehicle/snapshot");
        assert_eq!(bridge.drive_mode_url(), "http://127.0.0.1:7878/vehicle/drive-mode");
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(matches!(
            HttpBridge::new("  ", timeout()),
            Err(BridgeError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpBridge::new("ftp://vehicle", timeout()),
            Err(BridgeError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_describe() {
        let bridge = HttpBridge::new("https://vehicle.local", timeout()).unwrap();
        assert_eq!(bridge.describe(), "http bridge at https://vehicle.local");
    }

    #[tokio::test]
    async fn test_error_status_is_reported_with_body() {
        let bridge = HttpBridge::new(&serve_once("503 Service Unavailable", "bridge offline").await, timeout()).unwrap();
        match bridge.get_snapshot().await {
            Err(BridgeError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "bridge offline");
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_snapshot_is_decode_error() {
        let bridge = HttpBridge::new(&serve_once("200 OK", "not json").await, timeout()).unwrap();
        assert!(matches!(bridge.get_snapshot().await, Err(BridgeError::Decode(_))));
    }

    #[tokio::test]
    async fn test_snapshot_with_null_numbers_decodes() {
        let body = r#"{"speedMph": null, "driveMode": "D", "batteryPct": 70}"#;
        let bridge = HttpBridge::new(&serve_once("200 OK", body).await, timeout()).unwrap();
        let snapshot = bridge.get_snapshot().await.unwrap();
        assert_eq!(snapshot.speed_mph, 0.0);
        assert_eq!(snapshot.drive_mode, DriveMode::Drive);
        assert_eq!(snapshot.battery_pct, 70.0);
    }

    #[tokio::test]
    async fn test_drive_mode_acknowledgement_forms() {
        let bridge = HttpBridge::new(&serve_once("200 OK", r#"{"mode":"R"}"#).await, timeout()).unwrap();
        assert_eq!(bridge.set_drive_mode(DriveMode::Drive).await.unwrap(), DriveMode::Reverse);

        let bridge = HttpBridge::new(&serve_once("200 OK", "").await, timeout()).unwrap();
        assert_eq!(bridge.set_drive_mode(DriveMode::Drive).await.unwrap(), DriveMode::Drive);

        let bridge = HttpBridge::new(&serve_once("409 Conflict", "vehicle moving").await, timeout()).unwrap();
        assert!(matches!(
            bridge.set_drive_mode(DriveMode::Park).await,
            Err(BridgeError::Status { status: 409, .. })
        ));
    }
}
