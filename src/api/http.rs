//! reqwest implementation of the device API

use crate::api::traits::{AuthReply, DeviceApi};
use crate::config::DeviceConfig;
use crate::error::{DeviceError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use decibel_shared::codec::{self, CONTENT_TYPE_JSON};
use decibel_shared::{endpoints, LogEntry};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

/// HTTP client for the monitoring server
pub struct HttpApi {
    client: Client,
    auth_url: String,
    logs_url: String,
}

impl HttpApi {
    /// Create a new client with the configured timeouts
    pub fn new(config: &DeviceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            auth_url: config.url(endpoints::AUTH_PATH),
            logs_url: config.url(endpoints::LOGS_PATH),
        })
    }
}

/// Connection failures become `Unreachable`; everything else stays `Network`
fn classify(url: &str, err: reqwest::Error) -> DeviceError {
    if err.is_connect() {
        DeviceError::Unreachable(format!("{}: {}", url, err))
    } else {
        DeviceError::Network(err)
    }
}

#[async_trait]
impl DeviceApi for HttpApi {
    async fn request_token(&self) -> Result<AuthReply> {
        let response = self
            .client
            .get(&self.auth_url)
            .send()
            .await
            .map_err(|e| classify(&self.auth_url, e))?;
        let status = response.status().as_u16();

        // Header values that are not valid text count as absent
        let header_token = response
            .headers()
            .get(endpoints::TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // The body only matters when the header carried no token
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) if header_token.is_some() => {
                debug!(error = %e, "Ignoring unreadable auth body");
                Bytes::new()
            }
            Err(e) => return Err(e.into()),
        };
        debug!(status, header = header_token.is_some(), body_len = body.len(), "Auth reply");

        Ok(AuthReply {
            status,
            header_token,
            body,
        })
    }

    async fn post_reading(&self, token: &str, decibels: f64) -> Result<u16> {
        let body = codec::encode_log_entry(&LogEntry::new(decibels))?;

        let response = self
            .client
            .post(&self.logs_url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(body)
            .send()
            .await
            .map_err(|e| classify(&self.logs_url, e))?;

        Ok(response.status().as_u16())
    }

    fn name(&self) -> &'static str {
        "HTTP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// One captured request
    struct Captured {
        head: String,
        body: Vec<u8>,
    }

    /// Accept a single connection, capture the request and answer with `response`
    async fn respond_once(response: &'static str) -> (String, JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];

            let head_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed before sending headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);

            while buf.len() < head_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed before sending body");
                buf.extend_from_slice(&chunk[..n]);
            }

            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            Captured {
                head,
                body: buf[head_end..head_end + content_length].to_vec(),
            }
        });

        (format!("http://{}", addr), handle)
    }

    fn api_for(base_url: String) -> HttpApi {
        let config = DeviceConfig {
            base_url,
            request_timeout: Duration::from_secs(5),
            ..Default::default()
        };
        HttpApi::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_request_token_from_header() {
        let (base, server) = respond_once(
            "HTTP/1.1 200 OK\r\nx-device-token: hdr-token\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let reply = api_for(base).request_token().await.unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.header_token.as_deref(), Some("hdr-token"));

        let captured = server.await.unwrap();
        assert!(captured.head.starts_with("GET /api/auth HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_request_token_body_only() {
        let (base, server) = respond_once(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 18\r\nconnection: close\r\n\r\n{\"token\":\"abc123\"}",
        )
        .await;

        let reply = api_for(base).request_token().await.unwrap();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.header_token, None);
        assert_eq!(&reply.body[..], br#"{"token":"abc123"}"#);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_post_reading_headers_and_body() {
        let (base, server) = respond_once(
            "HTTP/1.1 401 Unauthorized\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let status = api_for(base).post_reading("tok-1", 61.5).await.unwrap();
        assert_eq!(status, 401);

        let captured = server.await.unwrap();
        let head = captured.head.to_ascii_lowercase();
        assert!(head.starts_with("post /api/logs http/1.1"));
        assert!(head.contains("authorization: bearer tok-1"));
        assert!(head.contains("content-type: application/json"));

        let entry = codec::decode_log_entry(&captured.body).unwrap();
        assert_eq!(entry.decibels, 61.5);
    }

    #[tokio::test]
    async fn test_header_token_survives_truncated_body() {
        // Declares 50 body bytes but closes after 9
        let (base, server) = respond_once(
            "HTTP/1.1 200 OK\r\nx-device-token: hdr-token\r\ncontent-length: 50\r\nconnection: close\r\n\r\n{\"token\":",
        )
        .await;

        let reply = api_for(base).request_token().await.unwrap();
        assert_eq!(reply.header_token.as_deref(), Some("hdr-token"));
        assert!(reply.body.is_empty());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_truncated_body_without_header_is_error() {
        let (base, server) = respond_once(
            "HTTP/1.1 200 OK\r\ncontent-length: 50\r\nconnection: close\r\n\r\n{\"token\":",
        )
        .await;

        let result = api_for(base).request_token().await;
        assert!(matches!(result, Err(DeviceError::Network(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = api_for(format!("http://{}", addr));
        assert!(matches!(api.request_token().await, Err(DeviceError::Unreachable(_))));
        assert!(matches!(
            api.post_reading("tok", 60.0).await,
            Err(DeviceError::Unreachable(_))
        ));
    }
}
