use crate::app::ports::RecordSource;
use crate::error::{DirectoryError, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use std::time::Duration;
use tracing::debug;

/// Reads the upstream table over HTTP (spreadsheet CSV export)
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    user_agent: String,
}

impl HttpSource {
    /// `timeout` bounds the whole request, body included
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            user_agent: user_agent.into(),
        })
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    async fn fetch(&self) -> Result<String> {
        let resp = self
            .client
            .get(&self.url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DirectoryError::Transport {
                source_name: self.describe(),
                message: format!("unexpected status {}", status.as_u16()),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/csv")
            .to_string();
        let bytes = resp.bytes().await?;
        debug!(url = %self.url, content_type = %content_type, bytes = bytes.len(), "fetched source");

        // The export is always UTF-8; tolerate stray invalid bytes rather than fail.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::net::{SocketAddr, TcpListener};

    fn serve(app: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = hyper::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service());
        tokio::spawn(server);
        addr
    }

    fn source(addr: SocketAddr, path: &str, timeout: Duration) -> HttpSource {
        HttpSource::new(format!("http://{}{}", addr, path), "test-agent", timeout).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_sends_user_agent() {
        let app = Router::new().route(
            "/sheet.csv",
            get(|headers: axum::http::HeaderMap| async move {
                let agent = headers
                    .get(USER_AGENT)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                format!("Post ID,agent\n1,{}", agent)
            }),
        );
        let addr = serve(app);

        let text = source(addr, "/sheet.csv", Duration::from_secs(5)).fetch().await.unwrap();
        assert_eq!(text, "Post ID,agent\n1,test-agent");
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let app = Router::new().route(
            "/sheet.csv",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let addr = serve(app);

        let err = source(addr, "/sheet.csv", Duration::from_secs(5)).fetch().await.unwrap_err();
        assert!(err.is_fetch_failure());
        match err {
            DirectoryError::Transport { message, .. } => assert!(message.contains("503")),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let app = Router::new().route(
            "/sheet.csv",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let addr = serve(app);

        let err = source(addr, "/sheet.csv", Duration::from_millis(100)).fetch().await.unwrap_err();
        assert!(matches!(&err, DirectoryError::Http(e) if e.is_timeout()));
        assert!(err.is_fetch_failure());
    }
}
