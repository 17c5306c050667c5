//! HTTP HEAD probe.
//!
//! # Responsibilities
//! - Normalize the host identifier into an `http://` URL
//! - Send a HEAD request bounded by the probe timeout
//! - Treat exactly `200 OK` as reachable
//!
//! # Design Decisions
//! - One pooled client per probe, shared by every monitor
//! - Redirects and other 2xx answers count as failures
//! - No TLS: `https` targets are rejected up front

use axum::body::Body;
use futures_util::future::BoxFuture;
use hyper::{Method, Request, StatusCode, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;
use tokio::time;
use url::Url;

use crate::probe::{Probe, ProbeError, ProbeResult};

#[derive(Clone)]
pub struct HttpProbe {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Self { client, timeout }
    }

    fn target(host: &str) -> Result<Uri, ProbeError> {
        let raw = if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };

        let url = Url::parse(&raw).map_err(|e| ProbeError::InvalidTarget(format!("{}: {}", host, e)))?;
        if url.scheme() != "http" {
            return Err(ProbeError::InvalidTarget(format!(
                "unsupported scheme '{}' in {}",
                url.scheme(),
                host
            )));
        }

        url.as_str()
            .parse::<Uri>()
            .map_err(|e| ProbeError::InvalidTarget(format!("{}: {}", host, e)))
    }
}

impl Probe for HttpProbe {
    fn probe<'a>(&'a self, host: &'a str) -> BoxFuture<'a, ProbeResult> {
        Box::pin(async move {
            let request = Request::builder()
                .method(Method::HEAD)
                .uri(Self::target(host)?)
                .header("user-agent", "hostwatch-probe")
                .body(Body::empty())
                .map_err(|e| ProbeError::Request(e.to_string()))?;

            match time::timeout(self.timeout, self.client.request(request)).await {
                Ok(Ok(response)) => {
                    if response.status() == StatusCode::OK {
                        Ok(())
                    } else {
                        Err(ProbeError::Status(response.status().as_u16()))
                    }
                }
                Ok(Err(e)) => Err(ProbeError::Request(e.to_string())),
                Err(_) => Err(ProbeError::Timeout(self.timeout)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::get, Router};
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    async fn start_backend() -> SocketAddr {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .route("/down", get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "down") }))
            .route("/moved", get(|| async { (AxumStatus::NO_CONTENT, "") }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        addr
    }

    #[test]
    fn test_target_normalization() {
        assert_eq!(HttpProbe::target("example.com").unwrap().to_string(), "http://example.com/");
        assert_eq!(
            HttpProbe::target("http://example.com/health").unwrap().to_string(),
            "http://example.com/health"
        );
        assert!(matches!(
            HttpProbe::target("https://example.com"),
            Err(ProbeError::InvalidTarget(_))
        ));
    }

    #[tokio::test]
    async fn test_probe_status_handling() {
        let addr = start_backend().await;
        let probe = HttpProbe::new(Duration::from_secs(2));

        assert!(probe.probe(&format!("http://{}/", addr)).await.is_ok());
        // Scheme is optional
        assert!(probe.probe(&addr.to_string()).await.is_ok());

        let err = probe.probe(&format!("{}/down", addr)).await.unwrap_err();
        assert!(matches!(err, ProbeError::Status(503)), "got {:?}", err);
        assert_eq!(err.reason().as_deref(), Some("unexpected status 503"));

        let err = probe.probe(&format!("{}/moved", addr)).await.unwrap_err();
        assert!(matches!(err, ProbeError::Status(204)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_probe_connection_refused() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let probe = HttpProbe::new(Duration::from_secs(2));
        let err = probe.probe(&addr.to_string()).await.unwrap_err();
        assert!(matches!(err, ProbeError::Request(_)), "got {:?}", err);
    }
}
