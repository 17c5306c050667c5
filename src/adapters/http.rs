//! HTTP control receiver.
//!
//! # Routes
//! ```text
//! DELETE /{host}              → stop monitoring host
//! <any other> /{host}         → start (or restart) monitoring host
//! <any other> /{host}?down=true → start with the host believed DOWN
//! /                           → 400 missing host
//! ```
//!
//! The host is the rest of the path, so URL targets for the HTTP probe
//! work as-is: `PUT /http://example.com/health`.

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use crate::monitor::{HostStatus, Receiver};

/// Serves start/stop requests over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReceiver {
    bind_address: String,
}

impl HttpReceiver {
    pub fn new(bind_address: impl Into<String>) -> Self {
        Self {
            bind_address: bind_address.into(),
        }
    }
}

#[derive(Clone)]
struct ControlState {
    start_tx: mpsc::Sender<HostStatus>,
    stop_tx: mpsc::Sender<HostStatus>,
}

#[derive(Debug, Default, Deserialize)]
struct ControlQuery {
    #[serde(default)]
    down: bool,
}

/// Acknowledgement returned for every accepted request.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControlAck {
    pub action: String,
    pub host: String,
    pub down: bool,
}

/// Build the control router feeding the given channels.
pub fn router(start_tx: mpsc::Sender<HostStatus>, stop_tx: mpsc::Sender<HostStatus>) -> Router {
    Router::new()
        .route("/", any(missing_host))
        .route("/{*host}", any(control))
        .with_state(ControlState { start_tx, stop_tx })
        .layer(TraceLayer::new_for_http())
}

async fn missing_host() -> Response {
    (StatusCode::BAD_REQUEST, "missing host on request\n").into_response()
}

async fn control(
    State(state): State<ControlState>,
    method: Method,
    Path(host): Path<String>,
    Query(query): Query<ControlQuery>,
) -> Response {
    let host = host.trim().trim_start_matches('/');
    if host.is_empty() {
        return missing_host().await;
    }

    let (action, channel, status) = if method == Method::DELETE {
        ("stop", &state.stop_tx, HostStatus::up(host))
    } else {
        let status = HostStatus {
            host: host.to_string(),
            down: query.down,
            reason: None,
        };
        ("start", &state.start_tx, status)
    };

    let ack = ControlAck {
        action: action.to_string(),
        host: status.host.clone(),
        down: status.down,
    };

    if channel.send(status).await.is_err() {
        tracing::error!(host = %ack.host, action, "Monitoring pool is not accepting requests");
        return (StatusCode::SERVICE_UNAVAILABLE, "monitoring pool unavailable\n").into_response();
    }

    tracing::debug!(host = %ack.host, action, "Control request accepted");
    (StatusCode::OK, Json(ack)).into_response()
}

impl Receiver for HttpReceiver {
    fn receive(
        self: Box<Self>,
        start_tx: mpsc::Sender<HostStatus>,
        stop_tx: mpsc::Sender<HostStatus>,
    ) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            let listener = match TcpListener::bind(&self.bind_address).await {
                Ok(listener) => listener,
                Err(e) => {
                    tracing::error!(address = %self.bind_address, error = %e, "Control endpoint failed to bind");
                    return;
                }
            };

            tracing::info!(address = %self.bind_address, "Control endpoint listening");
            if let Err(e) = axum::serve(listener, router(start_tx, stop_tx)).await {
                tracing::error!(error = %e, "Control endpoint stopped");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn channels() -> (
        Router,
        mpsc::Receiver<HostStatus>,
        mpsc::Receiver<HostStatus>,
    ) {
        let (start_tx, start_rx) = mpsc::channel(10);
        let (stop_tx, stop_rx) = mpsc::channel(10);
        (router(start_tx, stop_tx), start_rx, stop_rx)
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_start_request() {
        let (app, mut start_rx, _stop_rx) = channels();

        let res = app.oneshot(request(Method::PUT, "/h1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = to_bytes(res.into_body(), 1024).await.unwrap();
        let ack: ControlAck = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            ack,
            ControlAck {
                action: "start".into(),
                host: "h1".into(),
                down: false
            }
        );
        assert_eq!(start_rx.recv().await, Some(HostStatus::up("h1")));
    }

    #[tokio::test]
    async fn test_start_down_and_url_host() {
        let (app, mut start_rx, _stop_rx) = channels();

        let res = app
            .clone()
            .oneshot(request(Method::POST, "/h2?down=true"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(start_rx.recv().await, Some(HostStatus::down("h2")));

        let res = app
            .oneshot(request(Method::GET, "/http://example.com/health"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            start_rx.recv().await.unwrap().host,
            "http://example.com/health"
        );
    }

    #[tokio::test]
    async fn test_stop_request() {
        let (app, mut start_rx, mut stop_rx) = channels();

        let res = app.oneshot(request(Method::DELETE, "/h1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(stop_rx.recv().await.unwrap().host, "h1");
        assert!(start_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_missing_host() {
        let (app, mut start_rx, _stop_rx) = channels();

        let res = app.oneshot(request(Method::PUT, "/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(start_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_pool_gone() {
        let (app, start_rx, _stop_rx) = channels();
        drop(start_rx);

        let res = app.oneshot(request(Method::PUT, "/h1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
