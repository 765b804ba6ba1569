//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use rest_router::config::RouterConfig;
use rest_router::http::{ApiRequest, Dispatcher, HttpServer};
use rest_router::lifecycle::Shutdown;
use rest_router::routing::{HandlerResult, PathParams, Resource};

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Arc<Shutdown>,
    pub handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle.await.unwrap().unwrap();
    }
}

/// Start `dispatcher` behind an `HttpServer` bound to `127.0.0.1:0`.
pub async fn start_server<S>(mut config: RouterConfig, dispatcher: Dispatcher<S>) -> TestServer
where
    S: Clone + Send + Sync + 'static,
{
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Arc::new(Shutdown::new());
    let server = HttpServer::new(config, dispatcher);
    let handle = tokio::spawn(server.run(listener, shutdown.wait()));

    TestServer { addr, shutdown, handle }
}

pub fn request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "api.test")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Handler that answers with its own name, the captured params and the config.
pub fn named(
    name: &'static str,
) -> impl Fn(ApiRequest, PathParams, &'static str) -> futures_util::future::Ready<HandlerResult>
       + Clone
       + Send
       + Sync
       + 'static {
    move |_req, params, config| {
        futures_util::future::ready(rest_router::http::ok(serde_json::json!({
            "handler": name,
            "params": params,
            "config": config,
        })))
    }
}

/// The orders tree used across the routing tests:
///
/// ```text
/// /orders                         list, create
/// /orders/<id>                    read, update, delete
/// /orders/<orders_id>/summary     read
/// /orders/<orders_id>/items       list, create
/// /orders/<orders_id>/items/<id>  read, update, delete
/// /status                         read, update
/// ```
pub fn orders_tree() -> Resource<&'static str> {
    Resource::root()
        .resource(
            Resource::entity("orders", r"\d+")
                .list(named("orders.list"))
                .create(named("orders.create"))
                .read(named("orders.read"))
                .update(named("orders.update"))
                .delete(named("orders.delete"))
                .resource(Resource::singleton("summary").read(named("orders.summary.read")))
                .resource(
                    Resource::entity("items", r"[a-z]+-\d+")
                        .list(named("orders.items.list"))
                        .create(named("orders.items.create"))
                        .read(named("orders.items.read"))
                        .update(named("orders.items.update"))
                        .delete(named("orders.items.delete")),
                ),
        )
        .resource(
            Resource::singleton("status")
                .read(named("status.read"))
                .update(named("status.update")),
        )
}
