//! Canned-response HTTP servers for integration tests.
//!
//! Each server is a warp route bound to an ephemeral localhost port and
//! spawned on the current tokio runtime. Pointed at as a proxy, it answers
//! the absolute-form request itself, so no real upstream is ever contacted.

#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener};
use warp::http::{Response, StatusCode};
use warp::Filter;

/// Answer every request with `status` and `body`.
///
/// Must be called from within a tokio runtime.
pub fn spawn_responder(status: u16, body: impl Into<String>) -> SocketAddr {
    let status = StatusCode::from_u16(status).expect("valid status code");
    let body = body.into();
    let route = warp::any().map(move || {
        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(body.clone())
            .expect("canned response")
    });

    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

/// Accept requests and never answer them
pub fn spawn_silent() -> SocketAddr {
    let route = warp::any().and_then(|| async {
        std::future::pending::<Result<&'static str, warp::Rejection>>().await
    });

    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

/// An address nothing is listening on
pub fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test port");
    listener.local_addr().expect("test port address")
}
