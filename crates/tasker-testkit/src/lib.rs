//! In-process stand-in for the task backend, used by the client test suites.

pub mod routes;
pub mod state;

use axum::Router;
use tokio::net::TcpListener;

pub use state::{AppState, Backend, BackendError};

/// Build a router over a fresh backend.
pub fn test_router() -> (Router, AppState) {
    let state = AppState::new();
    (routes::build_router(state.clone()), state)
}

/// A running test server with base_url, backend handle and background task handle.
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port. Returns the TestServer
/// with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let (app, state) = test_router();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        state,
        _handle: handle,
    }
}

/// Address and backend handle of a server running on its own thread.
pub struct DetachedServer {
    pub base_url: String,
    pub state: AppState,
}

/// Spawn a test server on a background thread with its own runtime, for
/// sync callers that build their own runtime (and so cannot nest inside
/// `#[tokio::test]`). The server stays alive for the rest of the process.
pub fn spawn_detached() -> DetachedServer {
    let (tx, rx) = std::sync::mpsc::sync_channel(1);
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let server = spawn_test_server().await;
            tx.send(DetachedServer {
                base_url: server.base_url.clone(),
                state: server.state.clone(),
            })
            .unwrap();
            std::future::pending::<()>().await;
        });
    });
    rx.recv().unwrap()
}
