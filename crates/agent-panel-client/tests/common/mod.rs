use std::convert::Infallible;
use std::net::SocketAddr;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::sync::{broadcast, watch};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use agent_panel_client::api::HttpControlApi;
use agent_panel_client::app::Console;
use agent_panel_client::notify::NotificationSurface;
use agent_panel_client::sync::StatusSurface;
pub use agent_panel_client::test_support::{RecordingNotificationSurface, RecordingStatusSurface};
use agent_panel_core::config::ConsoleConfig;

/// Retry hint sent at the start of every SSE stream so reconnects are quick.
pub const SSE_RETRY: Duration = Duration::from_millis(100);

/// Canned answer for one endpoint.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(StatusCode),
    Raw(String),
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Self::Json(value) => axum::Json(value).into_response(),
            Self::Status(code) => code.into_response(),
            Self::Raw(body) => body.into_response(),
        }
    }
}

/// A request as the stub saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Received {
    pub path: &'static str,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
struct PushFrame {
    event: String,
    data: String,
}

struct Script {
    status: Reply,
    start: Reply,
    stop: Reply,
    received: Vec<Received>,
}

#[derive(Clone)]
struct Stub {
    script: Arc<Mutex<Script>>,
    events: broadcast::Sender<PushFrame>,
    close: Arc<watch::Sender<u64>>,
}

impl Stub {
    fn record(&self, path: &'static str, headers: &axum::http::HeaderMap, body: &[u8]) {
        let content_type = headers
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = if body.is_empty() {
            None
        } else {
            serde_json::from_slice(body).ok()
        };
        self.script.lock().unwrap().received.push(Received {
            path,
            content_type,
            body,
        });
    }
}

async fn status(State(stub): State<Stub>, headers: axum::http::HeaderMap) -> Reply {
    stub.record("/api/status", &headers, &[]);
    stub.script.lock().unwrap().status.clone()
}

async fn start(State(stub): State<Stub>, headers: axum::http::HeaderMap, body: Bytes) -> Reply {
    stub.record("/api/start", &headers, &body);
    stub.script.lock().unwrap().start.clone()
}

async fn stop(State(stub): State<Stub>, headers: axum::http::HeaderMap, body: Bytes) -> Reply {
    stub.record("/api/stop", &headers, &body);
    stub.script.lock().unwrap().stop.clone()
}

async fn event_stream(
    State(stub): State<Stub>,
) -> Sse<impl futures::Stream<Item = Result<SseEvent, Infallible>>> {
    let mut closed = stub.close.subscribe();
    let hello = tokio_stream::once(Ok::<_, Infallible>(SseEvent::default().retry(SSE_RETRY)));
    let frames = BroadcastStream::new(stub.events.subscribe()).filter_map(|frame| match frame {
        Ok(frame) => Some(Ok::<_, Infallible>(
            SseEvent::default().event(frame.event).data(frame.data),
        )),
        Err(e) => {
            tracing::warn!("Stub SSE lagged: {e}");
            None
        },
    });
    let stream = futures::StreamExt::take_until(hello.chain(frames), async move {
        let _ = closed.changed().await;
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// In-process stand-in for the agent's control server.
pub struct TestServer {
    pub addr: SocketAddr,
    stub: Stub,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Server reporting a stopped agent and accepting every command.
    pub async fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        let (close, _) = watch::channel(0);
        let stub = Stub {
            script: Arc::new(Mutex::new(Script {
                status: Reply::Json(json!({ "agent_running": false, "last_update": null })),
                start: Reply::Json(json!({ "status": "success" })),
                stop: Reply::Json(json!({ "status": "success" })),
                received: Vec::new(),
            })),
            events,
            close: Arc::new(close),
        };

        let app = Router::new()
            .route("/api/status", get(status))
            .route("/api/start", post(start))
            .route("/api/stop", post(stop))
            .route("/api/events", get(event_stream))
            .with_state(stub.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            stub,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn config(&self) -> ConsoleConfig {
        ConsoleConfig::default().with_base_url(&self.base_url())
    }

    pub fn set_status(&self, reply: Reply) {
        self.stub.script.lock().unwrap().status = reply;
    }

    pub fn set_start(&self, reply: Reply) {
        self.stub.script.lock().unwrap().start = reply;
    }

    pub fn set_stop(&self, reply: Reply) {
        self.stub.script.lock().unwrap().stop = reply;
    }

    pub fn received(&self) -> Vec<Received> {
        self.stub.script.lock().unwrap().received.clone()
    }

    pub fn received_on(&self, path: &str) -> Vec<Received> {
        self.received()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn subscribers(&self) -> usize {
        self.stub.events.receiver_count()
    }

    /// Send a named SSE event to every open stream.
    pub fn push_event(&self, event: &str, data: &str) {
        let _ = self.stub.events.send(PushFrame {
            event: event.to_string(),
            data: data.to_string(),
        });
    }

    pub fn push_agent_update(&self, payload: Value) {
        self.push_event("agent_update", &payload.to_string());
    }

    /// End every open SSE stream; clients are expected to reconnect.
    pub fn close_streams(&self) {
        self.stub.close.send_modify(|generation| *generation += 1);
    }
}

/// Poll `cond` until it holds or three seconds pass.
pub async fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}

/// A console talking to `server` over real HTTP, with recording surfaces.
pub struct Harness {
    pub console: Rc<Console<HttpControlApi>>,
    pub status: Rc<RecordingStatusSurface>,
    pub notes: Rc<RecordingNotificationSurface>,
}

impl Harness {
    pub fn new(config: &ConsoleConfig) -> Self {
        let status = Rc::new(RecordingStatusSurface::default());
        let notes = Rc::new(RecordingNotificationSurface::default());
        let console = Rc::new(Console::new(
            config,
            HttpControlApi::new(config),
            Rc::clone(&status) as Rc<dyn StatusSurface>,
            Rc::clone(&notes) as Rc<dyn NotificationSurface>,
        ));
        Self {
            console,
            status,
            notes,
        }
    }
}
