//! Push subscription to the server's `agent_update` events.

use std::cell::Cell;
use std::rc::Rc;
#[cfg(not(target_family = "wasm"))]
use std::time::Duration;

use agent_panel_core::config::ConsoleConfig;
use agent_panel_core::state::AgentState;
use agent_panel_core::wire::AgentUpdateEvent;

use crate::sync::StatusSynchronizer;

#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::*;

/// Decode one push payload and hand it to the synchronizer. Payloads that
/// carry nothing usable become an empty update.
pub fn forward_payload(sync: &StatusSynchronizer, data: &str) -> AgentState {
    let update = AgentUpdateEvent::decode(data).to_update();
    if update.is_empty() {
        tracing::debug!("Push event carried no usable fields");
    }
    sync.apply_update(update)
}

/// Owns the page's single push subscription.
///
/// The browser transport is `EventSource`, which reconnects on its own and
/// keeps the listener attached. Native builds read the SSE stream over
/// `reqwest` and reconnect after the server's `retry:` hint or the
/// configured delay.
pub struct ConnectionManager {
    events_url: String,
    event_name: String,
    #[cfg(not(target_family = "wasm"))]
    reconnect_delay: Duration,
    subscribed: Cell<bool>,
    connected: Rc<Cell<bool>>,
    #[cfg(target_family = "wasm")]
    source: std::cell::RefCell<Option<web_sys::EventSource>>,
}

impl ConnectionManager {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            events_url: config.events_url(),
            event_name: config.push.event_name.clone(),
            #[cfg(not(target_family = "wasm"))]
            reconnect_delay: config.push.reconnect_delay(),
            subscribed: Cell::new(false),
            connected: Rc::new(Cell::new(false)),
            #[cfg(target_family = "wasm")]
            source: std::cell::RefCell::new(None),
        }
    }

    /// Whether the transport currently has an open stream.
    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed.get()
    }

    /// Open the push subscription. Calling again after a successful
    /// subscription does nothing.
    #[cfg(target_family = "wasm")]
    pub fn connect(&self, sync: Rc<StatusSynchronizer>) -> Result<(), String> {
        if self.subscribed.get() {
            tracing::debug!("Push channel already subscribed");
            return Ok(());
        }
        let source = web_sys::EventSource::new(&self.events_url)
            .map_err(|e| format!("EventSource error: {e:?}"))?;

        let on_update =
            Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |evt: web_sys::MessageEvent| {
                let data = evt.data().as_string().unwrap_or_default();
                forward_payload(&sync, &data);
            });
        source
            .add_event_listener_with_callback(&self.event_name, on_update.as_ref().unchecked_ref())
            .map_err(|e| format!("Failed to attach {} listener: {e:?}", self.event_name))?;
        on_update.forget();

        let connected = Rc::clone(&self.connected);
        let onopen = Closure::<dyn FnMut()>::new(move || {
            connected.set(true);
            crate::diag::console_log!("Push channel connected");
        });
        source.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();

        let connected_err = Rc::clone(&self.connected);
        let onerror = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            connected_err.set(false);
            crate::diag::console_warn!("Push channel interrupted, browser will reconnect");
        });
        source.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        *self.source.borrow_mut() = Some(source);
        self.subscribed.set(true);
        Ok(())
    }

    /// Open the push subscription. Calling again after a successful
    /// subscription does nothing. Must be called inside a `LocalSet`.
    #[cfg(not(target_family = "wasm"))]
    pub fn connect(&self, sync: Rc<StatusSynchronizer>) -> Result<(), String> {
        if self.subscribed.get() {
            tracing::debug!("Push channel already subscribed");
            return Ok(());
        }
        let reader = SseReader {
            url: self.events_url.clone(),
            event_name: self.event_name.clone(),
            retry: self.reconnect_delay,
            connected: Rc::clone(&self.connected),
            sync,
        };
        crate::runtime::spawn_local(reader.run());
        self.subscribed.set(true);
        Ok(())
    }
}

#[cfg(not(target_family = "wasm"))]
struct SseReader {
    url: String,
    event_name: String,
    retry: Duration,
    connected: Rc<Cell<bool>>,
    sync: Rc<StatusSynchronizer>,
}

#[cfg(not(target_family = "wasm"))]
impl SseReader {
    async fn run(mut self) {
        let client = reqwest::Client::new();
        loop {
            match client
                .get(&self.url)
                .header(reqwest::header::ACCEPT, "text/event-stream")
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {
                    self.connected.set(true);
                    tracing::info!(url = %self.url, "Push channel connected");
                    self.read_stream(response).await;
                    self.connected.set(false);
                },
                Ok(response) => {
                    tracing::warn!(status = response.status().as_u16(), "Push channel refused");
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Push channel connect failed");
                },
            }
            crate::runtime::sleep(self.retry).await;
        }
    }

    async fn read_stream(&mut self, response: reqwest::Response) {
        use futures::StreamExt;

        let mut decoder = agent_panel_core::sse::SseDecoder::new();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let bytes = match chunk {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "Push channel read failed");
                    break;
                },
            };
            for event in decoder.push(&bytes) {
                if event.event == self.event_name {
                    forward_payload(&self.sync, &event.data);
                }
            }
            if let Some(retry) = decoder.retry() {
                self.retry = retry;
            }
        }
        tracing::info!("Push channel closed");
    }
}
