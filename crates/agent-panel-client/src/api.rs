//! HTTP side of the control API: status polling and start/stop commands.

use agent_panel_core::command::Command;
use agent_panel_core::config::ConsoleConfig;
use agent_panel_core::wire::{self, CommandResponse, StatusResponse};

/// A request that did not yield a usable response.
#[derive(Debug)]
pub enum TransportError {
    /// Connection failed, timed out or the body could not be read.
    Request(String),
    /// Server answered with a non-2xx status.
    Status(u16),
    /// Body was not the expected JSON.
    Decode(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request(e) => write!(f, "request failed: {e}"),
            Self::Status(code) => write!(f, "server returned HTTP {code}"),
            Self::Decode(e) => write!(f, "undecodable response: {e}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.to_string())
    }
}

/// Request/response half of the control API.
///
/// Futures are not `Send`: everything runs on the page's single thread.
#[allow(async_fn_in_trait)]
pub trait ControlApi {
    async fn fetch_status(&self) -> Result<StatusResponse, TransportError>;
    async fn send_command(&self, command: &Command) -> Result<CommandResponse, TransportError>;
}

/// [`ControlApi`] over `reqwest`, which uses `fetch` in the browser.
#[derive(Debug, Clone)]
pub struct HttpControlApi {
    client: reqwest::Client,
    status_url: String,
    start_url: String,
    stop_url: String,
}

impl HttpControlApi {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            status_url: config.status_url(),
            start_url: config.start_url(),
            stop_url: config.stop_url(),
        }
    }

    async fn read_body(response: reqwest::Response) -> Result<String, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

impl ControlApi for HttpControlApi {
    async fn fetch_status(&self) -> Result<StatusResponse, TransportError> {
        let response = self.client.get(&self.status_url).send().await?;
        let body = Self::read_body(response).await?;
        wire::decode_status(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn send_command(&self, command: &Command) -> Result<CommandResponse, TransportError> {
        let request = match command.start_body() {
            Some(body) => self.client.post(&self.start_url).json(&body),
            None => self.client.post(&self.stop_url),
        };
        let body = Self::read_body(request.send().await?).await?;
        wire::decode_command_response(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
