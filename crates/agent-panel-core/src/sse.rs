//! Incremental decoder for `text/event-stream` bodies.

use std::time::Duration;

/// Event name used when a frame carries no `event:` field.
pub const DEFAULT_EVENT_NAME: &str = "message";

/// Longest line kept while waiting for its newline.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
    pub id: Option<String>,
}

/// Feeds arbitrary byte chunks and yields complete events. Chunk boundaries
/// may fall anywhere, including inside a UTF-8 sequence or a `\r\n` pair.
///
/// A line longer than the limit is dropped along with the event it belongs
/// to; decoding resumes after its newline.
#[derive(Debug)]
pub struct SseDecoder {
    pending: Vec<u8>,
    max_line: usize,
    skipping_line: bool,
    event: Option<String>,
    data: Vec<String>,
    last_id: Option<String>,
    retry: Option<Duration>,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            max_line: MAX_LINE_BYTES,
            skipping_line: false,
            event: None,
            data: Vec::new(),
            last_id: None,
            retry: None,
        }
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line(mut self, bytes: usize) -> Self {
        self.max_line = bytes;
        self
    }

    /// Last reconnection delay announced by the server.
    pub fn retry(&self) -> Option<Duration> {
        self.retry
    }

    pub fn push(&mut self, mut chunk: &[u8]) -> Vec<SseEvent> {
        if self.skipping_line {
            match chunk.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    self.skipping_line = false;
                    chunk = &chunk[pos + 1..];
                },
                None => return Vec::new(),
            }
        }
        self.pending.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        if self.pending.len() > self.max_line {
            tracing::warn!(
                len = self.pending.len(),
                limit = self.max_line,
                "Dropping oversized SSE line"
            );
            self.pending.clear();
            self.event = None;
            self.data.clear();
            self.skipping_line = true;
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" if !value.contains('\0') => self.last_id = Some(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.retry = Some(Duration::from_millis(ms));
                }
            },
            _ => {},
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent {
            event: event
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT_NAME.to_string()),
            data,
            id: self.last_id.clone(),
        })
    }
}
