//! Incremental Server-Sent Events parser
//!
//! Feed raw response chunks with [`SseParser::push`]; complete events come
//! back as soon as their terminating blank line arrives. Chunk boundaries may
//! fall anywhere, including inside a multi-byte UTF-8 sequence.
//!
//! ```text
//! event: updates
//! data: {"supervisor": {"messages": []}}
//!
//! event: end
//! data: null
//! ```

/// A parsed Server-Sent Event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The `event:` field, if present
    pub event: Option<String>,
    /// All `data:` lines joined with `\n`
    pub data: String,
    /// The `id:` field, if present
    pub id: Option<String>,
}

impl SseEvent {
    /// Event name, defaulting to `message` as the SSE format prescribes
    pub fn kind(&self) -> &str {
        self.event.as_deref().unwrap_or("message")
    }
}

#[derive(Debug, Default)]
struct PendingEvent {
    event: Option<String>,
    data: Vec<String>,
    id: Option<String>,
}

impl PendingEvent {
    fn is_empty(&self) -> bool {
        self.data.is_empty() && self.event.is_none()
    }

    fn take(&mut self) -> SseEvent {
        let pending = std::mem::take(self);
        SseEvent {
            event: pending.event,
            data: pending.data.join("\n"),
            id: pending.id,
        }
    }

    fn apply_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return (!self.is_empty()).then(|| self.take());
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = split_field(line);
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" => self.id = Some(value.to_string()),
            _ => {}
        }
        None
    }
}

/// Split `field: value`; a line without a colon is a field with empty value
fn split_field(line: &str) -> (&str, &str) {
    match line.split_once(':') {
        Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
        None => (line, ""),
    }
}

/// Streaming SSE parser
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    pending: PendingEvent,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a chunk of bytes and collect the events it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if let Some(event) = self.pending.apply_line(line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing event that was not followed by a blank line
    pub fn finish(&mut self) -> Option<SseEvent> {
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if let Some(event) = self.pending.apply_line(line) {
                return Some(event);
            }
        }
        (!self.pending.is_empty()).then(|| self.pending.take())
    }
}
