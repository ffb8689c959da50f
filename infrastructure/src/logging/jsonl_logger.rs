//! JSONL file writer for conversation events.
//!
//! Each [`ConversationEvent`] becomes one JSON line: `type`, `timestamp` and
//! a per-run `seq`, followed by the payload fields. Lines are appended, so
//! one file accumulates events across runs.

use empower_application::{ConversationEvent, ConversationLogger};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// One line of the log: the envelope fields followed by the payload.
#[derive(Serialize)]
struct LogLine<'a> {
    #[serde(rename = "type")]
    event_type: &'a str,
    timestamp: String,
    /// Position of the event within this run, starting at 0.
    seq: u64,
    #[serde(flatten)]
    body: Body,
}

/// Object payloads are inlined; anything else is nested under `data`.
#[derive(Serialize)]
#[serde(untagged)]
enum Body {
    Fields(Map<String, Value>),
    Data { data: Value },
}

impl From<Value> for Body {
    fn from(payload: Value) -> Self {
        match payload {
            Value::Object(fields) => Body::Fields(fields),
            data => Body::Data { data },
        }
    }
}

/// Appends session events to a JSONL file, flushing after each line.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    next_seq: AtomicU64,
    path: PathBuf,
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

impl JsonlConversationLogger {
    /// Open (or create) the log at `path`, creating parent directories.
    ///
    /// Returns `None` if that fails; the caller runs without a conversation
    /// log.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match open_append(path) {
            Ok(file) => Some(Self {
                writer: Mutex::new(BufWriter::new(file)),
                next_seq: AtomicU64::new(0),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!("Could not open conversation log {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line)?;
        writer.flush()
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let line = LogLine {
            event_type: event.event_type,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            body: event.payload.into(),
        };

        let written = serde_json::to_string(&line)
            .map_err(io::Error::from)
            .and_then(|line| self.write_line(&line));
        if let Err(e) = written {
            warn!(event = event.event_type, "Dropped conversation log event: {}", e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        let writer = self.writer.get_mut().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.flush();
    }
}
