use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

pub const HISTORY_CAPACITY: usize = 10;

/// Events pushed to connected panels over `/ws/events`.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum PanelEvent {
    Log(LogEntry),
    RecordingProgress { percent: f64, remaining_secs: f64 },
    RecordingDone,
    RecordingFailed,
    Scanning { active: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    Info,
    Warn,
    Success,
    Error,
}

#[derive(Clone, Debug, Serialize)]
pub struct LogEntry {
    pub time: String,
    pub message: String,
    pub level: LogLevel,
}

/// The panel's scrolling log feed: append-only, second-resolution
/// timestamps, cleared destructively on request. Entries are mirrored
/// into `tracing` and broadcast to live panels.
#[derive(Clone)]
pub struct LogFeed {
    entries: Arc<RwLock<Vec<LogEntry>>>,
    events: broadcast::Sender<PanelEvent>,
}

impl LogFeed {
    pub fn new(events: broadcast::Sender<PanelEvent>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            events,
        }
    }

    pub fn push(&self, message: impl Into<String>, level: LogLevel) {
        let message = message.into();
        match level {
            LogLevel::Error => tracing::error!("{message}"),
            LogLevel::Warn => tracing::warn!("{message}"),
            _ => tracing::info!("{message}"),
        }
        let entry = LogEntry {
            time: Local::now().format("%H:%M:%S").to_string(),
            message,
            level,
        };
        self.entries.write().expect("log feed poisoned").push(entry.clone());
        let _ = self.events.send(PanelEvent::Log(entry));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(message, LogLevel::Info);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.push(message, LogLevel::Warn);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(message, LogLevel::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(message, LogLevel::Error);
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.read().expect("log feed poisoned").clone()
    }

    /// Destructive, unrecoverable, and deliberately unconfirmed.
    pub fn clear(&self) {
        self.entries.write().expect("log feed poisoned").clear();
        self.info("LOG CLEARED");
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct HistoryEntry {
    pub species: String,
    pub confidence: f64,
    pub time: String,
}

/// Bounded most-recent-first list of past detections. The oldest entry
/// is evicted once the list grows past `HISTORY_CAPACITY`.
#[derive(Clone, Default)]
pub struct DetectionHistory {
    entries: Arc<RwLock<VecDeque<HistoryEntry>>>,
}

impl DetectionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, species: &str, confidence: f64) {
        let entry = HistoryEntry {
            species: species.to_uppercase(),
            confidence,
            time: Local::now().format("%H:%M").to_string(),
        };
        let mut guard = self.entries.write().expect("history poisoned");
        guard.push_front(entry);
        while guard.len() > HISTORY_CAPACITY {
            guard.pop_back();
        }
    }

    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries
            .read()
            .expect("history poisoned")
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("history poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
