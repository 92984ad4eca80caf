use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = anyhow::Result<T>;

/// Date format used everywhere: task records, prompt, display.
pub const DATE_FORMAT: &str = "%m-%d-%Y";

pub const DEFAULT_MODEL: &str = "deepseek-r1:14b";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Resolve the per-user data directory (`~/.questlog`).
pub fn data_dir() -> PathBuf {
    std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .map(|home| Path::new(&home).join(".questlog"))
        .unwrap_or_else(|| PathBuf::from(".questlog"))
}

/// Today's date in the canonical `MM-DD-YYYY` form.
pub fn today_string() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

// ── Domain types ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    /// Due date in `MM-DD-YYYY` form, already validated by [`parse_date`].
    pub due: String,
    pub priority: u8,
}

impl Task {
    pub fn due_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.due, DATE_FORMAT).ok()
    }
}

/// Order tasks by due date ascending, then priority descending.
/// This is the stored order of the task file.
pub fn sort_by_schedule(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| {
        (
            t.due_date().unwrap_or(NaiveDate::MAX),
            std::cmp::Reverse(t.priority),
        )
    });
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub level: u32,
    pub tasks_completed: u32,
}

impl Character {
    /// Record one finished task: every fifth completion gains a level.
    pub fn record_completion(&mut self) {
        self.tasks_completed += 1;
        if self.tasks_completed % 5 == 0 {
            self.level += 1;
        }
    }
}

// ── Date parsing ────────────────────────────────────────────────────────

/// Normalize a loosely-punctuated date into `MM-DD-YYYY`.
///
/// Non-digit characters are stripped, zero-padding single-digit components
/// (`5/20/25` reads as `052025`) so punctuated dates survive the length
/// check; the result must be exactly 6 (`MMDDYY`, assumed 2000s) or 8
/// (`MMDDYYYY`) digits and form a calendar-valid date. Returns `None`
/// otherwise; invalid input never panics or escapes as an error.
pub fn parse_date(raw: &str) -> Option<String> {
    let mut digits = String::new();
    for run in raw.split(|c: char| !c.is_ascii_digit()) {
        if run.is_empty() {
            continue;
        }
        if run.len() == 1 {
            digits.push('0');
        }
        digits.push_str(run);
    }
    if digits.len() != 6 && digits.len() != 8 {
        return None;
    }
    let mm = &digits[..2];
    let dd = &digits[2..4];
    let yyyy = if digits.len() == 6 {
        format!("20{}", &digits[4..6])
    } else {
        digits[4..8].to_string()
    };
    let candidate = format!("{mm}-{dd}-{yyyy}");
    NaiveDate::parse_from_str(&candidate, DATE_FORMAT).ok()?;
    Some(candidate)
}

/// Parse and range-check a task priority (1-5).
pub fn parse_priority(raw: &str) -> Option<u8> {
    let value: u8 = raw.trim().parse().ok()?;
    (1..=5).contains(&value).then_some(value)
}

// ── Error taxonomy ──────────────────────────────────────────────────────

/// Everything that can go wrong inside an assistant turn. Each variant is
/// handled at the boundary where it occurs and rendered into the chat
/// transcript; none of these propagate as a crash.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssistantError {
    #[error("could not connect to the model server. Make sure Ollama is running!")]
    NetworkUnavailable,
    #[error("stream decode error: {0}")]
    StreamDecode(String),
    #[error("{0}")]
    Validation(String),
    #[error("task not found: '{0}'")]
    NotFound(String),
    #[error("malformed command: {0}")]
    MalformedCommand(String),
}

// ── Streaming ───────────────────────────────────────────────────────────

/// A single chunk emitted during streaming.
#[derive(Debug, Clone)]
pub enum StreamChunk {
    /// An incremental text fragment.
    ContentDelta(String),
    /// The stream has ended.
    Done,
}

/// Callback type for receiving streaming chunks.
/// Uses `Arc<dyn Fn>` so it can be cloned across multiple turns in a chat loop.
pub type StreamCallback = std::sync::Arc<dyn Fn(StreamChunk) + Send + Sync>;

// ── Configuration ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub endpoint: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// When false, `<think>...</think>` spans are hidden from chat display.
    /// Decided once per turn, at turn start.
    pub show_thinking: bool,
    pub llm: LlmConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            show_thinking: true,
            llm: LlmConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn settings_path(data_dir: &Path) -> PathBuf {
        data_dir.join("settings.json")
    }

    /// Pre-JSON versions stored only the show-thinking flag, as the literal
    /// string `True` or `False`.
    pub fn legacy_flag_path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.txt")
    }

    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut merged = serde_json::to_value(Self::default())?;

        let legacy = Self::legacy_flag_path(data_dir);
        if legacy.exists() {
            let raw = fs::read_to_string(legacy)?;
            let flag = raw.trim().eq_ignore_ascii_case("true");
            merge_json_value(&mut merged, &serde_json::json!({ "show_thinking": flag }));
        }

        let path = Self::settings_path(data_dir);
        if path.exists() {
            let raw = fs::read_to_string(path)?;
            let overlay: serde_json::Value = serde_json::from_str(&raw)?;
            merge_json_value(&mut merged, &overlay);
        }

        Ok(serde_json::from_value(merged)?)
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        fs::write(
            Self::settings_path(data_dir),
            serde_json::to_vec_pretty(self)?,
        )?;
        Ok(())
    }
}

fn merge_json_value(base: &mut serde_json::Value, overlay: &serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base_obj), serde_json::Value::Object(overlay_obj)) => {
            for (key, overlay_value) in overlay_obj {
                if let Some(base_value) = base_obj.get_mut(key) {
                    merge_json_value(base_value, overlay_value);
                } else {
                    base_obj.insert(key.clone(), overlay_value.clone());
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}
