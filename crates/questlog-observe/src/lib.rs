use anyhow::Result;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only application log in the data directory, with opt-in verbose
/// echo to stderr. Logging failures are swallowed by callers, so the log is
/// never allowed to take down a turn.
pub struct Observer {
    log_path: PathBuf,
    verbose: bool,
}

impl Observer {
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            log_path: data_dir.join("questlog.log"),
            verbose: false,
        })
    }

    /// Enable or disable verbose logging to stderr.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Log a message to the file; echoed to stderr with a `[questlog]`
    /// prefix when verbose mode is on.
    pub fn log(&self, msg: &str) -> Result<()> {
        if self.verbose {
            eprintln!("[questlog] {msg}");
        }
        self.append_log_line(&format!("{} INFO {msg}", Utc::now().to_rfc3339()))
    }

    /// Log a warning; always written to the log file and stderr.
    pub fn warn(&self, msg: &str) {
        eprintln!("[questlog WARN] {msg}");
        let _ = self.append_log_line(&format!("{} WARN {msg}", Utc::now().to_rfc3339()));
    }

    fn append_log_line(&self, line: &str) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(f, "{line}")?;
        Ok(())
    }
}
