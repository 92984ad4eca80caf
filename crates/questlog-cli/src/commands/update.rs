//! Release check. Reports whether a newer version exists; downloading and
//! installing are out of scope.

use anyhow::{Result, anyhow};
use questlog_observe::Observer;
use questlog_store::Store;
use std::path::Path;
use std::time::Duration;

const RELEASES_URL: &str = "https://api.github.com/repos/questlog/questlog/releases/latest";

pub fn run_update(data_dir: &Path, observer: &Observer) -> Result<()> {
    let store = Store::new(data_dir)?;
    let local = store.local_version();
    match fetch_remote_version(RELEASES_URL) {
        Ok(remote) => {
            observer.log(&format!("update check: local={local} remote={remote}"))?;
            if newer_than(&remote, &local) {
                println!("New version {remote} available (installed: {local}).");
            } else {
                println!("questlog is up to date ({local}).");
            }
        }
        Err(err) => {
            observer.warn(&format!("update check failed: {err}"));
            println!("Failed to check updates: {err}");
        }
    }
    Ok(())
}

fn fetch_remote_version(url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .user_agent("questlog")
        .timeout(Duration::from_secs(10))
        .build()?;
    let body: serde_json::Value = client.get(url).send()?.error_for_status()?.json()?;
    body.get("tag_name")
        .and_then(|v| v.as_str())
        .map(|tag| tag.trim_start_matches('v').to_string())
        .ok_or_else(|| anyhow!("release document has no tag_name"))
}

/// Same ordering the original updater used: plain lexicographic comparison
/// of the version strings.
fn newer_than(remote: &str, local: &str) -> bool {
    remote > local
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_versions_compare_greater() {
        assert!(newer_than("0.2.0", "0.1.0"));
        assert!(!newer_than("0.1.0", "0.1.0"));
        assert!(!newer_than("0.0.9", "0.1.0"));
    }
}
