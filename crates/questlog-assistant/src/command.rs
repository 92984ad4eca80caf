//! Extraction and parsing of `<command>...</command>` spans from model
//! output.
//!
//! Spans are parsed into a closed [`Command`] before any effectful
//! dispatch, so the set of operations is exhaustiveness-checked. Date and
//! priority fields stay raw here; validation happens at dispatch time.

use questlog_core::AssistantError;
use regex::Regex;
use std::sync::LazyLock;

static COMMAND_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<command>(.*?)</command>").expect("valid command regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        name: String,
        date: String,
        priority: String,
    },
    Finish {
        name: String,
    },
    Delete {
        name: String,
    },
    Edit {
        old_name: String,
        new_name: String,
        date: String,
        priority: String,
    },
}

impl Command {
    /// Parse one span's inner text. Fields are split on `;` and trimmed;
    /// the first field, lowercased, selects the kind. A wrong field count
    /// or unknown kind is a [`AssistantError::MalformedCommand`].
    pub fn parse(span: &str) -> Result<Self, AssistantError> {
        let parts: Vec<&str> = span.split(';').map(str::trim).collect();
        let action = parts[0].to_lowercase();
        match action.as_str() {
            "add" => {
                expect_fields(&action, &parts, 4)?;
                Ok(Self::Add {
                    name: parts[1].to_string(),
                    date: parts[2].to_string(),
                    priority: parts[3].to_string(),
                })
            }
            "finish" => {
                expect_fields(&action, &parts, 2)?;
                Ok(Self::Finish {
                    name: parts[1].to_string(),
                })
            }
            "delete" => {
                expect_fields(&action, &parts, 2)?;
                Ok(Self::Delete {
                    name: parts[1].to_string(),
                })
            }
            "edit" => {
                expect_fields(&action, &parts, 5)?;
                Ok(Self::Edit {
                    old_name: parts[1].to_string(),
                    new_name: parts[2].to_string(),
                    date: parts[3].to_string(),
                    priority: parts[4].to_string(),
                })
            }
            other => Err(AssistantError::MalformedCommand(format!(
                "unknown action '{other}'"
            ))),
        }
    }
}

fn expect_fields(action: &str, parts: &[&str], want: usize) -> Result<(), AssistantError> {
    if parts.len() == want {
        Ok(())
    } else {
        Err(AssistantError::MalformedCommand(format!(
            "'{action}' expects {} fields, got {}",
            want - 1,
            parts.len() - 1
        )))
    }
}

/// Find all command spans in the full response text. Returns the display
/// text (all spans removed, surrounding whitespace trimmed) and the inner
/// text of each span in left-to-right order.
pub fn extract_commands(full_text: &str) -> (String, Vec<String>) {
    let spans: Vec<String> = COMMAND_SPAN
        .captures_iter(full_text)
        .map(|cap| cap[1].trim().to_string())
        .collect();
    let display = COMMAND_SPAN.replace_all(full_text, "").trim().to_string();
    (display, spans)
}
