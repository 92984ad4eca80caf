//! The interactive chat loop.
//!
//! One turn at a time: input is accepted, the turn's background worker
//! streams events over its channel, and the loop blocks draining them
//! until the terminal event arrives, at which point the next prompt is
//! read. That drain-until-terminal shape is what guarantees input is
//! re-enabled whether the turn succeeded or failed.

use crate::output::ansi_render;
use anyhow::Result;
use questlog_assistant::{Dispatcher, ThinkFilter, TurnEvent, TurnRunner, prompt::build_prompt};
use questlog_core::{AppConfig, today_string};
use questlog_llm::OllamaClient;
use questlog_observe::Observer;
use questlog_store::Store;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

const GREETING: &str = "Assistant: Hi! I am your personal AI assistant. How can I help you today?";

pub fn run_chat(data_dir: &Path, observer: &Observer) -> Result<()> {
    let cfg = AppConfig::load(data_dir)?;
    let store = Store::new(data_dir)?;
    let mut character = store.load_character()?;
    let client = Arc::new(OllamaClient::new(cfg.llm.clone())?);
    let runner = TurnRunner::new(client);

    println!("{GREETING}");
    println!("(type 'exit' to leave)\n");

    let stdin = std::io::stdin();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let user_text = line.trim();
        if user_text.is_empty() {
            continue;
        }
        if user_text.eq_ignore_ascii_case("exit") || user_text.eq_ignore_ascii_case("quit") {
            break;
        }

        observer.log(&format!("turn started ({} chars)", user_text.len()))?;
        let prompt = build_prompt(user_text, &today_string());
        let rx = runner.start_turn(prompt, cfg.show_thinking);

        println!("Assistant:");
        let mut painted_lines = 0usize;
        for event in rx {
            match event {
                TurnEvent::Render(runs) => {
                    repaint(&mut painted_lines, &ansi_render(&runs))?;
                }
                TurnEvent::Failed(message) => {
                    clear_painted(&mut painted_lines)?;
                    println!("Assistant: {message}");
                    observer.warn(&format!("turn failed: {message}"));
                    break;
                }
                TurnEvent::Completed(full_text) => {
                    clear_painted(&mut painted_lines)?;
                    let mut dispatcher = Dispatcher::new(&store, &mut character);
                    let outcome = dispatcher.extract_and_dispatch(&full_text);
                    let display = final_display(&outcome.display, cfg.show_thinking);
                    if !display.is_empty() {
                        println!("Assistant: {display}");
                    }
                    for report in &outcome.reports {
                        println!("Assistant: {report}");
                    }
                    observer.log(&format!(
                        "turn completed ({} commands)",
                        outcome.reports.len()
                    ))?;
                    break;
                }
            }
        }
        println!();
    }
    Ok(())
}

/// The completed message is command-stripped but otherwise raw; when the
/// thinking setting is off the think span must not resurface here either.
fn final_display(display: &str, show_thinking: bool) -> String {
    let mut filter = ThinkFilter::new(show_thinking);
    filter.filter(display).trim().to_string()
}

/// Replace the previously painted partial render with a fresh one. Every
/// render ends with a newline, so the painted region is a whole number of
/// lines.
fn repaint(painted_lines: &mut usize, rendered: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if *painted_lines > 0 {
        write!(out, "\x1b[{}A\x1b[0J", *painted_lines)?;
    }
    write!(out, "{rendered}")?;
    out.flush()?;
    *painted_lines = rendered.matches('\n').count();
    Ok(())
}

fn clear_painted(painted_lines: &mut usize) -> Result<()> {
    if *painted_lines > 0 {
        let mut out = std::io::stdout().lock();
        write!(out, "\x1b[{}A\x1b[0J", *painted_lines)?;
        out.flush()?;
        *painted_lines = 0;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_display_hides_think_spans_when_setting_is_off() {
        let display = "before <think>reasoning</think> after";
        assert_eq!(final_display(display, false), "before  after");
        assert_eq!(final_display(display, true), "before reasoning after");
    }

    #[test]
    fn final_display_trims_the_spacing_terminator() {
        assert_eq!(final_display("I'll add that.\n\n", false), "I'll add that.");
    }
}
