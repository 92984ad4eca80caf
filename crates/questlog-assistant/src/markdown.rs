//! Minimal markdown-to-styled-run rendering for chat display.
//!
//! [`render`] is a pure function of the visible-text snapshot; the chat
//! surface replaces its previous output with the new run sequence on every
//! call, so the same input must always produce the same runs.

/// Style tag for a contiguous run of rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Bold,
    Italic,
    Code,
    /// Header depth 1-3.
    Header(u8),
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub style: Style,
}

/// Render a visible-text snapshot into styled runs.
///
/// Block level: headers (`#`, depth capped at 3) and bullet lists
/// (`- `/`* `/`+ ` replaced with a bullet glyph, one blank separator on
/// the first transition into list mode). Everything else goes through the
/// inline pass.
pub fn render(visible: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut list_mode = false;

    for line in visible.split('\n') {
        let stripped = line.trim_start();
        if stripped.starts_with('#') {
            list_mode = false;
            let depth = stripped.chars().take_while(|c| *c == '#').count().min(3) as u8;
            let text = stripped.trim_start_matches('#').trim();
            push_run(&mut runs, format!("{text}\n"), Style::Header(depth));
            continue;
        }

        if let Some(item) = list_item(line) {
            if !list_mode {
                list_mode = true;
                push_run(&mut runs, "\n".to_string(), Style::Plain);
            }
            push_run(&mut runs, format!("\u{2022} {item}\n"), Style::List);
            continue;
        }
        list_mode = false;

        render_inline(line, &mut runs);
        push_run(&mut runs, "\n".to_string(), Style::Plain);
    }
    runs
}

fn list_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("+ "))
}

/// Inline pass over one line. At each position the kinds are tried in
/// order (bold, italic, code) and a kind only matches when both its
/// delimiters are present on the line; otherwise it falls through and the
/// remainder is emitted as literal text.
fn render_inline(line: &str, runs: &mut Vec<StyledRun>) {
    let mut pos = 0;
    while pos < line.len() {
        // Bold: **text**
        if let Some(start) = line[pos..].find("**") {
            let start = pos + start;
            if let Some(end) = line[start + 2..].find("**") {
                let end = start + 2 + end;
                push_run(runs, line[pos..start].to_string(), Style::Plain);
                push_run(runs, line[start + 2..end].to_string(), Style::Bold);
                pos = end + 2;
                continue;
            }
        }

        // Italic: *text* or _text_. The opening delimiter is whichever of
        // the two occurs first, and the closing delimiter is whichever
        // occurs first after it; mismatched pairs like *text_ are a valid
        // span under this rule.
        if let Some(start) = find_either(line, pos, '*', '_') {
            if let Some(end) = find_either(line, start + 1, '*', '_') {
                push_run(runs, line[pos..start].to_string(), Style::Plain);
                push_run(runs, line[start + 1..end].to_string(), Style::Italic);
                pos = end + 1;
                continue;
            }
        }

        // Inline code: `text`
        if let Some(start) = line[pos..].find('`') {
            let start = pos + start;
            if let Some(end) = line[start + 1..].find('`') {
                let end = start + 1 + end;
                push_run(runs, line[pos..start].to_string(), Style::Plain);
                push_run(runs, line[start + 1..end].to_string(), Style::Code);
                pos = end + 1;
                continue;
            }
        }

        push_run(runs, line[pos..].to_string(), Style::Plain);
        break;
    }
}

/// Earliest occurrence of either delimiter at or after `from`.
fn find_either(line: &str, from: usize, a: char, b: char) -> Option<usize> {
    if from >= line.len() {
        return None;
    }
    let first_a = line[from..].find(a).map(|i| from + i);
    let first_b = line[from..].find(b).map(|i| from + i);
    match (first_a, first_b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    }
}

fn push_run(runs: &mut Vec<StyledRun>, text: String, style: Style) {
    if !text.is_empty() {
        runs.push(StyledRun { text, style });
    }
}
