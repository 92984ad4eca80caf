//! Prompt assembly for the generate endpoint.

/// Fixed system instructions, including the four command-syntax examples
/// the model is told to use. The date-format hint in the example matters:
/// the dispatcher tolerates loose punctuation but the model behaves best
/// when shown the canonical form.
const SYSTEM_INSTRUCTIONS: &str = "\
You are a TODO assistant. Use these commands when needed:
<command>add;[task];[date];[priority]</command>
<command>finish;[task]</command>
<command>delete;[task]</command>
<command>edit;[old task];[new task];[new date];[new priority]</command>
DO NOT ADD IN THIS EXAMPLE:
example:(<command>add;Buy milk;05-25-2024;3</command>";

/// Build the full prompt for one turn: system instructions, the current
/// date, and the user's text.
pub fn build_prompt(user_text: &str, today: &str) -> String {
    format!("{SYSTEM_INSTRUCTIONS}\nCurrent time: {today})\nUser: {user_text}")
}
