//! Applies parsed commands against the task store and character sheet.
//!
//! Each command span is dispatched independently: a validation failure,
//! missing task, or malformed span produces one transcript report and the
//! remaining spans are still processed.

use crate::command::{Command, extract_commands};
use anyhow::Result;
use questlog_core::{AssistantError, Character, Task, parse_date, parse_priority, sort_by_schedule};
use questlog_store::Store;

/// Result of processing one full response: the prose left for display and
/// one transcript report per command span, in span order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub display: String,
    pub reports: Vec<String>,
}

pub struct Dispatcher<'a> {
    store: &'a Store,
    character: &'a mut Character,
}

impl<'a> Dispatcher<'a> {
    pub fn new(store: &'a Store, character: &'a mut Character) -> Self {
        Self { store, character }
    }

    /// Strip command spans from the response, then apply each in order.
    /// Per-command failures become reports, never early exits.
    pub fn extract_and_dispatch(&mut self, full_text: &str) -> DispatchOutcome {
        let (display, spans) = extract_commands(full_text);
        let reports = spans
            .iter()
            .map(|span| match self.run_span(span) {
                Ok(msg) => msg,
                Err(err) => format!("Error processing command: {err}"),
            })
            .collect();
        DispatchOutcome { display, reports }
    }

    fn run_span(&mut self, span: &str) -> Result<String> {
        let command = Command::parse(span)?;
        self.apply(&command)
    }

    /// Apply one command, returning its success message.
    pub fn apply(&mut self, command: &Command) -> Result<String> {
        match command {
            Command::Add {
                name,
                date,
                priority,
            } => {
                let due = parse_date(date)
                    .ok_or_else(|| AssistantError::Validation("invalid date format".into()))?;
                let priority = parse_priority(priority).ok_or_else(|| {
                    AssistantError::Validation("priority must be 1-5".into())
                })?;
                let mut tasks = self.store.load_tasks()?;
                tasks.push(Task {
                    name: name.clone(),
                    due,
                    priority,
                });
                sort_by_schedule(&mut tasks);
                self.store.replace_all(&tasks)?;
                Ok(format!("Task '{name}' added successfully!"))
            }
            Command::Finish { name } => {
                let mut tasks = self.store.load_tasks()?;
                // First exact-name match only.
                let index = tasks
                    .iter()
                    .position(|t| t.name == *name)
                    .ok_or_else(|| AssistantError::NotFound(name.clone()))?;
                tasks.remove(index);
                self.character.record_completion();
                self.store.save_character(self.character)?;
                self.store.replace_all(&tasks)?;
                Ok(format!("Task '{name}' completed!"))
            }
            Command::Delete { name } => {
                let tasks = self.store.load_tasks()?;
                // Unlike finish, delete removes every exact-name match.
                let remaining: Vec<_> =
                    tasks.iter().filter(|t| t.name != *name).cloned().collect();
                if remaining.len() == tasks.len() {
                    return Err(AssistantError::NotFound(name.clone()).into());
                }
                self.store.replace_all(&remaining)?;
                Ok(format!("Task '{name}' deleted!"))
            }
            Command::Edit {
                old_name,
                new_name,
                date,
                priority,
            } => {
                let due = parse_date(date)
                    .ok_or_else(|| AssistantError::Validation("invalid new date format".into()))?;
                let priority = parse_priority(priority).ok_or_else(|| {
                    AssistantError::Validation("priority must be 1-5".into())
                })?;
                let mut tasks = self.store.load_tasks()?;
                let index = tasks
                    .iter()
                    .position(|t| t.name == *old_name)
                    .ok_or_else(|| AssistantError::NotFound(old_name.clone()))?;
                tasks[index] = Task {
                    name: new_name.clone(),
                    due,
                    priority,
                };
                self.store.replace_all(&tasks)?;
                Ok("Task updated successfully!".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questlog_core::Task;

    fn fixture() -> (tempfile::TempDir, Store, Character) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Store::new(dir.path()).expect("store");
        (dir, store, Character::default())
    }

    fn seed(store: &Store, tasks: &[(&str, &str, u8)]) {
        let tasks: Vec<Task> = tasks
            .iter()
            .map(|(name, due, priority)| Task {
                name: name.to_string(),
                due: due.to_string(),
                priority: *priority,
            })
            .collect();
        store.replace_all(&tasks).expect("seed");
    }

    #[test]
    fn add_command_applies_and_leaves_display_prose() {
        let (_dir, store, mut character) = fixture();
        let mut dispatcher = Dispatcher::new(&store, &mut character);

        let outcome = dispatcher
            .extract_and_dispatch("I'll add that.\n<command>add;Buy milk;5-25-2024;3</command>");

        assert_eq!(outcome.display, "I'll add that.");
        assert_eq!(outcome.reports, ["Task 'Buy milk' added successfully!"]);
        let tasks = store.load_tasks().expect("load");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Buy milk");
        assert_eq!(tasks[0].due, "05-25-2024");
        assert_eq!(tasks[0].priority, 3);
    }

    #[test]
    fn added_tasks_are_kept_in_schedule_order() {
        let (_dir, store, mut character) = fixture();
        seed(&store, &[("Later", "06-01-2024", 2)]);
        let mut dispatcher = Dispatcher::new(&store, &mut character);

        dispatcher.extract_and_dispatch("<command>add;Sooner;05-25-2024;3</command>");

        let names: Vec<String> = store
            .load_tasks()
            .expect("load")
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["Sooner", "Later"]);
    }

    #[test]
    fn finish_removes_first_match_and_levels_up() {
        let (_dir, store, mut character) = fixture();
        character.tasks_completed = 4;
        seed(
            &store,
            &[("Dup", "05-20-2024", 1), ("Dup", "05-25-2024", 2)],
        );
        let mut dispatcher = Dispatcher::new(&store, &mut character);

        let outcome = dispatcher.extract_and_dispatch("<command>finish;Dup</command>");

        assert_eq!(outcome.reports, ["Task 'Dup' completed!"]);
        let tasks = store.load_tasks().expect("load");
        assert_eq!(tasks.len(), 1, "only the first match is removed");
        assert_eq!(character.tasks_completed, 5);
        assert_eq!(character.level, 1);
        assert_eq!(store.load_character().expect("load"), character);
    }

    #[test]
    fn delete_removes_every_match() {
        let (_dir, store, mut character) = fixture();
        seed(
            &store,
            &[
                ("Dup", "05-20-2024", 1),
                ("Keep", "05-22-2024", 3),
                ("Dup", "05-25-2024", 2),
            ],
        );
        let mut dispatcher = Dispatcher::new(&store, &mut character);

        dispatcher.extract_and_dispatch("<command>delete;Dup</command>");

        let names: Vec<String> = store
            .load_tasks()
            .expect("load")
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["Keep"]);
        assert_eq!(character.tasks_completed, 0, "delete is not a completion");
    }

    #[test]
    fn edit_replaces_the_first_match_in_place() {
        let (_dir, store, mut character) = fixture();
        seed(&store, &[("Old", "05-20-2024", 1)]);
        let mut dispatcher = Dispatcher::new(&store, &mut character);

        let outcome =
            dispatcher.extract_and_dispatch("<command>edit;Old;New;06-01-2024;4</command>");

        assert_eq!(outcome.reports, ["Task updated successfully!"]);
        let tasks = store.load_tasks().expect("load");
        assert_eq!(tasks[0].name, "New");
        assert_eq!(tasks[0].due, "06-01-2024");
        assert_eq!(tasks[0].priority, 4);
    }

    #[test]
    fn missing_task_reports_not_found_without_mutation() {
        let (_dir, store, mut character) = fixture();
        seed(&store, &[("Keep", "05-20-2024", 1)]);
        let mut dispatcher = Dispatcher::new(&store, &mut character);

        let outcome = dispatcher.extract_and_dispatch("<command>finish;Ghost</command>");

        assert_eq!(outcome.reports.len(), 1);
        assert!(outcome.reports[0].contains("task not found"));
        assert_eq!(store.load_tasks().expect("load").len(), 1);
        assert_eq!(character.tasks_completed, 0);
    }

    #[test]
    fn invalid_date_or_priority_reports_and_does_not_apply() {
        let (_dir, store, mut character) = fixture();
        let mut dispatcher = Dispatcher::new(&store, &mut character);

        let outcome = dispatcher.extract_and_dispatch(
            "<command>add;Bad;13-40-2024;3</command><command>add;AlsoBad;05-25-2024;9</command>",
        );

        assert_eq!(outcome.reports.len(), 2);
        assert!(outcome.reports[0].contains("invalid date format"));
        assert!(outcome.reports[1].contains("priority must be 1-5"));
        assert!(store.load_tasks().expect("load").is_empty());
    }

    #[test]
    fn malformed_span_does_not_block_its_siblings() {
        let (_dir, store, mut character) = fixture();
        seed(&store, &[("X", "05-20-2024", 2)]);
        let mut dispatcher = Dispatcher::new(&store, &mut character);

        let outcome = dispatcher.extract_and_dispatch(
            "<command>add;MissingFields</command>\n<command>finish;X</command>",
        );

        assert_eq!(outcome.reports.len(), 2);
        assert!(outcome.reports[0].contains("Error processing command"));
        assert_eq!(outcome.reports[1], "Task 'X' completed!");
        assert!(store.load_tasks().expect("load").is_empty());
    }

    #[test]
    fn every_span_is_attempted_in_order() {
        let (_dir, store, mut character) = fixture();
        let mut dispatcher = Dispatcher::new(&store, &mut character);

        let outcome = dispatcher.extract_and_dispatch(
            "one <command>add;A;05-20-2024;1</command> two \
             <command>add;B;05-21-2024;2</command> three \
             <command>finish;A</command>",
        );

        assert!(!outcome.display.contains("<command>"));
        assert_eq!(outcome.display, "one  two  three");
        assert_eq!(outcome.reports.len(), 3);
        assert_eq!(outcome.reports[0], "Task 'A' added successfully!");
        assert_eq!(outcome.reports[1], "Task 'B' added successfully!");
        assert_eq!(outcome.reports[2], "Task 'A' completed!");
    }
}
