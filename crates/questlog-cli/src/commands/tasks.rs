//! Manual task operations. These go through the same dispatcher as
//! model-issued commands, so validation, duplicate-name semantics and
//! leveling behave identically on both paths.

use crate::output::{RED, RESET, YELLOW};
use anyhow::Result;
use chrono::NaiveDate;
use questlog_assistant::{Command, Dispatcher};
use questlog_core::Task;
use questlog_store::Store;
use std::path::Path;

pub fn run_task_add(data_dir: &Path, name: &str, date: &str, priority: &str) -> Result<()> {
    apply(
        data_dir,
        Command::Add {
            name: name.to_string(),
            date: date.to_string(),
            priority: priority.to_string(),
        },
    )
}

pub fn run_task_finish(data_dir: &Path, name: &str) -> Result<()> {
    apply(
        data_dir,
        Command::Finish {
            name: name.to_string(),
        },
    )
}

pub fn run_task_delete(data_dir: &Path, name: &str) -> Result<()> {
    apply(
        data_dir,
        Command::Delete {
            name: name.to_string(),
        },
    )
}

pub fn run_task_edit(
    data_dir: &Path,
    old_name: &str,
    new_name: &str,
    date: &str,
    priority: &str,
) -> Result<()> {
    apply(
        data_dir,
        Command::Edit {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
            date: date.to_string(),
            priority: priority.to_string(),
        },
    )
}

fn apply(data_dir: &Path, command: Command) -> Result<()> {
    let store = Store::new(data_dir)?;
    let mut character = store.load_character()?;
    let mut dispatcher = Dispatcher::new(&store, &mut character);
    let message = dispatcher.apply(&command)?;
    println!("{message}");
    Ok(())
}

/// List tasks grouped by due state: overdue first (red), then due today
/// (yellow), then upcoming.
pub fn run_task_list(data_dir: &Path) -> Result<()> {
    let store = Store::new(data_dir)?;
    let tasks = store.load_tasks()?;
    if tasks.is_empty() {
        println!("no tasks");
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    let (overdue, due_today, upcoming) = classify(&tasks, today);

    for task in &overdue {
        println!("{RED}{}{RESET}", format_row(task));
    }
    for task in &due_today {
        println!("{YELLOW}{}{RESET}", format_row(task));
    }
    for task in &upcoming {
        println!("{}", format_row(task));
    }
    println!("\n{} remaining", tasks.len());
    Ok(())
}

fn format_row(task: &Task) -> String {
    format!("{:<40} {}  p{}", task.name, task.due, task.priority)
}

fn classify(tasks: &[Task], today: NaiveDate) -> (Vec<Task>, Vec<Task>, Vec<Task>) {
    let mut overdue = Vec::new();
    let mut due_today = Vec::new();
    let mut upcoming = Vec::new();
    for task in tasks {
        match task.due_date() {
            Some(due) if due < today => overdue.push(task.clone()),
            Some(due) if due == today => due_today.push(task.clone()),
            _ => upcoming.push(task.clone()),
        }
    }
    overdue.sort_by_key(|t| (t.due_date(), t.priority));
    due_today.sort_by_key(|t| t.priority);
    upcoming.sort_by_key(|t| (t.due_date(), t.priority));
    (overdue, due_today, upcoming)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, due: &str, priority: u8) -> Task {
        Task {
            name: name.into(),
            due: due.into(),
            priority,
        }
    }

    #[test]
    fn tasks_are_classified_by_due_state() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 20).expect("date");
        let tasks = vec![
            task("late", "05-19-2025", 2),
            task("now", "05-20-2025", 1),
            task("soon", "05-21-2025", 3),
        ];
        let (overdue, due_today, upcoming) = classify(&tasks, today);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].name, "late");
        assert_eq!(due_today.len(), 1);
        assert_eq!(due_today[0].name, "now");
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].name, "soon");
    }

    #[test]
    fn overdue_is_ordered_earliest_first() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 20).expect("date");
        let tasks = vec![
            task("later-overdue", "05-19-2025", 1),
            task("oldest", "05-01-2025", 5),
        ];
        let (overdue, _, _) = classify(&tasks, today);
        assert_eq!(overdue[0].name, "oldest");
        assert_eq!(overdue[1].name, "later-overdue");
    }

    #[test]
    fn manual_operations_share_dispatcher_semantics() {
        let dir = tempfile::tempdir().expect("tempdir");
        run_task_add(dir.path(), "Buy milk", "5/25/24", "3").expect("add");
        let store = Store::new(dir.path()).expect("store");
        let tasks = store.load_tasks().expect("load");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].due, "05-25-2024", "date normalized on the way in");

        run_task_finish(dir.path(), "Buy milk").expect("finish");
        assert!(store.load_tasks().expect("load").is_empty());
        assert_eq!(store.load_character().expect("load").tasks_completed, 1);
    }

    #[test]
    fn invalid_manual_input_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(run_task_add(dir.path(), "Bad", "not-a-date", "3").is_err());
        assert!(run_task_add(dir.path(), "Bad", "05-25-2024", "7").is_err());
        let store = Store::new(dir.path()).expect("store");
        assert!(store.load_tasks().expect("load").is_empty());
    }
}
