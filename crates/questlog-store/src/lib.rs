//! Flat-file persistence for tasks, character progress and the local
//! version stamp.
//!
//! Every file lives in the questlog data directory and is rewritten in
//! full on change; records are small and a whole-file replace is atomic
//! enough for this scope.

use anyhow::Result;
use questlog_core::{Character, Task, sort_by_schedule};
use std::fs;
use std::path::{Path, PathBuf};

const FIELD_SEPARATOR: &str = " | ";

pub struct Store {
    pub root: PathBuf,
    todo_path: PathBuf,
    character_path: PathBuf,
    version_path: PathBuf,
}

impl Store {
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            root: data_dir.to_path_buf(),
            todo_path: data_dir.join("todo.txt"),
            character_path: data_dir.join("character.txt"),
            version_path: data_dir.join("version.txt"),
        })
    }

    /// Load all tasks, sorted by due date then descending priority.
    /// Records with the wrong field count or an unparsable priority are
    /// skipped rather than failing the whole load.
    pub fn load_tasks(&self) -> Result<Vec<Task>> {
        if !self.todo_path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.todo_path)?;
        let mut tasks = Vec::new();
        for line in raw.lines() {
            let parts: Vec<&str> = line.trim().split(FIELD_SEPARATOR).collect();
            if parts.len() != 3 {
                continue;
            }
            let Ok(priority) = parts[2].trim().parse::<u8>() else {
                continue;
            };
            tasks.push(Task {
                name: parts[0].to_string(),
                due: parts[1].to_string(),
                priority,
            });
        }
        sort_by_schedule(&mut tasks);
        Ok(tasks)
    }

    /// Rewrite the whole task file from the given list.
    pub fn replace_all(&self, tasks: &[Task]) -> Result<()> {
        let mut out = String::new();
        for task in tasks {
            out.push_str(&format!(
                "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}\n",
                task.name, task.due, task.priority
            ));
        }
        fs::write(&self.todo_path, out)?;
        Ok(())
    }

    pub fn load_character(&self) -> Result<Character> {
        if !self.character_path.exists() {
            return Ok(Character::default());
        }
        let raw = fs::read_to_string(&self.character_path)?;
        let parts: Vec<&str> = raw.trim().split(FIELD_SEPARATOR).collect();
        if parts.len() != 2 {
            return Ok(Character::default());
        }
        Ok(Character {
            level: parts[0].trim().parse().unwrap_or(0),
            tasks_completed: parts[1].trim().parse().unwrap_or(0),
        })
    }

    pub fn save_character(&self, character: &Character) -> Result<()> {
        fs::write(
            &self.character_path,
            format!(
                "{}{FIELD_SEPARATOR}{}",
                character.level, character.tasks_completed
            ),
        )?;
        Ok(())
    }

    /// Locally installed version, from `version.txt`.
    pub fn local_version(&self) -> String {
        fs::read_to_string(&self.version_path)
            .map(|raw| raw.trim().to_string())
            .unwrap_or_else(|_| "0.0.0 (dev)".to_string())
    }
}
