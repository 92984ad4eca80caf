use anyhow::Result;
use clap::{Parser, Subcommand};
use questlog_observe::Observer;
use std::path::PathBuf;

mod commands;
mod output;

use commands::admin::{run_character, run_config_show, run_config_show_thinking, run_version};
use commands::chat::run_chat;
use commands::tasks::{
    run_task_add, run_task_delete, run_task_edit, run_task_finish, run_task_list,
};
use commands::update::run_update;

#[derive(Parser)]
#[command(name = "questlog")]
#[command(
    about = "Task manager with character progression and a local AI assistant",
    long_about = None
)]
struct Cli {
    /// Override the data directory (default: ~/.questlog).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging to stderr.
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant (streams from a local Ollama endpoint).
    Chat,
    /// Task operations.
    Task {
        #[command(subcommand)]
        command: TaskCmd,
    },
    /// Show character level and completion count.
    Character,
    /// Show or change settings.
    Config {
        #[command(subcommand)]
        command: ConfigCmd,
    },
    /// Check whether a newer release is available (no download).
    Update,
    /// Print the installed version.
    Version,
}

#[derive(Subcommand)]
enum TaskCmd {
    /// Add a task. The date accepts loosely-punctuated MMDDYY / MMDDYYYY.
    Add {
        name: String,
        date: String,
        priority: String,
    },
    /// List tasks grouped by due state.
    List,
    /// Finish the first task with this exact name (counts toward leveling).
    Finish { name: String },
    /// Delete every task with this exact name.
    Delete { name: String },
    /// Replace the first task matching OLD_NAME.
    Edit {
        old_name: String,
        new_name: String,
        date: String,
        priority: String,
    },
}

#[derive(Subcommand)]
enum ConfigCmd {
    /// Print the current settings.
    Show,
    /// Show or hide the model's thinking spans in chat.
    ShowThinking {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(questlog_core::data_dir);
    let mut observer = Observer::new(&data_dir)?;
    observer.set_verbose(cli.verbose);

    match cli.command {
        Commands::Chat => run_chat(&data_dir, &observer),
        Commands::Task { command } => match command {
            TaskCmd::Add {
                name,
                date,
                priority,
            } => run_task_add(&data_dir, &name, &date, &priority),
            TaskCmd::List => run_task_list(&data_dir),
            TaskCmd::Finish { name } => run_task_finish(&data_dir, &name),
            TaskCmd::Delete { name } => run_task_delete(&data_dir, &name),
            TaskCmd::Edit {
                old_name,
                new_name,
                date,
                priority,
            } => run_task_edit(&data_dir, &old_name, &new_name, &date, &priority),
        },
        Commands::Character => run_character(&data_dir),
        Commands::Config { command } => match command {
            ConfigCmd::Show => run_config_show(&data_dir),
            ConfigCmd::ShowThinking { state } => {
                run_config_show_thinking(&data_dir, state == "on")
            }
        },
        Commands::Update => run_update(&data_dir, &observer),
        Commands::Version => run_version(&data_dir),
    }
}
