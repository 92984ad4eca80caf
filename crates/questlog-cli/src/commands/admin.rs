use anyhow::Result;
use questlog_core::AppConfig;
use questlog_store::Store;
use std::path::Path;

pub fn run_character(data_dir: &Path) -> Result<()> {
    let store = Store::new(data_dir)?;
    let character = store.load_character()?;
    let remaining = store.load_tasks()?.len();
    println!("Level: {}", character.level);
    println!("Tasks Completed: {}", character.tasks_completed);
    println!("Tasks Remaining: {remaining}");
    Ok(())
}

pub fn run_config_show(data_dir: &Path) -> Result<()> {
    let cfg = AppConfig::load(data_dir)?;
    println!(
        "settings file: {}",
        AppConfig::settings_path(data_dir).display()
    );
    println!(
        "show thinking: {}",
        if cfg.show_thinking { "on" } else { "off" }
    );
    println!("model: {}", cfg.llm.model);
    println!("endpoint: {}", cfg.llm.endpoint);
    Ok(())
}

pub fn run_config_show_thinking(data_dir: &Path, on: bool) -> Result<()> {
    let mut cfg = AppConfig::load(data_dir)?;
    cfg.show_thinking = on;
    cfg.save(data_dir)?;
    println!("show thinking: {}", if on { "on" } else { "off" });
    Ok(())
}

pub fn run_version(data_dir: &Path) -> Result<()> {
    let store = Store::new(data_dir)?;
    println!("questlog v{}", store.local_version());
    Ok(())
}
