//! The streaming AI-response processor: think-span filtering, incremental
//! markdown rendering, turn lifecycle, and command extraction/dispatch.

pub mod command;
pub mod dispatch;
pub mod markdown;
pub mod prompt;
pub mod think;
pub mod turn;

pub use command::{Command, extract_commands};
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use markdown::{Style, StyledRun, render};
pub use think::ThinkFilter;
pub use turn::{TurnEvent, TurnRunner};
