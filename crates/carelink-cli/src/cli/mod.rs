pub mod commands;
pub mod output;

pub use commands::{run, CliCommand};
pub use output::{event_line, to_json};
