//! Live debate terminal I/O: operator commands in, debate events out.

mod command;
mod printer;

pub use command::DebateCommand;
pub use printer::DebatePrinter;
