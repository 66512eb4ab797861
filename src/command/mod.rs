
mod parse;
pub mod ref_enum;
pub mod subcommands;
mod types;

pub use ref_enum::CommandRefEnum;
pub use subcommands::{BatchSubCommand, CapSubCommand};
pub use types::{Command, CommandRef};

