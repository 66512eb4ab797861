//! User and channel mode parsing and representation.

mod bitset;
mod parse;
mod types;

pub use self::bitset::{ChannelModeSet, UserModeSet};
pub use self::types::{ChannelMode, Mode, ModeType, UserMode};
