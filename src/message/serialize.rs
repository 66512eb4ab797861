//! `Display` formatting for [`Message`], delegating to the zero-copy encoder.

use std::fmt;

use crate::encode::IrcEncode;

use super::types::Message;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        let s = String::from_utf8_lossy(&bytes);
        f.write_str(s.trim_end_matches(['\r', '\n']))
    }
}
