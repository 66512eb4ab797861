//! CTCP (Client-to-Client Protocol) message handling.
//!
//! This module provides utilities for parsing and creating CTCP messages,
//! which are embedded within PRIVMSG and NOTICE commands using the
//! `\x01` delimiter character.
//!
//! Structured parsing of `DCC`-kind CTCP payloads (`DCC SEND`, `DCC CHAT`,
//! `DCC RESUME`, and their `SDCC` secure counterparts) into typed
//! [`Command`](crate::command::Command) variants lives in [`crate::dcc`];
//! this module only recognizes the `DCC` CTCP command name and leaves its
//! parameters as raw text.
//!
//! # Reference
//! - CTCP specification: <https://modern.ircdocs.horse/ctcp.html>
//!
//! # Example
//!
//! ```
//! use slirc_proto::ctcp::{Ctcp, CtcpKind};
//!
//! let ctcp = Ctcp::parse("\x01ACTION waves hello\x01").unwrap();
//! assert_eq!(ctcp.kind, CtcpKind::Action);
//! assert_eq!(ctcp.params, Some("waves hello"));
//!
//! let action = Ctcp::action("dances");
//! assert_eq!(action.to_string(), "\x01ACTION dances\x01");
//! ```

use std::fmt;

/// The CTCP delimiter character (`\x01`).
pub(crate) const CTCP_DELIM: char = '\x01';

/// Known CTCP command types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CtcpKind {
    /// ACTION - describes an action performed by the user.
    Action,
    /// VERSION - requests client version information.
    Version,
    /// PING - measures round-trip latency.
    Ping,
    /// TIME - requests local time from the client.
    Time,
    /// USERINFO - requests user-defined information.
    Userinfo,
    /// CLIENTINFO - requests list of supported CTCP commands.
    Clientinfo,
    /// SOURCE - requests source code location.
    Source,
    /// FINGER - requests user information (legacy).
    Finger,
    /// DCC - Direct Client-to-Client connection setup. See [`crate::dcc`]
    /// for structured parsing of the `SEND`/`CHAT`/`RESUME` subcommands.
    Dcc,
    /// SDCC - secure (TLS) variant of DCC negotiation.
    Sdcc,
    /// Unknown or custom CTCP command.
    Unknown(String),
}

impl CtcpKind {
    /// Parse a CTCP command name into a `CtcpKind`.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "ACTION" => Self::Action,
            "VERSION" => Self::Version,
            "PING" => Self::Ping,
            "TIME" => Self::Time,
            "USERINFO" => Self::Userinfo,
            "CLIENTINFO" => Self::Clientinfo,
            "SOURCE" => Self::Source,
            "FINGER" => Self::Finger,
            "DCC" => Self::Dcc,
            "SDCC" => Self::Sdcc,
            _ => Self::Unknown(name.to_owned()),
        }
    }

    /// Returns the canonical uppercase name of this CTCP command.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Action => "ACTION",
            Self::Version => "VERSION",
            Self::Ping => "PING",
            Self::Time => "TIME",
            Self::Userinfo => "USERINFO",
            Self::Clientinfo => "CLIENTINFO",
            Self::Source => "SOURCE",
            Self::Finger => "FINGER",
            Self::Dcc => "DCC",
            Self::Sdcc => "SDCC",
            Self::Unknown(s) => s,
        }
    }
}

impl fmt::Display for CtcpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed CTCP message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ctcp<'a> {
    /// The CTCP command type.
    pub kind: CtcpKind,
    /// Optional parameters following the command.
    pub params: Option<&'a str>,
}

impl<'a> Ctcp<'a> {
    /// Parse a CTCP message from a PRIVMSG/NOTICE body.
    ///
    /// Returns `None` if the message is not a valid CTCP message.
    pub fn parse(text: &'a str) -> Option<Self> {
        let text = text.strip_prefix(CTCP_DELIM)?;
        let text = text.strip_suffix(CTCP_DELIM).unwrap_or(text);

        if text.is_empty() {
            return None;
        }

        let (command, params) = match text.find(' ') {
            Some(pos) => {
                let params = &text[pos + 1..];
                (
                    &text[..pos],
                    if params.is_empty() {
                        None
                    } else {
                        Some(params)
                    },
                )
            }
            None => (text, None),
        };

        Some(Self {
            kind: CtcpKind::parse(command),
            params,
        })
    }

    /// Check if a message body contains a CTCP message.
    #[inline]
    pub fn is_ctcp(text: &str) -> bool {
        text.starts_with(CTCP_DELIM)
    }

    /// Create an ACTION CTCP message.
    pub fn action(text: &'a str) -> Self {
        Self {
            kind: CtcpKind::Action,
            params: Some(text),
        }
    }

    /// Create a VERSION request.
    pub fn version() -> Self {
        Self {
            kind: CtcpKind::Version,
            params: None,
        }
    }

    /// Create a VERSION reply.
    pub fn version_reply(version: &'a str) -> Self {
        Self {
            kind: CtcpKind::Version,
            params: Some(version),
        }
    }

    /// Create a PING request with a timestamp.
    pub fn ping(timestamp: &'a str) -> Self {
        Self {
            kind: CtcpKind::Ping,
            params: Some(timestamp),
        }
    }

    /// Create a TIME reply.
    pub fn time_reply(time: &'a str) -> Self {
        Self {
            kind: CtcpKind::Time,
            params: Some(time),
        }
    }

    /// Create a CLIENTINFO reply listing supported commands.
    pub fn clientinfo_reply(commands: &'a str) -> Self {
        Self {
            kind: CtcpKind::Clientinfo,
            params: Some(commands),
        }
    }

    /// Create a custom CTCP message.
    pub fn custom(command: &str, params: Option<&'a str>) -> Self {
        Self {
            kind: CtcpKind::parse(command),
            params,
        }
    }
}

impl fmt::Display for Ctcp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x01{}", self.kind)?;
        if let Some(params) = self.params {
            write!(f, " {}", params)?;
        }
        write!(f, "\x01")
    }
}

/// An owned version of `Ctcp` for when lifetime management is needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CtcpOwned {
    /// The CTCP command type.
    pub kind: CtcpKind,
    /// Optional parameters following the command.
    pub params: Option<String>,
}

impl CtcpOwned {
    /// Parse a CTCP message from a PRIVMSG/NOTICE body.
    pub fn parse(text: &str) -> Option<Self> {
        Ctcp::parse(text).map(|c| Self {
            kind: c.kind,
            params: c.params.map(|s| s.to_owned()),
        })
    }

    /// Create an ACTION CTCP message.
    pub fn action(text: impl Into<String>) -> Self {
        Self {
            kind: CtcpKind::Action,
            params: Some(text.into()),
        }
    }

    /// Create a VERSION request.
    pub fn version() -> Self {
        Self {
            kind: CtcpKind::Version,
            params: None,
        }
    }

    /// Create a VERSION reply.
    pub fn version_reply(version: impl Into<String>) -> Self {
        Self {
            kind: CtcpKind::Version,
            params: Some(version.into()),
        }
    }

    /// Create a PING request with a timestamp.
    pub fn ping(timestamp: impl Into<String>) -> Self {
        Self {
            kind: CtcpKind::Ping,
            params: Some(timestamp.into()),
        }
    }
}

impl fmt::Display for CtcpOwned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x01{}", self.kind)?;
        if let Some(ref params) = self.params {
            write!(f, " {}", params)?;
        }
        write!(f, "\x01")
    }
}
