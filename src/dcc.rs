//! DCC (Direct Client-to-Client) connection negotiation.
//!
//! DCC requests travel as a CTCP `DCC` (or, for the TLS variant, `SDCC`)
//! payload embedded in a PRIVMSG or NOTICE body — see [`crate::ctcp`] for
//! the delimiter-level framing. This module turns that payload into a
//! typed [`DccRequest`] and back, the way [`crate::sasl`] turns SASL
//! mechanism negotiation into typed values instead of leaving it as
//! loose strings.
//!
//! # Reference
//! - DCC CHAT/SEND conventions: <https://modern.ircdocs.horse/dcc.html>

use std::fmt;
use std::net::Ipv4Addr;

use crate::ctcp::{Ctcp, CtcpKind};
use crate::error::MessageParseError;

/// The address half of a DCC offer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum DccAddress {
    /// A legacy DCC address: a 32-bit integer in network byte order, the
    /// conventional (if dated) way to carry an IPv4 address in CTCP text.
    V4(Ipv4Addr),
    /// An extended DCC address (DCC over IPv6, or a hostname), carried
    /// through verbatim.
    Host(String),
}

impl DccAddress {
    fn parse(token: &str) -> Self {
        if let Ok(n) = token.parse::<u32>() {
            return DccAddress::V4(Ipv4Addr::from(n));
        }
        DccAddress::Host(token.to_owned())
    }
}

impl fmt::Display for DccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DccAddress::V4(addr) => write!(f, "{}", u32::from(*addr)),
            DccAddress::Host(h) => f.write_str(h),
        }
    }
}

/// A parsed DCC (or secure SDCC) connection offer.
///
/// `secure` is `true` when the offer arrived as `SDCC` rather than `DCC`,
/// meaning the resulting connection is expected to negotiate TLS.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum DccRequest {
    /// `DCC CHAT chat <address> <port>`
    Chat {
        /// Address to connect to.
        address: DccAddress,
        /// TCP port to connect to.
        port: u16,
        /// Whether this is a secure (SDCC) offer.
        secure: bool,
    },
    /// `DCC SEND <filename> <address> <port> [size]`
    Send {
        /// Name of the file being offered.
        filename: String,
        /// Address to connect to.
        address: DccAddress,
        /// TCP port to connect to.
        port: u16,
        /// File size in bytes, if advertised.
        size: Option<u64>,
        /// Whether this is a secure (SDCC) offer.
        secure: bool,
    },
    /// `DCC RESUME <filename> <port> <position>` - request to resume a
    /// previously offered, partially transferred file.
    Resume {
        /// Name of the file being resumed.
        filename: String,
        /// TCP port of the original offer.
        port: u16,
        /// Byte offset to resume from.
        position: u64,
        /// Whether this is a secure (SDCC) offer.
        secure: bool,
    },
    /// `DCC ACCEPT <filename> <port> <position>` - confirmation of a resume.
    Accept {
        /// Name of the file being resumed.
        filename: String,
        /// TCP port of the original offer.
        port: u16,
        /// Byte offset the sender will resume from.
        position: u64,
        /// Whether this is a secure (SDCC) offer.
        secure: bool,
    },
}

/// Split a DCC parameter string into tokens, honoring `"quoted filenames"`
/// that may themselves contain spaces.
fn tokenize(params: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = params.trim().chars().peekable();

    while chars.peek().is_some() {
        while chars.peek() == Some(&' ') {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        if chars.peek() == Some(&'"') {
            chars.next();
            let mut tok = String::new();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                tok.push(c);
            }
            tokens.push(tok);
        } else {
            let mut tok = String::new();
            while let Some(&c) = chars.peek() {
                if c == ' ' {
                    break;
                }
                tok.push(c);
                chars.next();
            }
            tokens.push(tok);
        }
    }

    tokens
}

impl DccRequest {
    /// Parse the parameters following `DCC`/`SDCC` in a CTCP payload, e.g.
    /// the `SEND report.pdf 3232235777 59001 40960` in
    /// `\x01DCC SEND report.pdf 3232235777 59001 40960\x01`.
    pub fn parse(params: &str, secure: bool) -> Result<Self, MessageParseError> {
        let tokens = tokenize(params);
        let mut it = tokens.iter();
        let kind = it
            .next()
            .ok_or(MessageParseError::NotEnoughArguments {
                expected: 1,
                got: 0,
            })?
            .to_ascii_uppercase();

        let rest: Vec<&str> = it.map(|s| s.as_str()).collect();

        match kind.as_str() {
            "CHAT" => {
                // `DCC CHAT chat <address> <port>` - the first token is
                // conventionally the literal protocol name "chat".
                let args = if rest.first().map(|s| s.eq_ignore_ascii_case("chat")) == Some(true) {
                    &rest[1..]
                } else {
                    &rest[..]
                };
                if args.len() < 2 {
                    return Err(MessageParseError::NotEnoughArguments {
                        expected: 2,
                        got: args.len(),
                    });
                }
                let address = DccAddress::parse(args[0]);
                let port = args[1]
                    .parse()
                    .map_err(|_| MessageParseError::InvalidArgument(args[1].to_owned()))?;
                Ok(DccRequest::Chat {
                    address,
                    port,
                    secure,
                })
            }
            "SEND" => {
                if rest.len() < 3 {
                    return Err(MessageParseError::NotEnoughArguments {
                        expected: 3,
                        got: rest.len(),
                    });
                }
                let filename = rest[0].to_owned();
                let address = DccAddress::parse(rest[1]);
                let port = rest[2]
                    .parse()
                    .map_err(|_| MessageParseError::InvalidArgument(rest[2].to_owned()))?;
                let size = rest.get(3).and_then(|s| s.parse().ok());
                Ok(DccRequest::Send {
                    filename,
                    address,
                    port,
                    size,
                    secure,
                })
            }
            "RESUME" => {
                if rest.len() < 3 {
                    return Err(MessageParseError::NotEnoughArguments {
                        expected: 3,
                        got: rest.len(),
                    });
                }
                let filename = rest[0].to_owned();
                let port = rest[1]
                    .parse()
                    .map_err(|_| MessageParseError::InvalidArgument(rest[1].to_owned()))?;
                let position = rest[2]
                    .parse()
                    .map_err(|_| MessageParseError::InvalidArgument(rest[2].to_owned()))?;
                Ok(DccRequest::Resume {
                    filename,
                    port,
                    position,
                    secure,
                })
            }
            "ACCEPT" => {
                if rest.len() < 3 {
                    return Err(MessageParseError::NotEnoughArguments {
                        expected: 3,
                        got: rest.len(),
                    });
                }
                let filename = rest[0].to_owned();
                let port = rest[1]
                    .parse()
                    .map_err(|_| MessageParseError::InvalidArgument(rest[1].to_owned()))?;
                let position = rest[2]
                    .parse()
                    .map_err(|_| MessageParseError::InvalidArgument(rest[2].to_owned()))?;
                Ok(DccRequest::Accept {
                    filename,
                    port,
                    position,
                    secure,
                })
            }
            other => Err(MessageParseError::InvalidSubcommand {
                cmd: "DCC",
                sub: other.to_owned(),
            }),
        }
    }

    /// Parse a DCC request out of a CTCP message, if its kind is `DCC` or
    /// `SDCC`. Returns `None` for any other CTCP kind.
    pub fn from_ctcp(ctcp: &Ctcp<'_>) -> Option<Result<Self, MessageParseError>> {
        let secure = match ctcp.kind {
            CtcpKind::Dcc => false,
            CtcpKind::Sdcc => true,
            _ => return None,
        };
        Some(Self::parse(ctcp.params.unwrap_or(""), secure))
    }

    /// Whether this offer requested a secure (SDCC/TLS) connection.
    pub fn is_secure(&self) -> bool {
        match self {
            DccRequest::Chat { secure, .. }
            | DccRequest::Send { secure, .. }
            | DccRequest::Resume { secure, .. }
            | DccRequest::Accept { secure, .. } => *secure,
        }
    }
}

fn quote_if_needed(s: &str) -> String {
    if s.contains(' ') {
        format!("\"{}\"", s)
    } else {
        s.to_owned()
    }
}

impl fmt::Display for DccRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DccRequest::Chat { address, port, .. } => {
                write!(f, "CHAT chat {} {}", address, port)
            }
            DccRequest::Send {
                filename,
                address,
                port,
                size,
                ..
            } => {
                write!(f, "SEND {} {} {}", quote_if_needed(filename), address, port)?;
                if let Some(size) = size {
                    write!(f, " {}", size)?;
                }
                Ok(())
            }
            DccRequest::Resume {
                filename,
                port,
                position,
                ..
            } => write!(f, "RESUME {} {} {}", quote_if_needed(filename), port, position),
            DccRequest::Accept {
                filename,
                port,
                position,
                ..
            } => write!(f, "ACCEPT {} {} {}", quote_if_needed(filename), port, position),
        }
    }
}
