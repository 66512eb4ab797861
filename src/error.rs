//! Error types for the IRC protocol library.
//!
//! This module defines error types for protocol-level errors,
//! message parsing failures, and mode parsing issues.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// Message exceeded maximum allowed length.
    #[error("message too long: {0} bytes")]
    MessageTooLong(usize),

    /// Illegal control character in message.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// Failed to parse an IRC message.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The raw message string.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors encountered when parsing IRC messages.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Message was empty.
    #[error("empty message")]
    EmptyMessage,

    /// Command was invalid or missing.
    #[error("invalid command")]
    InvalidCommand,

    /// Not enough arguments for command.
    #[error("not enough arguments: expected {expected}, got {got}")]
    NotEnoughArguments {
        /// Expected number of arguments.
        expected: usize,
        /// Actual number of arguments.
        got: usize,
    },

    /// An argument was invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Invalid mode argument.
    #[error("invalid mode argument: {0}")]
    InvalidModeArg(String),

    /// Failed to parse mode string.
    #[error("invalid mode string: {string}")]
    InvalidModeString {
        /// The raw mode string.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: ModeParseError,
    },

    /// Invalid subcommand for a command.
    #[error("invalid {cmd} subcommand: {sub}")]
    InvalidSubcommand {
        /// The parent command name.
        cmd: &'static str,
        /// The invalid subcommand.
        sub: String,
    },

    /// Invalid message prefix.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),

    /// Parsing error with detailed context information.
    #[error("parsing failed at position {position}: {context}")]
    ParseContext {
        /// Character position where parsing failed.
        position: usize,
        /// Description of what was being parsed.
        context: String,
        /// Optional source error that caused this failure.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Preserved source error message for Clone support.
        /// When cloning, the boxed error cannot be cloned, but this field
        /// preserves the error message for debugging purposes.
        source_message: Option<String>,
    },
}

impl Clone for MessageParseError {
    fn clone(&self) -> Self {
        match self {
            MessageParseError::EmptyMessage => MessageParseError::EmptyMessage,
            MessageParseError::InvalidCommand => MessageParseError::InvalidCommand,
            MessageParseError::NotEnoughArguments { expected, got } => {
                MessageParseError::NotEnoughArguments {
                    expected: *expected,
                    got: *got,
                }
            }
            MessageParseError::InvalidArgument(s) => MessageParseError::InvalidArgument(s.clone()),
            MessageParseError::UnknownCommand(s) => MessageParseError::UnknownCommand(s.clone()),
            MessageParseError::InvalidModeArg(s) => MessageParseError::InvalidModeArg(s.clone()),
            MessageParseError::InvalidModeString { string, cause } => {
                MessageParseError::InvalidModeString {
                    string: string.clone(),
                    cause: cause.clone(),
                }
            }
            MessageParseError::InvalidSubcommand { cmd, sub } => {
                MessageParseError::InvalidSubcommand {
                    cmd,
                    sub: sub.clone(),
                }
            }
            MessageParseError::InvalidPrefix(s) => MessageParseError::InvalidPrefix(s.clone()),
            MessageParseError::ParseContext {
                position,
                context,
                source,
                source_message,
            } => {
                // We can't clone the boxed error, but we preserve the error message
                let preserved_message = source_message.clone().or_else(|| {
                    source.as_ref().map(|e| e.to_string())
                });
                MessageParseError::ParseContext {
                    position: *position,
                    context: context.clone(),
                    source: None,
                    source_message: preserved_message,
                }
            }
        }
    }
}

/// Errors encountered when parsing mode strings.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum ModeParseError {
    /// Invalid mode modifier character (not + or -).
    #[error("invalid mode modifier: {modifier}")]
    InvalidModeModifier {
        /// The invalid modifier character.
        modifier: char,
    },

    /// Missing mode modifier (+ or -).
    #[error("missing mode modifier")]
    MissingModeModifier,
}

/// Errors encountered while decoding a mixed text/binary frame stream.
///
/// Unlike [`MessageParseError`], [`NeedsMoreData`](FrameError::NeedsMoreData) is
/// not a hard failure: it signals the decoder should be called again once
/// more bytes have arrived, without having consumed anything from the buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FrameError {
    /// The buffer does not yet contain a complete frame. Not fatal.
    #[error("need more data to complete frame")]
    NeedsMoreData,

    /// A DCC binary frame declared a body length beyond what this decoder
    /// will buffer for a single frame. The offending bytes are discarded so
    /// the stream can resync on the next frame.
    #[error("dcc frame body too large: {0} bytes")]
    PayloadTooLarge(usize),
}

/// Errors encountered while splitting a payload into fragments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FragmentError {
    /// The payload could not be split into 65535 or fewer parts at the
    /// configured chunk size.
    #[error("payload requires {0} parts, exceeding the maximum of 65535")]
    TooManyParts(usize),

    /// `fragment` was called with a command that carries no designated
    /// fragmentable payload slot (only `PRIVMSG`, `NOTICE`, `QUIT`, and the
    /// `Raw` catch-all for unrecognized commands/numerics qualify).
    #[error("command {0} carries no fragmentable payload")]
    NotFragmentable(&'static str),
}

/// Errors encountered while reassembling fragments back into a payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReassemblyError {
    /// A fragment's `packetMetadata` tag could not be decoded.
    #[error("corrupted packetMetadata tag: {0}")]
    AcknowledgmentCorrupted(String),

    /// A fragment arrived whose `part_number` was already seen for its
    /// `group_id`, with different contents than the one already buffered.
    #[error("duplicate part {part_number} for group {group_id}")]
    DuplicatePart {
        /// The fragmentation group identifier.
        group_id: String,
        /// The duplicated part number.
        part_number: u16,
    },

    /// Reassembling this fragment would exceed `max_bytes_per_group`.
    #[error("group {group_id} exceeded its byte budget")]
    PayloadTooLarge {
        /// The fragmentation group identifier.
        group_id: String,
    },

    /// Accepting this fragment's group required evicting another
    /// in-progress group to stay within `max_groups` or its TTL.
    #[error("evicted group {evicted_group_id} to bound reassembly cache")]
    MediaCacheEvicted {
        /// The identifier of the group that was evicted.
        evicted_group_id: String,
    },
}
