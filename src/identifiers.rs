//! Typed, canonicalized domain identifiers.
//!
//! [`crate::command::Command`] and [`crate::prefix::Prefix`] carry
//! identifiers as plain `String`s for the parser/encoder's sake, but a
//! caller building a client or server on top of this engine wants
//! validated values with IRC case-folded equality, not ad hoc string
//! comparisons scattered through its own code. This module provides that:
//! [`Nickname`], [`ChannelName`], [`UserId`], and [`Recipient`], each
//! validated once at construction (`Validation is total` -- every
//! constructor here either yields a valid value or fails).

use std::fmt;

use crate::casemap::irc_to_lower;
use crate::validation::{self, ValidationError};

/// A validated nickname, optionally paired with a device id.
///
/// The device id models a single account presenting several concurrent
/// sessions (e.g. a bouncer fanning one account out to multiple attached
/// clients) under variant nicknames that should still compare as "the
/// same underlying nick" when the device id matches.
///
/// Equality and hashing fold `name` per IRC case-folding
/// ([`irc_to_lower`]: `[]\~` maps to `{}|^` before lowercasing) and compare
/// `device_id` verbatim, so `"ALICE[1]"` and `"alice{1}"` with the same
/// `device_id` compare equal.
#[derive(Clone, Debug)]
pub struct Nickname {
    name: String,
    device_id: Option<String>,
}

/// Maximum nickname length this crate accepts, widened from the classic
/// RFC 2812 default (9, commonly raised via ISUPPORT `NICKLEN`) to give
/// headroom for the multi-device naming schemes `device_id` supports.
pub const MAX_NICKNAME_LEN: usize = 1024;

/// Minimum nickname length.
pub const MIN_NICKNAME_LEN: usize = 2;

impl Nickname {
    /// Validate and construct a nickname.
    ///
    /// `name` must be 2..=1024 characters, start with a letter or one of
    /// `` []\`_^{|} ``, and contain only those characters, digits, or `-`
    /// thereafter.
    pub fn new(name: impl Into<String>, device_id: Option<String>) -> Result<Self, ValidationError> {
        Self::construct(name, device_id, false)
    }

    /// Like [`Nickname::new`], additionally rejecting nicknames that
    /// contain an underscore (some networks reserve trailing underscores
    /// for auto-renamed ghosted nicks and want callers to avoid picking
    /// one that looks auto-generated).
    pub fn new_rejecting_underscore(
        name: impl Into<String>,
        device_id: Option<String>,
    ) -> Result<Self, ValidationError> {
        Self::construct(name, device_id, true)
    }

    fn construct(
        name: impl Into<String>,
        device_id: Option<String>,
        reject_underscore: bool,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let len = name.chars().count();
        if len < MIN_NICKNAME_LEN {
            return Err(ValidationError::TooShort {
                min: MIN_NICKNAME_LEN,
                actual: len,
            });
        }
        validation::validate_nickname_with_max_len(&name, MAX_NICKNAME_LEN)?;
        if reject_underscore {
            if let Some(position) = name.find('_') {
                return Err(ValidationError::InvalidChar {
                    ch: '_',
                    position,
                });
            }
        }
        Ok(Self { name, device_id })
    }

    /// The nickname as originally cased.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The associated device id, if any.
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// The IRC case-folded canonical form of `name`.
    pub fn folded(&self) -> String {
        irc_to_lower(&self.name)
    }
}

impl PartialEq for Nickname {
    fn eq(&self, other: &Self) -> bool {
        self.folded() == other.folded() && self.device_id == other.device_id
    }
}

impl Eq for Nickname {}

impl std::hash::Hash for Nickname {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.folded().hash(state);
        self.device_id.hash(state);
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A validated IRC channel name.
///
/// Equality and hashing use the same case-folding as [`Nickname`].
#[derive(Clone, Debug)]
pub struct ChannelName {
    name: String,
}

impl ChannelName {
    /// Validate and construct a channel name.
    ///
    /// `name` must be 3..=50 characters, start with one of `#&+!`, and its
    /// body must contain no BEL (0x07), SPACE (0x20), or COMMA (0x2C).
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let len = name.chars().count();
        if len < 3 {
            return Err(ValidationError::TooShort { min: 3, actual: len });
        }
        validation::validate_channel_name_with_max_len(&name, 50)?;
        Ok(Self { name })
    }

    /// The channel name as originally cased.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The IRC case-folded canonical form of `name`.
    pub fn folded(&self) -> String {
        irc_to_lower(&self.name)
    }
}

impl PartialEq for ChannelName {
    fn eq(&self, other: &Self) -> bool {
        self.folded() == other.folded()
    }
}

impl Eq for ChannelName {}

impl std::hash::Hash for ChannelName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.folded().hash(state);
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A parsed `nick[!user][@host]` user identifier.
///
/// Parsed greedily: the *last* `@` in the string separates the host from
/// everything before it, and within that pre-host region, `!` separates
/// the nick from the user. This differs from [`crate::prefix::Prefix`],
/// which splits on the first `@`/`!` for the common case and treats
/// anything unparseable as a bare server name; `UserId` is a stricter
/// typed parse of an identifier already known to be a user reference
/// (e.g. a `WHOIS`/`KICK` target), not a message source that might be a
/// server.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserId {
    /// The nickname portion.
    pub nick: String,
    /// The username (ident) portion, if present.
    pub user: Option<String>,
    /// The hostname portion, if present.
    pub host: Option<String>,
}

impl UserId {
    /// Parse `nick[!user][@host]`.
    ///
    /// Only the nick portion is validated (non-empty); `user` and `host`
    /// are carried verbatim since hostmasks used in targets like
    /// `WHOIS`/`KICK` may contain wildcards (`*`, `?`) that are not
    /// themselves legal nickname or hostname characters.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let (pre_host, host) = match s.rfind('@') {
            Some(at) => (&s[..at], Some(s[at + 1..].to_owned())),
            None => (s, None),
        };

        let (nick, user) = match pre_host.find('!') {
            Some(bang) => (pre_host[..bang].to_owned(), Some(pre_host[bang + 1..].to_owned())),
            None => (pre_host.to_owned(), None),
        };

        if nick.is_empty() {
            return Err(ValidationError::Empty);
        }

        Ok(UserId { nick, user, host })
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nick)?;
        if let Some(user) = &self.user {
            write!(f, "!{user}")?;
        }
        if let Some(host) = &self.host {
            write!(f, "@{host}")?;
        }
        Ok(())
    }
}

/// The target of a `PRIVMSG`/`NOTICE`: a channel, a nickname, or the
/// literal `*` ("all").
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Recipient {
    /// A channel target.
    Channel(ChannelName),
    /// A nickname target.
    Nick(String),
    /// The literal `*` target.
    All,
}

impl Recipient {
    /// Parse a single recipient token (one element of a comma-separated
    /// recipient list).
    ///
    /// A leading `#&+!` makes it a channel (validated via
    /// [`ChannelName::new`]); `*` is [`Recipient::All`]; anything else is
    /// carried as a bare nickname string rather than a validated
    /// [`Nickname`], since recipient lists may also address non-nick
    /// targets some networks support (host masks, services aliases).
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        if token == "*" {
            return Ok(Recipient::All);
        }
        if token.starts_with(['#', '&', '+', '!']) {
            return Ok(Recipient::Channel(ChannelName::new(token)?));
        }
        Ok(Recipient::Nick(token.to_owned()))
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Channel(c) => write!(f, "{c}"),
            Recipient::Nick(n) => write!(f, "{n}"),
            Recipient::All => write!(f, "*"),
        }
    }
}
