//! Mode flag types for user and channel modes.

use std::fmt;

/// A single mode change: add, remove, or bare (used when echoing a query).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode<T> {
    /// `+x [arg]`
    Plus(T, Option<String>),
    /// `-x [arg]`
    Minus(T, Option<String>),
    /// `x [arg]` with no leading sign, as seen in some RPL_CHANNELMODEIS replies.
    NoPrefix(T),
}

impl<T> Mode<T> {
    /// The argument carried by this mode change, if any.
    pub fn arg(&self) -> Option<&str> {
        match self {
            Mode::Plus(_, arg) | Mode::Minus(_, arg) => arg.as_deref(),
            Mode::NoPrefix(_) => None,
        }
    }
}

/// Behavior shared by the fixed mode-letter sets (`UserMode`, `ChannelMode`).
pub trait ModeType: Copy + Eq + fmt::Display {
    /// Map a mode letter to its typed representation.
    ///
    /// Unknown letters round-trip as `Unknown(letter)` rather than erroring,
    /// since server-specific mode letters are common in the wild.
    fn from_char(c: char) -> Self;

    /// Whether this mode takes an argument when set (and, for list modes,
    /// when queried too).
    fn takes_arg(&self) -> bool;

    /// Type A modes (lists: ban, exception, ...) may be queried with no
    /// argument even though they take one when actually set.
    fn is_list_mode(&self) -> bool {
        false
    }
}

/// User mode letters (RFC 2812 plus common ircd extensions).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum UserMode {
    /// `i` invisible
    Invisible,
    /// `w` receives wallops
    Wallops,
    /// `o` global operator
    Oper,
    /// `O` local operator
    LocalOper,
    /// `r` registered nick
    Registered,
    /// `a` away
    Away,
    /// `s` receives server notices
    ServerNotice,
    /// `g` only accepts messages from users sharing a channel (caller-id)
    CallerId,
    /// `Q` blocks forwarded messages
    NoForward,
    /// `R` blocks messages from unregistered users
    RegisteredOnly,
    /// `Z` connected via SSL/TLS
    SecureConn,
    /// `x` hidden/cloaked host
    HiddenHost,
    /// `d` deaf (ignores channel messages)
    Deaf,
    /// `h` helper/helpop
    Helper,
    /// `I` hides channel list from WHOIS
    HideChans,
    /// `W` sees whois notifications of self
    WhoisNotify,
    /// `B` marked as bot
    Bot,
    /// Unrecognized mode letter, preserved for round-tripping.
    Unknown(char),
}

impl ModeType for UserMode {
    fn from_char(c: char) -> Self {
        use UserMode::*;
        match c {
            'i' => Invisible,
            'w' => Wallops,
            'o' => Oper,
            'O' => LocalOper,
            'r' => Registered,
            'a' => Away,
            's' => ServerNotice,
            'g' => CallerId,
            'Q' => NoForward,
            'R' => RegisteredOnly,
            'Z' => SecureConn,
            'x' => HiddenHost,
            'd' => Deaf,
            'h' => Helper,
            'I' => HideChans,
            'W' => WhoisNotify,
            'B' => Bot,
            other => Unknown(other),
        }
    }

    fn takes_arg(&self) -> bool {
        false
    }
}

impl fmt::Display for UserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use UserMode::*;
        let c = match self {
            Invisible => 'i',
            Wallops => 'w',
            Oper => 'o',
            LocalOper => 'O',
            Registered => 'r',
            Away => 'a',
            ServerNotice => 's',
            CallerId => 'g',
            NoForward => 'Q',
            RegisteredOnly => 'R',
            SecureConn => 'Z',
            HiddenHost => 'x',
            Deaf => 'd',
            Helper => 'h',
            HideChans => 'I',
            WhoisNotify => 'W',
            Bot => 'B',
            Unknown(c) => *c,
        };
        write!(f, "{}", c)
    }
}

/// Channel mode letters (RFC 2812 plus common ircd extensions).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ChannelMode {
    /// `O` channel creator
    Creator,
    /// `o` channel operator (prefixed nick argument)
    Op,
    /// `v` voice (prefixed nick argument)
    Voice,
    /// `h` halfop (prefixed nick argument)
    HalfOp,
    /// `a` protected/admin (prefixed nick argument)
    Admin,
    /// `p` private
    Private,
    /// `s` secret
    Secret,
    /// `i` invite-only
    InviteOnly,
    /// `t` only ops may set topic
    TopicProtected,
    /// `n` no external messages
    NoExternalMessages,
    /// `m` moderated
    Moderated,
    /// `l` user limit (argument on set, none when unset)
    Limit,
    /// `b` ban mask (list mode)
    Ban,
    /// `e` ban exception (list mode)
    Exception,
    /// `I` invite exception (list mode)
    InviteException,
    /// `k` channel key (argument on set, none when unset)
    Key,
    /// `q` (as a non-prefix mode) quiet mask (list mode) -- some ircds reuse
    /// `q` for both owner and quiet depending on context; kept distinct here.
    Quiet,
    /// `r` registered channel
    RegisteredChannel,
    /// `c` blocks ANSI color codes
    NoColor,
    /// `C` blocks CTCP
    NoCtcp,
    /// `T` blocks NOTICE
    NoNotice,
    /// Unrecognized mode letter, preserved for round-tripping.
    Unknown(char),
}

impl ModeType for ChannelMode {
    fn from_char(c: char) -> Self {
        use ChannelMode::*;
        match c {
            'O' => Creator,
            'o' => Op,
            'v' => Voice,
            'h' => HalfOp,
            'a' => Admin,
            'p' => Private,
            's' => Secret,
            'i' => InviteOnly,
            't' => TopicProtected,
            'n' => NoExternalMessages,
            'm' => Moderated,
            'l' => Limit,
            'b' => Ban,
            'e' => Exception,
            'I' => InviteException,
            'k' => Key,
            'q' => Quiet,
            'r' => RegisteredChannel,
            'c' => NoColor,
            'C' => NoCtcp,
            'T' => NoNotice,
            other => Unknown(other),
        }
    }

    fn takes_arg(&self) -> bool {
        use ChannelMode::*;
        matches!(
            self,
            Op | Voice | HalfOp | Admin | Limit | Ban | Exception | InviteException | Key | Quiet
        )
    }

    fn is_list_mode(&self) -> bool {
        matches!(
            self,
            ChannelMode::Ban | ChannelMode::Exception | ChannelMode::InviteException | ChannelMode::Quiet
        )
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ChannelMode::*;
        let c = match self {
            Creator => 'O',
            Op => 'o',
            Voice => 'v',
            HalfOp => 'h',
            Admin => 'a',
            Private => 'p',
            Secret => 's',
            InviteOnly => 'i',
            TopicProtected => 't',
            NoExternalMessages => 'n',
            Moderated => 'm',
            Limit => 'l',
            Ban => 'b',
            Exception => 'e',
            InviteException => 'I',
            Key => 'k',
            Quiet => 'q',
            RegisteredChannel => 'r',
            NoColor => 'c',
            NoCtcp => 'C',
            NoNotice => 'T',
            Unknown(c) => *c,
        };
        write!(f, "{}", c)
    }
}
