//! IRC message prefix (source) representation.

/// The source of a message: either a server name, or a client identified by
/// nickname and optionally user/host.
///
/// Mirrors the `irc` crate's `Prefix` type, which this crate's conventions
/// are modeled on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Prefix {
    /// A bare server name, e.g. `irc.example.net`.
    ServerName(String),
    /// A client source: nickname, username, hostname. `user`/`host` are
    /// empty strings when absent from the wire form (`nick`, `nick@host`,
    /// `nick!user@host` all round-trip through this one variant).
    Nickname(String, String, String),
}

impl Prefix {
    /// Parse a prefix string (as it appears after the leading `:`, without
    /// that colon) into a `Prefix`.
    ///
    /// There's no failure mode here: anything that isn't clearly a
    /// `nick[!user][@host]` triple is treated as a server name, since
    /// RFC 2812 draws that same distinction only by the presence of `.` in
    /// practice and servers are free to pick arbitrary names.
    pub fn new_from_str(s: &str) -> Prefix {
        match (s.find('!'), s.find('@')) {
            (Some(i), Some(j)) if i < j => Prefix::Nickname(
                s[..i].to_owned(),
                s[i + 1..j].to_owned(),
                s[j + 1..].to_owned(),
            ),
            (None, Some(j)) => Prefix::Nickname(s[..j].to_owned(), String::new(), s[j + 1..].to_owned()),
            (Some(i), None) => Prefix::Nickname(s[..i].to_owned(), s[i + 1..].to_owned(), String::new()),
            _ => {
                if is_valid_prefix_str(s) && !s.contains('.') && !s.contains(':') {
                    Prefix::Nickname(s.to_owned(), String::new(), String::new())
                } else {
                    Prefix::ServerName(s.to_owned())
                }
            }
        }
    }

    /// The nickname, if this is a client prefix.
    pub fn nickname(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, ..) => Some(nick),
            Prefix::ServerName(_) => None,
        }
    }
}

/// A borrowed view of a prefix, carrying the original slice for zero-copy
/// re-encoding alongside convenient accessors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixRef<'a> {
    /// The raw prefix text (without the leading `:`).
    pub raw: &'a str,
    /// Byte offset of `!`, if present.
    bang: Option<usize>,
    /// Byte offset of `@`, if present (and after `bang`, if both present).
    at: Option<usize>,
}

impl<'a> PrefixRef<'a> {
    /// Parse a borrowed prefix from its raw wire text.
    pub fn parse(raw: &'a str) -> PrefixRef<'a> {
        let bang = raw.find('!');
        let at = match (bang, raw.find('@')) {
            (Some(i), Some(j)) if j > i => Some(j),
            (None, Some(j)) => Some(j),
            _ => None,
        };
        PrefixRef { raw, bang, at }
    }

    /// The nickname or server name portion (everything before `!`/`@`).
    pub fn nick_or_server(&self) -> &'a str {
        match (self.bang, self.at) {
            (Some(i), _) => &self.raw[..i],
            (None, Some(j)) => &self.raw[..j],
            (None, None) => self.raw,
        }
    }

    /// The username portion, if present.
    pub fn user(&self) -> Option<&'a str> {
        match (self.bang, self.at) {
            (Some(i), Some(j)) => Some(&self.raw[i + 1..j]),
            (Some(i), None) => Some(&self.raw[i + 1..]),
            _ => None,
        }
    }

    /// The hostname portion, if present.
    pub fn host(&self) -> Option<&'a str> {
        self.at.map(|j| &self.raw[j + 1..])
    }

    /// Materialize this borrowed prefix into an owned [`Prefix`].
    pub fn to_owned_prefix(&self) -> Prefix {
        Prefix::new_from_str(self.raw)
    }
}

/// Whether a string is a syntactically plausible prefix component (nickname
/// or server name): non-empty and free of spaces and protocol-structural
/// characters.
pub fn is_valid_prefix_str(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(|c| c == ' ' || c == '\r' || c == '\n' || c == '\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_nick_user_host() {
        let p = Prefix::new_from_str("nick!user@host");
        assert_eq!(
            p,
            Prefix::Nickname("nick".into(), "user".into(), "host".into())
        );
    }

    #[test]
    fn parses_server_name() {
        let p = Prefix::new_from_str("irc.example.net");
        assert_eq!(p, Prefix::ServerName("irc.example.net".into()));
    }

    #[test]
    fn parses_bare_nick() {
        let p = Prefix::new_from_str("nick");
        assert_eq!(p, Prefix::Nickname("nick".into(), String::new(), String::new()));
    }

    #[test]
    fn display_round_trips() {
        let p = Prefix::new_from_str("nick!user@host");
        assert_eq!(p.to_string(), "nick!user@host");
    }

    #[test]
    fn prefix_ref_splits_components() {
        let r = PrefixRef::parse("nick!user@host");
        assert_eq!(r.nick_or_server(), "nick");
        assert_eq!(r.user(), Some("user"));
        assert_eq!(r.host(), Some("host"));
    }
}
