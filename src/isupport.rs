//! RPL_ISUPPORT (005) token parsing and construction.
//!
//! # Reference
//! - ISUPPORT: <https://modern.ircdocs.horse/#isupport-parameters>

/// A single `key[=value]` ISUPPORT token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IsupportEntry<'a> {
    /// The token name, e.g. `CHANTYPES`.
    pub key: &'a str,
    /// The token value, if any.
    pub value: Option<&'a str>,
}

/// A parsed set of RPL_ISUPPORT tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Isupport<'a> {
    entries: Vec<IsupportEntry<'a>>,
}

impl<'a> Isupport<'a> {
    /// Parse ISUPPORT tokens from a raw parameter list.
    ///
    /// Stops at the first trailing (`:`-prefixed) parameter, which on the
    /// wire is the human-readable "are supported by this server" suffix.
    pub fn parse_params(params: &[&'a str]) -> Self {
        let mut entries = Vec::with_capacity(params.len());
        for &p in params {
            if p.starts_with(':') {
                break;
            }
            if p.is_empty() {
                continue;
            }
            let (k, v) = if let Some(eq) = p.find('=') {
                (&p[..eq], Some(&p[eq + 1..]))
            } else {
                (p, None)
            };

            entries.push(IsupportEntry { key: k, value: v });
        }
        Isupport { entries }
    }

    /// Parse from the raw args of an RPL_ISUPPORT message, skipping the
    /// leading nickname parameter and trailing human-readable suffix.
    pub fn from_response_args(args: &[&'a str]) -> Option<Self> {
        if args.is_empty() {
            return None;
        }

        let mut tokens = &args[1..];

        if let Some(last) = tokens.last() {
            if last.contains(' ') {
                tokens = &tokens[..tokens.len().saturating_sub(1)];
            }
        }
        Some(Self::parse_params(tokens))
    }

    /// Extract ISUPPORT tokens from an owned [`Message`](crate::Message), if
    /// it is an RPL_ISUPPORT response.
    pub fn from_message(msg: &'a crate::Message) -> Option<Self> {
        match &msg.command {
            crate::command::Command::Response(crate::response::Response::RPL_ISUPPORT, a) => {
                let borrowed: Vec<&'a str> = a.iter().map(|s| s.as_str()).collect();
                Self::from_response_args(&borrowed)
            }
            _ => None,
        }
    }

    /// Iterate over the parsed tokens in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &IsupportEntry<'a>> {
        self.entries.iter()
    }

    /// Look up a token by key (case-insensitive), last occurrence wins.
    pub fn get(&self, key: &str) -> Option<Option<&'a str>> {
        self.entries
            .iter()
            .rfind(|e| e.key.eq_ignore_ascii_case(key))
            .map(|e| e.value)
    }

    /// The `CASEMAPPING` token value, if present.
    pub fn casemapping(&self) -> Option<&'a str> {
        self.get("CASEMAPPING").flatten()
    }

    /// The `CHANTYPES` token value, if present.
    pub fn chantypes(&self) -> Option<&'a str> {
        self.get("CHANTYPES").flatten()
    }

    /// The `NETWORK` token value, if present.
    pub fn network(&self) -> Option<&'a str> {
        self.get("NETWORK").flatten()
    }

    /// The parsed `PREFIX` token, if present and well-formed.
    pub fn prefix(&self) -> Option<PrefixSpec<'a>> {
        self.get("PREFIX").flatten().and_then(PrefixSpec::parse)
    }

    /// The parsed `CHANMODES` token, if present and well-formed.
    pub fn chanmodes(&self) -> Option<ChanModes<'a>> {
        self.get("CHANMODES").flatten().and_then(ChanModes::parse)
    }

    /// Whether the server advertises `EXCEPTS`.
    pub fn has_excepts(&self) -> bool {
        self.get("EXCEPTS").is_some()
    }

    /// The ban-exception mode character, if `EXCEPTS` carries one.
    pub fn excepts_mode(&self) -> Option<char> {
        self.get("EXCEPTS").flatten().and_then(|s| s.chars().next())
    }

    /// Whether the server advertises `INVEX`.
    pub fn has_invex(&self) -> bool {
        self.get("INVEX").is_some()
    }

    /// The invite-exception mode character, if `INVEX` carries one.
    pub fn invex_mode(&self) -> Option<char> {
        self.get("INVEX").flatten().and_then(|s| s.chars().next())
    }

    /// The parsed `TARGMAX` token, if present.
    pub fn targmax(&self) -> Option<TargMax<'a>> {
        self.get("TARGMAX").flatten().and_then(TargMax::parse)
    }

    /// The parsed `MAXLIST` token, if present.
    pub fn maxlist(&self) -> Option<MaxList> {
        self.get("MAXLIST").flatten().and_then(MaxList::parse)
    }
}

/// A parsed `PREFIX=(modes)symbols` token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrefixSpec<'a> {
    /// The channel mode letters, e.g. `ov`.
    pub modes: &'a str,
    /// The corresponding status symbols, e.g. `@+`.
    pub prefixes: &'a str,
}

impl<'a> PrefixSpec<'a> {
    /// Parse a `(modes)symbols` value, or a bare symbol string with no modes.
    pub fn parse(s: &'a str) -> Option<Self> {
        if let Some(open) = s.find('(') {
            if let Some(close) = s[open + 1..].find(')') {
                let close = open + 1 + close;
                let modes = &s[open + 1..close];
                let prefixes = &s[close + 1..];
                if !modes.is_empty() && !prefixes.is_empty() {
                    return Some(PrefixSpec { modes, prefixes });
                }
            }
        } else if !s.is_empty() {
            return Some(PrefixSpec {
                modes: "",
                prefixes: s,
            });
        }
        None
    }
}

/// A parsed `CHANMODES=A,B,C,D` token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChanModes<'a> {
    /// Type A: modes that add/remove an address to a list (e.g. ban).
    pub a: &'a str,
    /// Type B: modes that always take a parameter.
    pub b: &'a str,
    /// Type C: modes that take a parameter only when set.
    pub c: &'a str,
    /// Type D: modes that never take a parameter.
    pub d: &'a str,
}

impl<'a> ChanModes<'a> {
    /// Parse the four comma-separated mode-letter groups.
    pub fn parse(s: &'a str) -> Option<Self> {
        let mut parts = s.splitn(4, ',');
        let (a, b, c, d) = (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
        Some(ChanModes { a, b, c, d })
    }
}

/// A parsed `TARGMAX=cmd:limit,...` token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargMax<'a> {
    entries: Vec<(&'a str, Option<usize>)>,
}

impl<'a> TargMax<'a> {
    /// Parse the comma-separated `COMMAND:limit` pairs.
    pub fn parse(s: &'a str) -> Option<Self> {
        if s.is_empty() {
            return Some(TargMax {
                entries: Vec::new(),
            });
        }
        let mut entries = Vec::new();
        for part in s.split(',') {
            if part.is_empty() {
                continue;
            }
            if let Some(colon) = part.find(':') {
                let (cmd, num) = (&part[..colon], &part[colon + 1..]);
                let val = num.parse::<usize>().ok();
                if !cmd.is_empty() {
                    entries.push((cmd, val));
                }
            } else {
                entries.push((part, None));
            }
        }
        Some(TargMax { entries })
    }

    /// Look up the limit for a given command, if advertised.
    pub fn get(&self, cmd: &str) -> Option<Option<usize>> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(cmd))
            .map(|(_, v)| *v)
    }

    /// Iterate over `(command, limit)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Option<usize>)> + '_ {
        self.entries.iter().copied()
    }
}

/// A parsed `MAXLIST=modes:limit,...` token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaxList {
    entries: Vec<(char, usize)>,
}

impl MaxList {
    /// Parse the comma-separated `modes:limit` groups.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return Some(MaxList {
                entries: Vec::new(),
            });
        }
        let mut entries: Vec<(char, usize)> = Vec::new();
        for part in s.split(',') {
            if part.is_empty() {
                continue;
            }
            let (modes, limit_str) = part.split_once(':')?;
            let limit: usize = match limit_str.parse() {
                Ok(n) => n,
                Err(_) => continue,
            };
            for ch in modes.chars() {
                entries.retain(|(c, _)| *c != ch);
                entries.push((ch, limit));
            }
        }
        Some(MaxList { entries })
    }

    /// The list limit for a given mode character, if advertised.
    pub fn limit_for(&self, mode: char) -> Option<usize> {
        self.entries
            .iter()
            .rev()
            .find(|(c, _)| *c == mode)
            .map(|(_, n)| *n)
    }

    /// Iterate over `(mode, limit)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.entries.iter().copied()
    }
}

/// A builder for constructing an RPL_ISUPPORT token string, for servers.
#[derive(Debug, Clone, Default)]
pub struct IsupportBuilder {
    tokens: Vec<String>,
}

impl IsupportBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Add a `NETWORK=name` token.
    pub fn network(mut self, name: &str) -> Self {
        self.tokens.push(format!("NETWORK={}", name));
        self
    }

    /// Add a `CHANTYPES=types` token.
    pub fn chantypes(mut self, types: &str) -> Self {
        self.tokens.push(format!("CHANTYPES={}", types));
        self
    }

    /// Add a `CHANMODES=a,b,c,d` token.
    pub fn chanmodes(mut self, modes: &str) -> Self {
        self.tokens.push(format!("CHANMODES={}", modes));
        self
    }

    /// Add a `PREFIX=(letters)symbols` token.
    pub fn prefix(mut self, symbols: &str, letters: &str) -> Self {
        self.tokens.push(format!("PREFIX=({}){}", letters, symbols));
        self
    }

    /// Add a `CASEMAPPING=mapping` token.
    pub fn casemapping(mut self, mapping: &str) -> Self {
        self.tokens.push(format!("CASEMAPPING={}", mapping));
        self
    }

    /// Add a `MAXCHANNELS=count` token.
    pub fn max_channels(mut self, count: u32) -> Self {
        self.tokens.push(format!("MAXCHANNELS={}", count));
        self
    }

    /// Add a `NICKLEN=len` token.
    pub fn max_nick_length(mut self, len: u32) -> Self {
        self.tokens.push(format!("NICKLEN={}", len));
        self
    }

    /// Add a `TOPICLEN=len` token.
    pub fn max_topic_length(mut self, len: u32) -> Self {
        self.tokens.push(format!("TOPICLEN={}", len));
        self
    }

    /// Add a `MODES=count` token.
    pub fn modes_count(mut self, count: u32) -> Self {
        self.tokens.push(format!("MODES={}", count));
        self
    }

    /// Add a `STATUSMSG=symbols` token.
    pub fn status_msg(mut self, symbols: &str) -> Self {
        self.tokens.push(format!("STATUSMSG={}", symbols));
        self
    }

    /// Add an `EXCEPTS[=mode]` token.
    pub fn excepts(mut self, mode_char: Option<char>) -> Self {
        if let Some(c) = mode_char {
            self.tokens.push(format!("EXCEPTS={}", c));
        } else {
            self.tokens.push("EXCEPTS".to_string());
        }
        self
    }

    /// Add an `INVEX[=mode]` token.
    pub fn invex(mut self, mode_char: Option<char>) -> Self {
        if let Some(c) = mode_char {
            self.tokens.push(format!("INVEX={}", c));
        } else {
            self.tokens.push("INVEX".to_string());
        }
        self
    }

    /// Add an arbitrary `key[=value]` token.
    pub fn custom(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(v) = value {
            self.tokens.push(format!("{}={}", key, v));
        } else {
            self.tokens.push(key.to_string());
        }
        self
    }

    /// Join all tokens into a single space-separated string.
    pub fn build(self) -> String {
        self.tokens.join(" ")
    }

    /// Split the tokens across multiple lines, at most `max_per_line` per
    /// line, for servers that must emit several RPL_ISUPPORT messages.
    pub fn build_lines(self, max_per_line: usize) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = Vec::new();

        for token in self.tokens {
            current.push(token);
            if current.len() >= max_per_line {
                lines.push(current.join(" "));
                current.clear();
            }
        }

        if !current.is_empty() {
            lines.push(current.join(" "));
        }

        lines
    }
}
