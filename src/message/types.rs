//! Owned IRC message representation.

use crate::command::Command;
use crate::prefix::Prefix;

/// A single IRCv3 message tag: `key[=value]`.
///
/// Equality and hashing consider only the key. The IRCv3 message-tags spec
/// treats a tag list as a map keyed by tag name -- a client overwriting
/// `time=...` with a second `time=...` tag is replacing the tag, not adding
/// a duplicate -- so two `Tag`s with the same key collide regardless of
/// value, matching how they'd collide as map entries.
#[derive(Clone, Debug, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag(pub String, pub Option<String>);

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl std::hash::Hash for Tag {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// An owned, parsed IRC message: tags, source, and command.
///
/// There is deliberately no `id` field. Anything that needs to correlate a
/// `Message` with local bookkeeping (a fragmentation group, a pending-ack
/// table) should key off of the IRCv3 `msgid`/`label` tag or keep its own
/// side table -- baking an identity into the type would make it something
/// other than a plain value and would have no wire representation to round
/// back in from a parsed message anyway.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// IRCv3 message tags, if any were present (or added via [`Message::with_tag`]).
    pub tags: Option<Vec<Tag>>,
    /// The message source, if any.
    pub prefix: Option<Prefix>,
    /// The command and its parameters.
    pub command: Command,
}

impl Message {
    /// Build a message from just a command, with no tags or prefix.
    pub fn new(command: Command) -> Message {
        Message {
            tags: None,
            prefix: None,
            command,
        }
    }

    /// `PRIVMSG <target> :<text>`
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Message {
        Message::new(Command::PRIVMSG(target.into(), text.into()))
    }

    /// `NOTICE <target> :<text>`
    pub fn notice(target: impl Into<String>, text: impl Into<String>) -> Message {
        Message::new(Command::NOTICE(target.into(), text.into()))
    }

    /// `JOIN <channel>`
    pub fn join(channel: impl Into<String>) -> Message {
        Message::new(Command::JOIN(channel.into(), None, None))
    }

    /// `NICK <nickname>`
    pub fn nick(nickname: impl Into<String>) -> Message {
        Message::new(Command::NICK(nickname.into()))
    }

    /// `PING <server>`
    pub fn ping(server: impl Into<String>) -> Message {
        Message::new(Command::PING(server.into(), None))
    }

    /// `QUIT [:<message>]`
    pub fn quit(message: Option<impl Into<String>>) -> Message {
        Message::new(Command::QUIT(message.map(Into::into)))
    }

    /// Attach (or overwrite) a tag, returning `self` for chaining.
    ///
    /// A `None` value produces a valueless tag (`key` with no `=value`).
    pub fn with_tag(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Message {
        let tag = Tag(key.into(), value.map(Into::into));
        match &mut self.tags {
            Some(tags) => {
                if let Some(existing) = tags.iter_mut().find(|t| *t == &tag) {
                    *existing = tag;
                } else {
                    tags.push(tag);
                }
            }
            None => self.tags = Some(vec![tag]),
        }
        self
    }

    /// Attach (or overwrite) the message source, returning `self` for chaining.
    pub fn with_prefix(mut self, prefix: Prefix) -> Message {
        self.prefix = Some(prefix);
        self
    }

    /// Look up a tag's value by key. Returns `Some(None)` for a valueless tag
    /// present in the list, and `None` if the tag isn't present at all.
    pub fn tag(&self, key: &str) -> Option<Option<&str>> {
        self.tags
            .as_ref()?
            .iter()
            .find(|t| t.0 == key)
            .map(|t| t.1.as_deref())
    }
}
