//! `FromStr` for the owned [`Message`] type.

use std::str::FromStr;

use crate::command::Command;
use crate::error::MessageParseError;
use crate::prefix::Prefix;

use super::nom_parser::ParsedMessage;
use super::tags::unescape_tag_value;
use super::types::{Message, Tag};

fn parse_tags(raw: &str) -> Vec<Tag> {
    raw.split(';')
        .filter(|kv| !kv.is_empty())
        .map(|kv| match kv.split_once('=') {
            Some((k, v)) => Tag(k.to_owned(), Some(unescape_tag_value(v))),
            None => Tag(kv.to_owned(), None),
        })
        .collect()
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Message, MessageParseError> {
        if s.is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let trimmed = s.trim_end_matches(['\r', '\n']);
        let parsed = ParsedMessage::parse(trimmed).map_err(|_| MessageParseError::InvalidCommand)?;

        let tags = parsed.tags.map(parse_tags);
        let prefix = parsed.prefix.map(Prefix::new_from_str);
        let command = Command::new(parsed.command, parsed.params)?;

        Ok(Message {
            tags,
            prefix,
            command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_privmsg() {
        let msg: Message = "PRIVMSG #channel :Hello, world!".parse().unwrap();
        assert_eq!(
            msg.command,
            Command::PRIVMSG("#channel".into(), "Hello, world!".into())
        );
        assert!(msg.tags.is_none());
        assert!(msg.prefix.is_none());
    }

    #[test]
    fn parses_tags_and_prefix() {
        let msg: Message = "@time=2023-01-01T00:00:00Z;msgid=abc123 :nick!user@host PRIVMSG #ch :hi"
            .parse()
            .unwrap();
        let tags = msg.tags.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], Tag("time".into(), Some("2023-01-01T00:00:00Z".into())));
        assert_eq!(tags[1], Tag("msgid".into(), Some("abc123".into())));
        assert_eq!(
            msg.prefix,
            Some(Prefix::Nickname("nick".into(), "user".into(), "host".into()))
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert!("".parse::<Message>().is_err());
    }

    #[test]
    fn valueless_tag_round_trips() {
        let msg: Message = "@+example-client-tag-name :irc.example.com NOTICE #ch :hi"
            .parse()
            .unwrap();
        let tags = msg.tags.unwrap();
        assert_eq!(tags[0], Tag("+example-client-tag-name".into(), None));
    }
}
