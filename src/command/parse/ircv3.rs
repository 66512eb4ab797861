use super::super::subcommands::{ChatHistorySubCommand, MessageReference};
use super::super::types::Command;
use super::connection::raw;
use crate::error::MessageParseError;

pub(super) fn parse(cmd: &str, args: Vec<&str>) -> Result<Command, MessageParseError> {
    let result = match cmd {
        "CAP" => {
            if args.len() == 1 {
                match args[0].parse() {
                    Ok(c) => Command::CAP(None, c, None, None),
                    Err(_) => raw(cmd, args),
                }
            } else if args.len() == 2 {
                match args[0].parse() {
                    Ok(c) => Command::CAP(None, c, Some(args[1].to_owned()), None),
                    Err(_) => raw(cmd, args),
                }
            } else if args.len() == 3 {
                if let Ok(cmd_parsed) = args[1].parse() {
                    Command::CAP(
                        Some(args[0].to_owned()),
                        cmd_parsed,
                        Some(args[2].to_owned()),
                        None,
                    )
                } else {
                    raw(cmd, args)
                }
            } else if args.len() == 4 {
                if let Ok(cmd_parsed) = args[1].parse() {
                    Command::CAP(
                        Some(args[0].to_owned()),
                        cmd_parsed,
                        Some(args[2].to_owned()),
                        Some(args[3].to_owned()),
                    )
                } else {
                    raw(cmd, args)
                }
            } else {
                raw(cmd, args)
            }
        }
        "AUTHENTICATE" => {
            if args.len() == 1 {
                Command::AUTHENTICATE(args[0].to_owned())
            } else {
                raw(cmd, args)
            }
        }
        "ACCOUNT" => {
            if args.len() == 1 {
                Command::ACCOUNT(args[0].to_owned())
            } else {
                raw(cmd, args)
            }
        }
        "MONITOR" => {
            if args.len() == 2 {
                Command::MONITOR(args[0].to_owned(), Some(args[1].to_owned()))
            } else if args.len() == 1 {
                Command::MONITOR(args[0].to_owned(), None)
            } else {
                raw(cmd, args)
            }
        }
        "BATCH" => {
            if args.len() == 1 {
                Command::BATCH(args[0].to_owned(), None, None)
            } else if args.len() == 2 {
                match args[1].parse() {
                    Ok(sub) => Command::BATCH(args[0].to_owned(), Some(sub), None),
                    Err(_) => raw(cmd, args),
                }
            } else if args.len() > 2 {
                match args[1].parse() {
                    Ok(sub) => Command::BATCH(
                        args[0].to_owned(),
                        Some(sub),
                        Some(args.iter().skip(2).map(|s| s.to_string()).collect()),
                    ),
                    Err(_) => raw(cmd, args),
                }
            } else {
                raw(cmd, args)
            }
        }
        "CHGHOST" => {
            if args.len() == 2 {
                Command::CHGHOST(args[0].to_owned(), args[1].to_owned())
            } else {
                raw(cmd, args)
            }
        }
        "SETNAME" => {
            if args.len() == 1 {
                Command::SETNAME(args[0].to_owned())
            } else {
                raw(cmd, args)
            }
        }
        "TAGMSG" => {
            if args.len() == 1 {
                Command::TAGMSG(args[0].to_owned())
            } else {
                raw(cmd, args)
            }
        }
        "CHATHISTORY" => {
            if args.is_empty() {
                raw(cmd, args)
            } else {
                match args[0].parse::<ChatHistorySubCommand>() {
                    Ok(subcommand) => {
                        let rest = &args[1..];
                        match subcommand {
                            ChatHistorySubCommand::TARGETS => match rest {
                                [r1, r2, limit] => {
                                    match (MessageReference::parse(r1), MessageReference::parse(r2), limit.parse()) {
                                        (Ok(msg_ref1), Ok(msg_ref2), Ok(limit)) => Command::CHATHISTORY {
                                            subcommand,
                                            target: String::new(),
                                            msg_ref1,
                                            msg_ref2: Some(msg_ref2),
                                            limit,
                                        },
                                        _ => raw(cmd, args),
                                    }
                                }
                                _ => raw(cmd, args),
                            },
                            ChatHistorySubCommand::BETWEEN => match rest {
                                [target, r1, r2, limit] => {
                                    match (MessageReference::parse(r1), MessageReference::parse(r2), limit.parse()) {
                                        (Ok(msg_ref1), Ok(msg_ref2), Ok(limit)) => Command::CHATHISTORY {
                                            subcommand,
                                            target: target.to_string(),
                                            msg_ref1,
                                            msg_ref2: Some(msg_ref2),
                                            limit,
                                        },
                                        _ => raw(cmd, args),
                                    }
                                }
                                _ => raw(cmd, args),
                            },
                            _ => match rest {
                                [target, r1, limit] => {
                                    match (MessageReference::parse(r1), limit.parse()) {
                                        (Ok(msg_ref1), Ok(limit)) => Command::CHATHISTORY {
                                            subcommand,
                                            target: target.to_string(),
                                            msg_ref1,
                                            msg_ref2: None,
                                            limit,
                                        },
                                        _ => raw(cmd, args),
                                    }
                                }
                                _ => raw(cmd, args),
                            },
                        }
                    }
                    Err(_) => raw(cmd, args),
                }
            }
        }
        "WEBIRC" => match args.len() {
            4 => Command::WEBIRC(
                args[0].to_owned(),
                args[1].to_owned(),
                args[2].to_owned(),
                args[3].to_owned(),
                None,
            ),
            5 => Command::WEBIRC(
                args[0].to_owned(),
                args[1].to_owned(),
                args[2].to_owned(),
                args[3].to_owned(),
                Some(args[4].to_owned()),
            ),
            _ => raw(cmd, args),
        },
        _ => unreachable!("ircv3::parse called with non-ircv3 command: {}", cmd),
    };

    Ok(result)
}
