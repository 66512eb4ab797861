//! Maps the handful of [`Command`] variants that carry fragmentable
//! payload text to and from a single logical payload string.
//!
//! Only `PRIVMSG`, `NOTICE`, `QUIT`, and the `Raw` catch-all (unrecognized
//! commands and unrecognized numerics both parse into [`Command::Raw`])
//! carry a payload worth fragmenting.

use crate::command::Command;

/// Extract the logical payload a [`super::Fragmenter`] would split, if
/// `command` is one of the fragmentable variants.
///
/// For `Raw`, the arguments are pre-joined with `,` into one payload
/// string, re-split by [`finalize_payload`] once reassembly completes.
pub(super) fn extract_payload(command: &Command) -> Option<String> {
    match command {
        Command::PRIVMSG(_, text) => Some(text.clone()),
        Command::NOTICE(_, text) => Some(text.clone()),
        Command::QUIT(msg) => Some(msg.clone().unwrap_or_default()),
        Command::Raw(_, args) => Some(args.join(",")),
        _ => None,
    }
}

/// Rebuild `command` with `chunk` substituted into its payload slot. Used
/// per-fragment by the [`super::Fragmenter`]: for `Raw`, the chunk is a
/// slice of the comma-joined payload and is carried as the command's sole
/// argument until [`finalize_payload`] re-splits it on reassembly.
pub(super) fn apply_chunk(command: &Command, chunk: String) -> Command {
    match command {
        Command::PRIVMSG(target, _) => Command::PRIVMSG(target.clone(), chunk),
        Command::NOTICE(target, _) => Command::NOTICE(target.clone(), chunk),
        Command::QUIT(_) => Command::QUIT(Some(chunk)),
        Command::Raw(name, _) => Command::Raw(name.clone(), vec![chunk]),
        other => other.clone(),
    }
}

/// Rebuild `command` with the fully reassembled payload. Identical to
/// [`apply_chunk`] except for `Raw`, which re-splits the joined payload
/// on `,` to restore the original argument list shape.
pub(super) fn finalize_payload(command: &Command, joined: String) -> Command {
    match command {
        Command::Raw(name, _) => {
            let args = if joined.is_empty() {
                Vec::new()
            } else {
                joined.split(',').map(str::to_owned).collect()
            };
            Command::Raw(name.clone(), args)
        }
        other => apply_chunk(other, joined),
    }
}
