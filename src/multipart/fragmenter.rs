//! Splits an oversized logical payload into an ordered sequence of
//! `\<= 512`-byte fragments, each carried as an ordinary [`Message`] tagged
//! with [`PacketMetadata`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::FragmentError;
use crate::message::{Message, Tag};
use crate::util::split_message;

use super::metadata::{PacketMetadata, PACKET_METADATA_TAG};
use super::payload::{apply_chunk, extract_payload};

/// Default fragment chunk size, chosen so the application payload portion
/// of a fragment never exceeds the classical 512-byte IRC line limit.
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Process-local counter backing [`Fragmenter`]'s default `group_id`
/// generator, the same millis-timestamp-plus-counter scheme already used by
/// [`crate::ircv3::generate_msgid`] and [`crate::ircv3::generate_batch_ref`]
/// for the same "unique per invocation" requirement.
static GROUP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn generate_group_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let counter = GROUP_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{timestamp}-{counter}")
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Splits a [`Message`]'s fragmentable payload into ordered fragment
/// messages, each bearing a `packetMetadata` tag a [`super::Reassembler`]
/// on the other end can recombine.
///
/// Pure and stateless beyond the group-id counter: safe to call from any
/// thread without coordination.
#[derive(Debug, Clone)]
pub struct Fragmenter {
    chunk_size: usize,
}

impl Default for Fragmenter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Fragmenter {
    /// Create a fragmenter using the default 512-byte chunk size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fragmenter with a custom chunk size. Mainly useful for
    /// exercising multi-fragment behavior in tests without huge payloads.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    /// Split `message`'s payload into an ordered sequence of fragment
    /// messages.
    ///
    /// `message.tags` and `message.prefix` are preserved on every fragment;
    /// any pre-existing `packetMetadata` tag is replaced. Returns
    /// [`FragmentError::NotFragmentable`] if the command carries no
    /// designated payload slot, and [`FragmentError::TooManyParts`] if the
    /// payload would require more than 65535 parts at the configured chunk
    /// size.
    pub fn fragment(&self, message: &Message) -> Result<Vec<Message>, FragmentError> {
        let payload = extract_payload(&message.command)
            .ok_or(FragmentError::NotFragmentable(message.command.name()))?;

        let chunks: Vec<&str> = if payload.is_empty() {
            vec![""]
        } else {
            split_message(&payload, self.chunk_size).collect()
        };

        if chunks.len() > u16::MAX as usize {
            return Err(FragmentError::TooManyParts(chunks.len()));
        }

        let group_id = generate_group_id();
        let timestamp = now_millis();
        let total_parts = chunks.len() as u16;

        Ok(chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                let part_number = (i + 1) as u16;
                let meta = PacketMetadata {
                    group_id: group_id.clone(),
                    timestamp,
                    part_number,
                    total_parts,
                };

                let mut tags = message
                    .tags
                    .clone()
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|t| t.0 != PACKET_METADATA_TAG)
                    .collect::<Vec<_>>();
                tags.push(Tag(PACKET_METADATA_TAG.to_owned(), Some(meta.encode())));

                Message {
                    tags: Some(tags),
                    prefix: message.prefix.clone(),
                    command: apply_chunk(&message.command, chunk.to_owned()),
                }
            })
            .collect())
    }
}
