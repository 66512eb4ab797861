//! Recombines interleaved fragment streams back into logical messages.
//!
//! [`Reassembler`] is the one stateful component in this crate. It is a
//! plain owned struct, not an actor runtime: callers who need shared
//! access wrap it themselves, either behind `Arc<Mutex<Reassembler>>` or
//! by handing it to a single task that owns it exclusively.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::error::ReassemblyError;
use crate::message::Message;

use super::metadata::{PacketMetadata, PACKET_METADATA_TAG};
use super::payload::{extract_payload, finalize_payload};

/// Bounds on the [`Reassembler`]'s in-progress group cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReassemblerConfig {
    /// Maximum number of distinct groups held concurrently. Accepting a
    /// fragment for a new group beyond this limit evicts the oldest
    /// still-open group.
    pub max_groups: usize,
    /// Maximum total bytes of chunk payload a single group may accumulate
    /// before it is dropped.
    pub max_bytes_per_group: usize,
    /// How long a group may sit untouched before it is considered stale
    /// and is evicted on its next touch.
    pub group_ttl: Duration,
}

impl Default for ReassemblerConfig {
    fn default() -> Self {
        Self {
            max_groups: 1024,
            max_bytes_per_group: 8 * 1024 * 1024,
            group_ttl: Duration::from_secs(300),
        }
    }
}

/// Result of feeding one fragment to the [`Reassembler`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReassemblyOutcome {
    /// The group this fragment belongs to is still missing parts.
    Pending,
    /// This fragment completed its group; here is the reassembled logical
    /// message, with its `packetMetadata` tag stripped and its payload
    /// slot replaced by the joined payload.
    Complete(Message),
}

#[derive(Debug)]
struct Group {
    total_parts: u16,
    parts: HashMap<u16, Vec<u8>>,
    byte_len: usize,
    last_touched: Instant,
    /// The first fragment seen for this group, used as a template to
    /// rebuild tags/prefix/command shape once the payload is joined.
    template: Message,
}

impl Group {
    fn new(total_parts: u16, template: Message) -> Self {
        Self {
            total_parts,
            parts: HashMap::new(),
            byte_len: 0,
            last_touched: Instant::now(),
            template,
        }
    }
}

/// Single-owner reassembly cache: `process` is the only mutating
/// operation, and is the only method any embedder needs to serialize
/// across threads (via a mutex or single-task ownership).
///
/// States per group: `Partial -> {Complete, Evicted}`; `Complete` and
/// `Evicted` are terminal.
#[derive(Debug)]
pub struct Reassembler {
    config: ReassemblerConfig,
    groups: HashMap<String, Group>,
    /// Insertion order of currently-open groups, used to pick an eviction
    /// victim when `max_groups` is exceeded. Entries are removed when
    /// their group completes, is evicted, or expires.
    order: VecDeque<String>,
}

impl Reassembler {
    /// Create a reassembler with the given resource bounds.
    pub fn new(config: ReassemblerConfig) -> Self {
        Self {
            config,
            groups: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Number of groups currently buffered, awaiting completion.
    pub fn open_group_count(&self) -> usize {
        self.groups.len()
    }

    fn remove_group(&mut self, group_id: &str) {
        self.groups.remove(group_id);
        if let Some(pos) = self.order.iter().position(|id| id == group_id) {
            self.order.remove(pos);
        }
    }

    fn evict_oldest_other_than(&mut self, group_id: &str) -> Option<String> {
        let victim = self.order.iter().find(|id| id.as_str() != group_id).cloned()?;
        self.remove_group(&victim);
        Some(victim)
    }

    /// Feed one fragment (or an unfragmented, untagged message, which is
    /// released immediately) into the reassembler.
    ///
    /// Bound-exceeding evictions are reported as
    /// [`ReassemblyError::MediaCacheEvicted`] for the call that triggered
    /// them; the triggering fragment itself is still buffered. If that same
    /// fragment also completes its own group, the completion is returned
    /// instead of the eviction error -- a group is released exactly once,
    /// and this is the only call that will ever see it complete, so it
    /// takes priority over reporting the unrelated eviction.
    pub fn process(&mut self, message: Message) -> Result<ReassemblyOutcome, ReassemblyError> {
        let raw_tag = message
            .tag(PACKET_METADATA_TAG)
            .flatten()
            .map(str::to_owned);

        let Some(raw_tag) = raw_tag else {
            return Ok(ReassemblyOutcome::Complete(message));
        };

        let meta = PacketMetadata::decode(&raw_tag)?;

        let chunk = extract_payload(&message.command)
            .map(String::into_bytes)
            .ok_or_else(|| {
                ReassemblyError::AcknowledgmentCorrupted(
                    "fragment's command carries no fragmentable payload".to_owned(),
                )
            })?;

        let mut evicted = None;

        if let Some(existing) = self.groups.get(&meta.group_id) {
            if existing.last_touched.elapsed() > self.config.group_ttl {
                self.remove_group(&meta.group_id);
                evicted = Some(meta.group_id.clone());
            }
        }

        if !self.groups.contains_key(&meta.group_id) && self.groups.len() >= self.config.max_groups
        {
            if let Some(victim) = self.evict_oldest_other_than(&meta.group_id) {
                evicted.get_or_insert(victim);
            }
        }

        if !self.groups.contains_key(&meta.group_id) {
            self.groups.insert(
                meta.group_id.clone(),
                Group::new(meta.total_parts, message.clone()),
            );
            self.order.push_back(meta.group_id.clone());
        }

        let group = self
            .groups
            .get_mut(&meta.group_id)
            .expect("just inserted or already present");

        if group.total_parts != meta.total_parts {
            return Err(ReassemblyError::AcknowledgmentCorrupted(format!(
                "group {} saw conflicting total_parts",
                meta.group_id
            )));
        }

        if group.parts.contains_key(&meta.part_number) {
            return Err(ReassemblyError::DuplicatePart {
                group_id: meta.group_id,
                part_number: meta.part_number,
            });
        }

        if group.byte_len + chunk.len() > self.config.max_bytes_per_group {
            self.remove_group(&meta.group_id);
            return Err(ReassemblyError::PayloadTooLarge {
                group_id: meta.group_id,
            });
        }

        group.last_touched = Instant::now();
        group.byte_len += chunk.len();
        group.parts.insert(meta.part_number, chunk);

        let complete = group.parts.len() as u16 == group.total_parts;

        if !complete {
            if let Some(evicted_group_id) = evicted {
                return Err(ReassemblyError::MediaCacheEvicted { evicted_group_id });
            }
            return Ok(ReassemblyOutcome::Pending);
        }

        // This fragment completes its own group even though inserting it
        // also triggered eviction of some other stale group. Releasing the
        // now-complete group takes priority over reporting that eviction:
        // a group must be released exactly once, and this is the only call
        // that will ever see it complete. The evicted group's memory was
        // already freed above; its eviction simply goes unreported here.
        let group = self.groups.remove(&meta.group_id).expect("just completed");
        self.remove_group(&meta.group_id);

        let mut part_numbers: Vec<u16> = group.parts.keys().copied().collect();
        part_numbers.sort_unstable();
        let mut joined = Vec::with_capacity(group.byte_len);
        let mut parts = group.parts;
        for part_number in part_numbers {
            joined.extend(parts.remove(&part_number).expect("key present"));
        }

        let payload = String::from_utf8(joined).map_err(|_| {
            ReassemblyError::AcknowledgmentCorrupted(
                "reassembled payload was not valid UTF-8".to_owned(),
            )
        })?;

        let mut out = group.template;
        out.command = finalize_payload(&out.command, payload);
        out.tags = out.tags.map(|tags| {
            tags.into_iter()
                .filter(|t| t.0 != PACKET_METADATA_TAG)
                .collect::<Vec<_>>()
        });
        if out.tags.as_ref().is_some_and(Vec::is_empty) {
            out.tags = None;
        }

        Ok(ReassemblyOutcome::Complete(out))
    }
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new(ReassemblerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipart::Fragmenter;

    #[test]
    fn untagged_message_is_released_immediately() {
        let msg = Message::privmsg("#chan", "hi");
        let mut r = Reassembler::default();
        match r.process(msg.clone()).unwrap() {
            ReassemblyOutcome::Complete(out) => assert_eq!(out, msg),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn two_fragments_in_reverse_order() {
        let fragments = Fragmenter::with_chunk_size(6)
            .fragment(&Message::privmsg("#chan", "Part 1Part 2"))
            .unwrap();
        assert_eq!(fragments.len(), 2);
        let mut r = Reassembler::default();
        let first = r.process(fragments[1].clone()).unwrap();
        assert_eq!(first, ReassemblyOutcome::Pending);
        match r.process(fragments[0].clone()).unwrap() {
            ReassemblyOutcome::Complete(out) => match out.command {
                crate::command::Command::PRIVMSG(_, text) => assert_eq!(text, "Part 1Part 2"),
                other => panic!("unexpected command: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn interleaved_groups_do_not_mix() {
        let g1 = Fragmenter::with_chunk_size(7)
            .fragment(&Message::privmsg("#chan", "First message"))
            .unwrap();
        let g2 = Fragmenter::with_chunk_size(7)
            .fragment(&Message::privmsg("#chan", "Second message"))
            .unwrap();
        assert_eq!(g1.len(), 2);
        assert_eq!(g2.len(), 2);

        let mut r = Reassembler::default();
        assert_eq!(r.process(g1[0].clone()).unwrap(), ReassemblyOutcome::Pending);
        assert_eq!(r.process(g2[1].clone()).unwrap(), ReassemblyOutcome::Pending);

        match r.process(g1[1].clone()).unwrap() {
            ReassemblyOutcome::Complete(out) => match out.command {
                crate::command::Command::PRIVMSG(_, text) => {
                    assert_eq!(text, "First message")
                }
                other => panic!("unexpected command: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }

        match r.process(g2[0].clone()).unwrap() {
            ReassemblyOutcome::Complete(out) => match out.command {
                crate::command::Command::PRIVMSG(_, text) => {
                    assert_eq!(text, "Second message")
                }
                other => panic!("unexpected command: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn duplicate_part_number_is_corrupted() {
        let fragments = Fragmenter::with_chunk_size(6)
            .fragment(&Message::privmsg("#chan", "hello world"))
            .unwrap();
        let mut r = Reassembler::default();
        r.process(fragments[0].clone()).unwrap();
        let err = r.process(fragments[0].clone()).unwrap_err();
        assert!(matches!(err, ReassemblyError::DuplicatePart { .. }));
    }

    #[test]
    fn exceeding_byte_budget_drops_the_group() {
        let fragments = Fragmenter::with_chunk_size(4)
            .fragment(&Message::privmsg("#chan", "0123456789abcdef"))
            .unwrap();
        let config = ReassemblerConfig {
            max_bytes_per_group: 5,
            ..ReassemblerConfig::default()
        };
        let mut r = Reassembler::new(config);
        r.process(fragments[0].clone()).unwrap();
        let err = r.process(fragments[1].clone()).unwrap_err();
        assert!(matches!(err, ReassemblyError::PayloadTooLarge { .. }));
        assert_eq!(r.open_group_count(), 0);
    }

    #[test]
    fn exceeding_max_groups_evicts_the_oldest() {
        let a = Fragmenter::with_chunk_size(4)
            .fragment(&Message::privmsg("#chan", "aaaaaaaa"))
            .unwrap();
        let b = Fragmenter::with_chunk_size(4)
            .fragment(&Message::privmsg("#chan", "bbbbbbbb"))
            .unwrap();
        let config = ReassemblerConfig {
            max_groups: 1,
            ..ReassemblerConfig::default()
        };
        let mut r = Reassembler::new(config);
        r.process(a[0].clone()).unwrap();
        let err = r.process(b[0].clone()).unwrap_err();
        assert!(matches!(err, ReassemblyError::MediaCacheEvicted { .. }));
        assert_eq!(r.open_group_count(), 1);
    }

    #[test]
    fn single_fragment_group_completes_even_when_it_triggers_eviction() {
        let a = Fragmenter::with_chunk_size(4)
            .fragment(&Message::privmsg("#chan", "aaaaaaaa"))
            .unwrap();
        let single = Fragmenter::new()
            .fragment(&Message::privmsg("#chan", "short"))
            .unwrap();
        assert_eq!(single.len(), 1);
        let config = ReassemblerConfig {
            max_groups: 1,
            ..ReassemblerConfig::default()
        };
        let mut r = Reassembler::new(config);
        r.process(a[0].clone()).unwrap();
        match r.process(single[0].clone()).unwrap() {
            ReassemblyOutcome::Complete(out) => match out.command {
                crate::command::Command::PRIVMSG(_, text) => assert_eq!(text, "short"),
                other => panic!("unexpected command: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(r.open_group_count(), 0);
    }

    #[test]
    fn single_part_group_completes_immediately() {
        let fragments = Fragmenter::new()
            .fragment(&Message::privmsg("#chan", "short"))
            .unwrap();
        assert_eq!(fragments.len(), 1);
        let mut r = Reassembler::default();
        match r.process(fragments[0].clone()).unwrap() {
            ReassemblyOutcome::Complete(out) => match out.command {
                crate::command::Command::PRIVMSG(_, text) => assert_eq!(text, "short"),
                other => panic!("unexpected command: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(r.open_group_count(), 0);
    }

    #[test]
    fn raw_command_resplits_after_reassembly() {
        let msg = Message::new(crate::command::Command::Raw(
            "FOOBAR".into(),
            vec!["alpha".into(), "beta".into(), "gamma".into()],
        ));
        let fragments = Fragmenter::with_chunk_size(6).fragment(&msg).unwrap();
        let mut r = Reassembler::default();
        let mut last = None;
        for f in fragments {
            last = Some(r.process(f).unwrap());
        }
        match last.unwrap() {
            ReassemblyOutcome::Complete(out) => assert_eq!(
                out.command,
                crate::command::Command::Raw(
                    "FOOBAR".into(),
                    vec!["alpha".into(), "beta".into(), "gamma".into()]
                )
            ),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn completed_output_has_no_packet_metadata_tag() {
        let fragments = Fragmenter::with_chunk_size(4)
            .fragment(&Message::privmsg("#chan", "0123456789"))
            .unwrap();
        let mut r = Reassembler::default();
        let mut last = None;
        for f in fragments {
            last = Some(r.process(f).unwrap());
        }
        match last.unwrap() {
            ReassemblyOutcome::Complete(out) => {
                assert!(out.tag(PACKET_METADATA_TAG).is_none());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
