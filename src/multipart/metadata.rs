//! The `packetMetadata` IRCv3 tag: a stable binary encoding of the group id,
//! timestamp, and part/total counters that accompany every fragment emitted
//! by the [`super::Fragmenter`].
//!
//! Tag values are strings, so the binary layout below is base64-encoded
//! with the same `base64` crate and `STANDARD` engine [`crate::sasl`] uses
//! for its payloads, rather than reaching for a new dependency to
//! serialize four fields.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::ReassemblyError;

/// The reserved IRCv3 tag key this crate uses to carry multipart fragment
/// metadata.
pub const PACKET_METADATA_TAG: &str = "packetMetadata";

/// Layout version byte, so a future revision of the encoding can be told
/// apart from this one instead of silently misparsing it.
const LAYOUT_VERSION: u8 = 1;

/// `(group_id, timestamp, part_number, total_parts)`, decoded from or bound
/// for the `packetMetadata` tag value.
///
/// `timestamp` is milliseconds since the Unix epoch, shared by every
/// fragment of a group. `part_number` and `total_parts` are 1-based and
/// capped at `u16::MAX` (see [`crate::error::FragmentError::TooManyParts`]);
/// the wire encoding widens them to `u32` for headroom independent of the
/// in-memory representation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketMetadata {
    /// Identifies the fragmentation group this fragment belongs to.
    pub group_id: String,
    /// Milliseconds since the Unix epoch, shared by the whole group.
    pub timestamp: i64,
    /// 1-based position of this fragment within the group.
    pub part_number: u16,
    /// Total number of fragments in the group.
    pub total_parts: u16,
}

impl PacketMetadata {
    /// Encode as the base64 string that goes in the `packetMetadata` tag
    /// value.
    pub fn encode(&self) -> String {
        let group_bytes = self.group_id.as_bytes();
        let mut buf = Vec::with_capacity(1 + 2 + group_bytes.len() + 8 + 4 + 4);
        buf.push(LAYOUT_VERSION);
        buf.extend_from_slice(&(group_bytes.len() as u16).to_be_bytes());
        buf.extend_from_slice(group_bytes);
        buf.extend_from_slice(&self.timestamp.to_be_bytes());
        buf.extend_from_slice(&u32::from(self.part_number).to_be_bytes());
        buf.extend_from_slice(&u32::from(self.total_parts).to_be_bytes());
        BASE64.encode(buf)
    }

    /// Decode a `packetMetadata` tag value back into its fields.
    ///
    /// Any structural problem -- bad base64, truncated fields, an
    /// unrecognized layout version, or counters that overflow `u16` --
    /// surfaces as [`ReassemblyError::AcknowledgmentCorrupted`].
    pub fn decode(value: &str) -> Result<Self, ReassemblyError> {
        let corrupted = |reason: &str| {
            ReassemblyError::AcknowledgmentCorrupted(format!(
                "packetMetadata tag {reason}"
            ))
        };

        let bytes = BASE64
            .decode(value)
            .map_err(|_| corrupted("is not valid base64"))?;

        let mut pos = 0usize;
        let take = |pos: &mut usize, n: usize, bytes: &[u8]| -> Result<Vec<u8>, ReassemblyError> {
            let end = pos.checked_add(n).ok_or_else(|| corrupted("overflowed while decoding"))?;
            let slice = bytes
                .get(*pos..end)
                .ok_or_else(|| corrupted("is truncated"))?
                .to_vec();
            *pos = end;
            Ok(slice)
        };

        let version = *bytes.first().ok_or_else(|| corrupted("is empty"))?;
        pos += 1;
        if version != LAYOUT_VERSION {
            return Err(corrupted("has an unrecognized layout version"));
        }

        let len_bytes = take(&mut pos, 2, &bytes)?;
        let group_len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;

        let group_bytes = take(&mut pos, group_len, &bytes)?;
        let group_id = String::from_utf8(group_bytes)
            .map_err(|_| corrupted("has a non-UTF-8 group id"))?;

        let ts_bytes = take(&mut pos, 8, &bytes)?;
        let timestamp = i64::from_be_bytes(ts_bytes.try_into().expect("exactly 8 bytes"));

        let part_bytes = take(&mut pos, 4, &bytes)?;
        let part_number = u32::from_be_bytes(part_bytes.try_into().expect("exactly 4 bytes"));

        let total_bytes = take(&mut pos, 4, &bytes)?;
        let total_parts = u32::from_be_bytes(total_bytes.try_into().expect("exactly 4 bytes"));

        if pos != bytes.len() {
            return Err(corrupted("has trailing bytes"));
        }

        let part_number: u16 = part_number
            .try_into()
            .map_err(|_| corrupted("has a part_number exceeding 65535"))?;
        let total_parts: u16 = total_parts
            .try_into()
            .map_err(|_| corrupted("has a total_parts exceeding 65535"))?;

        Ok(PacketMetadata {
            group_id,
            timestamp,
            part_number,
            total_parts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let meta = PacketMetadata {
            group_id: "g1".to_owned(),
            timestamp: 1_700_000_000_123,
            part_number: 2,
            total_parts: 5,
        };
        let encoded = meta.encode();
        let decoded = PacketMetadata::decode(&encoded).unwrap();
        assert_eq!(meta, decoded);
    }

    #[test]
    fn empty_group_id_round_trips() {
        let meta = PacketMetadata {
            group_id: String::new(),
            timestamp: 0,
            part_number: 1,
            total_parts: 1,
        };
        let decoded = PacketMetadata::decode(&meta.encode()).unwrap();
        assert_eq!(meta, decoded);
    }

    #[test]
    fn rejects_garbage_base64() {
        let err = PacketMetadata::decode("not base64!!").unwrap_err();
        assert!(matches!(err, ReassemblyError::AcknowledgmentCorrupted(_)));
    }

    #[test]
    fn rejects_truncated_payload() {
        let meta = PacketMetadata {
            group_id: "g1".to_owned(),
            timestamp: 1,
            part_number: 1,
            total_parts: 1,
        };
        let encoded = meta.encode();
        let raw = BASE64.decode(&encoded).unwrap();
        let truncated = BASE64.encode(&raw[..raw.len() - 3]);
        let err = PacketMetadata::decode(&truncated).unwrap_err();
        assert!(matches!(err, ReassemblyError::AcknowledgmentCorrupted(_)));
    }

    #[test]
    fn rejects_unrecognized_version() {
        let meta = PacketMetadata {
            group_id: "g1".to_owned(),
            timestamp: 1,
            part_number: 1,
            total_parts: 1,
        };
        let encoded = meta.encode();
        let mut raw = BASE64.decode(&encoded).unwrap();
        raw[0] = 255;
        let bumped = BASE64.encode(&raw);
        let err = PacketMetadata::decode(&bumped).unwrap_err();
        assert!(matches!(err, ReassemblyError::AcknowledgmentCorrupted(_)));
    }
}
