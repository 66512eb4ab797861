//! Multipart fragmentation and reassembly (components C6/C7): splits an
//! oversized logical payload into ordered `<=512`-byte fragments tagged
//! with a group id and part index, and recombines those fragments -- even
//! when many groups' fragments interleave on the wire -- into the
//! original payload exactly once per group.
//!
//! This layer sits above the protocol codec: a [`Fragmenter`] turns one
//! logical [`crate::message::Message`] into several wire-ready ones, and a
//! [`Reassembler`] turns a stream of wire messages back into logical ones.
//! Neither component interprets anything about transport; both operate on
//! already-parsed [`crate::message::Message`] values.

mod fragmenter;
mod metadata;
mod payload;
mod reassembler;

pub use self::fragmenter::{Fragmenter, DEFAULT_CHUNK_SIZE};
pub use self::metadata::{PacketMetadata, PACKET_METADATA_TAG};
pub use self::reassembler::{Reassembler, ReassemblerConfig, ReassemblyOutcome};
