//! Frame decoding for a mixed text/binary inbound byte stream.
//!
//! IRC is a text line protocol, but DCC negotiation opens a side channel
//! whose CHAT/SEND traffic is framed as opaque binary blobs rather than
//! `\r\n`-terminated lines. [`FrameDecoder`] tells the two apart on a
//! single stream so a caller never has to run two separate readers: a
//! leading byte in `0..=4` marks a binary DCC frame (discriminator + a
//! `u32` big-endian length prefix + that many opaque body bytes); anything
//! else marks the start of a `\r?\n`-terminated text line.
//!
//! [`IrcCodec`] wraps [`FrameDecoder`] as a `tokio_util::codec`
//! [`Decoder`]/[`Encoder`] pair so the engine can sit inside a
//! caller-supplied `tokio_util::codec::Framed<T, IrcCodec>`. Neither this
//! module nor the rest of the crate dials a socket.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::encode::IrcEncode;
use crate::error::{FrameError, MessageParseError};
use crate::message::Message;

/// Default ceiling on a single DCC binary frame's body size (1 MiB).
pub const DEFAULT_MAX_DCC_BODY_LEN: usize = 1024 * 1024;

/// Length in bytes of the DCC binary frame header: one discriminator byte
/// followed by a `u32` big-endian body length.
const DCC_HEADER_LEN: usize = 5;

/// A single decoded frame from a mixed text/binary stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A `\r?\n`-terminated text line. The line is always consumed from
    /// the buffer even when it fails to parse as a [`Message`]; the
    /// `Err` case carries the parse failure for the caller to log.
    Text(Result<Message, MessageParseError>),
    /// A binary DCC frame: the discriminator byte (`0..=4`) that selected
    /// this branch, and its opaque body. The body is never interpreted
    /// here — see `crate::dcc` for CTCP-level DCC negotiation text, which
    /// travels as ordinary [`Frame::Text`] lines, not these binary frames.
    Dcc {
        /// The frame kind discriminator (`0..=4`).
        discriminator: u8,
        /// The opaque frame body.
        body: Vec<u8>,
    },
}

/// Sans-io decoder distinguishing text IRC lines from binary DCC frames
/// on a single inbound byte stream.
///
/// `decode` never advances the buffer past an incomplete frame: on
/// [`FrameError::NeedsMoreData`] the caller should await more bytes and
/// call `decode` again with the same unconsumed buffer.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    max_dcc_body_len: usize,
    /// Bytes still to discard from a DCC frame whose body exceeded
    /// `max_dcc_body_len` but hadn't fully arrived yet.
    pending_skip: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self {
            max_dcc_body_len: DEFAULT_MAX_DCC_BODY_LEN,
            pending_skip: 0,
        }
    }
}

impl FrameDecoder {
    /// Create a decoder with the default DCC body size ceiling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with a custom DCC body size ceiling.
    pub fn with_max_dcc_body_len(max_dcc_body_len: usize) -> Self {
        Self {
            max_dcc_body_len,
            pending_skip: 0,
        }
    }

    /// Attempt to decode one frame from `buf`.
    ///
    /// On [`FrameError::NeedsMoreData`], `buf` is left exactly as it was
    /// passed in. On [`FrameError::PayloadTooLarge`], the oversized DCC
    /// frame (or as much of it as has arrived) is discarded so the stream
    /// can resync on the next frame.
    pub fn decode(&mut self, buf: &mut BytesMut) -> Result<Frame, FrameError> {
        if self.pending_skip > 0 {
            let n = self.pending_skip.min(buf.len());
            buf.advance(n);
            self.pending_skip -= n;
            return Err(FrameError::NeedsMoreData);
        }

        if buf.is_empty() {
            return Err(FrameError::NeedsMoreData);
        }

        match buf[0] {
            0..=4 => self.decode_dcc(buf),
            _ => decode_text(buf),
        }
    }

    fn decode_dcc(&mut self, buf: &mut BytesMut) -> Result<Frame, FrameError> {
        if buf.len() < DCC_HEADER_LEN {
            return Err(FrameError::NeedsMoreData);
        }

        let discriminator = buf[0];
        let len = u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]) as usize;

        if len > self.max_dcc_body_len {
            let available = buf.len() - DCC_HEADER_LEN;
            if available >= len {
                buf.advance(DCC_HEADER_LEN + len);
            } else {
                buf.advance(buf.len());
                self.pending_skip = len - available;
            }
            return Err(FrameError::PayloadTooLarge(len));
        }

        if buf.len() < DCC_HEADER_LEN + len {
            return Err(FrameError::NeedsMoreData);
        }

        buf.advance(DCC_HEADER_LEN);
        let body = buf.split_to(len).to_vec();
        Ok(Frame::Dcc {
            discriminator,
            body,
        })
    }
}

fn decode_text(buf: &mut BytesMut) -> Result<Frame, FrameError> {
    let Some(pos) = buf.iter().position(|&b| b == b'\n') else {
        return Err(FrameError::NeedsMoreData);
    };

    let line_end = if pos > 0 && buf[pos - 1] == b'\r' {
        pos - 1
    } else {
        pos
    };

    let raw = buf.split_to(pos + 1);
    let line = &raw[..line_end];

    let text = match std::str::from_utf8(line) {
        Ok(s) => s,
        Err(_) => {
            return Ok(Frame::Text(Err(MessageParseError::InvalidArgument(
                "line contains invalid UTF-8".to_owned(),
            ))));
        }
    };

    Ok(Frame::Text(text.parse::<Message>()))
}

/// Write a DCC binary frame (discriminator + length-prefixed body) to a
/// byte buffer.
pub fn encode_dcc_frame(discriminator: u8, body: &[u8], dst: &mut BytesMut) {
    dst.reserve(DCC_HEADER_LEN + body.len());
    dst.put_u8(discriminator);
    dst.put_u32(body.len() as u32);
    dst.extend_from_slice(body);
}

/// `tokio_util::codec` adapter combining [`FrameDecoder`] with
/// [`Message`] parsing/encoding.
///
/// This is the "suitable for embedding under any transport" surface: an
/// embedder owns the `AsyncRead + AsyncWrite` stream (`TcpStream`,
/// `TlsStream`, a test duplex, whatever) and wraps it in
/// `tokio_util::codec::Framed::new(stream, IrcCodec::default())`. This
/// crate never dials a socket itself.
///
/// Binary [`Frame::Dcc`] frames decode successfully but have no `Message`
/// representation; callers that need the DCC side channel should demux
/// on [`Frame`] directly via [`FrameDecoder`] rather than through this
/// codec, which only emits [`Message`] items.
#[derive(Debug, Clone, Default)]
pub struct IrcCodec {
    decoder: FrameDecoder,
}

impl IrcCodec {
    /// Create a codec with the default DCC body size ceiling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with a custom DCC body size ceiling.
    pub fn with_max_dcc_body_len(max_dcc_body_len: usize) -> Self {
        Self {
            decoder: FrameDecoder::with_max_dcc_body_len(max_dcc_body_len),
        }
    }
}

impl Decoder for IrcCodec {
    type Item = Message;
    type Error = MessageParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>, Self::Error> {
        loop {
            match self.decoder.decode(src) {
                Ok(Frame::Text(Ok(msg))) => return Ok(Some(msg)),
                Ok(Frame::Text(Err(e))) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(error = %e, "dropping unparsable IRC line");
                    continue;
                }
                Ok(Frame::Dcc { .. }) => {
                    // Not representable as a `Message`; skip and keep reading.
                    continue;
                }
                Err(FrameError::NeedsMoreData) => return Ok(None),
                Err(e @ FrameError::PayloadTooLarge(_)) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %e, "dropping oversized DCC frame");
                    continue;
                }
            }
        }
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = MessageParseError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let mut buf = Vec::with_capacity(512);
        // IrcEncode writes to any `Write` implementor; an I/O error here
        // would mean a `Vec<u8>` writer failed, which cannot happen.
        msg.encode(&mut buf)
            .expect("encoding to an in-memory buffer cannot fail");
        dst.extend_from_slice(&buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_simple_line() {
        let mut buf = BytesMut::from("PING :server\r\n");
        let mut dec = FrameDecoder::new();
        match dec.decode(&mut buf) {
            Ok(Frame::Text(Ok(msg))) => {
                assert_eq!(msg.command.name(), "PING");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_needs_more_data_leaves_buffer_untouched() {
        let mut buf = BytesMut::from("PING :serv");
        let mut dec = FrameDecoder::new();
        let before = buf.clone();
        let result = dec.decode(&mut buf);
        assert_eq!(result, Err(FrameError::NeedsMoreData));
        assert_eq!(buf, before);
    }

    #[test]
    fn decode_dcc_frame() {
        let mut buf = BytesMut::new();
        encode_dcc_frame(2, b"hello", &mut buf);
        let mut dec = FrameDecoder::new();
        match dec.decode(&mut buf) {
            Ok(Frame::Dcc {
                discriminator,
                body,
            }) => {
                assert_eq!(discriminator, 2);
                assert_eq!(body, b"hello");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_dcc_incomplete_body_needs_more_data() {
        let mut full = BytesMut::new();
        encode_dcc_frame(1, b"0123456789", &mut full);
        let mut buf = BytesMut::from(&full[..full.len() - 3]);
        let before = buf.clone();
        let mut dec = FrameDecoder::new();
        assert_eq!(dec.decode(&mut buf), Err(FrameError::NeedsMoreData));
        assert_eq!(buf, before);
    }

    #[test]
    fn decode_dcc_incomplete_header_needs_more_data() {
        let mut buf = BytesMut::from(&[2u8, 0, 0][..]);
        let before = buf.clone();
        let mut dec = FrameDecoder::new();
        assert_eq!(dec.decode(&mut buf), Err(FrameError::NeedsMoreData));
        assert_eq!(buf, before);
    }

    #[test]
    fn decode_oversized_dcc_body_is_dropped() {
        let mut buf = BytesMut::new();
        encode_dcc_frame(3, &vec![0u8; 64], &mut buf);
        let mut dec = FrameDecoder::with_max_dcc_body_len(16);
        let result = dec.decode(&mut buf);
        assert_eq!(result, Err(FrameError::PayloadTooLarge(64)));
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_strips_cr() {
        let mut buf = BytesMut::from("NOTICE #c :hi\r\n");
        let mut dec = FrameDecoder::new();
        match dec.decode(&mut buf) {
            Ok(Frame::Text(Ok(msg))) => assert_eq!(msg.command.name(), "NOTICE"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn decode_bad_line_is_consumed_not_fatal() {
        let mut buf = BytesMut::from("\r\n");
        let mut dec = FrameDecoder::new();
        match dec.decode(&mut buf) {
            Ok(Frame::Text(Err(_))) => {}
            other => panic!("unexpected: {other:?}"),
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn idempotent_on_unconsumed_buffer() {
        let mut buf = BytesMut::from("PING :x");
        let mut dec = FrameDecoder::new();
        let r1 = dec.decode(&mut buf);
        let snapshot = buf.clone();
        let r2 = dec.decode(&mut buf);
        assert_eq!(r1, r2);
        assert_eq!(buf, snapshot);
    }

    #[test]
    fn codec_decodes_multiple_lines_in_one_poll() {
        let mut buf = BytesMut::from("NICK a\r\nNICK b\r\n");
        let mut codec = IrcCodec::new();
        let first = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.command.name(), "NICK");
        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(second.command.name(), "NICK");
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn codec_round_trips_privmsg() {
        let mut codec = IrcCodec::new();
        let mut buf = BytesMut::new();
        let msg = Message::privmsg("#chan", "hi");
        codec.encode(msg.clone(), &mut buf).unwrap();
        let decoded = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.command, msg.command);
    }
}
