//! Integration tests for the multipart fragmentation/reassembly layer,
//! exercised through the full text wire format: fragments are serialized
//! to strings and reparsed before being fed to the reassembler, the same
//! path a real client/server pair would take.

use slirc_proto::multipart::{Fragmenter, Reassembler, ReassemblerConfig, ReassemblyOutcome};
use slirc_proto::{Command, Message};

#[test]
fn s2_multipart_split_1024_bytes() {
    let payload = "A".repeat(1024);
    let fragments = Fragmenter::new()
        .fragment(&Message::privmsg("#general", payload))
        .unwrap();
    assert_eq!(fragments.len(), 2);
    match &fragments[0].command {
        Command::PRIVMSG(_, text) => assert_eq!(text.len(), 512),
        other => panic!("unexpected: {other:?}"),
    }
    match &fragments[1].command {
        Command::PRIVMSG(_, text) => assert_eq!(text.len(), 512),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn s3_multipart_reassemble_reverse_order() {
    let fragments = Fragmenter::with_chunk_size(6)
        .fragment(&Message::privmsg("#general", "Part 1Part 2"))
        .unwrap();
    assert_eq!(fragments.len(), 2);

    let mut reassembler = Reassembler::default();
    assert_eq!(
        reassembler.process(fragments[1].clone()).unwrap(),
        ReassemblyOutcome::Pending
    );
    match reassembler.process(fragments[0].clone()).unwrap() {
        ReassemblyOutcome::Complete(msg) => match msg.command {
            Command::PRIVMSG(_, text) => assert_eq!(text, "Part 1Part 2"),
            other => panic!("unexpected: {other:?}"),
        },
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn s4_interleaved_groups() {
    let g1 = Fragmenter::with_chunk_size(7)
        .fragment(&Message::privmsg("#general", "First message"))
        .unwrap();
    let g2 = Fragmenter::with_chunk_size(7)
        .fragment(&Message::privmsg("#general", "Second message"))
        .unwrap();

    let mut reassembler = Reassembler::default();
    assert_eq!(
        reassembler.process(g1[0].clone()).unwrap(),
        ReassemblyOutcome::Pending
    );
    assert_eq!(
        reassembler.process(g2[1].clone()).unwrap(),
        ReassemblyOutcome::Pending
    );

    match reassembler.process(g1[1].clone()).unwrap() {
        ReassemblyOutcome::Complete(msg) => match msg.command {
            Command::PRIVMSG(_, text) => assert_eq!(text, "First message"),
            other => panic!("unexpected: {other:?}"),
        },
        other => panic!("unexpected: {other:?}"),
    }

    match reassembler.process(g2[0].clone()).unwrap() {
        ReassemblyOutcome::Complete(msg) => match msg.command {
            Command::PRIVMSG(_, text) => assert_eq!(text, "Second message"),
            other => panic!("unexpected: {other:?}"),
        },
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn fragments_survive_a_text_wire_round_trip() {
    let payload = "the quick brown fox jumps over the lazy dog ".repeat(40);
    let original = Message::privmsg("#general", payload.clone());
    let fragments = Fragmenter::new().fragment(&original).unwrap();
    assert!(fragments.len() > 1);

    let mut reassembler = Reassembler::default();
    let mut outcome = None;
    for fragment in &fragments {
        // Round-trip every fragment through the text wire encoder/parser,
        // exactly as it would travel over a real connection.
        let wire = fragment.to_string();
        let reparsed: Message = wire.parse().expect("fragment must reparse");
        outcome = Some(reassembler.process(reparsed).unwrap());
    }

    match outcome.unwrap() {
        ReassemblyOutcome::Complete(msg) => match msg.command {
            Command::PRIVMSG(_, text) => assert_eq!(text, payload),
            other => panic!("unexpected: {other:?}"),
        },
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn bounded_memory_reports_media_cache_eviction() {
    let a = Fragmenter::with_chunk_size(4)
        .fragment(&Message::privmsg("#c", "aaaaaaaa"))
        .unwrap();
    let b = Fragmenter::with_chunk_size(4)
        .fragment(&Message::privmsg("#c", "bbbbbbbb"))
        .unwrap();

    let mut reassembler = Reassembler::new(ReassemblerConfig {
        max_groups: 1,
        ..ReassemblerConfig::default()
    });
    reassembler.process(a[0].clone()).unwrap();
    let err = reassembler.process(b[0].clone()).unwrap_err();
    assert!(err.to_string().contains("evicted"));
}

#[test]
fn quit_message_fragments_and_reassembles() {
    let msg = Message::quit(Some("a very long goodbye message ".repeat(30)));
    let original_text = match &msg.command {
        Command::QUIT(Some(text)) => text.clone(),
        _ => unreachable!(),
    };
    let fragments = Fragmenter::new().fragment(&msg).unwrap();
    assert!(fragments.len() > 1);

    let mut reassembler = Reassembler::default();
    let mut outcome = None;
    for f in fragments {
        outcome = Some(reassembler.process(f).unwrap());
    }
    match outcome.unwrap() {
        ReassemblyOutcome::Complete(out) => match out.command {
            Command::QUIT(Some(text)) => assert_eq!(text, original_text),
            other => panic!("unexpected: {other:?}"),
        },
        other => panic!("unexpected: {other:?}"),
    }
}
