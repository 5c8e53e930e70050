mod common;

use std::{io::Cursor, thread};

use crossbeam::channel::unbounded;
use deframer::framing::*;
use rand::Rng;
use test_case::test_case;

use common::{contains_sync, init_tracing, random_bits, random_bytes, rng};

fn run(config: DeframerConfig, bits: &[u8]) -> (Deframer, Collector) {
    let mut deframer = Deframer::new(config).unwrap();
    let mut sink = Collector::new();
    assert_eq!(deframer.work(bits, &mut sink), bits.len());
    (deframer, sink)
}

#[test]
fn random_stream_without_sync_stays_searching() {
    init_tracing();
    let sync = SyncWord::DEFAULT;
    let mut rng = rng(0x5eed);
    let bits = loop {
        let bits = random_bits(&mut rng, 1000);
        if !contains_sync(sync, &bits) {
            break bits;
        }
    };

    let (deframer, sink) = run(DeframerConfig::new(sync).with_crc(true), &bits);

    assert!(sink.packets.is_empty());
    assert!(sink.diagnostics.is_empty());
    assert_eq!(deframer.state(), StateKind::Searching);
    assert_eq!(deframer.stats().syncs, 0);
    assert_eq!(deframer.stats().bits, 1000);
}

#[test]
fn prefixes_without_sync_never_leave_searching() {
    let sync = SyncWord::new(0x1acf_fc1d, 32);
    let mut rng = rng(7);
    let mut deframer = Deframer::new(DeframerConfig::new(sync)).unwrap();
    let mut sink = Collector::new();
    let bits = random_bits(&mut rng, 5000);
    assert!(!contains_sync(sync, &bits));

    for bit in bits {
        deframer.push(bit == 1, &mut sink);
        assert_eq!(deframer.state(), StateKind::Searching);
    }
    assert!(sink.packets.is_empty());
}

#[test_case(false, false; "no trailer")]
#[test_case(true, false; "unchecked trailer")]
#[test_case(true, true; "checked trailer")]
fn random_frames_round_trip(has_crc: bool, check_crc: bool) {
    init_tracing();
    let mut config = DeframerConfig::default();
    if has_crc {
        config = config.with_crc(check_crc);
    }

    let mut rng = rng(42);
    let mut bits = Vec::new();
    let mut expected = Vec::new();
    for _ in 0..50 {
        // zero fill between frames cannot form the sync word
        let gap = rng.gen_range(0..40);
        bits.extend(std::iter::repeat(0).take(gap));
        let len = rng.gen_range(0..=255);
        let payload = random_bytes(&mut rng, len);
        bits.extend(frame_bits(&config, &payload).unwrap());
        expected.push(payload);
    }

    let (deframer, sink) = run(config, &bits);

    let got: Vec<Vec<u8>> = sink.packets.iter().map(|p| p.data.clone()).collect();
    assert_eq!(got, expected);
    assert!(sink.diagnostics.is_empty());
    assert_eq!(deframer.stats().packets, 50);
    for packet in &sink.packets {
        assert_eq!(usize::from(packet.length), packet.len());
    }
}

#[test]
fn random_batch_sizes_give_same_packets() {
    let config = DeframerConfig::default().with_crc(true);
    let mut rng = rng(99);
    let mut bits = Vec::new();
    for len in [0usize, 1, 17, 200] {
        bits.extend(frame_bits(&config, &random_bytes(&mut rng, len)).unwrap());
    }
    let (_, expected) = run(config, &bits);

    let mut deframer = Deframer::new(config).unwrap();
    let mut sink = Collector::new();
    let mut rest = bits.as_slice();
    while !rest.is_empty() {
        let n = rng.gen_range(0..=rest.len().min(64));
        let (chunk, tail) = rest.split_at(n);
        assert_eq!(deframer.work(chunk, &mut sink), n);
        rest = tail;
    }

    assert_eq!(sink.packets, expected.packets);
    assert_eq!(sink.packets.len(), 4);
}

#[test]
fn single_bit_flips_are_detected() {
    let config = DeframerConfig::default().with_crc(true);
    let payload = b"telemetry frame 42";
    let clean = frame_bits(&config, payload).unwrap();
    // enough trailing bits for any corrupted length to complete its frame
    let padding = vec![0u8; 255 * 8 + 16];
    let sync_len = config.sync.bits().count();
    let crc_start = clean.len() - 16;

    for idx in sync_len..crc_start {
        let mut bits = clean.clone();
        bits[idx] ^= 1;
        bits.extend(&padding);

        let (_, sink) = run(config, &bits);
        assert!(sink.packets.is_empty(), "flip at {idx} produced a packet");
        assert!(
            sink.diagnostics
                .iter()
                .any(|d| matches!(d, Diagnostic::CrcMismatch { .. })),
            "flip at {idx} was not reported"
        );
    }
}

#[test]
fn resyncs_after_crc_mismatch() {
    let config = DeframerConfig::default().with_crc(true);
    let mut bits = frame_bits(&config, b"corrupt me").unwrap();
    let last = bits.len() - 1;
    bits[last] ^= 1;
    bits.extend(frame_bits(&config, b"next").unwrap());

    let (deframer, sink) = run(config, &bits);

    assert_eq!(sink.diagnostics.len(), 1);
    assert_eq!(sink.packets.len(), 1);
    assert_eq!(sink.packets[0].data, b"next");
    let stats = deframer.stats();
    assert_eq!((stats.syncs, stats.packets, stats.crc_mismatches), (2, 1, 1));
}

#[test_case(0x8005)]
#[test_case(0x1021)]
#[test_case(0x3d65)]
fn custom_polynomials(poly: u16) {
    let config = DeframerConfig::default().with_crc(true).with_polynomial(poly);
    let bits = frame_bits(&config, b"poly").unwrap();
    let (_, sink) = run(config, &bits);
    assert_eq!(sink.packets.len(), 1);
    assert_eq!(
        sink.packets[0].crc,
        Some(crc16(&[4, b'p', b'o', b'l', b'y'], poly))
    );
}

#[test]
fn polynomial_mismatch_is_detected() {
    let tx = DeframerConfig::default().with_crc(true).with_polynomial(0x1021);
    let rx = DeframerConfig::default().with_crc(true);
    let (_, sink) = run(rx, &frame_bits(&tx, b"poly").unwrap());
    assert!(sink.packets.is_empty());
    assert_eq!(sink.diagnostics.len(), 1);
}

#[test]
fn short_unaligned_sync_word() {
    let config = DeframerConfig::new(SyncWord::new(0b1_0110_1110_0101, 13));
    let mut bits = vec![0, 0, 0];
    bits.extend(frame_bits(&config, b"odd").unwrap());
    let (_, sink) = run(config, &bits);
    assert_eq!(sink.packets.len(), 1);
    assert_eq!(sink.packets[0].data, b"odd");
}

#[test]
fn packets_through_channel() {
    let config = DeframerConfig::default().with_crc(true);
    let (mut tx, rx) = unbounded::<Packet>();

    let consumer = thread::spawn(move || rx.iter().map(|p: Packet| p.data).collect::<Vec<_>>());

    let mut deframer = Deframer::new(config).unwrap();
    for payload in [&b"first"[..], b"second"] {
        deframer.work(&frame_bits(&config, payload).unwrap(), &mut tx);
    }
    drop(tx);

    let got = consumer.join().unwrap();
    assert_eq!(got, vec![b"first".to_vec(), b"second".to_vec()]);
}

#[test]
fn deframe_packed_byte_stream() {
    let config = DeframerConfig::default().with_crc(true);
    let mut bits = vec![0u8; 5];
    bits.extend(frame_bits(&config, b"packed").unwrap());
    bits.extend(vec![0u8; 3]);
    let bytes = pack_bits(&bits);

    let packets: Vec<Packet> = deframe(
        read_bits(Cursor::new(bytes), true).map_while(Result::ok),
        config,
    )
    .unwrap()
    .collect();

    assert_eq!(packets.len(), 1);
    assert_eq!(packets[0].data, b"packed");
    assert_eq!(packets[0].integrity, Some(Integrity::Ok));
}

#[cfg(feature = "serde")]
#[test]
fn config_from_json() {
    let config: DeframerConfig = serde_json::from_str(
        r#"{"sync": {"pattern": 54161, "width": 16}, "has_crc": true, "check_crc": true}"#,
    )
    .unwrap();
    assert_eq!(config, DeframerConfig::default().with_crc(true));
    config.validate().unwrap();
}

#[cfg(feature = "serde")]
#[test]
fn packet_to_json() {
    let config = DeframerConfig::default().with_crc(true);
    let (_, sink) = run(config, &frame_bits(&config, b"AB").unwrap());
    let value = serde_json::to_value(&sink.packets[0]).unwrap();
    assert_eq!(value["length"], 2);
    assert_eq!(value["integrity"], "Ok");
}
