/// Property tests for the raw track store and archive codec

use proptest::prelude::*;
use rawtrack::io::{read_track, write_track, write_track_version};
use rawtrack::*;
use std::collections::BTreeSet;

/// A write: position (any sign, any magnitude), value and mark flag
fn write_op() -> impl Strategy<Value = (isize, u8, bool)> {
    (-20_000isize..20_000, any::<u8>(), any::<bool>())
}

fn track_with(length: usize, ops: &[(isize, u8, bool)]) -> RawTrack {
    let mut track = RawTrack::new(length);
    for &(pos, value, mark) in ops {
        track.write(pos, value, mark);
    }
    track
}

proptest! {
    #[test]
    fn index_matches_model(length in 1usize..8000, ops in prop::collection::vec(write_op(), 0..200)) {
        let mut track = RawTrack::new(length);
        let mut model = BTreeSet::new();

        for &(pos, value, mark) in &ops {
            track.write(pos, value, mark);
            let wrapped = pos.rem_euclid(length as isize) as usize;
            if mark {
                model.insert(wrapped);
            } else {
                model.remove(&wrapped);
            }
        }

        let expected: Vec<usize> = model.into_iter().collect();
        prop_assert_eq!(track.idam_offsets(), expected.as_slice());
        prop_assert!(track.idam_offsets().windows(2).all(|w| w[0] < w[1]));
        prop_assert!(track.idam_offsets().iter().all(|&i| i < length));
    }

    #[test]
    fn read_after_write(length in 1usize..8000, pos in any::<i32>(), value in any::<u8>()) {
        let mut track = RawTrack::new(length);
        let pos = pos as isize;
        track.write(pos, value, false);

        prop_assert_eq!(track.read(pos), value);
        prop_assert_eq!(track.read(pos + length as isize), value);
        prop_assert_eq!(track.read(pos - length as isize), value);
        prop_assert!(track.wrap_index(pos) < length);
    }

    #[test]
    fn block_write_wraps(length in 1usize..600, pos in -2000isize..2000, bytes in prop::collection::vec(any::<u8>(), 0..600)) {
        let bytes = &bytes[..bytes.len().min(length)];
        let mut track = RawTrack::new(length);
        track.write(pos, 0xFE, true);
        track.write_block(pos, bytes);

        let mut read_back = vec![0u8; bytes.len()];
        track.read_block(pos, &mut read_back);
        prop_assert_eq!(read_back.as_slice(), bytes);
        if !bytes.is_empty() {
            prop_assert!(track.idam_offsets().is_empty());
        }
    }

    #[test]
    fn crc_split_matches_whole(bytes in prop::collection::vec(any::<u8>(), 0..300), split in any::<prop::sample::Index>()) {
        let at = split.index(bytes.len() + 1);

        let mut whole = Crc16::new();
        whole.update_slice(&bytes);

        let mut parts = Crc16::new();
        parts.update_slice(&bytes[..at]);
        for &b in &bytes[at..] {
            parts.update(b);
        }

        prop_assert_eq!(whole.value(), parts.value());
    }

    #[test]
    fn track_crc_matches_linear(length in 1usize..500, pos in -1000isize..1000, count in 0usize..500, ops in prop::collection::vec(write_op(), 0..100)) {
        let track = track_with(length, &ops);

        let mut crc = Crc16::new();
        for i in 0..count as isize {
            crc.update(track.read(pos + i));
        }

        prop_assert_eq!(track.calc_crc(pos, count), crc.value());
    }

    #[test]
    fn archive_round_trip(length in 1usize..8000, ops in prop::collection::vec(write_op(), 0..100)) {
        let track = track_with(length, &ops);

        let mut buffer = Vec::new();
        write_track(&mut buffer, &track).unwrap();
        let restored = read_track(&mut buffer.as_slice()).unwrap();

        prop_assert_eq!(restored, track);
    }

    #[test]
    fn version_1_is_standard_length(ops in prop::collection::vec(write_op(), 0..100), trailing in prop::collection::vec(any::<u8>(), 0..16)) {
        let track = track_with(STANDARD_TRACK_SIZE, &ops);

        let mut buffer = Vec::new();
        write_track_version(&mut buffer, &track, 1).unwrap();
        buffer.extend_from_slice(&trailing);
        let restored = read_track(&mut buffer.as_slice()).unwrap();

        prop_assert_eq!(restored.len(), STANDARD_TRACK_SIZE);
        prop_assert_eq!(restored, track);
    }

    #[test]
    fn decoding_never_panics(length in 1usize..2000, ops in prop::collection::vec(write_op(), 0..300), from in any::<usize>()) {
        let mut track = track_with(length, &ops);

        for sector in track.decode_all() {
            prop_assert!(sector.is_complete());
            prop_assert!(sector.header_offset < length);
            prop_assert!(sector.data_offset().unwrap() < length);
        }
        if let Some(sector) = track.decode_next_sector(from) {
            prop_assert!(track.idam_offsets().contains(&sector.header_offset));
        }

        let index = track.idam_offsets().to_vec();
        track.apply_wd2793_read_track_quirk();
        prop_assert_eq!(track.idam_offsets(), index.as_slice());
        prop_assert_eq!(track.apply_wd2793_read_track_quirk(), 0);
    }
}
