use evview::source::{is_live_camera, Batch, EventsIterator, LiveReplay};
use evview_types::{DvsEvent, DvsPolarity};
use std::io::Write;

#[test]
fn live_camera_detection() {
    let file = tempfile::NamedTempFile::new().unwrap();
    assert!(!is_live_camera(file.path().to_str().unwrap()));
    assert!(is_live_camera(""));
    assert!(is_live_camera("00050423"));
    let directory = tempfile::tempdir().unwrap();
    assert!(is_live_camera(
        directory.path().join("missing.raw").to_str().unwrap()
    ));
}

#[test]
fn raw_file_batches() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"% format EVT3;height=4;width=8\n% end\n")
        .unwrap();
    for word in [0x8000u16, 0x6064, 0x0000, 0x2000 | 0x0800 | 5, 0x6070, 0x3000 | 2, 0x5000 | 0b11] {
        file.write_all(&word.to_le_bytes()).unwrap();
    }
    file.flush().unwrap();

    let iterator = EventsIterator::from_raw_file(file.path()).unwrap();
    assert_eq!((iterator.width(), iterator.height()), (8, 4));
    let batches = iterator.collect::<Result<Vec<Batch>, evview::Error>>().unwrap();
    let events = batches
        .iter()
        .flat_map(|batch| batch.events.iter().copied())
        .collect::<Vec<_>>();
    assert_eq!(
        events,
        vec![
            DvsEvent {
                t: 100,
                x: 5,
                y: 3,
                polarity: DvsPolarity::On
            },
            DvsEvent {
                t: 112,
                x: 2,
                y: 3,
                polarity: DvsPolarity::Off
            },
            DvsEvent {
                t: 112,
                x: 3,
                y: 3,
                polarity: DvsPolarity::Off
            },
        ]
    );
    assert_eq!(batches.last().map(|batch| batch.t), Some(112));
}

#[test]
fn unsupported_raw_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"% evt 2.0\n").unwrap();
    file.flush().unwrap();
    assert!(matches!(
        EventsIterator::from_raw_file(file.path()),
        Err(evview::Error::Raw(_))
    ));
}

fn batch(t: u64) -> Result<Batch, ()> {
    Ok(Batch {
        t,
        events: Vec::new(),
    })
}

#[test]
fn live_replay_pacing() {
    let start = std::time::Instant::now();
    let timestamps = LiveReplay::new(vec![batch(1_000), Err(()), batch(31_000), batch(61_000)].into_iter())
        .map(|batch| batch.map(|batch| batch.t))
        .collect::<Vec<_>>();
    assert_eq!(timestamps, vec![Ok(1_000), Err(()), Ok(31_000), Ok(61_000)]);
    assert!(start.elapsed() >= std::time::Duration::from_millis(60));
}

#[test]
fn live_replay_does_not_wait_for_past_batches() {
    let start = std::time::Instant::now();
    let count = LiveReplay::new(vec![batch(5_000_000), batch(1_000), batch(5_000_000)].into_iter())
        .count();
    assert_eq!(count, 3);
    assert!(start.elapsed() < std::time::Duration::from_secs(1));
}
