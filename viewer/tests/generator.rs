use evview::generator::{Palette, PeriodicFrameGenerator};
use evview_types::{DvsEvent, DvsPolarity};

fn event(t: u64, x: u16, y: u16, polarity: DvsPolarity) -> DvsEvent<u64, u16, u16> {
    DvsEvent { t, x, y, polarity }
}

#[test]
fn period() {
    assert_eq!(PeriodicFrameGenerator::new(4, 2, 25.0, Palette::Dark).period_us(), 40_000);
    assert_eq!(PeriodicFrameGenerator::new(4, 2, 30.0, Palette::Dark).period_us(), 33_333);
}

#[test]
fn cadence_and_palette() {
    let mut generator = PeriodicFrameGenerator::new(4, 2, 25.0, Palette::Dark);
    let mut frames = Vec::new();
    generator.process_events(
        &[
            event(5_000, 0, 0, DvsPolarity::On),
            event(35_000, 1, 0, DvsPolarity::On),
            event(36_000, 2, 1, DvsPolarity::Off),
        ],
        |t, frame| frames.push((t, frame.clone())),
    );
    assert!(frames.is_empty());
    generator.process_events(&[event(41_000, 3, 0, DvsPolarity::On)], |t, frame| {
        frames.push((t, frame.clone()))
    });
    assert_eq!(frames.len(), 1);
    let (t, frame) = &frames[0];
    assert_eq!(*t, 40_000);
    assert_eq!((frame.width(), frame.height()), (4, 2));
    assert_eq!(frame.pixel(0, 0), Palette::Dark.background());
    assert_eq!(frame.pixel(1, 0), Palette::Dark.on());
    assert_eq!(frame.pixel(2, 1), Palette::Dark.off());
    assert_eq!(frame.pixel(3, 0), Palette::Dark.background());

    frames.clear();
    generator.process_events(&[event(125_000, 0, 1, DvsPolarity::On)], |t, frame| {
        frames.push((t, frame.clone()))
    });
    assert_eq!(
        frames.iter().map(|(t, _)| *t).collect::<Vec<_>>(),
        vec![80_000, 120_000]
    );
    // 41000 is outside [70000, 80000)
    assert_eq!(frames[0].1.pixel(3, 0), Palette::Dark.background());
}

#[test]
fn skips_empty_periods() {
    let mut generator = PeriodicFrameGenerator::new(2, 2, 25.0, Palette::Gray);
    let mut timestamps = Vec::new();
    generator.process_events(
        &[
            event(125_000, 0, 0, DvsPolarity::On),
            event(1_000_000, 1, 1, DvsPolarity::Off),
        ],
        |t, _| timestamps.push(t),
    );
    assert_eq!(timestamps, vec![160_000, 1_000_000]);
}

#[test]
fn accumulation_time() {
    let mut generator = PeriodicFrameGenerator::new(2, 1, 25.0, Palette::Light);
    generator.set_accumulation_time_us(40_000);
    let mut frames = Vec::new();
    generator.process_events(
        &[
            event(5_000, 0, 0, DvsPolarity::Off),
            event(40_000, 1, 0, DvsPolarity::On),
        ],
        |_, frame| frames.push(frame.clone()),
    );
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].pixel(0, 0), Palette::Light.off());
    assert_eq!(frames[0].pixel(1, 0), Palette::Light.background());
}

#[test]
fn out_of_bounds_events_are_ignored() {
    let mut generator = PeriodicFrameGenerator::new(2, 2, 25.0, Palette::Dark);
    let mut frames = Vec::new();
    generator.process_events(
        &[
            event(39_000, 2, 0, DvsPolarity::On),
            event(39_000, 0, 5, DvsPolarity::On),
            event(40_000, 0, 0, DvsPolarity::On),
        ],
        |_, frame| frames.push(frame.clone()),
    );
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0], evview::Frame::from_color(2, 2, Palette::Dark.background()));
}
