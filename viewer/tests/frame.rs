use evview::udp::EventFrame;
use evview::Frame;

#[test]
fn set_channel_transposes_counts() {
    let mut events = EventFrame::new(3, 2);
    assert!(events.add(2, 1));
    assert!(events.add(2, 1));
    assert!(events.add(0, 0));
    assert!(!events.add(3, 0));
    let mut frame = Frame::from_color(3, 2, [7, 0, 9]);
    frame.set_channel(1, &events);
    assert_eq!(frame.pixel(2, 1), [7, 255, 9]);
    assert_eq!(frame.pixel(0, 0), [7, 255, 9]);
    assert_eq!(frame.pixel(1, 0), [7, 0, 9]);

    events.clear();
    frame.set_channel(1, &events);
    assert_eq!(frame, Frame::from_color(3, 2, [7, 0, 9]));
}

#[test]
fn resize_replicates_pixels() {
    let mut frame = Frame::new(2, 1);
    frame.set_pixel(1, 0, [10, 20, 30]);
    let resized = frame.resize(4, 2);
    assert_eq!((resized.width(), resized.height()), (4, 2));
    for y in 0..2 {
        assert_eq!(resized.pixel(0, y), [0, 0, 0]);
        assert_eq!(resized.pixel(1, y), [0, 0, 0]);
        assert_eq!(resized.pixel(2, y), [10, 20, 30]);
        assert_eq!(resized.pixel(3, y), [10, 20, 30]);
    }
}

#[test]
fn write_0rgb() {
    let mut frame = Frame::new(2, 1);
    frame.fill([0x01, 0x02, 0x03]);
    frame.set_pixel(1, 0, [0xff, 0x00, 0x80]);
    let mut output = [0u32; 2];
    frame.write_0rgb(&mut output);
    assert_eq!(output, [0x0003_0201, 0x0080_00ff]);
}
