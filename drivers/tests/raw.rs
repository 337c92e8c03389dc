use evview_drivers::raw;
use std::io::Write;

#[test]
fn header() {
    let mut input = std::io::Cursor::new(
        b"% date 2023-01-01\n% format EVT3;height=480;width=640\n% end\n\x01\x80".to_vec(),
    );
    let header = raw::Header::parse(&mut input).unwrap();
    assert_eq!(header.width, 640);
    assert_eq!(header.height, 480);
    assert_eq!(header.format.as_deref(), Some("EVT3"));
    assert_eq!(header.lines.len(), 3);
    assert_eq!(input.position(), 59);
}

#[test]
fn legacy_header() {
    let header =
        raw::Header::parse(&mut std::io::Cursor::new(b"% evt 3.0\n% geometry 320x240\n".to_vec()))
            .unwrap();
    assert_eq!((header.width, header.height), (320, 240));
    assert_eq!(header.format.as_deref(), Some("EVT3"));
}

#[test]
fn default_geometry() {
    let header = raw::Header::parse(&mut std::io::Cursor::new(Vec::new())).unwrap();
    assert_eq!(
        (header.width, header.height),
        (raw::DEFAULT_WIDTH, raw::DEFAULT_HEIGHT)
    );
    assert_eq!(header.format, None);
}

#[test]
fn unsupported_format() {
    let result = raw::Header::parse(&mut std::io::Cursor::new(b"% evt 2.0\n".to_vec()));
    assert!(matches!(result, Err(raw::Error::Format(format)) if format == "EVT2"));
    let result = raw::Header::parse(&mut std::io::Cursor::new(b"% geometry 640\n".to_vec()));
    assert!(matches!(result, Err(raw::Error::Geometry(_))));
}

#[test]
fn read_whole_words() {
    let mut reader =
        raw::Reader::new(std::io::Cursor::new(b"% end\n\x01\x80\x05\x60\x0a".to_vec())).unwrap();
    let mut buffer = [0u8; 3];
    assert_eq!(reader.read(&mut buffer).unwrap(), 2);
    assert_eq!(&buffer[..2], &[0x01, 0x80]);
    assert_eq!(reader.read(&mut buffer).unwrap(), 2);
    assert_eq!(&buffer[..2], &[0x05, 0x60]);
    assert_eq!(reader.read(&mut buffer).unwrap(), 0);
}

#[test]
fn open_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"% format EVT3;height=720;width=1280\n% end\n")
        .unwrap();
    for word in [0x8001u16, 0x6005, 0x000A, 0x2000 | 0x0800 | 100] {
        file.write_all(&word.to_le_bytes()).unwrap();
    }
    file.flush().unwrap();

    let mut reader = raw::open(file.path()).unwrap();
    let mut adapter = reader.adapter();
    let mut buffer = vec![0u8; 1 << 10];
    let mut events = Vec::new();
    loop {
        let read = reader.read(&mut buffer).unwrap();
        if read == 0 {
            break;
        }
        adapter.convert_into(&buffer[..read], &mut events);
    }
    assert_eq!(
        events,
        vec![evview_drivers::types::DvsEvent {
            t: 4101,
            x: 100,
            y: 709,
            polarity: evview_drivers::types::DvsPolarity::On,
        }]
    );
}
