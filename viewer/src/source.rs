use evview_drivers::adapters;
use evview_drivers::raw;
use evview_types::DvsEvent;

const RAW_CHUNK_SIZE: usize = 1 << 14;

/// Events decoded from one USB packet or one file chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Decoder clock after the batch, in µs.
    pub t: u64,
    pub events: Vec<DvsEvent<u64, u16, u16>>,
}

/// Returns true unless `input_path` names an existing file.
///
/// An empty path or a camera serial selects a live camera.
pub fn is_live_camera(input_path: &str) -> bool {
    !std::path::Path::new(input_path).exists()
}

enum Input {
    Device(evview_drivers::Device),
    Raw(raw::Reader<std::io::BufReader<std::fs::File>>),
}

/// Iterates over event batches from a camera or a RAW file.
///
/// Camera batches are empty when no packet arrived before the USB timeout.
/// A RAW iterator ends with the file. The iterator ends after the first error.
pub struct EventsIterator {
    input: Input,
    adapter: adapters::Adapter,
    buffer: Vec<u8>,
    width: u16,
    height: u16,
    finished: bool,
}

impl EventsIterator {
    pub fn from_device(device: evview_drivers::Device) -> Self {
        Self {
            adapter: device.adapter(),
            buffer: vec![0; device.buffer_size()],
            width: device.width(),
            height: device.height(),
            input: Input::Device(device),
            finished: false,
        }
    }

    pub fn from_raw_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, crate::Error> {
        let reader = raw::open(path)?;
        Ok(Self {
            adapter: reader.adapter().into(),
            buffer: vec![0; RAW_CHUNK_SIZE],
            width: reader.header().width,
            height: reader.header().height,
            input: Input::Raw(reader),
            finished: false,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }
}

impl Iterator for EventsIterator {
    type Item = Result<Batch, crate::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let read = match &mut self.input {
            Input::Device(device) => device.read(&mut self.buffer).map_err(crate::Error::from),
            Input::Raw(reader) => match reader.read(&mut self.buffer) {
                Ok(0) => {
                    self.finished = true;
                    return None;
                }
                result => result.map_err(crate::Error::from),
            },
        };
        match read {
            Ok(read) => {
                let mut events = Vec::new();
                self.adapter.convert_into(&self.buffer[..read], &mut events);
                Some(Ok(Batch {
                    t: self.adapter.current_t(),
                    events,
                }))
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

/// Delays batches so that they are delivered at the pace they were recorded.
pub struct LiveReplay<Inner> {
    inner: Inner,
    origin: Option<(std::time::Instant, u64)>,
}

impl<Inner> LiveReplay<Inner> {
    pub fn new(inner: Inner) -> Self {
        Self {
            inner,
            origin: None,
        }
    }
}

impl<Inner, Error> Iterator for LiveReplay<Inner>
where
    Inner: Iterator<Item = Result<Batch, Error>>,
{
    type Item = Result<Batch, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        if let Ok(batch) = &item {
            match self.origin {
                Some((instant, t)) => {
                    let deadline =
                        instant + std::time::Duration::from_micros(batch.t.saturating_sub(t));
                    let now = std::time::Instant::now();
                    if deadline > now {
                        std::thread::sleep(deadline - now);
                    }
                }
                None => self.origin = Some((std::time::Instant::now(), batch.t)),
            }
        }
        Some(item)
    }
}
