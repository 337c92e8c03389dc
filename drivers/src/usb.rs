#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Configuration {
    pub buffer_size: usize,
    pub timeout: std::time::Duration,
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error(transparent)]
    Rusb(#[from] rusb::Error),

    #[error("device with serial not found")]
    Serial(String),

    #[error("device not found")]
    Device,

    #[error("the device is already used by another program")]
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Speed {
    Unknown,
    Low,
    Full,
    High,
    Super,
    SuperPlus,
}

impl From<rusb::Speed> for Speed {
    fn from(speed: rusb::Speed) -> Self {
        match speed {
            rusb::Speed::Low => Self::Low,
            rusb::Speed::Full => Self::Full,
            rusb::Speed::High => Self::High,
            rusb::Speed::Super => Self::Super,
            rusb::Speed::SuperPlus => Self::SuperPlus,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Speed {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            Self::Unknown => "USB Unknown speed",
            Self::Low => "USB 1.0 Low Speed (1.5 Mb/s)",
            Self::Full => "USB 1.1 Full Speed (12 Mb/s)",
            Self::High => "USB 2.0 High Speed (480 Mb/s)",
            Self::Super => "USB 3.0 SuperSpeed (5.0 Gb/s)",
            Self::SuperPlus => "USB 3.1 SuperSpeed+ (10.0 Gb/s)",
        })
    }
}

/// Blocking bulk reader bound to one IN endpoint.
///
/// A timeout is not an error: the read returns zero bytes so that callers
/// can service their own event loop between packets.
pub struct BulkReader {
    handle: std::sync::Arc<rusb::DeviceHandle<rusb::Context>>,
    endpoint: u8,
    timeout: std::time::Duration,
}

impl BulkReader {
    pub fn new(
        handle: std::sync::Arc<rusb::DeviceHandle<rusb::Context>>,
        endpoint: u8,
        timeout: std::time::Duration,
    ) -> Self {
        Self {
            handle,
            endpoint,
            timeout,
        }
    }

    pub fn read(&self, buffer: &mut [u8]) -> Result<usize, Error> {
        match self.handle.read_bulk(self.endpoint, buffer, self.timeout) {
            Ok(read) => Ok(read),
            Err(rusb::Error::Timeout) => Ok(0),
            Err(rusb::Error::Busy) => Err(Error::Busy),
            Err(error) => Err(error.into()),
        }
    }
}
