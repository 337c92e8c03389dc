//! Prophesee RAW recordings.
//!
//! A RAW file starts with text lines prefixed with `%` (the header), for instance
//! `% format EVT3;height=720;width=1280` or `% geometry 1280x720`, optionally
//! closed by `% end`. The encoded events follow immediately.

use crate::adapters;

pub const DEFAULT_WIDTH: u16 = 1280;
pub const DEFAULT_HEIGHT: u16 = 720;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unsupported event format \"{0}\" (only EVT3 is supported)")]
    Format(String),

    #[error("invalid geometry \"{0}\"")]
    Geometry(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub width: u16,
    pub height: u16,
    pub format: Option<String>,
    pub lines: Vec<String>,
}

fn parse_dimension(value: &str, entry: &str) -> Result<u16, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Geometry(entry.to_owned()))
}

impl Header {
    pub fn parse<R: std::io::BufRead>(reader: &mut R) -> Result<Self, Error> {
        let mut header = Header {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            format: None,
            lines: Vec::new(),
        };
        let mut line = Vec::new();
        while reader.fill_buf()?.first() == Some(&b'%') {
            line.clear();
            reader.read_until(b'\n', &mut line)?;
            let text = String::from_utf8_lossy(&line);
            let text = text.trim_start_matches('%').trim();
            header.lines.push(text.to_owned());
            if text == "end" {
                break;
            }
            let (key, value) = match text.split_once(' ') {
                Some((key, value)) => (key, value.trim()),
                None => continue,
            };
            match key {
                "format" => {
                    let mut fields = value.split(';');
                    // unwrap: split always yields at least one field
                    header.format = Some(fields.next().unwrap().trim().to_owned());
                    for field in fields {
                        match field.split_once('=') {
                            Some(("width", width)) => header.width = parse_dimension(width, text)?,
                            Some(("height", height)) => {
                                header.height = parse_dimension(height, text)?
                            }
                            _ => (),
                        }
                    }
                }
                "evt" => {
                    if header.format.is_none() {
                        header.format = Some(match value {
                            "3.0" => "EVT3".to_owned(),
                            "2.0" => "EVT2".to_owned(),
                            "2.1" => "EVT21".to_owned(),
                            other => format!("evt {other}"),
                        });
                    }
                }
                "geometry" => {
                    let (width, height) = value
                        .split_once('x')
                        .ok_or_else(|| Error::Geometry(text.to_owned()))?;
                    header.width = parse_dimension(width, text)?;
                    header.height = parse_dimension(height, text)?;
                }
                _ => (),
            }
        }
        if let Some(format) = &header.format {
            if !format.eq_ignore_ascii_case("EVT3") {
                return Err(Error::Format(format.clone()));
            }
        }
        Ok(header)
    }
}

pub struct Reader<R> {
    inner: R,
    header: Header,
    carry: Option<u8>,
}

pub fn open<P: AsRef<std::path::Path>>(
    path: P,
) -> Result<Reader<std::io::BufReader<std::fs::File>>, Error> {
    Reader::new(std::io::BufReader::new(std::fs::File::open(path)?))
}

impl<R: std::io::BufRead> Reader<R> {
    pub fn new(mut inner: R) -> Result<Self, Error> {
        let header = Header::parse(&mut inner)?;
        log::debug!(
            "RAW header: {}x{}, format {:?}",
            header.width,
            header.height,
            header.format
        );
        Ok(Self {
            inner,
            header,
            carry: None,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn adapter(&self) -> adapters::evt3::Adapter {
        adapters::evt3::Adapter::from_dimensions(self.header.width, self.header.height)
    }

    /// Fills `buffer` with whole 16-bit words and returns the number of bytes.
    ///
    /// An odd trailing byte is kept for the next call. Returns 0 at the end of the file.
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Error> {
        let mut length = 0;
        if let Some(byte) = self.carry.take() {
            buffer[0] = byte;
            length = 1;
        }
        while length < buffer.len() {
            match self.inner.read(&mut buffer[length..]) {
                Ok(0) => break,
                Ok(read) => length += read,
                Err(error) if error.kind() == std::io::ErrorKind::Interrupted => (),
                Err(error) => return Err(error.into()),
            }
        }
        if length % 2 == 1 {
            length -= 1;
            self.carry = Some(buffer[length]);
        }
        Ok(length)
    }
}
