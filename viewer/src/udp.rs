//! Events streamed over UDP.
//!
//! Each datagram carries little-endian 32-bit words, one event per word:
//!
//! ```text
//! 31          30..16  15        14..0
//! no-timestamp  y      polarity  x
//! ```

use evview_types::DvsPolarity;

const MAXIMUM_DATAGRAM_SIZE: usize = 1 << 16;

pub fn decode(word: u32) -> (u16, u16, DvsPolarity) {
    (
        (word & 0x7fff) as u16,
        ((word >> 16) & 0x7fff) as u16,
        if (word & (1 << 15)) > 0 {
            DvsPolarity::On
        } else {
            DvsPolarity::Off
        },
    )
}

pub fn encode(x: u16, y: u16, polarity: DvsPolarity) -> u32 {
    (1 << 31)
        | (((y as u32) & 0x7fff) << 16)
        | ((polarity as u32) << 15)
        | ((x as u32) & 0x7fff)
}

/// Per-pixel event counts, indexed by (x, y) with x varying slowest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFrame {
    width: u16,
    height: u16,
    counts: Vec<u32>,
}

impl EventFrame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            counts: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn count(&self, x: u16, y: u16) -> u32 {
        self.counts[x as usize * self.height as usize + y as usize]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|count| *count as u64).sum()
    }

    pub fn clear(&mut self) {
        self.counts.fill(0);
    }

    /// Returns false if the event lies outside the frame.
    pub fn add(&mut self, x: u16, y: u16) -> bool {
        if x < self.width && y < self.height {
            self.counts[x as usize * self.height as usize + y as usize] += 1;
            true
        } else {
            false
        }
    }

    pub fn add_datagram(&mut self, datagram: &[u8]) {
        for bytes in datagram.chunks_exact(4) {
            let (x, y, _) = decode(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]));
            self.add(x, y);
        }
    }
}

pub struct UdpInput {
    socket: std::net::UdpSocket,
    frame: EventFrame,
    buffer: Vec<u8>,
}

impl UdpInput {
    /// Listens on all interfaces.
    pub fn bind(resolution: (u16, u16), port: u16) -> Result<Self, crate::Error> {
        Self::from_socket(
            resolution,
            std::net::UdpSocket::bind((std::net::Ipv4Addr::UNSPECIFIED, port))?,
        )
    }

    pub fn from_socket(
        resolution: (u16, u16),
        socket: std::net::UdpSocket,
    ) -> Result<Self, crate::Error> {
        log::debug!("UDP input on {}", socket.local_addr()?);
        Ok(Self {
            socket,
            frame: EventFrame::new(resolution.0, resolution.1),
            buffer: vec![0; MAXIMUM_DATAGRAM_SIZE],
        })
    }

    pub fn local_addr(&self) -> Result<std::net::SocketAddr, crate::Error> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocks until a datagram arrives, then accumulates every datagram already queued.
    pub fn read(&mut self) -> Result<&EventFrame, crate::Error> {
        self.frame.clear();
        self.socket.set_nonblocking(false)?;
        let read = self.socket.recv(&mut self.buffer)?;
        self.frame.add_datagram(&self.buffer[..read]);
        self.socket.set_nonblocking(true)?;
        loop {
            match self.socket.recv(&mut self.buffer) {
                Ok(read) => self.frame.add_datagram(&self.buffer[..read]),
                Err(error) if error.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(error) => return Err(error.into()),
            }
        }
        Ok(&self.frame)
    }
}
