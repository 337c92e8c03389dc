use evview_types::{DvsEvent, DvsPolarity, TriggerEvent, TriggerPolarity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventsLengths {
    pub dvs: usize,
    pub trigger: usize,
}

/// Stateful EVT3 decoder.
///
/// EVT3 packets are streams of little-endian 16-bit words. Coordinates and
/// time are sticky: a word only updates the field it carries. Decoded `y`
/// has its origin at the top of the sensor.
pub struct Adapter {
    t: u64,
    overflows: u32,
    previous_msb_t: u16,
    previous_lsb_t: u16,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    polarity: DvsPolarity,
}

fn words(slice: &[u8]) -> impl Iterator<Item = u16> + '_ {
    slice
        .chunks_exact(2)
        .map(|bytes| u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn polarity(word: u16) -> DvsPolarity {
    if (word & (1 << 11)) > 0 {
        DvsPolarity::On
    } else {
        DvsPolarity::Off
    }
}

impl Adapter {
    pub fn from_dimensions(width: u16, height: u16) -> Self {
        Self {
            t: 0,
            overflows: 0,
            previous_msb_t: 0,
            previous_lsb_t: 0,
            x: 0,
            y: 0,
            width,
            height,
            polarity: DvsPolarity::Off,
        }
    }

    /// Counts the events that `convert` would produce, without changing the state.
    pub fn events_lengths(&self, slice: &[u8]) -> EventsLengths {
        let mut lengths = EventsLengths::default();
        let mut x = self.x;
        let mut y = self.y;
        for word in words(slice) {
            match word >> 12 {
                0b0000 => {
                    y = word & 0b11111111111;
                }
                0b0010 => {
                    x = word & 0b11111111111;
                    if x < self.width && y < self.height {
                        lengths.dvs += 1;
                    }
                }
                0b0011 => {
                    x = word & 0b11111111111;
                }
                0b0100 => {
                    if x < self.width && y < self.height {
                        lengths.dvs += (word & self.vector_mask(x, 12)).count_ones() as usize;
                        x += 12;
                    }
                }
                0b0101 => {
                    if x < self.width && y < self.height {
                        lengths.dvs += (word & self.vector_mask(x, 8)).count_ones() as usize;
                        x += 8;
                    }
                }
                0b1010 => {
                    lengths.trigger += 1;
                }
                _ => (),
            }
        }
        lengths
    }

    pub fn current_t(&self) -> u64 {
        (((self.previous_lsb_t as u32) | ((self.previous_msb_t as u32) << 12)) as u64)
            | ((self.overflows as u64) << 24)
    }

    pub fn convert<HandleDvsEvent, HandleTriggerEvent>(
        &mut self,
        slice: &[u8],
        mut handle_dvs_event: HandleDvsEvent,
        mut handle_trigger_event: HandleTriggerEvent,
    ) where
        HandleDvsEvent: FnMut(DvsEvent<u64, u16, u16>),
        HandleTriggerEvent: FnMut(TriggerEvent<u64, u8>),
    {
        for word in words(slice) {
            match word >> 12 {
                0b0000 => {
                    self.y = word & 0b11111111111;
                    if self.y < self.height {
                        self.y = self.height - 1 - self.y;
                    }
                }
                0b0010 => {
                    self.x = word & 0b11111111111;
                    self.polarity = polarity(word);
                    if self.x < self.width && self.y < self.height {
                        handle_dvs_event(DvsEvent {
                            t: self.t,
                            x: self.x,
                            y: self.y,
                            polarity: self.polarity,
                        });
                    }
                }
                0b0011 => {
                    self.x = word & 0b11111111111;
                    self.polarity = polarity(word);
                }
                0b0100 => self.vector(word, 12, &mut handle_dvs_event),
                0b0101 => self.vector(word, 8, &mut handle_dvs_event),
                0b0110 => self.update_lsb_t(word),
                0b1000 => self.update_msb_t(word),
                0b1010 => handle_trigger_event(TriggerEvent {
                    t: self.t,
                    id: ((word >> 8) & 0b1111) as u8,
                    polarity: if (word & 1) > 0 {
                        TriggerPolarity::Rising
                    } else {
                        TriggerPolarity::Falling
                    },
                }),
                _ => (),
            }
        }
    }

    /// Decodes and stores the events of `slice` at the end of `events`.
    pub fn convert_into(&mut self, slice: &[u8], events: &mut Vec<DvsEvent<u64, u16, u16>>) {
        events.reserve_exact(self.events_lengths(slice).dvs);
        self.convert(slice, |event| events.push(event), |_| {});
    }

    /// Updates the clock without decoding events.
    pub fn consume(&mut self, slice: &[u8]) {
        for word in words(slice) {
            match word >> 12 {
                0b0110 => self.update_lsb_t(word),
                0b1000 => self.update_msb_t(word),
                _ => (),
            }
        }
    }

    fn vector_mask(&self, x: u16, bits: u16) -> u16 {
        (1 << std::cmp::min(bits, self.width - x)) - 1
    }

    fn vector<HandleDvsEvent>(&mut self, word: u16, bits: u16, handle_dvs_event: &mut HandleDvsEvent)
    where
        HandleDvsEvent: FnMut(DvsEvent<u64, u16, u16>),
    {
        if self.x < self.width && self.y < self.height {
            let set = word & self.vector_mask(self.x, bits);
            for bit in 0..bits {
                if (set & (1 << bit)) > 0 {
                    handle_dvs_event(DvsEvent {
                        t: self.t,
                        x: self.x + bit,
                        y: self.y,
                        polarity: self.polarity,
                    });
                }
            }
            self.x += bits;
        }
    }

    fn update_lsb_t(&mut self, word: u16) {
        let lsb_t = word & 0b111111111111;
        if lsb_t != self.previous_lsb_t {
            self.previous_lsb_t = lsb_t;
            self.advance();
        }
    }

    fn update_msb_t(&mut self, word: u16) {
        let msb_t = word & 0b111111111111;
        if msb_t != self.previous_msb_t {
            if msb_t > self.previous_msb_t {
                if (msb_t - self.previous_msb_t) < (1 << 11) {
                    self.previous_lsb_t = 0;
                    self.previous_msb_t = msb_t;
                }
            } else if (self.previous_msb_t - msb_t) > (1 << 11) {
                self.overflows += 1;
                self.previous_lsb_t = 0;
                self.previous_msb_t = msb_t;
            }
            self.advance();
        }
    }

    // the clock never goes backwards
    fn advance(&mut self) {
        let t = self.current_t();
        if t >= self.t {
            self.t = t;
        }
    }
}
