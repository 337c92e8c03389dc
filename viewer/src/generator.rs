use crate::frame::Frame;
use evview_types::{DvsEvent, DvsPolarity};

/// BGR colors used to render events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Light,
    Dark,
    Gray,
}

impl Palette {
    pub fn background(self) -> [u8; 3] {
        match self {
            Palette::Light => [255, 255, 255],
            Palette::Dark => [52, 37, 30],
            Palette::Gray => [128, 128, 128],
        }
    }

    pub fn on(self) -> [u8; 3] {
        match self {
            Palette::Light => [201, 126, 64],
            Palette::Dark => [236, 223, 216],
            Palette::Gray => [255, 255, 255],
        }
    }

    pub fn off(self) -> [u8; 3] {
        match self {
            Palette::Light => [52, 37, 30],
            Palette::Dark => [201, 126, 64],
            Palette::Gray => [0, 0, 0],
        }
    }
}

pub const DEFAULT_ACCUMULATION_TIME_US: u64 = 10_000;

const NO_EVENT: u64 = u64::MAX;

/// Renders a frame every `1 / fps` seconds of event time.
///
/// A frame generated at `t` shows the last event of each pixel in
/// `[t - accumulation time, t)`. Frames are timestamped on multiples of the period.
pub struct PeriodicFrameGenerator {
    width: u16,
    height: u16,
    period_us: u64,
    accumulation_time_us: u64,
    palette: Palette,
    next_frame_t: Option<u64>,
    last_ts: Vec<u64>,
    last_polarities: Vec<DvsPolarity>,
    frame: Frame,
}

impl PeriodicFrameGenerator {
    pub fn new(width: u16, height: u16, fps: f64, palette: Palette) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            period_us: ((1e6 / fps).round() as u64).max(1),
            accumulation_time_us: DEFAULT_ACCUMULATION_TIME_US,
            palette,
            next_frame_t: None,
            last_ts: vec![NO_EVENT; pixels],
            last_polarities: vec![DvsPolarity::Off; pixels],
            frame: Frame::from_color(width as u32, height as u32, palette.background()),
        }
    }

    pub fn set_accumulation_time_us(&mut self, accumulation_time_us: u64) {
        self.accumulation_time_us = accumulation_time_us;
    }

    pub fn period_us(&self) -> u64 {
        self.period_us
    }

    /// Feeds time-ordered events, calling `handle_frame(t, frame)` for every frame they complete.
    ///
    /// When events are more than one period apart, the frame at the first pending
    /// boundary is generated, then boundaries are skipped up to the last one.
    pub fn process_events<HandleFrame>(
        &mut self,
        events: &[DvsEvent<u64, u16, u16>],
        mut handle_frame: HandleFrame,
    ) where
        HandleFrame: FnMut(u64, &Frame),
    {
        for event in events {
            let (t, x, y, polarity) = (event.t, event.x, event.y, event.polarity);
            let mut next_frame_t = match self.next_frame_t {
                Some(next_frame_t) => next_frame_t,
                None => (t / self.period_us + 1) * self.period_us,
            };
            while t >= next_frame_t {
                self.render(next_frame_t);
                handle_frame(next_frame_t, &self.frame);
                next_frame_t += self.period_us;
                if t >= next_frame_t + self.period_us {
                    next_frame_t = (t / self.period_us) * self.period_us;
                }
            }
            self.next_frame_t = Some(next_frame_t);
            if x < self.width && y < self.height {
                let index = y as usize * self.width as usize + x as usize;
                self.last_ts[index] = t;
                self.last_polarities[index] = polarity;
            }
        }
    }

    fn render(&mut self, frame_t: u64) {
        let start_t = frame_t.saturating_sub(self.accumulation_time_us);
        let width = self.width as usize;
        for (index, (t, polarity)) in self
            .last_ts
            .iter()
            .zip(self.last_polarities.iter())
            .enumerate()
        {
            let color = if *t != NO_EVENT && *t >= start_t && *t < frame_t {
                match polarity {
                    DvsPolarity::On => self.palette.on(),
                    DvsPolarity::Off => self.palette.off(),
                }
            } else {
                self.palette.background()
            };
            self.frame
                .set_pixel((index % width) as u32, (index / width) as u32, color);
        }
    }
}
