use crate::udp::EventFrame;

/// BGR raster, one byte per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    // image stores RGB by name only, channels are kept in BGR order
    image: image::RgbImage,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: image::RgbImage::new(width, height),
        }
    }

    pub fn from_color(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self {
            image: image::RgbImage::from_pixel(width, height, image::Rgb(color)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        self.image.put_pixel(x, y, image::Rgb(color));
    }

    pub fn fill(&mut self, color: [u8; 3]) {
        for pixel in self.image.pixels_mut() {
            pixel.0 = color;
        }
    }

    /// Overwrites one channel with the event counts, 255 where at least one event occurred.
    ///
    /// `events` is indexed by (x, y) and written transposed, row by row.
    /// The other channels are left untouched.
    pub fn set_channel(&mut self, channel: usize, events: &EventFrame) {
        let width = self.width().min(events.width() as u32);
        let height = self.height().min(events.height() as u32);
        for y in 0..height {
            for x in 0..width {
                self.image.get_pixel_mut(x, y).0[channel] =
                    if events.count(x as u16, y as u16) > 0 {
                        255
                    } else {
                        0
                    };
            }
        }
    }

    /// Resamples the frame. Integer upscaling replicates pixels, as area interpolation does.
    pub fn resize(&self, width: u32, height: u32) -> Frame {
        Frame {
            image: image::imageops::resize(
                &self.image,
                width,
                height,
                image::imageops::FilterType::Nearest,
            ),
        }
    }

    /// Packs pixels as 0RGB words, the layout expected by the window surface.
    pub fn write_0rgb(&self, output: &mut [u32]) {
        for (word, pixel) in output.iter_mut().zip(self.image.pixels()) {
            let [blue, green, red] = pixel.0;
            *word = ((red as u32) << 16) | ((green as u32) << 8) | (blue as u32);
        }
    }
}
