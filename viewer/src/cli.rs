#[derive(clap::Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "udp-display", about = "Displays events streamed over UDP")]
pub struct UdpDisplayArgs {
    /// Port for events
    #[arg(short, long, default_value_t = 5050)]
    pub port: u16,

    /// Image scale
    #[arg(short, long, default_value_t = 1)]
    pub scale: u32,

    /// Image X resolution
    #[arg(short = 'x', long, default_value_t = 1280)]
    pub res_x: u16,

    /// Image Y resolution
    #[arg(short = 'y', long, default_value_t = 720)]
    pub res_y: u16,
}

#[derive(clap::Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "simple-viewer",
    about = "Visualizes events from a live camera or a RAW file"
)]
pub struct SimpleViewerArgs {
    /// Path to input RAW file. If not specified, the live stream of the first available
    /// camera is used. If it's a camera serial number, it will try to open that camera instead.
    #[arg(short = 'i', long = "input-raw-file", default_value = "")]
    pub input_path: String,

    /// Bias overrides applied to live cameras
    #[arg(short, long, default_value = "biases.bias")]
    pub bias_file: std::path::PathBuf,
}

/// Window size for a sensor of `res_x × res_y` pixels shown at `scale`.
///
/// Returns `None` if a dimension does not fit in a `u32`.
pub fn display_size(res_x: u16, res_y: u16, scale: u32) -> Option<(u32, u32)> {
    Some((
        (res_x as u32).checked_mul(scale)?,
        (res_y as u32).checked_mul(scale)?,
    ))
}
