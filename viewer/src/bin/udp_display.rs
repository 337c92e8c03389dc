use anyhow::Context;
use clap::Parser;
use evview::cli::{display_size, UdpDisplayArgs};
use evview::udp::UdpInput;
use evview::window::Window;
use evview::Frame;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = UdpDisplayArgs::parse();
    let (width, height) = display_size(args.res_x, args.res_y, args.scale).with_context(|| {
        format!(
            "{}x{} at scale {} is too large to display",
            args.res_x, args.res_y, args.scale
        )
    })?;
    let mut window = Window::new("Events Display", width, height)?;
    let mut input = UdpInput::bind((args.res_x, args.res_y), args.port)
        .with_context(|| format!("binding UDP port {}", args.port))?;
    log::info!(
        "listening on {} ({}x{}, scale {})",
        input.local_addr()?,
        args.res_x,
        args.res_y,
        args.scale
    );

    // channels other than the event channel stay black
    let mut frame = Frame::new(args.res_x as u32, args.res_y as u32);
    loop {
        let events = input.read()?;
        frame.set_channel(1, events);
        if args.scale == 1 {
            window.show(frame.clone())?;
        } else {
            window.show(frame.resize(width, height))?;
        }
        window.poll_and_dispatch(std::time::Duration::from_millis(1))?;
    }
}
