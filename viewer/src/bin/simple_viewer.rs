use anyhow::Context;
use clap::Parser;
use evview::biases;
use evview::cli::SimpleViewerArgs;
use evview::generator::{Palette, PeriodicFrameGenerator};
use evview::player;
use evview::source::{is_live_camera, Batch, EventsIterator, LiveReplay};
use evview::window::{close_on_exit_key, Window};
use std::process::ExitCode;

const FPS: f64 = 25.0;

type Batches = Box<dyn Iterator<Item = Result<Batch, evview::Error>>>;

fn open_camera(args: &SimpleViewerArgs) -> anyhow::Result<Option<EventsIterator>> {
    let serial = if args.input_path.is_empty() {
        None
    } else {
        Some(args.input_path.as_str())
    };
    let mut device = match evview::drivers::open(serial, None, None) {
        Ok(device) => device,
        Err(error) => {
            log::error!("{error}");
            match evview::drivers::list_devices() {
                Ok(listed_devices) => {
                    for listed_device in listed_devices {
                        log::info!("found {listed_device}");
                    }
                }
                Err(error) => log::debug!("listing devices failed: {error}"),
            }
            log::error!(
                "Could not open camera. Make sure you have an event-based device plugged in"
            );
            return Ok(None);
        }
    };
    log::info!(
        "opened {} (serial {}, {})",
        device.name(),
        device.serial(),
        device.speed()
    );
    let mut configuration = device.configuration();
    if biases::apply_file(&mut configuration, &args.bias_file)
        .with_context(|| format!("parsing {}", args.bias_file.display()))?
        > 0
    {
        device.update_configuration(configuration)?;
    }
    log::debug!(
        "configuration: {}",
        serde_json::to_string(&device.configuration())?
    );
    Ok(Some(EventsIterator::from_device(device)))
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = SimpleViewerArgs::parse();

    let (width, height, batches) = if is_live_camera(&args.input_path) {
        match open_camera(&args)? {
            Some(iterator) => (
                iterator.width(),
                iterator.height(),
                Box::new(iterator) as Batches,
            ),
            None => return Ok(ExitCode::FAILURE),
        }
    } else {
        let iterator = EventsIterator::from_raw_file(&args.input_path)
            .with_context(|| format!("opening {}", args.input_path))?;
        log::info!("reading {}", args.input_path);
        (
            iterator.width(),
            iterator.height(),
            Box::new(LiveReplay::new(iterator)) as Batches,
        )
    };

    let mut window = Window::new("Events Viewer", 2 * width as u32, 2 * height as u32)?;
    window.set_keyboard_callback(close_on_exit_key(window.close_flag()));
    let mut generator = PeriodicFrameGenerator::new(width, height, FPS, Palette::Dark);

    let processed = player::play(batches, &mut generator, &mut window)?;
    log::debug!("{processed} batches processed");
    Ok(ExitCode::SUCCESS)
}
