use crate::frame::Frame;
use crate::generator::PeriodicFrameGenerator;
use crate::source::Batch;

/// Where the viewer loop sends frames and from which it receives close requests.
pub trait Screen {
    fn poll_and_dispatch(&mut self, timeout: std::time::Duration) -> Result<(), crate::Error>;

    fn show(&mut self, frame: Frame) -> Result<(), crate::Error>;

    fn should_close(&self) -> bool;
}

impl Screen for crate::window::Window {
    fn poll_and_dispatch(&mut self, timeout: std::time::Duration) -> Result<(), crate::Error> {
        crate::window::Window::poll_and_dispatch(self, timeout)
    }

    fn show(&mut self, frame: Frame) -> Result<(), crate::Error> {
        crate::window::Window::show(self, frame)
    }

    fn should_close(&self) -> bool {
        crate::window::Window::should_close(self)
    }
}

/// Renders batches until they run out or the screen asks to close.
///
/// Pending system events are dispatched before each batch. The batch is then fed
/// to the generator, the last frame it completes is shown, and the close request
/// is checked. Returns the number of batches processed.
pub fn play<Batches, Output>(
    batches: Batches,
    generator: &mut PeriodicFrameGenerator,
    screen: &mut Output,
) -> Result<usize, crate::Error>
where
    Batches: IntoIterator<Item = Result<Batch, crate::Error>>,
    Output: Screen,
{
    let mut processed = 0;
    for batch in batches {
        screen.poll_and_dispatch(std::time::Duration::ZERO)?;
        let batch = batch?;
        let mut latest: Option<Frame> = None;
        generator.process_events(&batch.events, |_, frame| latest = Some(frame.clone()));
        if let Some(frame) = latest {
            screen.show(frame)?;
        }
        processed += 1;
        if screen.should_close() {
            log::debug!("close requested after {processed} batches");
            break;
        }
    }
    Ok(processed)
}
