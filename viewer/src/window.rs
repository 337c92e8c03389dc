//! Frame display window.
//!
//! The window does not own a render loop. Callers push frames with [`Window::show`]
//! and pump system events with [`Window::poll_and_dispatch`] between reads.

use crate::frame::Frame;
use std::num::NonZeroU32;
use std::rc::Rc;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Q,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

pub fn is_exit_key(key: Key) -> bool {
    matches!(key, Key::Escape | Key::Q)
}

/// Shared "should close" state, set by the window or by keyboard callbacks.
#[derive(Debug, Clone, Default)]
pub struct CloseFlag(Rc<std::cell::Cell<bool>>);

impl CloseFlag {
    pub fn set(&self) {
        self.0.set(true);
    }

    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

/// Keyboard callback that sets `flag` on any action on Escape or Q.
pub fn close_on_exit_key(flag: CloseFlag) -> impl FnMut(Key, KeyAction) {
    move |key, _| {
        if is_exit_key(key) {
            flag.set();
        }
    }
}

pub type KeyboardCallback = Box<dyn FnMut(Key, KeyAction)>;

fn key_from_event(event: &winit::event::KeyEvent) -> (Key, KeyAction) {
    use winit::keyboard::{KeyCode, PhysicalKey};
    let key = match event.physical_key {
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        PhysicalKey::Code(KeyCode::KeyQ) => Key::Q,
        _ => Key::Other,
    };
    let action = match (event.state, event.repeat) {
        (winit::event::ElementState::Released, _) => KeyAction::Release,
        (winit::event::ElementState::Pressed, true) => KeyAction::Repeat,
        (winit::event::ElementState::Pressed, false) => KeyAction::Press,
    };
    (key, action)
}

pub struct Window {
    // fields drop in order, the surface must go before the window and the event loop last
    surface: softbuffer::Surface<Rc<winit::window::Window>, Rc<winit::window::Window>>,
    _context: softbuffer::Context<Rc<winit::window::Window>>,
    window: Rc<winit::window::Window>,
    frame: Option<Frame>,
    close_flag: CloseFlag,
    keyboard_callback: Option<KeyboardCallback>,
    event_loop: winit::event_loop::EventLoop<()>,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, crate::Error> {
        let event_loop = winit::event_loop::EventLoop::new()?;
        let window = Rc::new(
            winit::window::WindowBuilder::new()
                .with_title(title)
                .with_inner_size(winit::dpi::PhysicalSize::new(width, height))
                .build(&event_loop)?,
        );
        let context = softbuffer::Context::new(window.clone())?;
        let surface = softbuffer::Surface::new(&context, window.clone())?;
        log::debug!("window \"{title}\" ({width}x{height})");
        Ok(Self {
            surface,
            _context: context,
            window,
            frame: None,
            close_flag: CloseFlag::default(),
            keyboard_callback: None,
            event_loop,
        })
    }

    pub fn close_flag(&self) -> CloseFlag {
        self.close_flag.clone()
    }

    pub fn set_close_flag(&self) {
        self.close_flag.set();
    }

    pub fn should_close(&self) -> bool {
        self.close_flag.is_set()
    }

    pub fn set_keyboard_callback<Callback>(&mut self, callback: Callback)
    where
        Callback: FnMut(Key, KeyAction) + 'static,
    {
        self.keyboard_callback = Some(Box::new(callback));
    }

    /// Displays `frame` until the next call. The frame is stretched to the window.
    pub fn show(&mut self, frame: Frame) -> Result<(), crate::Error> {
        self.frame = Some(frame);
        self.present()
    }

    fn present(&mut self) -> Result<(), crate::Error> {
        let frame = match &self.frame {
            Some(frame) => frame,
            None => return Ok(()),
        };
        let size = self.window.inner_size();
        let (width, height) = match (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            (Some(width), Some(height)) => (width, height),
            _ => return Ok(()), // minimized
        };
        self.surface.resize(width, height)?;
        let mut buffer = self.surface.buffer_mut()?;
        if frame.width() == width.get() && frame.height() == height.get() {
            frame.write_0rgb(&mut buffer);
        } else {
            frame
                .resize(width.get(), height.get())
                .write_0rgb(&mut buffer);
        }
        buffer.present()?;
        Ok(())
    }

    /// Dispatches pending system events, waiting at most `timeout` for the first one.
    ///
    /// Close requests and keyboard events are handled here, so this must be called
    /// regularly for the window to stay responsive.
    pub fn poll_and_dispatch(&mut self, timeout: std::time::Duration) -> Result<(), crate::Error> {
        let mut redraw = false;
        let close_flag = &self.close_flag;
        let keyboard_callback = &mut self.keyboard_callback;
        let status = self.event_loop.pump_events(Some(timeout), |event, _| {
            if let winit::event::Event::WindowEvent { event, .. } = event {
                match event {
                    winit::event::WindowEvent::CloseRequested => close_flag.set(),
                    winit::event::WindowEvent::KeyboardInput { event, .. } => {
                        if let Some(callback) = keyboard_callback.as_mut() {
                            let (key, action) = key_from_event(&event);
                            callback(key, action);
                        }
                    }
                    winit::event::WindowEvent::Resized(_)
                    | winit::event::WindowEvent::RedrawRequested => redraw = true,
                    _ => (),
                }
            }
        });
        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with code {code}");
            self.close_flag.set();
        }
        if redraw {
            self.present()?;
        }
        Ok(())
    }
}
