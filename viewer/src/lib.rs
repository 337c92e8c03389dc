pub mod biases;
pub mod cli;
pub mod error;
pub mod frame;
pub mod generator;
pub mod player;
pub mod source;
pub mod udp;
pub mod window;

pub use crate::error::Error;
pub use crate::frame::Frame;

pub use evview_drivers as drivers;
