pub mod adapters;
pub mod bias;
pub mod device;
pub mod devices;
pub mod properties;
pub mod raw;
pub mod usb;

pub use crate::adapters::Adapter;
pub use crate::devices::list_devices;
pub use crate::devices::open;
pub use crate::devices::Configuration;
pub use crate::devices::Device;
pub use crate::devices::Error;
pub use crate::devices::Type;
pub use crate::usb::Configuration as UsbConfiguration;

pub use evview_types as types;
pub use rusb;
