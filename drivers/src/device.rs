use crate::usb;
use rusb::UsbContext;

pub struct ListedDevice {
    pub speed: usb::Speed,
    pub serial: Result<String, usb::Error>,
}

pub trait Usb: Sized {
    type Adapter;
    type Configuration;
    type Error;
    type Properties;

    const VENDOR_ID: u16;

    const PRODUCT_ID: u16;

    const PROPERTIES: Self::Properties;

    const DEFAULT_USB_CONFIGURATION: usb::Configuration;

    /// Reads the serial of a device whose interface 0 is claimed.
    fn read_serial(handle: &rusb::DeviceHandle<rusb::Context>) -> rusb::Result<String>;

    fn open(
        serial: &Option<&str>,
        configuration: Self::Configuration,
        usb_configuration: &usb::Configuration,
    ) -> Result<Self, Self::Error>;

    fn configuration(&self) -> Self::Configuration;

    /// Writes the registers whose value differs from the current configuration.
    fn update_configuration(&mut self, configuration: Self::Configuration)
        -> Result<(), Self::Error>;

    /// Blocks until a packet arrives or the USB timeout expires (0 bytes read).
    fn read(&self, buffer: &mut [u8]) -> Result<usize, Self::Error>;

    fn serial(&self) -> String;

    fn speed(&self) -> usb::Speed;

    fn adapter(&self) -> Self::Adapter;

    fn list_devices(devices: &rusb::DeviceList<rusb::Context>) -> rusb::Result<Vec<ListedDevice>> {
        let mut result = Vec::new();
        for device in devices
            .iter()
            .filter(|device| match device.device_descriptor() {
                Ok(descriptor) => {
                    descriptor.vendor_id() == Self::VENDOR_ID
                        && descriptor.product_id() == Self::PRODUCT_ID
                }
                Err(_) => false,
            })
        {
            let serial = match device.open() {
                Ok(mut handle) => claim(&mut handle)
                    .and_then(|()| Self::read_serial(&handle).map_err(usb::Error::from)),
                Err(error) => Err(error.into()),
            };
            result.push(ListedDevice {
                speed: device.speed().into(),
                serial,
            });
        }
        Ok(result)
    }

    fn handle_from_serial(
        context: &rusb::Context,
        serial: &Option<&str>,
    ) -> Result<(rusb::DeviceHandle<rusb::Context>, String), usb::Error> {
        for device in context.devices()?.iter() {
            let descriptor = match device.device_descriptor() {
                Ok(descriptor) => descriptor,
                Err(_) => continue,
            };
            if descriptor.vendor_id() != Self::VENDOR_ID
                || descriptor.product_id() != Self::PRODUCT_ID
            {
                continue;
            }
            let mut handle = device.open()?;
            claim(&mut handle)?;
            let device_serial = Self::read_serial(&handle)?;
            match serial {
                Some(serial) if *serial != device_serial => {
                    log::debug!("skipping device with serial {device_serial}");
                }
                _ => return Ok((handle, device_serial)),
            }
        }
        Err(match serial {
            Some(serial) => usb::Error::Serial((*serial).to_owned()),
            None => usb::Error::Device,
        })
    }
}

fn claim(handle: &mut rusb::DeviceHandle<rusb::Context>) -> Result<(), usb::Error> {
    match handle.claim_interface(0) {
        Ok(()) => Ok(()),
        Err(rusb::Error::Busy) => Err(usb::Error::Busy),
        Err(error) => Err(error.into()),
    }
}
