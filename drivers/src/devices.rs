use crate::adapters;
use crate::bias;
use crate::device::Usb;
use crate::usb;

macro_rules! register {
    ($($module:ident),+) => {
        paste::paste! {
            $(
                pub mod $module;
            )+

            #[derive(Debug, Copy, Clone, PartialEq, Eq)]
            pub enum Type {
                $(
                    [<$module:camel>],
                )+
            }

            impl std::fmt::Display for Type {
                fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    match self {
                        $(
                            Self::[<$module:camel>] => write!(formatter, stringify!($module)),
                        )+
                    }
                }
            }

            impl Type {
                pub fn name(self) -> &'static str  {
                    match self {
                        $(
                            Type::[<$module:camel>] => $module::Device::PROPERTIES.name,
                        )+
                    }
                }

                pub fn default_configuration(self) -> Configuration {
                    match self {
                        $(
                            Type::[<$module:camel>] => Configuration::[<$module:camel>](
                                $module::Device::PROPERTIES.default_configuration
                            ),
                        )+
                    }
                }
            }

            #[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
            #[serde(tag = "type", content = "configuration")]
            pub enum Configuration {
                $(
                    #[serde(rename = "" $module)]
                    [<$module:camel>]($module::Configuration),
                )+
            }

            impl Configuration {
                pub fn type_name(&self) -> &'static str {
                    match self {
                        $(
                            Configuration::[<$module:camel>](_) => Type::[<$module:camel>].name(),
                        )+
                    }
                }

                /// Overrides one bias by name, see each device's `Biases::set`.
                pub fn set_bias(&mut self, name: &str, value: i64) -> Result<(), bias::Error> {
                    match self {
                        $(
                            Configuration::[<$module:camel>](configuration) => {
                                configuration.biases.set(name, value)
                            }
                        )+
                    }
                }
            }

            pub enum Device {
                $(
                    [<$module:camel>]($module::Device),
                )+
            }

            pub struct ListedDevice {
                pub device_type: Type,
                pub speed: usb::Speed,
                pub serial: Result<String, usb::Error>,
            }

            impl std::fmt::Display for ListedDevice {
                fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    match &self.serial {
                        Ok(serial) => write!(
                            formatter,
                            "{} ({}), serial {serial}, {}",
                            self.device_type.name(),
                            self.device_type,
                            self.speed
                        ),
                        Err(error) => write!(
                            formatter,
                            "{} ({}), {}, serial unavailable: {error}",
                            self.device_type.name(),
                            self.device_type,
                            self.speed
                        ),
                    }
                }
            }

            pub fn list_devices() -> rusb::Result<Vec<ListedDevice>> {
                use rusb::UsbContext;
                let context = rusb::Context::new()?;
                let devices = context.devices()?;
                let mut result = Vec::new();
                $(
                    result.extend(
                        $module::Device::list_devices(&devices)?
                            .into_iter()
                            .map(|listed_device| ListedDevice {
                                device_type: Type::[<$module:camel>],
                                speed: listed_device.speed,
                                serial: listed_device.serial,
                            }),
                    );
                )+
                Ok(result)
            }

            /// Opens the first supported device whose serial matches.
            ///
            /// Without a configuration every device type is tried in turn with its
            /// default configuration. `None` matches any serial.
            pub fn open(
                serial: Option<&str>,
                configuration: Option<Configuration>,
                usb_configuration: Option<usb::Configuration>,
            ) -> Result<Device, Error>
            {
                match configuration {
                    Some(configuration) => {
                        match configuration {
                            $(
                                Configuration::[<$module:camel>](configuration) => Ok(
                                    $module::Device::open(
                                        &serial,
                                        configuration,
                                        usb_configuration
                                        .as_ref()
                                        .unwrap_or(&$module::Device::DEFAULT_USB_CONFIGURATION),
                                    )
                                    .map(Device::[<$module:camel>])
                                    .map_err(|error| Error::from(error).unpack())?
                                ),
                            )+
                        }
                    },
                    None => {
                        $(
                            match $module::Device::open(
                                &serial,
                                $module::Device::PROPERTIES.default_configuration.clone(),
                                usb_configuration
                                .as_ref()
                                .unwrap_or(&$module::Device::DEFAULT_USB_CONFIGURATION),
                            ) {
                                Ok(device) => return Ok(Device::[<$module:camel>](device)),
                                Err(error) => match Error::from(error).unpack() {
                                    Error::DeviceWithSerial {device_type: _, serial: _} => (),
                                    Error::Device(_) => (),
                                    error => return Err(error),
                                }
                            };
                        )+
                        Err(match serial {
                            Some(serial) => Error::Serial(serial.to_owned()),
                            None => Error::NoDevice
                        })
                    }
                }
            }

            impl Device {
                pub fn device_type(&self) -> Type {
                    match self {
                        $(
                            Self::[<$module:camel>](_) => Type::[<$module:camel>],
                        )+
                    }
                }

                pub fn adapter(&self) -> adapters::Adapter {
                    match self {
                        $(
                            Self::[<$module:camel>](device) => device.adapter().into(),
                        )+
                    }
                }

                pub fn read(&self, buffer: &mut [u8]) -> Result<usize, Error> {
                    match self {
                        $(
                            Self::[<$module:camel>](device) => Ok(device.read(buffer)?),
                        )+
                    }
                }

                pub fn name(&self) -> &'static str {
                    self.device_type().name()
                }

                pub fn width(&self) -> u16 {
                    match self {
                        $(
                            Self::[<$module:camel>](_) => $module::Device::PROPERTIES.width,
                        )+
                    }
                }

                pub fn height(&self) -> u16 {
                    match self {
                        $(
                            Self::[<$module:camel>](_) => $module::Device::PROPERTIES.height,
                        )+
                    }
                }

                pub fn buffer_size(&self) -> usize {
                    match self {
                        $(
                            Self::[<$module:camel>](_) => {
                                $module::Device::DEFAULT_USB_CONFIGURATION.buffer_size
                            }
                        )+
                    }
                }

                pub fn serial(&self) -> String {
                    match self {
                        $(
                            Self::[<$module:camel>](device) => device.serial(),
                        )+
                    }
                }

                pub fn speed(&self) -> usb::Speed {
                    match self {
                        $(
                            Self::[<$module:camel>](device) => device.speed(),
                        )+
                    }
                }

                pub fn configuration(&self) -> Configuration {
                    match self {
                        $(
                            Self::[<$module:camel>](device) => {
                                Configuration::[<$module:camel>](device.configuration())
                            }
                        )+
                    }
                }

                pub fn update_configuration(&mut self, configuration: Configuration) -> Result<(), Error> {
                    match self {
                        $(
                            Self::[<$module:camel>](device) => match configuration {
                                Configuration::[<$module:camel>](configuration) => {
                                    Ok(device.update_configuration(configuration)?)
                                },
                                #[allow(unreachable_patterns)]
                                configuration => Err(Error::UpdateMismatch {
                                    configuration: configuration.type_name().to_owned(),
                                    device: $module::Device::PROPERTIES.name.to_owned(),
                                })
                            },
                        )+
                    }
                }
            }

            #[derive(Debug, PartialEq, Eq)]
            pub struct ParseTypeError {
                on: String
            }

            impl std::fmt::Display for ParseTypeError {
                fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    write!(formatter, "unknown device type \"{}\"", self.on)
                }
            }

            impl std::error::Error for ParseTypeError {}

            impl std::str::FromStr for Type {
                type Err = ParseTypeError;

                fn from_str(string: &str) -> Result<Self, Self::Err> {
                    match string {
                        $(
                            stringify!($module) => Ok(Self::[<$module:camel>]),
                        )+
                        _ => Err(Self::Err {on: string.to_owned()}),
                    }
                }
            }

            #[derive(thiserror::Error, Debug, Clone)]
            pub enum Error {
                #[error("{0}")]
                Usb(#[from] usb::Error),

                #[error("{device_type} with serial \"{serial}\" not found")]
                DeviceWithSerial { device_type: Type, serial: String },

                #[error("no {0} found")]
                Device(Type),

                #[error("serial \"{0}\" not found")]
                Serial(String),

                #[error("no device found")]
                NoDevice,

                #[error("configuration for {configuration:?} is not compatible with device {device:?}")]
                UpdateMismatch {
                    configuration: String,
                    device: String,
                },

                $(
                    #[error(transparent)]
                    [<$module:camel>](#[from] $module::Error),
                )+
            }

            impl Error {
                /// Lifts "not found" errors out of device-specific errors.
                pub fn unpack(self) -> Self {
                    match self {
                        $(
                            Self::[<$module:camel>](error) => {
                                match error {
                                    $module::Error::Usb(error) => match error {
                                        usb::Error::Serial(serial) => Self::DeviceWithSerial {
                                            device_type: Type::[<$module:camel>],
                                            serial,
                                        },
                                        usb::Error::Device => Self::Device(Type::[<$module:camel>]),
                                        error => Self::[<$module:camel>]($module::Error::Usb(error)),
                                    },
                                    #[allow(unreachable_patterns)]  // devices may not need extra errors besides "usb::Error"
                                    error => Self::[<$module:camel>](error)
                                }
                            }
                        )+
                        error => error
                    }
                }
            }
        }
    };
}

register! { prophesee_evk3_hd }
