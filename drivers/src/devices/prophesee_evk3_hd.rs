use crate::adapters;
use crate::bias;
use crate::device;
use crate::properties;
use crate::usb;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Biases {
    pub pr: u8,
    pub fo_p: u8,
    pub fo_n: u8,
    pub hpf: u8,
    pub diff_on: u8,
    pub diff: u8,
    pub diff_off: u8,
    pub refr: u8,
    pub reqpuy: u8,
    pub blk: u8,
}

impl Biases {
    /// Sets a bias by name, with or without the `bias_` prefix.
    ///
    /// `fo` is an alias of `fo_p`.
    pub fn set(&mut self, name: &str, value: i64) -> Result<(), bias::Error> {
        let field = match bias::field_name(name) {
            "pr" => &mut self.pr,
            "fo" | "fo_p" => &mut self.fo_p,
            "fo_n" => &mut self.fo_n,
            "hpf" => &mut self.hpf,
            "diff_on" => &mut self.diff_on,
            "diff" => &mut self.diff,
            "diff_off" => &mut self.diff_off,
            "refr" => &mut self.refr,
            "reqpuy" => &mut self.reqpuy,
            "blk" => &mut self.blk,
            _ => return Err(bias::Error::Name(name.to_owned())),
        };
        *field = bias::to_u8(name, value)?;
        Ok(())
    }

    // same order as BIAS_REGISTERS
    fn values(&self) -> [u8; 10] {
        [
            self.pr,
            self.fo_p,
            self.fo_n,
            self.hpf,
            self.diff_on,
            self.diff,
            self.diff_off,
            self.refr,
            self.reqpuy,
            self.blk,
        ]
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Configuration {
    pub biases: Biases,
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error(transparent)]
    Usb(#[from] usb::Error),

    #[error("short write ({requested} bytes requested, {written} bytes written)")]
    ShortWrite { requested: usize, written: usize },
}

impl From<rusb::Error> for Error {
    fn from(error: rusb::Error) -> Self {
        usb::Error::from(error).into()
    }
}

pub struct Device {
    handle: std::sync::Arc<rusb::DeviceHandle<rusb::Context>>,
    reader: usb::BulkReader,
    configuration: Configuration,
    serial: String,
}

impl device::Usb for Device {
    type Adapter = adapters::evt3::Adapter;

    type Configuration = Configuration;

    type Error = Error;

    type Properties = properties::Camera<Self::Configuration>;

    const VENDOR_ID: u16 = 0x04b4;

    const PRODUCT_ID: u16 = 0x00f4;

    const PROPERTIES: Self::Properties = Self::Properties {
        name: "Prophesee EVK3 HD",
        width: 1280,
        height: 720,
        default_configuration: Self::Configuration {
            biases: Biases {
                pr: 0x69,
                fo_p: 0x4a,
                fo_n: 0x00,
                hpf: 0x00,
                diff_on: 0x73,
                diff: 0x50,
                diff_off: 0x34,
                refr: 0x44,
                reqpuy: 0x94,
                blk: 0x78,
            },
        },
    };

    const DEFAULT_USB_CONFIGURATION: usb::Configuration = usb::Configuration {
        buffer_size: 1 << 17,
        timeout: std::time::Duration::from_millis(100),
    };

    fn read_serial(handle: &rusb::DeviceHandle<rusb::Context>) -> rusb::Result<String> {
        handle.write_bulk(
            0x02,
            &[0x72, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
            std::time::Duration::from_secs(1),
        )?;
        let mut buffer = vec![0u8; 16];
        handle.read_bulk(0x82, &mut buffer, std::time::Duration::from_secs(1))?;
        Ok(format!(
            "{:02X}{:02X}{:02X}{:02X}",
            buffer[11], buffer[10], buffer[9], buffer[8]
        ))
    }

    fn open(
        serial: &Option<&str>,
        configuration: Self::Configuration,
        usb_configuration: &usb::Configuration,
    ) -> Result<Self, Self::Error> {
        let context = rusb::Context::new()?;
        let (handle, serial) = Self::handle_from_serial(&context, serial)?;
        log::debug!("{} {serial}: start-up sequence", Self::PROPERTIES.name);
        std::thread::sleep(std::time::Duration::from_millis(150));
        run(&handle, STARTUP)?;
        for offset in 0..230 {
            write(&handle, ERC_RESERVED_6800 + offset * 4, 0x08080808)?;
        }
        write(&handle, ERC_RESERVED_602C, 0x00000000)?;
        for offset in 0..256 {
            write(
                &handle,
                T_DROP_LUT + offset * 4,
                ((offset * 2 + 1) << 16) | (offset * 2),
            )?;
        }
        run(&handle, READOUT)?;
        write_biases(&handle, None, &configuration.biases)?;
        for offset in 0..40 {
            write(&handle, TD_ROI_X + offset * 4, 0)?;
        }
        for offset in 0..23 {
            write(
                &handle,
                TD_ROI_Y + offset * 4,
                if offset == 22 { 0x00ff0000 } else { 0 },
            )?;
        }
        write(&handle, ROI_CTRL, roi_ctrl(true, true, false))?;
        run(&handle, START)?;
        let handle = std::sync::Arc::new(handle);
        Ok(Device {
            reader: usb::BulkReader::new(handle.clone(), 0x81, usb_configuration.timeout),
            handle,
            configuration,
            serial,
        })
    }

    fn configuration(&self) -> Self::Configuration {
        self.configuration.clone()
    }

    fn update_configuration(&mut self, configuration: Self::Configuration) -> Result<(), Self::Error> {
        write_biases(
            &self.handle,
            Some(&self.configuration.biases),
            &configuration.biases,
        )?;
        self.configuration = configuration;
        Ok(())
    }

    fn read(&self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(self.reader.read(buffer)?)
    }

    fn serial(&self) -> String {
        self.serial.clone()
    }

    fn speed(&self) -> usb::Speed {
        self.handle.device().speed().into()
    }

    fn adapter(&self) -> Self::Adapter {
        Self::Adapter::from_dimensions(Self::PROPERTIES.width, Self::PROPERTIES.height)
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        if let Err(error) = run(&self.handle, SHUTDOWN) {
            log::warn!("{} {}: {error}", <Self as device::Usb>::PROPERTIES.name, self.serial);
        }
    }
}

const TIMEOUT: std::time::Duration = std::time::Duration::from_millis(100);

const PING: [u8; 8] = [0x71, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

const ROI_CTRL: u32 = 0x0004;
const ADC_MISC_CTRL: u32 = 0x0054;
const BGEN_CTRL: u32 = 0x1100;
const TD_ROI_X: u32 = 0x2000;
const TD_ROI_Y: u32 = 0x4000;
const ERC_RESERVED_6000: u32 = 0x6000;
const ERC_IN_DROP_RATE_CONTROL: u32 = 0x6004;
const ERC_CONTROL: u32 = 0x6028;
const ERC_RESERVED_602C: u32 = 0x602C;
const ERC_T_DROPPING_CONTROL: u32 = 0x6050;
const ERC_H_DROPPING_CONTROL: u32 = 0x6060;
const ERC_V_DROPPING_CONTROL: u32 = 0x6070;
const T_DROP_LUT: u32 = 0x6400;
const ERC_RESERVED_6800: u32 = 0x6800;
const EDF_PIPELINE_CONTROL: u32 = 0x7000;
const RO_READOUT_CTRL: u32 = 0x9000;
const RO_TIME_BASE_CTRL: u32 = 0x9008;
const RO_CTRL: u32 = 0x9028;
const AFK_PIPELINE_CONTROL: u32 = 0xC000;
const STC_PIPELINE_CONTROL: u32 = 0xD000;

enum Step {
    Request([u8; 8]),
    Sleep(std::time::Duration),
    Write(u32, u32),
}

use Step::{Request, Sleep, Write};

const fn roi_ctrl(td_shadow_trigger: bool, td_roni_n_en: bool, td_rstn: bool) -> u32 {
    (1 << 1) // td_enable
        | ((td_shadow_trigger as u32) << 5)
        | ((td_roni_n_en as u32) << 6)
        | ((td_rstn as u32) << 10)
        | (0x1e000a << 11)
}

// power-up, clocks and the event rate controller (disabled), up to its LUTs
const STARTUP: &[Step] = &[
    Request(PING),
    Request([0x55, 0x00, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00]),
    Sleep(std::time::Duration::from_millis(5)),
    Write(0x7008, 0x00000001),
    Write(EDF_PIPELINE_CONTROL, 0xffff0001),
    Write(0x8000, 0x0001e085),
    Write(RO_TIME_BASE_CTRL, 0x00000644),
    Write(0x0064, 0x00000001),
    Write(0xB074, 0x00000002),
    Write(0xB078, 0x000000a0),
    Write(0x0000, 0x10006442),
    Write(0x0000, 0x10001442),
    Write(0x0000, 0x10001442),
    Write(0xB068, 0x00000004),
    Write(0xB07C, 0x00000003),
    Write(0x0000, 0x50001442),
    Write(0x0000, 0x5000144a),
    Write(0x0000, 0x5000140a),
    Write(0x0000, 0x5000640a),
    Write(0x0000, 0x5000644a),
    Write(0xB080, 0x00000077),
    Write(0xB084, 0x0000000f),
    Write(0xB088, 0x00000037),
    Write(0xB08C, 0x00000037),
    Write(0xB090, 0x000000df),
    Write(0xB094, 0x00000057),
    Write(0xB098, 0x00000037),
    Write(0xB09C, 0x00000067),
    Write(0xB0A0, 0x00000037),
    Write(0xB0A4, 0x0000002f),
    Write(0xB0AC, 0x00000028),
    Write(0xB0CC, 0x00000001),
    Write(0xB000, 0x000002d8),
    Write(0xB004, 0x0000008a),
    Write(0xB01C, 0x00000030),
    Write(0xB020, 0x00002000),
    Write(0xB02C, 0x000000ff),
    Write(0xB030, 0x00003e80),
    Write(0xB028, 0x00000fa0),
    Write(0xB040, 0x00000007),
    Write(0xA000, 0x000000a1),
    Write(0xA008, 0x00002401),
    Write(0xA004, 0x000000a1),
    Write(0xA020, 0x00000160),
    Write(0xB040, 0x0000000f),
    Write(0xB004, 0x0000008a),
    Write(0xB0C8, 0x00000003),
    Write(0xB044, 0x00000001),
    Write(0xB000, 0x000002dd),
    Write(RO_TIME_BASE_CTRL, 0x00000640),
    Write(0x8000, 0x0001e085),
    Write(0x7008, 0x00000001),
    Write(EDF_PIPELINE_CONTROL, 0x00070001),
    Write(ERC_RESERVED_6000, 0x00155403),
    Write(STC_PIPELINE_CONTROL, 0x00000005),
    Write(AFK_PIPELINE_CONTROL, 0x00000005),
    Write(ERC_RESERVED_6000, 0x00155400),
    Write(ERC_IN_DROP_RATE_CONTROL, 0x00000000),
    Write(ERC_CONTROL, 0x00000002),
    Write(ERC_RESERVED_602C, 0x00000001),
];

// readout and analog front-end, before the biases
const READOUT: &[Step] = &[
    Write(ERC_T_DROPPING_CONTROL, 0x00000000),
    Write(ERC_H_DROPPING_CONTROL, 0x00000000),
    Write(ERC_V_DROPPING_CONTROL, 0x00000000),
    Write(ERC_RESERVED_6000, 0x00155401),
    Write(RO_READOUT_CTRL, 0x00000208),
    Write(0x7008, 0x00000001),
    Write(EDF_PIPELINE_CONTROL, 0x00070001),
    Write(0x8000, 0x0001e085),
    Write(RO_TIME_BASE_CTRL, 0x00000644),
    Write(ROI_CTRL, roi_ctrl(false, true, false)),
    Write(0x002C, 0x0022c324),
    Write(0xA000, 0x000002a1),
    Write(0xA000, 0x000002a1),
    Write(0xA008, 0x00082401),
    Write(0xA004, 0x000002a1),
    Write(0xA004, 0x000002a1),
    Write(0xA020, 0x00000160),
    Write(0xA020, 0x00000160),
    Write(0xA008, 0x00082401),
    Write(0x004C, 0x00007141),
    Write(ADC_MISC_CTRL, 0x00000210),
    Write(0x0008, 0x60000000),
    Write(0x1104, 0x00000001),
    Write(0xA010, 0x0000a06b),
    Write(BGEN_CTRL, 0x00000004),
    Write(0xA010, 0x0180a063),
    Write(0xA00C, 0x00000400),
    Write(0xA00C, 0x00000401),
    Write(0xA00C, 0x00020401),
    Write(0x0070, 0x00400000),
    Write(0x006C, 0x0ee47117),
    Write(0x006C, 0x0ee4711f),
    Write(0x0070, 0x00480000),
];

const START: &[Step] = &[
    Write(BGEN_CTRL, 0x00000005),
    Write(0x002C, 0x0022c724),
    Write(0x0018, 0x00000200),
    Request(PING),
    Write(0xB000, 0x000002dd),
    Write(RO_CTRL, 0x00000000),
    Write(RO_TIME_BASE_CTRL, 0x00000645),
    Write(0x002C, 0x0022c724),
    Write(ROI_CTRL, roi_ctrl(false, true, true)),
];

const SHUTDOWN: &[Step] = &[
    Write(ROI_CTRL, roi_ctrl(false, true, false)),
    Write(0x002C, 0x0022c324),
    Write(AFK_PIPELINE_CONTROL, 0x00000002),
    Write(RO_CTRL, 0x00000002),
    Write(AFK_PIPELINE_CONTROL, 0x00000005),
    Sleep(std::time::Duration::from_millis(1)),
    Write(RO_TIME_BASE_CTRL, 0x00000644),
    Write(0xB000, 0x000002d8),
    Sleep(std::time::Duration::from_micros(300)),
    Write(0x0070, 0x00400000),
    Write(0x006C, 0x0ee47114),
    Sleep(std::time::Duration::from_micros(500)),
    Write(0xA00C, 0x00000400),
    Sleep(std::time::Duration::from_micros(500)),
    Write(0xA010, 0x00008068),
    Sleep(std::time::Duration::from_micros(200)),
    Write(0x1104, 0x00000000),
    Sleep(std::time::Duration::from_micros(200)),
    Write(0xA020, 0x00000060),
    Sleep(std::time::Duration::from_micros(200)),
    Write(0xA004, 0x000002a0),
    Sleep(std::time::Duration::from_micros(200)),
    Write(0xA008, 0x00002400),
    Sleep(std::time::Duration::from_micros(200)),
    Write(0xA000, 0x000002a0),
    Write(0xB044, 0x00000002),
    Write(0xB004, 0x0000000a),
    Write(0xB040, 0x0000000e),
    Write(0xB0C8, 0x00000000),
    Write(0xB040, 0x00000006),
    Write(0xB040, 0x00000004),
    Write(0x0000, 0x50006442),
    Write(0x0000, 0x10006442),
    Write(0xB07C, 0x00000000),
];

struct BiasRegister {
    address: u32,
    vdac_ctl: u32,
    ibtype_sel: u32,
    buf_en: u32,
}

// same order as Biases::values
const BIAS_REGISTERS: [BiasRegister; 10] = [
    BiasRegister { address: 0x1000, vdac_ctl: 0xc4, ibtype_sel: 0, buf_en: 1 }, // pr
    BiasRegister { address: 0x1004, vdac_ctl: 0xe8, ibtype_sel: 0, buf_en: 1 }, // fo_p
    BiasRegister { address: 0x1008, vdac_ctl: 0x00, ibtype_sel: 0, buf_en: 0 }, // fo_n
    BiasRegister { address: 0x100C, vdac_ctl: 0xff, ibtype_sel: 0, buf_en: 1 }, // hpf
    BiasRegister { address: 0x1010, vdac_ctl: 0x63, ibtype_sel: 0, buf_en: 1 }, // diff_on
    BiasRegister { address: 0x1014, vdac_ctl: 0x50, ibtype_sel: 0, buf_en: 1 }, // diff
    BiasRegister { address: 0x1018, vdac_ctl: 0x37, ibtype_sel: 0, buf_en: 1 }, // diff_off
    BiasRegister { address: 0x1020, vdac_ctl: 0xcd, ibtype_sel: 1, buf_en: 1 }, // refr
    BiasRegister { address: 0x1040, vdac_ctl: 0x8a, ibtype_sel: 1, buf_en: 1 }, // reqpuy
    BiasRegister { address: 0x104C, vdac_ctl: 0x92, ibtype_sel: 0, buf_en: 1 }, // blk
];

impl BiasRegister {
    fn value(&self, idac_ctl: u8) -> u32 {
        (idac_ctl as u32)
            | (self.vdac_ctl << 8)
            | (1 << 16) // buf_stg
            | (self.ibtype_sel << 19)
            | (1 << 21) // mux_en
            | (self.buf_en << 23)
            | (1 << 24) // idac_en
    }
}

fn write_biases(
    handle: &rusb::DeviceHandle<rusb::Context>,
    previous_biases: Option<&Biases>,
    biases: &Biases,
) -> Result<(), Error> {
    let previous_values = previous_biases.map(Biases::values);
    for (index, (register, value)) in BIAS_REGISTERS.iter().zip(biases.values()).enumerate() {
        if previous_values.map_or(true, |previous_values| previous_values[index] != value) {
            write(handle, register.address, register.value(value))?;
        }
    }
    Ok(())
}

fn run(handle: &rusb::DeviceHandle<rusb::Context>, steps: &[Step]) -> Result<(), Error> {
    for step in steps {
        match step {
            Request(buffer) => {
                request(handle, buffer, TIMEOUT)?;
            }
            Sleep(duration) => std::thread::sleep(*duration),
            Write(address, value) => write(handle, *address, *value)?,
        }
    }
    Ok(())
}

fn write(
    handle: &rusb::DeviceHandle<rusb::Context>,
    address: u32,
    value: u32,
) -> Result<(), Error> {
    let mut buffer = [0u8; 12];
    buffer[0] = 0x56;
    buffer[4..8].copy_from_slice(&address.to_le_bytes());
    buffer[8..12].copy_from_slice(&value.to_le_bytes());
    request(handle, &buffer, TIMEOUT)?;
    Ok(())
}

fn request(
    handle: &rusb::DeviceHandle<rusb::Context>,
    buffer: &[u8],
    timeout: std::time::Duration,
) -> Result<Vec<u8>, Error> {
    let written = handle.write_bulk(0x02, buffer, timeout)?;
    if buffer.len() != written {
        return Err(Error::ShortWrite {
            requested: buffer.len(),
            written,
        });
    }
    let mut buffer = vec![0; 16];
    let read = handle.read_bulk(0x82, &mut buffer, timeout)?;
    buffer.truncate(read);
    Ok(buffer)
}
