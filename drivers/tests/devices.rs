use evview_drivers::devices::{ListedDevice, ParseTypeError};
use evview_drivers::{usb, Type};

#[test]
fn parse_type() {
    assert_eq!(
        "prophesee_evk3_hd".parse::<Type>(),
        Ok(Type::PropheseeEvk3Hd)
    );
    assert_eq!(Type::PropheseeEvk3Hd.to_string().parse::<Type>(), Ok(Type::PropheseeEvk3Hd));
    let error: ParseTypeError = "prophesee_evk4".parse::<Type>().unwrap_err();
    assert_eq!(error.to_string(), "unknown device type \"prophesee_evk4\"");
}

#[test]
fn type_properties() {
    assert_eq!(Type::PropheseeEvk3Hd.name(), "Prophesee EVK3 HD");
    assert_eq!(
        Type::PropheseeEvk3Hd.default_configuration().type_name(),
        "Prophesee EVK3 HD"
    );
}

#[test]
fn listed_device() {
    let listed_device = ListedDevice {
        device_type: Type::PropheseeEvk3Hd,
        speed: usb::Speed::Super,
        serial: Ok("00050423".to_owned()),
    };
    assert_eq!(
        listed_device.to_string(),
        "Prophesee EVK3 HD (prophesee_evk3_hd), serial 00050423, USB 3.0 SuperSpeed (5.0 Gb/s)"
    );
    let listed_device = ListedDevice {
        device_type: Type::PropheseeEvk3Hd,
        speed: usb::Speed::High,
        serial: Err(usb::Error::Busy),
    };
    assert_eq!(
        listed_device.to_string(),
        "Prophesee EVK3 HD (prophesee_evk3_hd), USB 2.0 High Speed (480 Mb/s), serial unavailable: the device is already used by another program"
    );
}
