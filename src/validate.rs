//! USB chapter 9 / HID consistency checks over a parsed topology.

use super::*;
use std::collections::HashSet;
use std::fmt;

/// One broken rule. A topology can have any number of these and still be
/// usable; they are reported, not raised.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Violation {
    /// bLength differs from what the descriptor type requires
    BadLength {
        descriptor_type: DescriptorType,
        length: u8,
        expected: u8,
    },
    InvalidMaxPacketSize0 { usb_version: u16, value: u8 },
    ConfigurationCount { declared: u8, actual: usize },
    TotalLength {
        configuration: u8,
        declared: u16,
        actual: usize,
    },
    InterfaceCount {
        configuration: u8,
        declared: u8,
        actual: usize,
    },
    ZeroConfigurationValue,
    DuplicateConfigurationValue { configuration: u8 },
    EndpointCount {
        interface: u8,
        alternate: u8,
        declared: u8,
        actual: usize,
    },
    DuplicateInterface { interface: u8, alternate: u8 },
    ZeroEndpointNumber { interface: u8, address: EndpointAddress },
    ReservedAddressBits { interface: u8, address: EndpointAddress },
    DuplicateEndpoint {
        interface: u8,
        alternate: u8,
        address: EndpointAddress,
    },
    HidLength {
        interface: u8,
        num_descriptors: u8,
        length: u8,
    },
    HidWithoutClassDescriptors { interface: u8 },
    AssociationOutOfRange {
        first_interface: u8,
        interface_count: u8,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength {
                descriptor_type,
                length,
                expected,
            } => write!(
                f,
                "{descriptor_type:?} descriptor has bLength {length}, expected {expected}"
            ),
            Self::InvalidMaxPacketSize0 { usb_version, value } => write!(
                f,
                "bMaxPacketSize0 {value} is not valid for bcdUSB {usb_version:#06x}"
            ),
            Self::ConfigurationCount { declared, actual } => write!(
                f,
                "bNumConfigurations is {declared} but {actual} configuration(s) present"
            ),
            Self::TotalLength {
                configuration,
                declared,
                actual,
            } => write!(
                f,
                "configuration {configuration}: wTotalLength is {declared} but it spans {actual} bytes"
            ),
            Self::InterfaceCount {
                configuration,
                declared,
                actual,
            } => write!(
                f,
                "configuration {configuration}: bNumInterfaces is {declared} but {actual} interface(s) present"
            ),
            Self::ZeroConfigurationValue => write!(f, "bConfigurationValue 0 is reserved"),
            Self::DuplicateConfigurationValue { configuration } => {
                write!(f, "configuration value {configuration} used twice")
            }
            Self::EndpointCount {
                interface,
                alternate,
                declared,
                actual,
            } => write!(
                f,
                "interface {interface} alt {alternate}: bNumEndpoints is {declared} but {actual} endpoint(s) present"
            ),
            Self::DuplicateInterface {
                interface,
                alternate,
            } => write!(f, "interface {interface} alt {alternate} described twice"),
            Self::ZeroEndpointNumber { interface, address } => write!(
                f,
                "interface {interface}: endpoint {address} uses the default control pipe number"
            ),
            Self::ReservedAddressBits { interface, address } => write!(
                f,
                "interface {interface}: endpoint {address} has reserved address bits set"
            ),
            Self::DuplicateEndpoint {
                interface,
                alternate,
                address,
            } => write!(
                f,
                "interface {interface} alt {alternate}: endpoint {address} described twice"
            ),
            Self::HidLength {
                interface,
                num_descriptors,
                length,
            } => write!(
                f,
                "interface {interface}: HID descriptor lists {num_descriptors} class descriptor(s) in {length} bytes"
            ),
            Self::HidWithoutClassDescriptors { interface } => {
                write!(f, "interface {interface}: HID descriptor lists no class descriptors")
            }
            Self::AssociationOutOfRange {
                first_interface,
                interface_count,
            } => write!(
                f,
                "interface association {first_interface}+{interface_count} names missing interfaces"
            ),
        }
    }
}

/// Check a topology against the USB structural rules. An empty result
/// means no violations.
pub fn validate(topology: &DeviceTopology) -> Vec<Violation> {
    let mut violations = vec![];

    if let Some(device) = &topology.device {
        check_length(
            &mut violations,
            DescriptorType::Device,
            device.length,
            DeviceDescriptor::LENGTH,
        );
        if !valid_max_packet_size_0(device.usb_version, device.max_packet_size_0) {
            violations.push(Violation::InvalidMaxPacketSize0 {
                usb_version: device.usb_version,
                value: device.max_packet_size_0,
            });
        }
        let regular = topology
            .configurations
            .iter()
            .filter(|c| !c.other_speed)
            .count();
        if regular > 0 && usize::from(device.num_configurations) != regular {
            violations.push(Violation::ConfigurationCount {
                declared: device.num_configurations,
                actual: regular,
            });
        }
    }

    if let Some(qualifier) = &topology.qualifier {
        check_length(
            &mut violations,
            DescriptorType::DeviceQualifier,
            qualifier.length,
            DeviceQualifierDescriptor::LENGTH,
        );
    }

    let mut config_values = HashSet::new();
    for config in &topology.configurations {
        validate_configuration(&mut violations, config);
        if config.configuration_value == 0 {
            violations.push(Violation::ZeroConfigurationValue);
        } else if !config.other_speed && !config_values.insert(config.configuration_value) {
            violations.push(Violation::DuplicateConfigurationValue {
                configuration: config.configuration_value,
            });
        }
    }

    for violation in &violations {
        warn!("{violation}");
    }
    violations
}

impl DeviceTopology {
    pub fn validate(&self) -> Vec<Violation> {
        validate(self)
    }
}

fn check_length(violations: &mut Vec<Violation>, ty: DescriptorType, length: u8, expected: u8) {
    if length != expected {
        violations.push(Violation::BadLength {
            descriptor_type: ty,
            length,
            expected,
        });
    }
}

fn valid_max_packet_size_0(usb_version: u16, value: u8) -> bool {
    if usb_version >= 0x0300 {
        value == 9
    } else {
        matches!(value, 8 | 16 | 32 | 64)
    }
}

fn validate_configuration(violations: &mut Vec<Violation>, config: &Configuration) {
    let ty = if config.other_speed {
        DescriptorType::OtherSpeedConfiguration
    } else {
        DescriptorType::Configuration
    };
    check_length(violations, ty, config.length, ConfigurationDescriptor::LENGTH);

    if usize::from(config.total_length) != config.span {
        violations.push(Violation::TotalLength {
            configuration: config.configuration_value,
            declared: config.total_length,
            actual: config.span,
        });
    }

    let numbers = config.interface_numbers();
    if usize::from(config.num_interfaces) != numbers.len() {
        violations.push(Violation::InterfaceCount {
            configuration: config.configuration_value,
            declared: config.num_interfaces,
            actual: numbers.len(),
        });
    }

    for iad in &config.associations {
        check_length(
            violations,
            DescriptorType::InterfaceAssociation,
            iad.length,
            InterfaceAssociationDescriptor::LENGTH,
        );
        if iad.interface_count == 0
            || !iad
                .interfaces()
                .all(|n| numbers.iter().any(|&m| u16::from(m) == n))
        {
            violations.push(Violation::AssociationOutOfRange {
                first_interface: iad.first_interface,
                interface_count: iad.interface_count,
            });
        }
    }

    let mut seen = HashSet::new();
    for intf in &config.interfaces {
        if !seen.insert((intf.interface_number, intf.alternate_setting)) {
            violations.push(Violation::DuplicateInterface {
                interface: intf.interface_number,
                alternate: intf.alternate_setting,
            });
        }
        validate_interface(violations, intf);
    }
}

fn validate_interface(violations: &mut Vec<Violation>, intf: &Interface) {
    let interface = intf.interface_number;
    check_length(
        violations,
        DescriptorType::Interface,
        intf.length,
        InterfaceDescriptor::LENGTH,
    );

    if usize::from(intf.num_endpoints) != intf.endpoints.len() {
        violations.push(Violation::EndpointCount {
            interface,
            alternate: intf.alternate_setting,
            declared: intf.num_endpoints,
            actual: intf.endpoints.len(),
        });
    }

    if let Some(hid) = &intf.hid {
        if hid.num_descriptors == 0 {
            violations.push(Violation::HidWithoutClassDescriptors { interface });
        }
        if usize::from(hid.length) != 6 + 3 * usize::from(hid.num_descriptors) {
            violations.push(Violation::HidLength {
                interface,
                num_descriptors: hid.num_descriptors,
                length: hid.length,
            });
        }
    }

    let mut addresses = HashSet::new();
    for ep in &intf.endpoints {
        if ep.length != EndpointDescriptor::LENGTH && ep.length != EndpointDescriptor::AUDIO_LENGTH {
            violations.push(Violation::BadLength {
                descriptor_type: DescriptorType::Endpoint,
                length: ep.length,
                expected: EndpointDescriptor::LENGTH,
            });
        }
        if ep.number() == 0 {
            violations.push(Violation::ZeroEndpointNumber {
                interface,
                address: ep.address,
            });
        }
        if ep.address.reserved_bits() != 0 {
            violations.push(Violation::ReservedAddressBits {
                interface,
                address: ep.address,
            });
        }
        if !addresses.insert(ep.address) {
            violations.push(Violation::DuplicateEndpoint {
                interface,
                alternate: intf.alternate_setting,
                address: ep.address,
            });
        }
    }
}
