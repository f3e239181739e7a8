#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration descriptor header (bDescriptorType 0x02, or 0x07 for the
/// other-speed variant which shares the layout)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConfigurationDescriptor {
    pub length: u8,
    /// Bytes covered by this configuration, header included
    pub total_length: u16,
    pub num_interfaces: u8,
    /// Argument to SET_CONFIGURATION selecting this configuration
    pub configuration_value: u8,
    pub string_configuration: u8,
    pub attributes: u8,
    /// In 2 mA units
    pub max_power: u8,
}

impl ConfigurationDescriptor {
    pub const LENGTH: u8 = 9;

    pub(crate) fn from_raw(length: u8, buf: &[u8]) -> Option<Self> {
        if let &[a, b, c, d, e, f, g, ..] = buf {
            Some(ConfigurationDescriptor {
                length,
                total_length: u16::from_le_bytes([a, b]),
                num_interfaces: c,
                configuration_value: d,
                string_configuration: e,
                attributes: f,
                max_power: g,
            })
        } else {
            None
        }
    }

    pub fn self_powered(&self) -> bool {
        self.attributes & 1 << 6 != 0
    }

    pub fn remote_wakeup(&self) -> bool {
        self.attributes & 1 << 5 != 0
    }

    pub fn max_power_ma(&self) -> u16 {
        u16::from(self.max_power) * 2
    }
}

/// Interface association (bDescriptorType 0x0B): groups consecutive
/// interfaces into one function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterfaceAssociationDescriptor {
    pub length: u8,
    pub first_interface: u8,
    pub interface_count: u8,
    pub function_class: u8,
    pub function_subclass: u8,
    pub function_protocol: u8,
    pub string_function: u8,
}

impl InterfaceAssociationDescriptor {
    pub const LENGTH: u8 = 8;

    pub(crate) fn from_raw(length: u8, buf: &[u8]) -> Option<Self> {
        if let &[a, b, c, d, e, f, ..] = buf {
            Some(InterfaceAssociationDescriptor {
                length,
                first_interface: a,
                interface_count: b,
                function_class: c,
                function_subclass: d,
                function_protocol: e,
                string_function: f,
            })
        } else {
            None
        }
    }

    /// Interface numbers claimed by this association
    pub fn interfaces(&self) -> std::ops::Range<u16> {
        let first = u16::from(self.first_interface);
        first..first + u16::from(self.interface_count)
    }
}
