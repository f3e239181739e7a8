use super::*;

/// Interface descriptor (bDescriptorType 0x04), one per alternate setting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterfaceDescriptor {
    pub length: u8,
    pub interface_number: u8,
    pub alternate_setting: u8,
    pub num_endpoints: u8,
    pub interface_class: u8,
    pub interface_subclass: u8,
    pub interface_protocol: u8,
    pub string_interface: u8,
}

impl InterfaceDescriptor {
    pub const LENGTH: u8 = 9;

    pub(crate) fn from_raw(length: u8, buf: &[u8]) -> Option<Self> {
        if let &[a, b, c, d, e, f, g, ..] = buf {
            Some(InterfaceDescriptor {
                length,
                interface_number: a,
                alternate_setting: b,
                num_endpoints: c,
                interface_class: d,
                interface_subclass: e,
                interface_protocol: f,
                string_interface: g,
            })
        } else {
            None
        }
    }

    pub fn class(&self) -> Option<ClassCode> {
        ClassCode::from_u8(self.interface_class)
    }
}
