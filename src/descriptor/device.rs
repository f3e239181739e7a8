#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Standard device descriptor (bDescriptorType 0x01)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceDescriptor {
    pub length: u8,
    pub usb_version: u16,
    pub device_class: u8,
    pub device_subclass: u8,
    pub device_protocol: u8,
    /// Raw bMaxPacketSize0, an exponent for USB 3.x devices
    pub max_packet_size_0: u8,
    pub vendor_id: u16,
    pub product_id: u16,
    pub device_bcd: u16,
    pub string_manufacturer: u8,
    pub string_product: u8,
    pub string_serial: u8,
    pub num_configurations: u8,
}

impl DeviceDescriptor {
    pub const LENGTH: u8 = 18;

    pub(crate) fn from_raw(length: u8, buf: &[u8]) -> Option<Self> {
        if let &[a, b, c, d, e, f, g, h, i, j, k, l, m, n, o, p, ..] = buf {
            Some(DeviceDescriptor {
                length,
                usb_version: u16::from_le_bytes([a, b]),
                device_class: c,
                device_subclass: d,
                device_protocol: e,
                max_packet_size_0: f,
                vendor_id: u16::from_le_bytes([g, h]),
                product_id: u16::from_le_bytes([i, j]),
                device_bcd: u16::from_le_bytes([k, l]),
                string_manufacturer: m,
                string_product: n,
                string_serial: o,
                num_configurations: p,
            })
        } else {
            None
        }
    }

    pub fn is_superspeed(&self) -> bool {
        self.usb_version >= 0x0300
    }

    /// Max packet size of endpoint zero in bytes
    pub fn ep0_max_packet_size(&self) -> u32 {
        if self.is_superspeed() {
            1u32.checked_shl(self.max_packet_size_0.into()).unwrap_or(0)
        } else {
            self.max_packet_size_0.into()
        }
    }
}

/// Device qualifier (bDescriptorType 0x06): what the device would look like
/// at the other speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceQualifierDescriptor {
    pub length: u8,
    pub usb_version: u16,
    pub device_class: u8,
    pub device_subclass: u8,
    pub device_protocol: u8,
    pub max_packet_size_0: u8,
    pub num_configurations: u8,
}

impl DeviceQualifierDescriptor {
    pub const LENGTH: u8 = 10;

    pub(crate) fn from_raw(length: u8, buf: &[u8]) -> Option<Self> {
        // bReserved is the last byte, not kept
        if let &[a, b, c, d, e, f, g, _, ..] = buf {
            Some(DeviceQualifierDescriptor {
                length,
                usb_version: u16::from_le_bytes([a, b]),
                device_class: c,
                device_subclass: d,
                device_protocol: e,
                max_packet_size_0: f,
                num_configurations: g,
            })
        } else {
            None
        }
    }
}
