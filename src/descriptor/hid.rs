use super::*;
use std::fmt;

/// HID class descriptor (bDescriptorType 0x21 inside a HID interface)
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HidDescriptor {
    pub length: u8,
    pub hid_version: u16,
    pub country_code: u8,
    /// bNumDescriptors as declared, may disagree with `descriptors.len()`
    pub num_descriptors: u8,
    pub descriptors: Vec<HidClassDescriptor>,
}

/// One (bDescriptorType, wDescriptorLength) entry of a HID descriptor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HidClassDescriptor {
    pub descriptor_type: u8,
    pub length: u16,
}

impl HidDescriptor {
    pub const LENGTH: u8 = 9;

    pub(crate) fn from_raw(length: u8, buf: &[u8]) -> Option<Self> {
        if let &[a, b, c, d, ref rest @ ..] = buf {
            let descriptors = rest
                .chunks_exact(3)
                .map(|entry| HidClassDescriptor {
                    descriptor_type: entry[0],
                    length: u16::from_le_bytes([entry[1], entry[2]]),
                })
                .collect::<Vec<_>>();
            if descriptors.is_empty() {
                return None;
            }
            Some(HidDescriptor {
                length,
                hid_version: u16::from_le_bytes([a, b]),
                country_code: c,
                num_descriptors: d,
                descriptors,
            })
        } else {
            None
        }
    }

    /// Length of the report descriptor the host would fetch next
    pub fn report_descriptor_length(&self) -> Option<u16> {
        self.descriptors
            .iter()
            .find(|d| d.descriptor_type == DescriptorType::Report as u8)
            .map(|d| d.length)
    }
}

impl fmt::Debug for HidDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [maj, min] = self.hid_version.to_be_bytes();
        f.debug_struct(stringify!(HidDescriptor))
            .field("length", &self.length)
            .field("hid_version", &format_args!("{:x}.{:02x}", maj, min))
            .field("country_code", &self.country_code)
            .field("num_descriptors", &self.num_descriptors)
            .field("descriptors", &self.descriptors)
            .finish()
    }
}
