#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// String descriptor (bDescriptorType 0x03), kept as UTF-16 code units
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StringDescriptor {
    pub length: u8,
    pub code_units: Vec<u16>,
}

impl StringDescriptor {
    pub(crate) fn from_raw(length: u8, buf: &[u8]) -> Option<Self> {
        (buf.len() % 2 == 0).then(|| StringDescriptor {
            length,
            code_units: buf
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect(),
        })
    }

    /// String index 0 carries the supported LANGIDs instead of text
    pub fn language_ids(&self) -> &[u16] {
        &self.code_units
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.code_units)
    }
}
