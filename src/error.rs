use std::fmt;
use std::io::{self, ErrorKind};

/// Structural problems that stop a blob from being parsed at all.
///
/// Offsets are byte positions in the input blob where the offending record
/// starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DescriptorError {
    /// The record declares more bytes than are left in the buffer
    Truncated {
        offset: usize,
        length: u8,
        remaining: usize,
    },
    /// bLength below 2 cannot even cover its own header
    InvalidLength { offset: usize, length: u8 },
    /// The record is too short for the fixed fields of its type
    TooShort {
        offset: usize,
        descriptor_type: u8,
        length: u8,
        expected: u8,
    },
    /// String descriptor payload is not a whole number of UTF-16 code units
    InvalidString { offset: usize },
    /// Device descriptor found after other records
    UnexpectedDevice { offset: usize },
    /// Interface descriptor before any configuration descriptor
    OrphanInterface { offset: usize },
    /// Endpoint descriptor before any interface of the current configuration
    OrphanEndpoint { offset: usize },
    /// HID descriptor before any interface of the current configuration
    OrphanHid { offset: usize },
    /// The length chain did not end exactly at the end of the buffer
    LengthChain { consumed: usize, total: usize },
    /// The input ended before the wanted endpoints were seen
    NotFound,
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated {
                offset,
                length,
                remaining,
            } => write!(
                f,
                "descriptor at offset {offset} declares {length} bytes but only {remaining} remain"
            ),
            Self::InvalidLength { offset, length } => {
                write!(f, "descriptor at offset {offset} has invalid length {length}")
            }
            Self::TooShort {
                offset,
                descriptor_type,
                length,
                expected,
            } => write!(
                f,
                "descriptor type {descriptor_type:#04x} at offset {offset} is {length} bytes, expected at least {expected}"
            ),
            Self::InvalidString { offset } => {
                write!(f, "string descriptor at offset {offset} has odd length")
            }
            Self::UnexpectedDevice { offset } => {
                write!(f, "device descriptor at offset {offset} is not the first record")
            }
            Self::OrphanInterface { offset } => write!(
                f,
                "interface descriptor at offset {offset} precedes any configuration"
            ),
            Self::OrphanEndpoint { offset } => write!(
                f,
                "endpoint descriptor at offset {offset} precedes any interface"
            ),
            Self::OrphanHid { offset } => {
                write!(f, "HID descriptor at offset {offset} precedes any interface")
            }
            Self::LengthChain { consumed, total } => write!(
                f,
                "descriptor lengths sum to {consumed} but the buffer holds {total} bytes"
            ),
            Self::NotFound => write!(f, "no matching endpoints found"),
        }
    }
}

impl std::error::Error for DescriptorError {}

impl From<DescriptorError> for io::Error {
    fn from(err: DescriptorError) -> Self {
        let kind = match err {
            DescriptorError::Truncated { .. } => ErrorKind::UnexpectedEof,
            DescriptorError::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    }
}
