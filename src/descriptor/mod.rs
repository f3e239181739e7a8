//! Descriptor classification: turn raw records into typed descriptors.

use super::*;
use std::iter::FusedIterator;

mod configuration;
mod device;
mod endpoint;
mod hid;
mod interface;
mod string;

pub use configuration::*;
pub use device::*;
pub use endpoint::*;
pub use hid::*;
pub use interface::*;
pub use string::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Descriptor<'a> {
    Device(DeviceDescriptor),
    Configuration(ConfigurationDescriptor),
    OtherSpeedConfiguration(ConfigurationDescriptor),
    String(StringDescriptor),
    Interface(InterfaceDescriptor),
    Endpoint(EndpointDescriptor),
    DeviceQualifier(DeviceQualifierDescriptor),
    InterfaceAssociation(InterfaceAssociationDescriptor),
    Hid(HidDescriptor),
    SuperSpeedCompanion(SuperSpeedCompanionDescriptor),
    /// Types 0x20..=0x2F other than a HID descriptor in a HID interface
    ClassSpecific { descriptor_type: u8, data: &'a [u8] },
    Unknown { descriptor_type: u8, data: &'a [u8] },
}

macro_rules! into {
    ($v:ident $f:ident $t:ty) => {
        pub fn $f(self) -> Option<$t> {
            match self {
                Self::$v(v) => Some(v),
                _ => None,
            }
        }
    };
}

impl<'a> Descriptor<'a> {
    into!(Device into_device DeviceDescriptor);
    into!(Configuration into_configuration ConfigurationDescriptor);
    into!(Interface into_interface InterfaceDescriptor);
    into!(Endpoint into_endpoint EndpointDescriptor);
    into!(String into_string StringDescriptor);
    into!(Hid into_hid HidDescriptor);

    /// Decode the fixed fields of `record`.
    ///
    /// Type 0x21 is shared between class specifications, so it is only read
    /// as a HID descriptor when `in_hid_interface` is set.
    pub fn classify(
        record: &RawRecord<'a>,
        in_hid_interface: bool,
    ) -> Result<Self, DescriptorError> {
        let length = record.length();
        let ty = record.descriptor_type();
        let buf = record.payload();
        let too_short = |expected: u8| DescriptorError::TooShort {
            offset: record.offset,
            descriptor_type: ty,
            length,
            expected,
        };

        macro_rules! decode {
            ($t:ident) => {
                $t::from_raw(length, buf).ok_or_else(|| too_short($t::LENGTH))?
            };
        }

        let desc = match record.kind() {
            Some(DescriptorType::Device) => Descriptor::Device(decode!(DeviceDescriptor)),
            Some(DescriptorType::Configuration) => {
                Descriptor::Configuration(decode!(ConfigurationDescriptor))
            }
            Some(DescriptorType::OtherSpeedConfiguration) => {
                Descriptor::OtherSpeedConfiguration(decode!(ConfigurationDescriptor))
            }
            Some(DescriptorType::String) => Descriptor::String(
                StringDescriptor::from_raw(length, buf).ok_or(DescriptorError::InvalidString {
                    offset: record.offset,
                })?,
            ),
            Some(DescriptorType::Interface) => {
                Descriptor::Interface(decode!(InterfaceDescriptor))
            }
            Some(DescriptorType::Endpoint) => Descriptor::Endpoint(decode!(EndpointDescriptor)),
            Some(DescriptorType::DeviceQualifier) => {
                Descriptor::DeviceQualifier(decode!(DeviceQualifierDescriptor))
            }
            Some(DescriptorType::InterfaceAssociation) => {
                Descriptor::InterfaceAssociation(decode!(InterfaceAssociationDescriptor))
            }
            Some(DescriptorType::Hid) if in_hid_interface => {
                Descriptor::Hid(decode!(HidDescriptor))
            }
            Some(DescriptorType::SuperSpeedEndpointCompanion) => {
                Descriptor::SuperSpeedCompanion(decode!(SuperSpeedCompanionDescriptor))
            }
            _ if (0x20..=0x2f).contains(&ty) => Descriptor::ClassSpecific {
                descriptor_type: ty,
                data: buf,
            },
            _ => Descriptor::Unknown {
                descriptor_type: ty,
                data: buf,
            },
        };
        Ok(desc)
    }
}

/// Walk and classify the records of a descriptor blob.
pub fn descriptors(buf: &[u8]) -> Descriptors<'_> {
    Descriptors::new(buf)
}

/// Iterator of classified descriptors, paired with the record they came from.
/// Like [Records], it stops after the first error and can be restarted.
#[derive(Clone, Debug)]
pub struct Descriptors<'a> {
    records: Records<'a>,
    in_hid_interface: bool,
    failed: bool,
}

impl<'a> Descriptors<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            records: Records::new(buf),
            in_hid_interface: false,
            failed: false,
        }
    }

    pub fn restart(&mut self) {
        self.records.restart();
        self.in_hid_interface = false;
        self.failed = false;
    }
}

impl<'a> Iterator for Descriptors<'a> {
    type Item = Result<(RawRecord<'a>, Descriptor<'a>), DescriptorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(err)),
        };
        match Descriptor::classify(&record, self.in_hid_interface) {
            Ok(desc) => {
                match &desc {
                    Descriptor::Interface(intf) => {
                        self.in_hid_interface = intf.class() == Some(ClassCode::Hid);
                    }
                    Descriptor::Configuration(_) | Descriptor::OtherSpeedConfiguration(_) => {
                        self.in_hid_interface = false;
                    }
                    _ => {}
                }
                Some(Ok((record, desc)))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Descriptors<'_> {}
