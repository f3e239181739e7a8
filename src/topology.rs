//! Rebuild the device → configuration → interface → endpoint tree from a
//! classified descriptor stream.

use super::*;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;

/// Everything a descriptor blob says about one device
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceTopology {
    /// Absent when the blob is a bare GET_DESCRIPTOR(CONFIGURATION) response
    pub device: Option<DeviceDescriptor>,
    pub qualifier: Option<DeviceQualifierDescriptor>,
    pub strings: Vec<StringDescriptor>,
    pub configurations: Vec<Configuration>,
    /// Raw records seen before the first configuration that belong to no node
    pub extra: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Configuration {
    pub descriptor: ConfigurationDescriptor,
    /// Came from an other-speed configuration descriptor
    pub other_speed: bool,
    /// Position of the configuration header in the blob
    pub offset: usize,
    /// Bytes from the header up to the next configuration or the end of the blob
    pub span: usize,
    pub associations: Vec<InterfaceAssociationDescriptor>,
    /// One entry per alternate setting, in blob order
    pub interfaces: Vec<Interface>,
    /// Class-specific records between the header and the first interface
    pub extra: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interface {
    pub descriptor: InterfaceDescriptor,
    pub hid: Option<HidDescriptor>,
    pub endpoints: Vec<Endpoint>,
    /// Raw class-specific records (HID descriptor included) following the
    /// interface header, before its first endpoint
    pub extra: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Endpoint {
    pub descriptor: EndpointDescriptor,
    pub companion: Option<SuperSpeedCompanionDescriptor>,
    /// Raw class-specific records following the endpoint
    pub extra: Vec<u8>,
}

impl Deref for Configuration {
    type Target = ConfigurationDescriptor;

    fn deref(&self) -> &ConfigurationDescriptor {
        &self.descriptor
    }
}

impl Deref for Interface {
    type Target = InterfaceDescriptor;

    fn deref(&self) -> &InterfaceDescriptor {
        &self.descriptor
    }
}

impl Deref for Endpoint {
    type Target = EndpointDescriptor;

    fn deref(&self) -> &EndpointDescriptor {
        &self.descriptor
    }
}

impl DeviceTopology {
    /// Parse a whole blob. Fails on the first malformed record or on a
    /// record that cannot be placed in the tree.
    pub fn parse(buf: &[u8]) -> Result<Self, DescriptorError> {
        let mut builder = TopologyBuilder::default();
        for item in descriptors(buf) {
            let (record, desc) = item?;
            builder.push(&record, desc)?;
        }
        Ok(builder.finish(buf.len()))
    }

    /// Look up a configuration by bConfigurationValue
    pub fn configuration(&self, value: u8) -> Option<&Configuration> {
        self.configurations
            .iter()
            .find(|c| c.configuration_value == value)
    }

    /// Find an endpoint by its address, searching every configuration
    pub fn find_endpoint(&self, address: u8) -> Option<(&Endpoint, &Interface)> {
        self.configurations.iter().find_map(|c| c.find_endpoint(address))
    }
}

impl Configuration {
    pub fn interface(&self, number: u8, alternate: u8) -> Option<&Interface> {
        self.interfaces
            .iter()
            .find(|i| i.interface_number == number && i.alternate_setting == alternate)
    }

    /// Alternate settings of one interface number
    pub fn alternates(&self, number: u8) -> impl Iterator<Item = &Interface> {
        self.interfaces
            .iter()
            .filter(move |i| i.interface_number == number)
    }

    /// Distinct interface numbers, ascending
    pub fn interface_numbers(&self) -> Vec<u8> {
        self.interfaces
            .iter()
            .map(|i| i.interface_number)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.interfaces.iter().flat_map(|i| i.endpoints.iter())
    }

    pub fn find_endpoint(&self, address: u8) -> Option<(&Endpoint, &Interface)> {
        self.interfaces
            .iter()
            .find_map(|intf| intf.endpoint(address).map(|ep| (ep, intf)))
    }
}

impl Interface {
    pub fn endpoint(&self, address: u8) -> Option<&Endpoint> {
        self.endpoints.iter().find(|ep| ep.address.0 == address)
    }
}

/// Where the last structural record left us; class-specific records attach here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Cursor {
    #[default]
    Top,
    Configuration,
    Interface,
    Endpoint,
}

#[derive(Default)]
struct TopologyBuilder {
    topology: DeviceTopology,
    cursor: Cursor,
    seen_records: bool,
}

impl TopologyBuilder {
    fn configuration(&mut self) -> Option<&mut Configuration> {
        self.topology.configurations.last_mut()
    }

    fn interface(&mut self) -> Option<&mut Interface> {
        match self.cursor {
            Cursor::Interface | Cursor::Endpoint => {
                self.configuration().and_then(|c| c.interfaces.last_mut())
            }
            _ => None,
        }
    }

    fn endpoint(&mut self) -> Option<&mut Endpoint> {
        match self.cursor {
            Cursor::Endpoint => self.interface().and_then(|i| i.endpoints.last_mut()),
            _ => None,
        }
    }

    fn attach_extra(&mut self, raw: &[u8]) {
        let cursor = self.cursor;
        let extra = match cursor {
            Cursor::Top => Some(&mut self.topology.extra),
            Cursor::Configuration => self.configuration().map(|c| &mut c.extra),
            Cursor::Interface => self.interface().map(|i| &mut i.extra),
            Cursor::Endpoint => self.endpoint().map(|e| &mut e.extra),
        };
        if let Some(extra) = extra {
            extra.extend_from_slice(raw);
        }
    }

    fn close_configuration(&mut self, boundary: usize) {
        if let Some(config) = self.configuration() {
            config.span = boundary - config.offset;
        }
    }

    fn push(&mut self, record: &RawRecord<'_>, desc: Descriptor<'_>) -> Result<(), DescriptorError> {
        let offset = record.offset;
        match desc {
            Descriptor::Device(device) => {
                if self.seen_records {
                    return Err(DescriptorError::UnexpectedDevice { offset });
                }
                debug!(
                    "device {:04x}:{:04x}, {} configuration(s)",
                    device.vendor_id, device.product_id, device.num_configurations
                );
                self.topology.device = Some(device);
            }
            Descriptor::Configuration(descriptor) | Descriptor::OtherSpeedConfiguration(descriptor) => {
                let other_speed = record.kind() == Some(DescriptorType::OtherSpeedConfiguration);
                self.close_configuration(offset);
                debug!(
                    "configuration {} at {offset}, {} interface(s)",
                    descriptor.configuration_value, descriptor.num_interfaces
                );
                self.topology.configurations.push(Configuration {
                    descriptor,
                    other_speed,
                    offset,
                    span: 0,
                    associations: vec![],
                    interfaces: vec![],
                    extra: vec![],
                });
                self.cursor = Cursor::Configuration;
            }
            Descriptor::Interface(descriptor) => {
                let config = self
                    .configuration()
                    .ok_or(DescriptorError::OrphanInterface { offset })?;
                debug!(
                    "interface {} alt {}, class {:#04x}",
                    descriptor.interface_number,
                    descriptor.alternate_setting,
                    descriptor.interface_class
                );
                config.interfaces.push(Interface {
                    descriptor,
                    hid: None,
                    endpoints: vec![],
                    extra: vec![],
                });
                self.cursor = Cursor::Interface;
            }
            Descriptor::Endpoint(descriptor) => {
                let intf = self
                    .interface()
                    .ok_or(DescriptorError::OrphanEndpoint { offset })?;
                intf.endpoints.push(Endpoint {
                    descriptor,
                    companion: None,
                    extra: vec![],
                });
                self.cursor = Cursor::Endpoint;
            }
            Descriptor::Hid(hid) => {
                let intf = self
                    .interface()
                    .ok_or(DescriptorError::OrphanHid { offset })?;
                if intf.hid.is_none() {
                    intf.hid = Some(hid);
                }
                intf.extra.extend_from_slice(record.as_bytes());
            }
            Descriptor::SuperSpeedCompanion(companion) => {
                if let Some(ep) = self.endpoint().filter(|ep| ep.companion.is_none()) {
                    ep.companion = Some(companion);
                } else {
                    self.attach_extra(record.as_bytes());
                }
            }
            Descriptor::InterfaceAssociation(iad) => {
                if let Some(config) = self.configuration() {
                    config.associations.push(iad);
                } else {
                    self.attach_extra(record.as_bytes());
                }
            }
            Descriptor::String(string) => self.topology.strings.push(string),
            Descriptor::DeviceQualifier(qualifier) => self.topology.qualifier = Some(qualifier),
            Descriptor::ClassSpecific { .. } | Descriptor::Unknown { .. } => {
                self.attach_extra(record.as_bytes());
            }
        }
        self.seen_records = true;
        Ok(())
    }

    fn finish(mut self, total: usize) -> DeviceTopology {
        self.close_configuration(total);
        self.topology
    }
}

impl fmt::Display for DeviceTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(d) = &self.device {
            let [maj, min] = d.usb_version.to_be_bytes();
            writeln!(
                f,
                "Device {:04x}:{:04x} USB {:x}.{:02x}, class {:#04x}, ep0 {} bytes",
                d.vendor_id,
                d.product_id,
                maj,
                min,
                d.device_class,
                d.ep0_max_packet_size()
            )?;
        }
        for config in &self.configurations {
            writeln!(
                f,
                "  Configuration {}: {} interface(s), {} mA{}",
                config.configuration_value,
                config.num_interfaces,
                config.max_power_ma(),
                if config.other_speed { " (other speed)" } else { "" }
            )?;
            for intf in &config.interfaces {
                writeln!(
                    f,
                    "    Interface {} alt {}: class {:#04x} subclass {:#04x} protocol {:#04x}",
                    intf.interface_number,
                    intf.alternate_setting,
                    intf.interface_class,
                    intf.interface_subclass,
                    intf.interface_protocol
                )?;
                for ep in &intf.endpoints {
                    writeln!(
                        f,
                        "      Endpoint {} {:?} {:?}, {} bytes, interval {}",
                        ep.address,
                        ep.direction(),
                        ep.transfer_type(),
                        ep.max_packet_bytes(),
                        ep.interval
                    )?;
                }
            }
        }
        Ok(())
    }
}
