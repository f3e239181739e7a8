use super::*;

/// bmRequestType bit layout
pub mod request_type {
    pub const DIR_OUT: u8 = 0;
    pub const DIR_IN: u8 = 1 << 7;

    pub const TYPE_STANDARD: u8 = 0;
    pub const TYPE_CLASS: u8 = 1 << 5;
    pub const TYPE_VENDOR: u8 = 2 << 5;

    pub const RECIPIENT_DEVICE: u8 = 0;
    pub const RECIPIENT_INTERFACE: u8 = 1;
    pub const RECIPIENT_ENDPOINT: u8 = 2;
    pub const RECIPIENT_OTHER: u8 = 3;
}

/// Control transfer setup packet, 8 bytes little endian on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetupPacket {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

impl SetupPacket {
    /// Parse a setup packet from raw bytes
    pub fn parse(setup: &[u8; 8]) -> SetupPacket {
        SetupPacket {
            request_type: setup[0],
            request: setup[1],
            value: u16::from_le_bytes([setup[2], setup[3]]),
            index: u16::from_le_bytes([setup[4], setup[5]]),
            length: u16::from_le_bytes([setup[6], setup[7]]),
        }
    }

    pub fn to_bytes(&self) -> [u8; 8] {
        let [v0, v1] = self.value.to_le_bytes();
        let [i0, i1] = self.index.to_le_bytes();
        let [l0, l1] = self.length.to_le_bytes();
        [self.request_type, self.request, v0, v1, i0, i1, l0, l1]
    }

    /// GET_DESCRIPTOR: descriptor type in the high byte of wValue, index in
    /// the low byte, language id (strings only) in wIndex.
    pub fn get_descriptor(
        descriptor_type: DescriptorType,
        descriptor_index: u8,
        language_id: u16,
        length: u16,
    ) -> Self {
        use request_type::*;
        Self {
            request_type: DIR_IN | TYPE_STANDARD | RECIPIENT_DEVICE,
            request: StandardRequest::GetDescriptor as u8,
            value: u16::from(descriptor_type as u8) << 8 | u16::from(descriptor_index),
            index: language_id,
            length,
        }
    }

    pub fn set_address(address: u8) -> Self {
        Self::standard_out(StandardRequest::SetAddress, address.into())
    }

    pub fn set_configuration(value: u8) -> Self {
        Self::standard_out(StandardRequest::SetConfiguration, value.into())
    }

    fn standard_out(request: StandardRequest, value: u16) -> Self {
        use request_type::*;
        Self {
            request_type: DIR_OUT | TYPE_STANDARD | RECIPIENT_DEVICE,
            request: request as u8,
            value,
            index: 0,
            length: 0,
        }
    }

    pub fn direction(&self) -> Direction {
        if self.request_type & request_type::DIR_IN != 0 {
            Direction::In
        } else {
            Direction::Out
        }
    }

    /// Recognized only for the standard request type
    pub fn standard_request(&self) -> Option<StandardRequest> {
        if self.request_type & 0x60 == request_type::TYPE_STANDARD {
            StandardRequest::from_u8(self.request)
        } else {
            None
        }
    }

    /// For GET_DESCRIPTOR, the requested type and index
    pub fn descriptor(&self) -> Option<(u8, u8)> {
        match self.standard_request() {
            Some(StandardRequest::GetDescriptor) => {
                let [index, ty] = self.value.to_le_bytes();
                Some((ty, index))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wire_layouts() {
        let get = SetupPacket::get_descriptor(DescriptorType::Device, 0, 0, 0x40);
        assert_eq!(
            get.to_bytes(),
            [0x80, 0x06, 0x00, 0x01, 0x00, 0x00, 0x40, 0x00]
        );
        assert_eq!(
            SetupPacket::set_address(0x12).to_bytes(),
            [0x00, 0x05, 0x12, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(
            SetupPacket::set_configuration(1).to_bytes(),
            [0x00, 0x09, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00]
        );

        let config = SetupPacket::get_descriptor(DescriptorType::Configuration, 0, 0, 0xff);
        assert_eq!(
            config.to_bytes(),
            [0x80, 0x06, 0x00, 0x02, 0x00, 0x00, 0xff, 0x00]
        );
        let string = SetupPacket::get_descriptor(DescriptorType::String, 2, 0x0409, 0xff);
        assert_eq!(
            string.to_bytes(),
            [0x80, 0x06, 0x02, 0x03, 0x09, 0x04, 0xff, 0x00]
        );
    }

    #[test]
    fn parse_captured_setup() {
        let setup = SetupPacket::parse(&[0x80, 0x06, 0x00, 0x02, 0x00, 0x00, 0x3b, 0x00]);
        assert_eq!(setup.direction(), Direction::In);
        assert_eq!(setup.standard_request(), Some(StandardRequest::GetDescriptor));
        assert_eq!(setup.descriptor(), Some((DescriptorType::Configuration as u8, 0)));
        assert_eq!(setup.length, 59);
        assert_eq!(SetupPacket::parse(&setup.to_bytes()), setup);

        // HID SET_IDLE is a class request, not SET_CONFIGURATION
        let class = SetupPacket::parse(&[0x21, 0x0a, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(class.direction(), Direction::Out);
        assert_eq!(class.standard_request(), None);
        assert_eq!(class.descriptor(), None);
    }
}
