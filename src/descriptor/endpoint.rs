use super::*;
use std::fmt;

/// Endpoint descriptor (bDescriptorType 0x05)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EndpointDescriptor {
    pub length: u8,
    pub address: EndpointAddress,
    pub attributes: EndpointAttributes,
    /// Raw wMaxPacketSize, see [EndpointDescriptor::max_packet_bytes]
    pub max_packet_size: u16,
    pub interval: u8,
    /// Audio class endpoints append bRefresh and bSynchAddress
    pub refresh: Option<u8>,
    pub synch_address: Option<u8>,
}

impl EndpointDescriptor {
    pub const LENGTH: u8 = 7;
    pub const AUDIO_LENGTH: u8 = 9;

    pub(crate) fn from_raw(length: u8, buf: &[u8]) -> Option<Self> {
        if let &[a, b, c, d, e, ref rest @ ..] = buf {
            let (refresh, synch_address) = match *rest {
                [r, s, ..] => (Some(r), Some(s)),
                _ => (None, None),
            };
            Some(EndpointDescriptor {
                length,
                address: EndpointAddress(a),
                attributes: EndpointAttributes(b),
                max_packet_size: u16::from_le_bytes([c, d]),
                interval: e,
                refresh,
                synch_address,
            })
        } else {
            None
        }
    }

    pub fn number(&self) -> u8 {
        self.address.number()
    }

    pub fn direction(&self) -> Direction {
        self.address.direction()
    }

    pub fn transfer_type(&self) -> TransferType {
        self.attributes.transfer_type()
    }

    /// Packet size in bytes, bits 10:0
    pub fn max_packet_bytes(&self) -> u16 {
        self.max_packet_size & 0x7ff
    }

    /// Extra transactions per microframe for high-speed periodic endpoints, bits 12:11
    pub fn additional_transactions(&self) -> u8 {
        (self.max_packet_size >> 11 & 0x3) as u8
    }
}

/// bEndpointAddress
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EndpointAddress(pub u8);

impl EndpointAddress {
    pub fn number(&self) -> u8 {
        self.0 & 0xf
    }

    pub fn direction(&self) -> Direction {
        if self.0 & 1 << 7 == 0 {
            Direction::Out
        } else {
            Direction::In
        }
    }

    /// Bits 6:4 must be zero
    pub fn reserved_bits(&self) -> u8 {
        self.0 >> 4 & 0x7
    }
}

impl fmt::Debug for EndpointAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(stringify!(EndpointAddress))
            .field("direction", &self.direction())
            .field("number", &self.number())
            .finish()
    }
}

impl fmt::Display for EndpointAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// bmAttributes
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EndpointAttributes(pub u8);

impl EndpointAttributes {
    pub fn transfer_type(&self) -> TransferType {
        match self.0 & 0x3 {
            0 => TransferType::Control,
            1 => TransferType::Isochronous,
            2 => TransferType::Bulk,
            _ => TransferType::Interrupt,
        }
    }

    pub fn sync_type(&self) -> SyncType {
        match self.0 >> 2 & 0x3 {
            0 => SyncType::None,
            1 => SyncType::Async,
            2 => SyncType::Adaptive,
            _ => SyncType::Sync,
        }
    }

    pub fn usage_type(&self) -> UsageType {
        match self.0 >> 4 & 0x3 {
            0 => UsageType::Data,
            1 => UsageType::Feedback,
            2 => UsageType::ImplicitFeedback,
            _ => UsageType::Reserved,
        }
    }
}

impl fmt::Debug for EndpointAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(stringify!(EndpointAttributes))
            .field("transfer", &self.transfer_type())
            .field("sync", &self.sync_type())
            .field("usage", &self.usage_type())
            .finish()
    }
}

/// SuperSpeed endpoint companion (bDescriptorType 0x30), follows its endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SuperSpeedCompanionDescriptor {
    pub length: u8,
    pub max_burst: u8,
    pub attributes: u8,
    pub bytes_per_interval: u16,
}

impl SuperSpeedCompanionDescriptor {
    pub const LENGTH: u8 = 6;

    pub(crate) fn from_raw(length: u8, buf: &[u8]) -> Option<Self> {
        if let &[a, b, c, d, ..] = buf {
            Some(SuperSpeedCompanionDescriptor {
                length,
                max_burst: a,
                attributes: b,
                bytes_per_interval: u16::from_le_bytes([c, d]),
            })
        } else {
            None
        }
    }
}
