use super::*;

/// bDescriptorType values this crate knows how to decode
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DescriptorType {
    Device = 0x1,
    Configuration = 0x2,
    String = 0x3,
    Interface = 0x4,
    Endpoint = 0x5,
    DeviceQualifier = 0x6,
    OtherSpeedConfiguration = 0x7,
    InterfacePower = 0x8,
    InterfaceAssociation = 0xB,
    Bos = 0xF,
    Hid = 0x21,
    Report = 0x22,
    Physical = 0x23,
    ClassSpecificInterface = 0x24,
    ClassSpecificEndpoint = 0x25,
    SuperSpeedEndpointCompanion = 0x30,
}

/// A list of defined USB class codes
/// Only the ones that can appear in an interface descriptor are listed,
/// 0x00 and 0x09 are device-level only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClassCode {
    Audio = 0x01,
    Cdc = 0x02,
    Hid = 0x03,
    Physical = 0x05,
    Image = 0x06,
    Printer = 0x07,
    MassStorage = 0x08,
    CdcData = 0x0A,
    SmartCard = 0x0B,
    ContentSecurity = 0x0D,
    Video = 0x0E,
    PersonalHealthcare = 0x0F,
    AudioVideo = 0x10,
    Billboard = 0x11,
    TypeCBridge = 0x12,
    BulkDisplay = 0x13,
    MctpOverUsb = 0x14,
    I3c = 0x3C,
    Diagnostic = 0xDC,
    WirelessController = 0xE0,
    Misc = 0xEF,
    ApplicationSpecific = 0xFE,
    VendorSpecific = 0xFF,
}

pub const AUDIO_SUBCLASS_UNDEFINED: u8 = 0x00;
pub const AUDIO_SUBCLASS_AUDIOCONTROL: u8 = 0x01;
pub const AUDIO_SUBCLASS_AUDIOSTREAMING: u8 = 0x02;
pub const AUDIO_SUBCLASS_MIDISTREAMING: u8 = 0x03;

/// Audio Class 1.0, also used when the protocol is undefined
pub const AUDIO_PROTOCOL_1_0: u8 = 0x00;
pub const AUDIO_PROTOCOL_2_0: u8 = 0x20;

pub const MSC_SUBCLASS_SCSI_NOT_REPORTED: u8 = 0x00;
pub const MSC_SUBCLASS_RBC: u8 = 0x01;
pub const MSC_SUBCLASS_MMC5: u8 = 0x02;
pub const MSC_SUBCLASS_QIC157: u8 = 0x03;
pub const MSC_SUBCLASS_UFI: u8 = 0x04;
pub const MSC_SUBCLASS_SFF8070I: u8 = 0x05;
pub const MSC_SUBCLASS_SCSI_TRANSPARENT: u8 = 0x06;

pub const MSC_PROTOCOL_CBI_WITH_INTERRUPT: u8 = 0x00;
pub const MSC_PROTOCOL_CBI_WITHOUT_INTERRUPT: u8 = 0x01;
/// Bulk-Only Transport, what nearly every thumbdrive speaks
pub const MSC_PROTOCOL_BULK_ONLY: u8 = 0x50;
pub const MSC_PROTOCOL_UAS: u8 = 0x62;

pub const HID_SUBCLASS_NONE: u8 = 0x00;
pub const HID_SUBCLASS_BOOT_INTERFACE: u8 = 0x01;

pub const HID_PROTOCOL_NONE: u8 = 0x00;
pub const HID_PROTOCOL_KEYBOARD: u8 = 0x01;
pub const HID_PROTOCOL_MOUSE: u8 = 0x02;

/// bmAttributes bits 1:0 of an endpoint descriptor
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TransferType {
    Control = 0,
    Isochronous = 1,
    Bulk = 2,
    Interrupt = 3,
}

/// bmAttributes bits 3:2, only meaningful for isochronous endpoints
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SyncType {
    None = 0,
    Async = 1,
    Adaptive = 2,
    Sync = 3,
}

/// bmAttributes bits 5:4, only meaningful for isochronous endpoints
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UsageType {
    Data = 0,
    Feedback = 1,
    ImplicitFeedback = 2,
    Reserved = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Host to device
    Out = 0,
    /// Device to host
    In = 1,
}

/// Standard bRequest codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StandardRequest {
    GetStatus = 0,
    ClearFeature = 1,
    SetFeature = 3,
    SetAddress = 5,
    GetDescriptor = 6,
    SetDescriptor = 7,
    GetConfiguration = 8,
    SetConfiguration = 9,
    GetInterface = 10,
    SetInterface = 11,
    SynchFrame = 12,
}
