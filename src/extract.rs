//! Streaming endpoint extraction.
//!
//! [EndpointExtractor] is fed a configuration descriptor one byte at a time,
//! the way it arrives over a control pipe, and picks out the first IN and/or
//! OUT endpoint of the first interface matching an [EndpointFilter]. It keeps
//! a handful of latched fields and never buffers a record.

use super::*;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Which endpoint directions an extraction must find
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Directions {
    In,
    Out,
    InAndOut,
}

impl Directions {
    pub fn wants_in(&self) -> bool {
        matches!(self, Directions::In | Directions::InAndOut)
    }

    pub fn wants_out(&self) -> bool {
        matches!(self, Directions::Out | Directions::InAndOut)
    }

    fn satisfied_by(&self, found: &ExtractedEndpoints) -> bool {
        (!self.wants_in() || found.in_endpoint.is_some())
            && (!self.wants_out() || found.out_endpoint.is_some())
    }
}

/// Interface and endpoint selection for an extraction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EndpointFilter {
    pub interface_class: u8,
    /// Ignored when `None`
    pub interface_subclass: Option<u8>,
    /// Ignored when `None`
    pub interface_protocol: Option<u8>,
    pub transfer_type: TransferType,
    pub directions: Directions,
}

impl EndpointFilter {
    /// Bulk IN and OUT endpoints of any interface of `class`
    pub fn new(class: ClassCode) -> Self {
        Self {
            interface_class: class as u8,
            interface_subclass: None,
            interface_protocol: None,
            transfer_type: TransferType::Bulk,
            directions: Directions::InAndOut,
        }
    }

    pub fn with_subclass(mut self, subclass: u8) -> Self {
        self.interface_subclass = Some(subclass);
        self
    }

    pub fn with_protocol(mut self, protocol: u8) -> Self {
        self.interface_protocol = Some(protocol);
        self
    }

    pub fn with_transfer_type(mut self, transfer_type: TransferType) -> Self {
        self.transfer_type = transfer_type;
        self
    }

    pub fn with_directions(mut self, directions: Directions) -> Self {
        self.directions = directions;
        self
    }

    /// USB-MIDI 1.0 streaming interface
    pub fn midi() -> Self {
        Self::new(ClassCode::Audio)
            .with_subclass(AUDIO_SUBCLASS_MIDISTREAMING)
            .with_protocol(AUDIO_PROTOCOL_1_0)
    }

    /// Bulk-only SCSI mass storage
    pub fn mass_storage() -> Self {
        Self::new(ClassCode::MassStorage)
            .with_subclass(MSC_SUBCLASS_SCSI_TRANSPARENT)
            .with_protocol(MSC_PROTOCOL_BULK_ONLY)
    }

    pub fn hid_keyboard() -> Self {
        Self::hid_boot(HID_PROTOCOL_KEYBOARD)
    }

    pub fn hid_mouse() -> Self {
        Self::hid_boot(HID_PROTOCOL_MOUSE)
    }

    fn hid_boot(protocol: u8) -> Self {
        Self::new(ClassCode::Hid)
            .with_subclass(HID_SUBCLASS_BOOT_INTERFACE)
            .with_protocol(protocol)
            .with_transfer_type(TransferType::Interrupt)
            .with_directions(Directions::In)
    }

    pub fn matches_interface(&self, class: u8, subclass: u8, protocol: u8) -> bool {
        class == self.interface_class
            && self.interface_subclass.is_none_or(|s| s == subclass)
            && self.interface_protocol.is_none_or(|p| p == protocol)
    }

    pub fn matches(&self, intf: &InterfaceDescriptor) -> bool {
        self.matches_interface(
            intf.interface_class,
            intf.interface_subclass,
            intf.interface_protocol,
        )
    }
}

/// Result of a successful extraction. Directions the filter did not ask
/// for are always `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtractedEndpoints {
    pub in_endpoint: Option<EndpointAddress>,
    pub out_endpoint: Option<EndpointAddress>,
}

impl ExtractedEndpoints {
    fn capture(&mut self, filter: &EndpointFilter, ep: &EndpointDescriptor) -> bool {
        if ep.transfer_type() != filter.transfer_type {
            return false;
        }
        let slot = match ep.direction() {
            Direction::In if filter.directions.wants_in() => &mut self.in_endpoint,
            Direction::Out if filter.directions.wants_out() => &mut self.out_endpoint,
            _ => return false,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(ep.address);
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    NeedMore,
    Done(ExtractedEndpoints),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum State {
    /// Next byte is bLength
    Length,
    /// Inside a record
    Record,
    Done,
    Failed(DescriptorError),
}

/// Byte-at-a-time endpoint extractor, see the module docs.
#[derive(Clone, Debug)]
pub struct EndpointExtractor {
    filter: EndpointFilter,
    state: State,
    /// Bytes pushed so far
    position: usize,
    record_start: usize,
    length: u8,
    /// Bytes of the current record seen, bLength included
    index: u8,
    descriptor_type: u8,
    /// Record bytes 2..=8, enough for interface and endpoint fields
    fields: [u8; 7],
    in_matching_interface: bool,
    found: ExtractedEndpoints,
}

impl EndpointExtractor {
    pub fn new(filter: EndpointFilter) -> Self {
        Self {
            filter,
            state: State::Length,
            position: 0,
            record_start: 0,
            length: 0,
            index: 0,
            descriptor_type: 0,
            fields: [0; 7],
            in_matching_interface: false,
            found: ExtractedEndpoints::default(),
        }
    }

    pub fn filter(&self) -> &EndpointFilter {
        &self.filter
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Feed one byte. Once done, further bytes are ignored.
    pub fn push(&mut self, byte: u8) -> Result<Progress, DescriptorError> {
        match &self.state {
            State::Done => return Ok(Progress::Done(self.found)),
            State::Failed(err) => return Err(err.clone()),
            State::Length => {
                if byte < 2 {
                    return self.fail(DescriptorError::InvalidLength {
                        offset: self.position,
                        length: byte,
                    });
                }
                self.record_start = self.position;
                self.length = byte;
                self.index = 1;
                self.state = State::Record;
            }
            State::Record => {
                match self.index {
                    1 => self.descriptor_type = byte,
                    i @ 2..=8 => self.fields[usize::from(i - 2)] = byte,
                    _ => {}
                }
                self.index += 1;
                if self.index == self.length {
                    self.position += 1;
                    return self.end_of_record();
                }
            }
        }
        self.position += 1;
        Ok(Progress::NeedMore)
    }

    /// Call once the input is exhausted.
    pub fn finish(&self) -> Result<ExtractedEndpoints, DescriptorError> {
        match &self.state {
            State::Done => Ok(self.found),
            State::Failed(err) => Err(err.clone()),
            State::Record => Err(DescriptorError::Truncated {
                offset: self.record_start,
                length: self.length,
                remaining: usize::from(self.index),
            }),
            State::Length => Err(DescriptorError::NotFound),
        }
    }

    fn fail(&mut self, err: DescriptorError) -> Result<Progress, DescriptorError> {
        self.state = State::Failed(err.clone());
        Err(err)
    }

    fn too_short(&mut self, expected: u8) -> Result<Progress, DescriptorError> {
        self.fail(DescriptorError::TooShort {
            offset: self.record_start,
            descriptor_type: self.descriptor_type,
            length: self.length,
            expected,
        })
    }

    fn end_of_record(&mut self) -> Result<Progress, DescriptorError> {
        let ty = DescriptorType::from_u8(self.descriptor_type);
        trace!("{:#04x} len = {}", self.descriptor_type, self.length);
        match ty {
            Some(DescriptorType::Configuration | DescriptorType::OtherSpeedConfiguration) => {
                // a host selects one configuration, endpoints must share it
                self.in_matching_interface = false;
                self.found = ExtractedEndpoints::default();
            }
            Some(DescriptorType::Interface) => {
                if self.length < InterfaceDescriptor::LENGTH {
                    return self.too_short(InterfaceDescriptor::LENGTH);
                }
                let [_, _, _, class, subclass, protocol, _] = self.fields;
                trace!("\t bInterfaceClass = {class:#04x}");
                trace!("\t bInterfaceSubClass = {subclass:#04x}");
                trace!("\t bInterfaceProtocol = {protocol:#04x}");
                self.in_matching_interface =
                    self.filter.matches_interface(class, subclass, protocol);
            }
            Some(DescriptorType::Endpoint) => {
                if self.length < EndpointDescriptor::LENGTH {
                    return self.too_short(EndpointDescriptor::LENGTH);
                }
                if let Some(ep) = EndpointDescriptor::from_raw(self.length, &self.fields[..5]) {
                    trace!("\t bEndpointAddress = {}", ep.address);
                    trace!("\t bmAttributes = {:?}", ep.attributes);
                    if self.in_matching_interface && self.found.capture(&self.filter, &ep) {
                        trace!("\t **** extracted {:?} ****", ep.direction());
                    }
                }
            }
            _ => {}
        }

        if self.filter.directions.satisfied_by(&self.found) {
            self.state = State::Done;
            Ok(Progress::Done(self.found))
        } else {
            self.state = State::Length;
            Ok(Progress::NeedMore)
        }
    }
}

/// Run an extraction over a whole buffer.
pub fn extract(filter: EndpointFilter, buf: &[u8]) -> Result<ExtractedEndpoints, DescriptorError> {
    let mut extractor = EndpointExtractor::new(filter);
    for &byte in buf {
        if let Progress::Done(found) = extractor.push(byte)? {
            return Ok(found);
        }
    }
    extractor.finish()
}

/// Control transfers hand the descriptor over in packets of at most this size
const READ_CHUNK: usize = 64;

/// Run an extraction over an async byte stream, stopping as soon as the
/// wanted endpoints have been seen.
pub async fn extract_from_reader<R: AsyncRead + Unpin>(
    filter: EndpointFilter,
    reader: &mut R,
) -> std::io::Result<ExtractedEndpoints> {
    let mut extractor = EndpointExtractor::new(filter);
    let mut buf = [0u8; READ_CHUNK];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(extractor.finish()?);
        }
        for &byte in &buf[..n] {
            if let Progress::Done(found) = extractor.push(byte)? {
                return Ok(found);
            }
        }
    }
}

impl DeviceTopology {
    /// Same selection as [EndpointExtractor], done on the parsed tree
    pub fn find_endpoints(&self, filter: &EndpointFilter) -> Option<ExtractedEndpoints> {
        self.configurations
            .iter()
            .find_map(|config| config.find_endpoints(filter))
    }
}

impl Configuration {
    /// Endpoints satisfying `filter` within this configuration alone
    pub fn find_endpoints(&self, filter: &EndpointFilter) -> Option<ExtractedEndpoints> {
        let mut found = ExtractedEndpoints::default();
        for intf in self.interfaces.iter().filter(|intf| filter.matches(intf)) {
            for ep in &intf.endpoints {
                found.capture(filter, ep);
                if filter.directions.satisfied_by(&found) {
                    return Some(found);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::tests::*;

    fn numbers(found: ExtractedEndpoints) -> (Option<u8>, Option<u8>) {
        (
            found.in_endpoint.map(|a| a.number()),
            found.out_endpoint.map(|a| a.number()),
        )
    }

    #[test]
    fn extraction_table() {
        setup_test_logger();
        let cases = [
            ("midi_keyboard", MIDI_KEYBOARD, EndpointFilter::midi(), Some(1), Some(1)),
            ("msc_thumbdrive", MSC_THUMBDRIVE, EndpointFilter::mass_storage(), Some(1), Some(2)),
            ("superspeed_flash", SUPERSPEED_FLASH, EndpointFilter::mass_storage(), Some(1), Some(2)),
            ("logi_g502", LOGI_G502, EndpointFilter::hid_mouse(), Some(1), None),
            ("logi_receiver", LOGI_RECEIVER, EndpointFilter::hid_mouse(), Some(2), None),
            ("logi_receiver", LOGI_RECEIVER, EndpointFilter::hid_keyboard(), Some(1), None),
        ];
        for (name, blob, filter, want_in, want_out) in cases {
            let found = extract(filter, blob).unwrap();
            assert_eq!(numbers(found), (want_in, want_out), "{name}");
        }
    }

    #[test]
    fn agrees_with_topology() {
        let filters = [
            EndpointFilter::midi(),
            EndpointFilter::mass_storage(),
            EndpointFilter::hid_keyboard(),
            EndpointFilter::hid_mouse(),
            EndpointFilter::new(ClassCode::VendorSpecific),
        ];
        for (name, blob) in ALL_FIXTURES {
            let topo = DeviceTopology::parse(blob).unwrap();
            for filter in &filters {
                assert_eq!(
                    extract(*filter, blob).ok(),
                    topo.find_endpoints(filter),
                    "{name} {filter:?}"
                );
            }
        }
    }

    #[test]
    fn vendor_interface_without_subclass() {
        let found = extract(EndpointFilter::new(ClassCode::VendorSpecific), SERVO_MICRO).unwrap();
        assert_eq!(found.in_endpoint, Some(EndpointAddress(0x81)));
        assert_eq!(found.out_endpoint, Some(EndpointAddress(0x01)));

        let filter = EndpointFilter::new(ClassCode::VendorSpecific).with_subclass(0x52);
        let found = extract(filter, SERVO_MICRO).unwrap();
        assert_eq!(numbers(found), (Some(3), Some(3)));
    }

    #[test]
    fn no_matching_interface() {
        assert_eq!(
            extract(EndpointFilter::hid_keyboard(), LOGI_G502),
            Err(DescriptorError::NotFound)
        );
        // the mouse interface exists but has no bulk endpoints
        let filter = EndpointFilter::hid_mouse().with_transfer_type(TransferType::Bulk);
        assert_eq!(extract(filter, LOGI_G502), Err(DescriptorError::NotFound));
    }

    /// Mass storage split over two configurations: IN only in the first,
    /// OUT only in the second.
    const SPLIT_CONFIGURATIONS: &[u8] = &[
        0x09, 0x02, 0x19, 0x00, 0x01, 0x01, 0x00, 0x80, 0x32, // configuration 1
        0x09, 0x04, 0x00, 0x00, 0x01, 0x08, 0x06, 0x50, 0x00, // interface 0
        0x07, 0x05, 0x81, 0x02, 0x00, 0x02, 0x00, // EP 1 IN
        0x09, 0x02, 0x19, 0x00, 0x01, 0x02, 0x00, 0x80, 0x32, // configuration 2
        0x09, 0x04, 0x00, 0x00, 0x01, 0x08, 0x06, 0x50, 0x00, // interface 0
        0x07, 0x05, 0x02, 0x02, 0x00, 0x02, 0x00, // EP 2 OUT
    ];

    #[test]
    fn endpoints_never_span_configurations() {
        let filter = EndpointFilter::mass_storage();
        assert_eq!(
            extract(filter, SPLIT_CONFIGURATIONS),
            Err(DescriptorError::NotFound)
        );
        let topo = DeviceTopology::parse(SPLIT_CONFIGURATIONS).unwrap();
        assert_eq!(topo.find_endpoints(&filter), None);

        // each half still satisfies a single-direction filter on its own
        let filter_out = filter.with_directions(Directions::Out);
        let found = extract(filter_out, SPLIT_CONFIGURATIONS).unwrap();
        assert_eq!(found.out_endpoint, Some(EndpointAddress(0x02)));
        assert_eq!(topo.find_endpoints(&filter_out), Some(found));
        assert_eq!(
            topo.configurations[1].find_endpoints(&filter_out),
            Some(found)
        );
        assert_eq!(topo.configurations[0].find_endpoints(&filter_out), None);
    }

    #[test]
    fn later_configuration_can_match() {
        let mut blob = SPLIT_CONFIGURATIONS[..25].to_vec();
        blob.extend_from_slice(MSC_THUMBDRIVE);
        // give the appended configuration its own value
        blob[25 + 5] = 0x02;
        let filter = EndpointFilter::mass_storage();
        let found = extract(filter, &blob).unwrap();
        assert_eq!(numbers(found), (Some(1), Some(2)));
        let topo = DeviceTopology::parse(&blob).unwrap();
        assert_eq!(topo.find_endpoints(&filter), Some(found));
    }

    #[test]
    fn stops_at_first_complete_match() {
        let mut extractor = EndpointExtractor::new(EndpointFilter::hid_keyboard());
        let mut done_at = None;
        for (i, &byte) in LOGI_RECEIVER.iter().enumerate() {
            if let Progress::Done(_) = extractor.push(byte).unwrap() {
                done_at = Some(i);
                break;
            }
        }
        // end of the first endpoint record
        assert_eq!(done_at, Some(33));
        assert!(extractor.is_done());
        assert_eq!(
            extractor.push(0x00),
            Ok(Progress::Done(ExtractedEndpoints {
                in_endpoint: Some(EndpointAddress(0x81)),
                out_endpoint: None,
            }))
        );
    }

    #[test]
    fn truncated_input() {
        let filter = EndpointFilter::mass_storage();
        assert_eq!(
            extract(filter, &MSC_THUMBDRIVE[..22]),
            Err(DescriptorError::Truncated {
                offset: 18,
                length: 7,
                remaining: 4
            })
        );
        // only the IN endpoint made it
        assert_eq!(
            extract(filter, &MSC_THUMBDRIVE[..25]),
            Err(DescriptorError::NotFound)
        );
    }

    #[test]
    fn zero_length_record_poisons_extractor() {
        let mut extractor = EndpointExtractor::new(EndpointFilter::midi());
        let err = DescriptorError::InvalidLength {
            offset: 0,
            length: 0,
        };
        assert_eq!(extractor.push(0x00), Err(err.clone()));
        assert_eq!(extractor.push(0x09), Err(err.clone()));
        assert_eq!(extractor.finish(), Err(err));
    }

    #[test]
    fn short_interface_record() {
        let buf = [0x05, 0x04, 0x00, 0x00, 0x01];
        assert_eq!(
            extract(EndpointFilter::midi(), &buf),
            Err(DescriptorError::TooShort {
                offset: 0,
                descriptor_type: 0x04,
                length: 5,
                expected: 9
            })
        );
    }

    #[tokio::test]
    async fn extract_from_slow_reader() {
        setup_test_logger();
        let mut reader = MockReader::new(LOGI_RECEIVER, 1);
        let found = extract_from_reader(EndpointFilter::hid_keyboard(), &mut reader)
            .await
            .unwrap();
        assert_eq!(numbers(found), (Some(1), None));
        assert_eq!(reader.consumed(), 34);

        let mut reader = MockReader::new(MIDI_KEYBOARD, 8);
        let found = extract_from_reader(EndpointFilter::midi(), &mut reader)
            .await
            .unwrap();
        assert_eq!(numbers(found), (Some(1), Some(1)));
    }

    #[tokio::test]
    async fn reader_errors_are_io_errors() {
        let mut reader = MockReader::new(LOGI_G502, 16);
        let err = extract_from_reader(EndpointFilter::hid_keyboard(), &mut reader)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
