#![allow(dead_code)]

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

pub fn setup_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Gaming mouse, full sysfs `descriptors` file: device descriptor followed by
/// the only configuration. Boot mouse on interface 0, vendor HID on 1.
pub const LOGI_G502: &[u8] = &[
    0x12, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x40, 0x6d, 0x04, 0x8b, 0xc0, 0x03, 0x27, 0x01,
    0x02, 0x03, 0x01, // device
    0x09, 0x02, 0x3b, 0x00, 0x02, 0x01, 0x04, 0xa0, 0x96, // configuration
    0x09, 0x04, 0x00, 0x00, 0x01, 0x03, 0x01, 0x02, 0x00, // interface 0
    0x09, 0x21, 0x11, 0x01, 0x00, 0x01, 0x22, 0x43, 0x00, // HID
    0x07, 0x05, 0x81, 0x03, 0x08, 0x00, 0x01, // EP 1 IN
    0x09, 0x04, 0x01, 0x00, 0x01, 0x03, 0x00, 0x00, 0x00, // interface 1
    0x09, 0x21, 0x11, 0x01, 0x00, 0x01, 0x22, 0x97, 0x00, // HID
    0x07, 0x05, 0x82, 0x03, 0x14, 0x00, 0x01, // EP 2 IN
];

/// USB-MIDI keyboard configuration descriptor: audio control interface plus
/// a MIDI streaming interface with audio-class (9 byte) bulk endpoints.
pub const MIDI_KEYBOARD: &[u8] = &[
    0x09, 0x02, 0x56, 0x00, 0x02, 0x01, 0x00, 0x80, 0x32, // configuration
    0x09, 0x04, 0x00, 0x00, 0x00, 0x01, 0x01, 0x00, 0x00, // interface 0, audio control
    0x09, 0x24, 0x01, 0x00, 0x01, 0x09, 0x00, 0x01, 0x01, // AC header
    0x09, 0x04, 0x01, 0x00, 0x02, 0x01, 0x03, 0x00, 0x00, // interface 1, MIDI streaming
    0x07, 0x24, 0x01, 0x00, 0x01, 0x32, 0x00, // MS header
    0x06, 0x24, 0x02, 0x01, 0x01, 0x00, // MIDI IN jack
    0x09, 0x24, 0x03, 0x01, 0x02, 0x01, 0x01, 0x01, 0x00, // MIDI OUT jack
    0x09, 0x05, 0x01, 0x02, 0x40, 0x00, 0x00, 0x00, 0x00, // EP 1 OUT
    0x05, 0x25, 0x01, 0x01, 0x01, // MS endpoint
    0x09, 0x05, 0x81, 0x02, 0x40, 0x00, 0x00, 0x00, 0x00, // EP 1 IN
    0x05, 0x25, 0x01, 0x01, 0x02, // MS endpoint
];

/// Bulk-only mass storage configuration descriptor.
pub const MSC_THUMBDRIVE: &[u8] = &[
    0x09, 0x02, 0x20, 0x00, 0x01, 0x01, 0x00, 0x80, 0x32, // configuration
    0x09, 0x04, 0x00, 0x00, 0x02, 0x08, 0x06, 0x50, 0x00, // interface 0
    0x07, 0x05, 0x81, 0x02, 0x00, 0x02, 0x00, // EP 1 IN
    0x07, 0x05, 0x02, 0x02, 0x00, 0x02, 0x00, // EP 2 OUT
];

/// Dual-function wireless receiver configuration descriptor: boot keyboard,
/// boot mouse and a vendor HID interface.
pub const LOGI_RECEIVER: &[u8] = &[
    0x09, 0x02, 0x54, 0x00, 0x03, 0x01, 0x04, 0xa0, 0x31, // configuration
    0x09, 0x04, 0x00, 0x00, 0x01, 0x03, 0x01, 0x01, 0x00, // interface 0, keyboard
    0x09, 0x21, 0x11, 0x01, 0x00, 0x01, 0x22, 0x3b, 0x00, // HID
    0x07, 0x05, 0x81, 0x03, 0x08, 0x00, 0x08, // EP 1 IN
    0x09, 0x04, 0x01, 0x00, 0x01, 0x03, 0x01, 0x02, 0x00, // interface 1, mouse
    0x09, 0x21, 0x11, 0x01, 0x00, 0x01, 0x22, 0x94, 0x00, // HID
    0x07, 0x05, 0x82, 0x03, 0x08, 0x00, 0x02, // EP 2 IN
    0x09, 0x04, 0x02, 0x00, 0x01, 0x03, 0x00, 0x00, 0x00, // interface 2
    0x09, 0x21, 0x11, 0x01, 0x00, 0x01, 0x22, 0x62, 0x00, // HID
    0x07, 0x05, 0x83, 0x03, 0x20, 0x00, 0x02, // EP 3 IN
];

/// SuperSpeed flash drive, full descriptor set with endpoint companions.
pub const SUPERSPEED_FLASH: &[u8] = &[
    0x12, 0x01, 0x00, 0x03, 0x00, 0x00, 0x00, 0x09, 0x81, 0x07, 0x80, 0x55, 0x10, 0x00, 0x01,
    0x02, 0x03, 0x01, 0x09, 0x02, 0x2C, 0x00, 0x01, 0x01, 0x00, 0x80, 0x32, 0x09, 0x04, 0x00,
    0x00, 0x02, 0x08, 0x06, 0x50, 0x00, 0x07, 0x05, 0x81, 0x02, 0x00, 0x04, 0x00, 0x06, 0x30,
    0x0F, 0x00, 0x00, 0x00, 0x07, 0x05, 0x02, 0x02, 0x00, 0x04, 0x00, 0x06, 0x30, 0x0F, 0x00,
    0x00, 0x00,
];

/// Debug board with five vendor interfaces. bNumInterfaces claims six.
pub const SERVO_MICRO: &[u8] = &[
    0x12, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x40, 0xd1, 0x18, 0x1b, 0x50, 0x00, 0x01, 0x01,
    0x02, 0x03, 0x01, 0x09, 0x02, 0x7c, 0x00, 0x06, 0x01, 0x04, 0xc0, 0xfa, 0x09, 0x04, 0x00,
    0x00, 0x02, 0xff, 0x50, 0x01, 0x06, 0x07, 0x05, 0x81, 0x02, 0x40, 0x00, 0x0a, 0x07, 0x05,
    0x01, 0x02, 0x40, 0x00, 0x00, 0x09, 0x04, 0x02, 0x00, 0x02, 0xff, 0x52, 0x01, 0x05, 0x07,
    0x05, 0x83, 0x02, 0x40, 0x00, 0x0a, 0x07, 0x05, 0x03, 0x02, 0x40, 0x00, 0x00, 0x09, 0x04,
    0x03, 0x00, 0x02, 0xff, 0x50, 0x01, 0x07, 0x07, 0x05, 0x84, 0x02, 0x10, 0x00, 0x0a, 0x07,
    0x05, 0x04, 0x02, 0x10, 0x00, 0x00, 0x09, 0x04, 0x04, 0x00, 0x02, 0xff, 0x50, 0x01, 0x08,
    0x07, 0x05, 0x85, 0x02, 0x10, 0x00, 0x0a, 0x07, 0x05, 0x05, 0x02, 0x10, 0x00, 0x00, 0x09,
    0x04, 0x05, 0x00, 0x02, 0xff, 0x53, 0xff, 0x09, 0x07, 0x05, 0x86, 0x02, 0x40, 0x00, 0x0a,
    0x07, 0x05, 0x06, 0x02, 0x40, 0x00, 0x00,
];

pub const ALL_FIXTURES: [(&str, &[u8]); 6] = [
    ("logi_g502", LOGI_G502),
    ("midi_keyboard", MIDI_KEYBOARD),
    ("msc_thumbdrive", MSC_THUMBDRIVE),
    ("logi_receiver", LOGI_RECEIVER),
    ("superspeed_flash", SUPERSPEED_FLASH),
    ("servo_micro", SERVO_MICRO),
];

/// Reader that hands out at most `chunk` bytes per read, to exercise the
/// streaming paths.
pub struct MockReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
    pub reads: usize,
}

impl MockReader {
    pub fn new(data: &[u8], chunk: usize) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            chunk,
            reads: 0,
        }
    }

    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl AsyncRead for MockReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let end = self
            .data
            .len()
            .min(self.pos + self.chunk)
            .min(self.pos + buf.remaining());
        let pos = self.pos;
        buf.put_slice(&self.data[pos..end]);
        self.pos = end;
        self.reads += 1;
        Poll::Ready(Ok(()))
    }
}
