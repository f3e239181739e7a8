use super::*;
use std::iter::FusedIterator;

/// One length-delimited record of a descriptor blob, not yet classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// Position of bLength in the blob
    pub offset: usize,
    raw: &'a [u8],
}

impl<'a> RawRecord<'a> {
    pub fn length(&self) -> u8 {
        self.raw[0]
    }

    pub fn descriptor_type(&self) -> u8 {
        self.raw[1]
    }

    /// The type byte decoded, if it is one this crate knows about
    pub fn kind(&self) -> Option<DescriptorType> {
        DescriptorType::from_u8(self.descriptor_type())
    }

    /// Everything after bLength and bDescriptorType
    pub fn payload(&self) -> &'a [u8] {
        &self.raw[2..]
    }

    /// The whole record, header included
    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }
}

/// Walk the records of a descriptor blob.
pub fn records(buf: &[u8]) -> Records<'_> {
    Records::new(buf)
}

/// Lazy iterator over the records of a blob.
///
/// Every yielded record lies fully within the buffer. The first malformed
/// record yields an error and ends the iteration. Cloning or calling
/// [Records::restart] starts the walk over without touching the input.
#[derive(Clone, Debug)]
pub struct Records<'a> {
    buf: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Records<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: 0,
            failed: false,
        }
    }

    pub fn restart(&mut self) {
        self.offset = 0;
        self.failed = false;
    }

    /// Offset of the next record to be yielded
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not consumed yet
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.offset..]
    }

    fn fail(&mut self, err: DescriptorError) -> Option<Result<RawRecord<'a>, DescriptorError>> {
        self.failed = true;
        Some(Err(err))
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<RawRecord<'a>, DescriptorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.buf.len() {
            return None;
        }

        let offset = self.offset;
        let rest = &self.buf[offset..];
        let length = rest[0];
        if length < 2 {
            return self.fail(DescriptorError::InvalidLength { offset, length });
        }
        if usize::from(length) > rest.len() {
            return self.fail(DescriptorError::Truncated {
                offset,
                length,
                remaining: rest.len(),
            });
        }

        let raw = &rest[..usize::from(length)];
        trace!("record type = {:#04x} len = {length} at {offset}", raw[1]);
        self.offset += usize::from(length);
        Some(Ok(RawRecord { offset, raw }))
    }
}

impl FusedIterator for Records<'_> {}
