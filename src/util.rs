use super::*;

/// Check validity of a USB descriptor blob: follow the length chain and make
/// sure it ends exactly at the end of the buffer. Returns the record count.
pub fn verify_descriptor(desc: &[u8]) -> Result<usize, DescriptorError> {
    let mut count = 0;
    for record in records(desc) {
        match record {
            Ok(_) => count += 1,
            Err(DescriptorError::Truncated { offset, length, .. }) => {
                return Err(DescriptorError::LengthChain {
                    consumed: offset + usize::from(length),
                    total: desc.len(),
                });
            }
            Err(err) => return Err(err),
        }
    }
    Ok(count)
}

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
pub(crate) mod tests;
