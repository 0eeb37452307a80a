//! Bounded big-endian reader over serialized bytes

use crate::crypto::{Hash, HASH_BYTES};
use crate::error::{Error, Result};

/// Reads fixed-size fields off the front of a byte slice
///
/// Every failure is reported through `corrupt`, so each format keeps its own
/// error kind.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    corrupt: fn(&str) -> Error,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8], corrupt: fn(&str) -> Error) -> Self {
        Self { data, corrupt }
    }

    /// Build this format's error for a reason
    pub(crate) fn error(&self, reason: &str) -> Error {
        (self.corrupt)(reason)
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.data.len() < n {
            return Err(self.error("truncated"));
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    pub(crate) fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    pub(crate) fn u8(&mut self) -> Result<u8> {
        Ok(self.bytes(1)?[0])
    }

    pub(crate) fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    pub(crate) fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.array()?))
    }

    pub(crate) fn hash(&mut self) -> Result<Hash> {
        Ok(Hash::from_bytes(self.array::<HASH_BYTES>()?))
    }

    /// A u32 element count, bounded by what the remaining bytes can hold
    pub(crate) fn count(&mut self, min_element_bytes: usize) -> Result<usize> {
        let count = self.u32()? as usize;
        if count.saturating_mul(min_element_bytes) > self.remaining() {
            return Err(self.error("element count exceeds remaining bytes"));
        }
        Ok(count)
    }

    /// Fail unless every byte has been consumed
    pub(crate) fn finish(&self) -> Result<()> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(self.error("trailing bytes"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrupt(reason: &str) -> Error {
        Error::CorruptSerialization(reason.to_string())
    }

    #[test]
    fn test_reads_big_endian_fields() {
        let data = [1, 0, 2, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 4];
        let mut reader = ByteReader::new(&data, corrupt);

        assert_eq!(reader.u8().unwrap(), 1);
        assert_eq!(reader.u16().unwrap(), 2);
        assert_eq!(reader.u32().unwrap(), 3);
        assert_eq!(reader.u64().unwrap(), 4);
        assert_eq!(reader.remaining(), 0);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_truncated_and_trailing() {
        let mut reader = ByteReader::new(&[0, 1], corrupt);
        assert_eq!(reader.u32(), Err(Error::CorruptSerialization("truncated".to_string())));

        let reader = ByteReader::new(&[0], corrupt);
        assert_eq!(reader.finish(), Err(Error::CorruptSerialization("trailing bytes".to_string())));
    }

    #[test]
    fn test_count_is_bounded() {
        let data = [0, 0, 0, 2, 9, 9];
        assert_eq!(ByteReader::new(&data, corrupt).count(1).unwrap(), 2);
        assert!(ByteReader::new(&data, corrupt).count(2).is_err());

        let huge = [0xff, 0xff, 0xff, 0xff];
        assert!(ByteReader::new(&huge, corrupt).count(65).is_err());
    }
}
