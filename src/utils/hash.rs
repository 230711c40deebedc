//! Content hashing using blake3.

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash raw content.
    #[inline]
    pub fn of<T: AsRef<[u8]> + ?Sized>(data: &T) -> Self {
        Self(*blake3::hash(data.as_ref()).as_bytes())
    }

    /// Convert to hex string.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// First `len` hex digits, for short stable identifiers.
    pub fn short(self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len);
        hex
    }
}
