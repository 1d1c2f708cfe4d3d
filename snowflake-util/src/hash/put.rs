use {
    super::{Blake3, Hash},
    std::{os::unix::ffi::OsStrExt, path::Path},
};

/// Convenient methods for writing values.
///
/// In contrast with the [`Hash`][`std::hash::Hash`] trait,
/// these methods are stable across platforms and versions.
/// To aid in avoiding instability, the methods are all named differently.
/// Changing a type would hence result in a type error, unlike with a trait.
///
/// See the module documentation on [`Hash`] for why framing every
/// variable-length field matters: two different inputs must never
/// serialize to the same byte stream.
#[allow(missing_docs)]
impl Blake3
{
    pub fn put_bool(&mut self, value: bool) -> &mut Self
    {
        self.put_u8(value as u8)
    }

    pub fn put_u8(&mut self, value: u8) -> &mut Self
    {
        self.update(&[value])
    }

    pub fn put_u64(&mut self, value: u64) -> &mut Self
    {
        self.update(&value.to_le_bytes())
    }

    pub fn put_usize(&mut self, value: usize) -> &mut Self
    {
        self.put_u64(value as u64)
    }

    pub fn put_bytes(&mut self, value: &[u8]) -> &mut Self
    {
        self.put_usize(value.len()).update(value)
    }

    pub fn put_str(&mut self, value: &str) -> &mut Self
    {
        self.put_bytes(value.as_bytes())
    }

    pub fn put_path(&mut self, value: &Path) -> &mut Self
    {
        self.put_bytes(value.as_os_str().as_bytes())
    }

    /// Write a hash.
    ///
    /// Hashes have a fixed width, so unlike [`put_bytes`][`Self::put_bytes`]
    /// no length prefix is needed for this to remain unambiguous.
    pub fn put_hash(&mut self, value: Hash) -> &mut Self
    {
        self.update(&value.0)
    }
}
