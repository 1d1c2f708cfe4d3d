//! Identifying elements of a build.
//!
//! A [`Hash`] plays three distinct roles depending on context:
//! a *sources hash* identifies a rule's sources mapping,
//! a *build hash* identifies a rule instance (sources plus dependency
//! outputs), and an *output hash* identifies the bytes of a produced
//! artifact. The type is shared because the three are interchangeable
//! wherever only identity and equality matter (cache keys, stash paths).

pub use self::{blake3::*, file::*};

use std::{fmt, str::FromStr};

mod blake3;
mod file;
mod put;

/// Cryptographic hash used for identifying elements of a build.
///
/// # Examples
///
/// A hash can be computed using [`Blake3`].
/// Displaying a hash produces a lower-case hexadecimal string.
///
/// ```
/// use snowflake_util::hash::Blake3;
/// let hash = Blake3::new().update(b"Hello, world!").finalize();
/// assert_eq!(hash.to_string(), "ede5c0b10f2ec4979c69b52f61e42ff5\
///                               b413519ce09be0f14d098dcfe5f6f98d");
/// ```
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Hash(pub [u8; 32]);

impl fmt::Debug for Hash
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        write!(f, "Hash({self})")
    }
}

impl fmt::Display for Hash
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Returned when a string does not parse as a [`Hash`].
#[derive(Debug, thiserror::Error)]
#[error("invalid hash: {0}")]
pub struct ParseHashError(String);

impl FromStr for Hash
{
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        let bad = || ParseHashError(s.to_owned());

        if s.len() != 64 {
            return Err(bad());
        }

        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2 .. i * 2 + 2], 16)
                .map_err(|_| bad())?;
        }

        Ok(Self(bytes))
    }
}

impl serde::Serialize for Hash
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: serde::Serializer
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Hash
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: serde::Deserializer<'de>
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
