//! Validated names for entries of a rule's sources mapping.

use std::{fmt, path::Path};

/// The logical name of a source within a rule's sources mapping.
///
/// A source name is a relative path string
/// (`/` separated, regardless of host platform)
/// used both as the key of the sources mapping and,
/// unmodified, as the path of the corresponding entry
/// in the scratch directory. It must be non-empty,
/// must not be absolute, and must not contain `.` or `..`
/// components, so that materializing it can never escape
/// the scratch directory or collide with `.`/`..` themselves.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SourceName(String);

impl SourceName
{
    /// Validate and wrap a source name.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidSourceName>
    {
        let name = name.into();

        if name.is_empty() {
            return Err(InvalidSourceName::Empty);
        }

        if name.starts_with('/') {
            return Err(InvalidSourceName::Absolute(name));
        }

        for component in name.split('/') {
            match component {
                ""   => return Err(InvalidSourceName::EmptyComponent(name)),
                "."  => return Err(InvalidSourceName::CurDirComponent(name)),
                ".." => return Err(InvalidSourceName::ParentDirComponent(name)),
                _    => { }
            }
        }

        Ok(Self(name))
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str
    {
        &self.0
    }

    /// Borrow the name as a relative filesystem path.
    ///
    /// The name is `/`-separated on every host platform;
    /// on platforms whose native separator differs this still
    /// works because a single path component never contains `/`.
    pub fn as_path(&self) -> &Path
    {
        Path::new(&self.0)
    }

    /// Check whether this name is exactly `snowflake-build`,
    /// the name that [ScratchManager] treats specially
    /// by marking the materialized entry executable.
    ///
    /// [ScratchManager]: /snowflake-manual/index.html
    pub fn is_build_script(&self) -> bool
    {
        self.0 == "snowflake-build"
    }
}

impl fmt::Display for SourceName
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SourceName
{
    fn as_ref(&self) -> &str
    {
        &self.0
    }
}

/// Returned by [`SourceName::new`] when a candidate name is invalid.
#[derive(Debug, thiserror::Error)]
pub enum InvalidSourceName
{
    /// The name was empty.
    #[error("source name must not be empty")]
    Empty,

    /// The name started with `/`.
    #[error("source name must be relative: {0:?}")]
    Absolute(String),

    /// Two consecutive `/` with nothing between them.
    #[error("source name must not contain an empty path component: {0:?}")]
    EmptyComponent(String),

    /// A `.` path component.
    #[error("source name must not contain a `.` component: {0:?}")]
    CurDirComponent(String),

    /// A `..` path component.
    #[error("source name must not contain a `..` component: {0:?}")]
    ParentDirComponent(String),
}
