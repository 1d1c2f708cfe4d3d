//! Mapping build hashes to output hashes.
//!
//! Each cache entry is a flat file named after its build hash,
//! containing the hex digest of the corresponding output hash.

use {snowflake_util::hash::Hash, std::{io, path::Path}};

pub fn get(dir: &Path, build_hash: Hash) -> io::Result<Option<Hash>>
{
    let path = dir.join(build_hash.to_string());
    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(Some(content.trim().parse().map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData,
                           format!("corrupt cache entry at {}", path.display()))
        })?)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Idempotent: the same build hash always maps to the same output
/// hash, so writing twice just rewrites the same bytes. The write
/// goes through a per-call temporary file and a rename so a reader
/// never observes a partially written entry.
pub fn set(dir: &Path, build_hash: Hash, output_hash: Hash) -> io::Result<()>
{
    let tmp_name = format!(".{build_hash}.{}.tmp", std::process::id());
    let tmp_path = dir.join(tmp_name);
    std::fs::write(&tmp_path, output_hash.to_string())?;
    std::fs::rename(&tmp_path, dir.join(build_hash.to_string()))
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn hash(seed: &[u8]) -> Hash
    {
        snowflake_util::hash::Blake3::new().update(seed).finalize()
    }

    #[test]
    fn missing_entry_is_none()
    {
        let dir = tempfile::tempdir().unwrap();
        assert!(get(dir.path(), hash(b"build")).unwrap().is_none());
    }

    #[test]
    fn set_then_get_roundtrips()
    {
        let dir = tempfile::tempdir().unwrap();
        let build_hash = hash(b"build");
        let output_hash = hash(b"output");
        set(dir.path(), build_hash, output_hash).unwrap();
        assert_eq!(get(dir.path(), build_hash).unwrap(), Some(output_hash));
    }

    #[test]
    fn no_leftover_temporary_files()
    {
        let dir = tempfile::tempdir().unwrap();
        set(dir.path(), hash(b"build"), hash(b"output")).unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path()).unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(!names[0].starts_with('.'));
    }
}
