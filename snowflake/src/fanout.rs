//! The two-level fanout shared by the stash and the scratch directory.
//!
//! Both are keyed by a [`Hash`] and split as `<hash[0:2]>/<hash[2:]>`,
//! so that no single directory ever holds more than 256 entries. The
//! two layouts are kept at the same depth deliberately: it is what
//! lets a dependency path be expressed as a small, fixed number of
//! `..` segments regardless of which build hash it is computed for
//! (see [`dependency_path`]).

use {snowflake_util::hash::Hash, std::path::PathBuf};

/// Split a hash into its fanout directory name and leaf name.
pub fn split(hash: Hash) -> (String, String)
{
    let hex = hash.to_string();
    (hex[..2].to_owned(), hex[2..].to_owned())
}

/// The path of a fanned-out entry, relative to the directory containing
/// the fanout (e.g. `stash/` or `scratch/`).
pub fn relative_path(hash: Hash) -> PathBuf
{
    let (dir, leaf) = split(hash);
    PathBuf::from(dir).join(leaf)
}

/// The relative path from inside a rule's scratch directory to a
/// dependency's stash entry.
///
/// A scratch directory lives at `scratch/<h[0:2]>/<h[2:]>`; climbing
/// out of the leaf and its fanout directory, then out of `scratch/`
/// itself, takes three `..` segments. From there, `stash/<h[0:2]>/
/// <h[2:]>` is two segments back down. The evaluator, not the runner,
/// builds these paths, since only it has a reason to know the stash's
/// layout.
pub fn dependency_path(output_hash: Hash) -> PathBuf
{
    PathBuf::from("../../../stash").join(relative_path(output_hash))
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
    fn split_matches_display()
    {
        let h = hash(b"split");
        let (dir, leaf) = split(h);
        assert_eq!(format!("{dir}{leaf}"), h.to_string());
        assert_eq!(dir.len(), 2);
        assert_eq!(leaf.len(), 62);
    }

    #[test]
    fn dependency_path_has_three_levels_of_ascent()
    {
        let h = hash(b"dep");
        let path = dependency_path(h);
        let mut components = path.components();
        for _ in 0..3 {
            assert_eq!(components.next().unwrap().as_os_str(), "..");
        }
    }
}
