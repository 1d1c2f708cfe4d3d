//! Canonical serialization and digest of sources, builds, and outputs.
//!
//! All three operations share one fixed hash algorithm (BLAKE3) and one
//! framing discipline: every variable-length field is length-prefixed,
//! so that no two distinct inputs ever serialize to the same byte
//! stream.

use {
    crate::source::Source,
    snowflake_util::{
        hash::{Blake3, Hash, hash_inline_source, hash_source_at},
        source_name::SourceName,
    },
    std::{collections::BTreeMap, io, path::Path},
};

/// Digest a rule's sources mapping.
///
/// Iterates source names in sorted order (the mapping is a
/// [`BTreeMap`], so iteration order already is this order) and emits,
/// per entry, the name followed by a content digest.
///
/// The content digest deliberately does not carry a tag identifying
/// which [`Source`] variant produced it: `Inline(x)`, `OnDiskCopy(p)`
/// with content `x`, and `OnDiskLink(p)` with content `x` must hash
/// identically, and [`hash_inline_source`] is defined to produce
/// exactly the digest [`hash_source_at`] would produce for a regular
/// file holding the same bytes.
pub fn sources_hash(sources: &BTreeMap<SourceName, Source>) -> io::Result<Hash>
{
    let mut blake3 = Blake3::new();
    for (name, source) in sources {
        let digest = match source {
            Source::Inline(bytes) => hash_inline_source(bytes),
            Source::OnDiskCopy(path) | Source::OnDiskLink(path) =>
                hash_source_at(None, path)?,
        };
        blake3.put_str(name.as_str());
        blake3.put_hash(digest);
    }
    Ok(blake3.finalize())
}

/// Digest a sources hash together with ordered dependency output
/// hashes.
///
/// Dependency order matters: reordering `dep_output_hashes` yields a
/// different build hash, because each hash is framed with its
/// position implicit in the concatenation order (no two dependency
/// lists of the same length and same hash set can be reordered into
/// each other without changing the digest, since BLAKE3 is sensitive
/// to input order).
pub fn build_hash(sources_hash: Hash, dep_output_hashes: &[Hash]) -> Hash
{
    let mut blake3 = Blake3::new();
    blake3.put_hash(sources_hash);
    blake3.put_usize(dep_output_hashes.len());
    for hash in dep_output_hashes {
        blake3.put_hash(*hash);
    }
    blake3.finalize()
}

/// Digest the artifact at `path`, preserving the executable bit.
///
/// This is the identity function for promoted stash entries: two
/// successful builds whose outputs are byte-identical (same contents,
/// same directory structure, same executable bits) produce equal
/// output hashes, which is exactly what lets the Cache and Stash
/// de-duplicate concurrent or repeated builds of the same rule.
pub fn output_hash(path: impl AsRef<Path>) -> io::Result<Hash>
{
    snowflake_util::hash::hash_file_at(None, path)
}
