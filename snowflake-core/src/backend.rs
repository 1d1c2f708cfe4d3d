use {
    crate::{BuildRecord, Error, Source},
    snowflake_util::{hash::Hash, source_name::SourceName},
    std::{collections::BTreeMap, io, path::{Path, PathBuf}},
};

/// The persistence and configuration handle the evaluator is driven
/// against.
///
/// This crate only describes the interface; the `snowflake` crate
/// provides an implementation rooted at an on-disk state directory
/// (Cache, Stash, ScratchManager, and Journal all confined to their
/// own subtree of it), and tests provide another rooted at a
/// temporary directory.
pub trait Backend
{
    /// Look up a build hash in the cache.
    fn get_cache(&self, build_hash: Hash) -> Result<Option<Hash>, Error>;

    /// Record that a build hash maps to an output hash.
    ///
    /// Idempotent: setting the same pair twice is not an error, since
    /// a build hash always maps to the same output hash by
    /// construction (invariant: two successful builds of the same
    /// rule produce content-identical outputs).
    fn set_cache(&self, build_hash: Hash, output_hash: Hash) -> Result<(), Error>;

    /// The path at which the stash entry for `output_hash` does, or
    /// would, live. A pure path computation; never touches disk.
    fn output_path(&self, output_hash: Hash) -> PathBuf;

    /// Whether a stash entry for `output_hash` is actually present on
    /// disk.
    ///
    /// Used as a cache-hit sanity check: a build hash recorded in the
    /// cache is only trustworthy evidence of a finished build if the
    /// stash entry it points at still exists.
    fn stash_exists(&self, output_hash: Hash) -> bool;

    /// The path of the scratch directory for `build_hash`. A pure
    /// path computation; never touches disk.
    fn scratch_path(&self, build_hash: Hash) -> PathBuf;

    /// Materialize a rule's sources into its scratch directory,
    /// marking the entry named `snowflake-build`, if any, executable.
    fn prepare_scratch(
        &self,
        build_hash: Hash,
        sources: &BTreeMap<SourceName, Source>,
    ) -> Result<(), Error>;

    /// Move the artifact at `scratch_output_path` into the stash under
    /// `output_hash`.
    ///
    /// If the destination already exists, the existing entry is kept
    /// and the new one discarded; this is not an error (see
    /// [`Error::PromotionFailed`]'s documentation).
    fn promote(&self, scratch_output_path: &Path, output_hash: Hash) -> Result<(), Error>;

    /// Append a row to the journal.
    ///
    /// The journal is diagnostic only; a failure to write one does not
    /// fail the rule it describes, but is still surfaced to the
    /// caller as an I/O error so it can be logged.
    fn record_build(&self, record: &BuildRecord) -> io::Result<()>;
}
