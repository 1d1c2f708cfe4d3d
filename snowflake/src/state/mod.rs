//! The on-disk [`Backend`] implementation.
//!
//! A state directory, typically `.snowflake` at the root of a project,
//! holds four subtrees: `cache/` (build hash to output hash), `stash/`
//! (content-addressed artifacts), `scratch/` (working directories for
//! in-progress and most-recently-finished builds), and `journal/` (an
//! append-only record of what was built, when).

use {
    snowflake_core::{Backend, BuildRecord, Error, Source},
    snowflake_util::{hash::Hash, source_name::SourceName},
    std::{collections::BTreeMap, io, path::{Path, PathBuf}},
    crate::config::Config,
};

mod cache;
mod journal;
mod promote;
mod scratch;

const CACHE_DIR:   &str = "cache";
const STASH_DIR:   &str = "stash";
const SCRATCH_DIR: &str = "scratch";
const JOURNAL_DIR: &str = "journal";

/// Handle to a state directory.
pub struct State
{
    root: PathBuf,
    config: Config,
}

impl State
{
    /// Open a state directory, creating its subtrees if they do not
    /// already exist.
    ///
    /// The root directory itself must already exist.
    pub fn open(root: impl Into<PathBuf>, config: Config) -> io::Result<Self>
    {
        let root = root.into();
        for subdir in [CACHE_DIR, STASH_DIR, SCRATCH_DIR, JOURNAL_DIR] {
            std::fs::create_dir_all(root.join(subdir))?;
        }
        Ok(Self{root, config})
    }

    fn cache_dir(&self) -> PathBuf
    {
        self.root.join(CACHE_DIR)
    }

    fn stash_dir(&self) -> PathBuf
    {
        self.root.join(STASH_DIR)
    }

    fn scratch_dir(&self) -> PathBuf
    {
        self.root.join(SCRATCH_DIR)
    }

    fn journal_dir(&self) -> PathBuf
    {
        self.root.join(JOURNAL_DIR)
    }
}

impl Backend for State
{
    fn get_cache(&self, build_hash: Hash) -> Result<Option<Hash>, Error>
    {
        cache::get(&self.cache_dir(), build_hash).map_err(Error::CacheIOError)
    }

    fn set_cache(&self, build_hash: Hash, output_hash: Hash) -> Result<(), Error>
    {
        cache::set(&self.cache_dir(), build_hash, output_hash)
            .map_err(Error::CacheIOError)
    }

    fn output_path(&self, output_hash: Hash) -> PathBuf
    {
        self.stash_dir().join(crate::fanout::relative_path(output_hash))
    }

    fn stash_exists(&self, output_hash: Hash) -> bool
    {
        self.output_path(output_hash).exists()
    }

    fn scratch_path(&self, build_hash: Hash) -> PathBuf
    {
        self.scratch_dir().join(crate::fanout::relative_path(build_hash))
    }

    fn prepare_scratch(
        &self,
        build_hash: Hash,
        sources: &BTreeMap<SourceName, Source>,
    ) -> Result<(), Error>
    {
        let path = self.scratch_path(build_hash);
        scratch::prepare(&self.config, &path, sources)
            .map_err(Error::ScratchSetupFailed)
    }

    fn promote(&self, scratch_output_path: &Path, output_hash: Hash) -> Result<(), Error>
    {
        let dest = self.output_path(output_hash);
        promote::promote(scratch_output_path, &dest).map_err(Error::PromotionFailed)
    }

    fn record_build(&self, record: &BuildRecord) -> io::Result<()>
    {
        journal::append(&self.journal_dir(), record)
    }
}

fn ok_if_already_exists(err: io::Error) -> io::Result<()>
{
    if err.kind() == io::ErrorKind::AlreadyExists {
        Ok(())
    } else {
        Err(err)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn test_config() -> Config
    {
        Config{shell: "/bin/sh".into(), copy: "cp".into()}
    }

    #[test]
    fn open_creates_subtrees()
    {
        let dir = tempfile::tempdir().unwrap();
        State::open(dir.path(), test_config()).unwrap();
        for subdir in [CACHE_DIR, STASH_DIR, SCRATCH_DIR, JOURNAL_DIR] {
            assert!(dir.path().join(subdir).is_dir());
        }
    }

    #[test]
    fn output_path_and_scratch_path_share_fanout_depth()
    {
        let dir = tempfile::tempdir().unwrap();
        let state = State::open(dir.path(), test_config()).unwrap();
        let h = snowflake_util::hash::Blake3::new().update(b"x").finalize();
        let output = state.output_path(h);
        let scratch = state.scratch_path(h);
        assert_eq!(output.strip_prefix(dir.path().join(STASH_DIR)).unwrap(),
                   scratch.strip_prefix(dir.path().join(SCRATCH_DIR)).unwrap());
    }

    #[test]
    fn stash_exists_reflects_whether_the_entry_is_on_disk()
    {
        let dir = tempfile::tempdir().unwrap();
        let state = State::open(dir.path(), test_config()).unwrap();
        let h = snowflake_util::hash::Blake3::new().update(b"x").finalize();

        assert!(!state.stash_exists(h));

        let path = state.output_path(h);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"x").unwrap();

        assert!(state.stash_exists(h));
    }
}
