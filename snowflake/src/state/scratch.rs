//! Materializing a rule's sources into its scratch directory.

use {
    crate::config::Config,
    snowflake_core::Source,
    snowflake_util::source_name::SourceName,
    std::{collections::BTreeMap, io, os::unix::fs::PermissionsExt, path::Path,
          process::Command},
};

/// Recreate the scratch directory for a rule and populate it with its
/// sources, marking the entry named `snowflake-build`, if any,
/// executable.
///
/// The directory is removed and recreated first: scratch directories
/// are not meant to survive between builds of the same rule, and a
/// stale leftover from an earlier, differently-configured run of the
/// engine must not leak into a fresh one.
pub fn prepare(
    config: &Config,
    scratch_dir: &Path,
    sources: &BTreeMap<SourceName, Source>,
) -> io::Result<()>
{
    if scratch_dir.exists() {
        std::fs::remove_dir_all(scratch_dir)?;
    }
    std::fs::create_dir_all(scratch_dir)?;

    for (name, source) in sources {
        let dest = scratch_dir.join(name.as_path());
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match source {
            Source::Inline(bytes) => { std::fs::write(&dest, bytes)?; }
            Source::OnDiskCopy(src) => { run_copy(config, src, &dest, false)?; }
            Source::OnDiskLink(src) => { run_copy(config, src, &dest, true)?; }
        }

        if name.is_build_script() {
            let mut perms = std::fs::metadata(&dest)?.permissions();
            let mode = perms.mode() | 0o100;
            perms.set_mode(mode);
            std::fs::set_permissions(&dest, perms)?;
        }
    }

    Ok(())
}

fn run_copy(config: &Config, src: &Path, dest: &Path, link: bool) -> io::Result<()>
{
    let mut command = Command::new(&config.copy);
    command.arg("--no-target-directory").arg("--recursive");
    if link {
        command.arg("--link");
    }
    command.arg(src).arg(dest);

    let status = command.status()?;
    if !status.success() {
        return Err(io::Error::other(
            format!("copy tool exited with {status} copying {} to {}",
                     src.display(), dest.display())));
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn config() -> Config
    {
        Config{shell: "/bin/sh".into(), copy: "cp".into()}
    }

    fn name(s: &str) -> SourceName
    {
        SourceName::new(s.to_owned()).unwrap()
    }

    #[test]
    fn inline_source_is_written()
    {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("scratch");
        let mut sources = BTreeMap::new();
        sources.insert(name("greeting.txt"), Source::Inline(b"hi".to_vec()));

        prepare(&config(), &scratch, &sources).unwrap();

        assert_eq!(std::fs::read(scratch.join("greeting.txt")).unwrap(), b"hi");
    }

    #[test]
    fn build_script_is_marked_executable()
    {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("scratch");
        let mut sources = BTreeMap::new();
        sources.insert(name("snowflake-build"),
                        Source::Inline(b"#!/bin/sh\nexit 0\n".to_vec()));

        prepare(&config(), &scratch, &sources).unwrap();

        let mode = std::fs::metadata(scratch.join("snowflake-build")).unwrap()
            .permissions().mode();
        assert_ne!(mode & 0o100, 0);
    }

    #[test]
    fn on_disk_copy_is_materialized_via_the_copy_tool()
    {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("original.txt");
        std::fs::write(&original, b"copied").unwrap();

        let scratch = dir.path().join("scratch");
        let mut sources = BTreeMap::new();
        sources.insert(name("copy.txt"), Source::OnDiskCopy(original));

        prepare(&config(), &scratch, &sources).unwrap();

        assert_eq!(std::fs::read(scratch.join("copy.txt")).unwrap(), b"copied");
    }

    #[test]
    fn rerunning_prepare_clears_stale_entries()
    {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("scratch");
        std::fs::create_dir_all(&scratch).unwrap();
        std::fs::write(scratch.join("stale.txt"), b"old").unwrap();

        let sources = BTreeMap::new();
        prepare(&config(), &scratch, &sources).unwrap();

        assert!(!scratch.join("stale.txt").exists());
    }
}
