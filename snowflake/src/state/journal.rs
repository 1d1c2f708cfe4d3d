//! The append-only build journal.

use {snowflake_core::BuildRecord, std::{fs::OpenOptions, io::{self, Write}, path::{Path, PathBuf}}};

const SECONDS_PER_DAY: u64 = 86_400;

/// Append a record to the journal.
///
/// Records are bucketed into one file per day (named after the number
/// of days since the Unix epoch, derived from the record's own
/// `start_time` rather than the wall clock), so the journal never
/// grows into one unbounded file. Each line is an independent JSON
/// object; a reader can start tailing the current day's file at any
/// line boundary without needing to parse the whole thing.
pub fn append(journal_dir: &Path, record: &BuildRecord) -> io::Result<()>
{
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(journal_dir.join(file_name(record.start_time)))?;

    let mut line = serde_json::to_vec(record)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    line.push(b'\n');
    file.write_all(&line)
}

fn file_name(start_time: u64) -> PathBuf
{
    PathBuf::from(format!("{}.jsonl", start_time / SECONDS_PER_DAY))
}

#[cfg(test)]
mod tests
{
    use super::*;
    use snowflake_core::Outcome;

    fn record() -> BuildRecord
    {
        BuildRecord{
            name: "example".to_owned(),
            build_hash: snowflake_util::hash::Blake3::new().update(b"b").finalize(),
            output_hash: None,
            start_time: 0,
            duration: None,
            outcome: Outcome::Success,
        }
    }

    #[test]
    fn appended_records_are_newline_delimited_json()
    {
        let dir = tempfile::tempdir().unwrap();
        append(dir.path(), &record()).unwrap();
        append(dir.path(), &record()).unwrap();

        let content = std::fs::read_to_string(dir.path().join(file_name(0))).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let _: BuildRecord = serde_json::from_str(line).unwrap();
        }
    }

    #[test]
    fn records_from_different_days_land_in_different_files()
    {
        let dir = tempfile::tempdir().unwrap();
        append(dir.path(), &record()).unwrap();
        append(dir.path(), &BuildRecord{start_time: SECONDS_PER_DAY, ..record()}).unwrap();

        assert!(dir.path().join(file_name(0)).exists());
        assert!(dir.path().join(file_name(SECONDS_PER_DAY)).exists());
    }
}
