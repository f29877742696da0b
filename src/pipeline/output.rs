//! Output files for edge lists
//!
//! A plain run writes one CSV per channel. A partitioned run turns the
//! requested path `dir/name.csv` into a fresh directory `dir/name/` holding
//! `name_<end date>.csv` per partition.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use crate::data::writer::{write_rows, TableRow};
use crate::edges::Partition;
use crate::{EdgeError, Result};

/// Directory and file prefix used for partitioned output of `path`
pub fn partition_target(path: &Path) -> (PathBuf, String) {
    let prefix = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "edges".to_string());
    let dir = path.with_extension("");
    (dir, prefix)
}

/// File name for one partition, keyed by its upper boundary
pub fn partition_file_name<R>(prefix: &str, partition: &Partition<'_, R>) -> String {
    format!("{}_{}.csv", prefix, partition.end.format("%Y-%m-%d"))
}

/// Paths of every partition file, in partition order.
///
/// Two partitions whose upper boundaries share a calendar day would map to the
/// same file; that is reported here so nothing gets written.
pub fn partition_files<R>(path: &Path, partitions: &[Partition<'_, R>]) -> Result<Vec<PathBuf>> {
    let (dir, prefix) = partition_target(path);
    let mut files: Vec<PathBuf> = Vec::with_capacity(partitions.len());
    for partition in partitions {
        let file_path = dir.join(partition_file_name(&prefix, partition));
        if files.contains(&file_path) {
            return Err(EdgeError::OutputExists(file_path.display().to_string()));
        }
        files.push(file_path);
    }
    Ok(files)
}

/// Fail early if a partition directory is already there
pub fn ensure_absent(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(EdgeError::OutputExists(path.display().to_string()));
    }
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write all rows to a single CSV file, replacing any previous file
pub fn write_file<R: TableRow>(path: &Path, rows: &[R]) -> Result<usize> {
    create_parent(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    let count = write_rows(&mut writer, rows)?;
    log::info!("Wrote {} rows to {}", count, path.display());
    Ok(count)
}

/// Write one file per partition into a newly created directory.
/// Nothing is overwritten: an existing directory or file is an error.
pub fn write_partitions<R: TableRow>(path: &Path, partitions: &[Partition<'_, R>]) -> Result<Vec<PathBuf>> {
    let files = partition_files(path, partitions)?;
    let (dir, _) = partition_target(path);
    create_parent(&dir)?;
    fs::create_dir(&dir).map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => EdgeError::OutputExists(dir.display().to_string()),
        _ => EdgeError::Io(e),
    })?;

    for (partition, file_path) in partitions.iter().zip(&files) {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(file_path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => EdgeError::OutputExists(file_path.display().to_string()),
                _ => EdgeError::Io(e),
            })?;

        let mut writer = BufWriter::new(file);
        let count = write_rows(&mut writer, partition.rows.iter().copied())?;
        log::info!(
            "Wrote {} rows ({} .. {}) to {}",
            count,
            partition.start,
            partition.end,
            file_path.display()
        );
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn empty_partition(start: NaiveDateTime, end: NaiveDateTime) -> Partition<'static, ()> {
        Partition {
            start,
            end,
            rows: Vec::new(),
        }
    }

    #[test]
    fn test_partition_target() {
        let (dir, prefix) = partition_target(Path::new("out/single.csv"));
        assert_eq!(dir, PathBuf::from("out/single"));
        assert_eq!(prefix, "single");

        let (dir, prefix) = partition_target(Path::new("double"));
        assert_eq!(dir, PathBuf::from("double"));
        assert_eq!(prefix, "double");
    }

    #[test]
    fn test_partition_files_named_by_end_date() {
        let parts = vec![empty_partition(at(1, 0), at(5, 0)), empty_partition(at(5, 0), at(9, 0))];
        let files = partition_files(Path::new("out/single.csv"), &parts).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("out/single/single_2021-01-05.csv"),
                PathBuf::from("out/single/single_2021-01-09.csv"),
            ]
        );
    }

    #[test]
    fn test_partition_files_same_day_collide() {
        let parts = vec![empty_partition(at(1, 0), at(1, 12)), empty_partition(at(1, 12), at(1, 18))];
        match partition_files(Path::new("out/single.csv"), &parts) {
            Err(EdgeError::OutputExists(path)) => assert!(path.ends_with("single_2021-01-01.csv")),
            other => panic!("expected OutputExists, got {:?}", other),
        }
    }
}
