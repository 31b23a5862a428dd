//! Sequential wheel file copier
//!
//! Handles the core logic of:
//! - Preparing the destination directory
//! - Scanning the source directory for matching files (non-recursive)
//! - Copying each file that is absent at the destination, skipping the rest

use crate::config::Config;
use crate::error::{Error, Result};
use filetime::FileTime;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, error, info, span, warn};
use walkdir::WalkDir;

/// Result of processing a single file
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Source file path
    pub source: PathBuf,
    /// Destination file path
    pub destination: PathBuf,
    /// Outcome of the copy attempt
    pub status: CopyStatus,
    /// Error message (if failed)
    pub error: Option<String>,
}

/// Status of a single copy attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    /// File was copied to the destination
    Copied,
    /// Destination already exists, file left untouched
    Skipped,
    /// Copying failed
    Failed,
    /// Dry run - would have copied
    DryRun,
}

/// Run statistics
///
/// Every matching file contributes to exactly one of copied/skipped/errors;
/// a dry-run "would copy" is tallied under copied.
#[derive(Debug, Clone, Default)]
pub struct CopyStats {
    pub found: usize,
    pub copied: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl CopyStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> String {
        format!(
            "Found: {}, Copied: {}, Skipped: {}, Errors: {}",
            self.found, self.copied, self.skipped, self.errors
        )
    }
}

/// Main copier for collecting wheel files
pub struct Copier {
    config: Config,
    stats: CopyStats,
}

impl Copier {
    /// Create a new copier with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stats: CopyStats::new(),
        }
    }

    /// Run the copy pass
    ///
    /// Ensures the destination directory exists, then copies each matching
    /// source file that is not already present at the destination. Per-file
    /// failures are recorded and never abort the run; only destination
    /// creation and source enumeration errors propagate.
    pub fn run(&mut self) -> Result<Vec<FileResult>> {
        let _span = span!(Level::INFO, "copier_run").entered();

        if !self.config.dry_run {
            fs::create_dir_all(&self.config.dest_dir)?;
        }

        info!(
            source = %self.config.source_dir.display(),
            extension = %self.config.extension,
            "Scanning source directory"
        );
        let files = self.collect_files()?;
        self.stats.found = files.len();
        info!(count = files.len(), "Found matching files");

        if files.is_empty() {
            return Ok(Vec::new());
        }

        let mut results = Vec::with_capacity(files.len());
        for file_path in &files {
            let result = self.copy_single(file_path);
            match result.status {
                CopyStatus::Copied | CopyStatus::DryRun => self.stats.copied += 1,
                CopyStatus::Skipped => self.stats.skipped += 1,
                CopyStatus::Failed => self.stats.errors += 1,
            }
            results.push(result);
        }

        info!("{}", self.stats.summary());

        Ok(results)
    }

    /// Collect matching files from the source directory
    ///
    /// The scan is non-recursive; only regular files directly inside the
    /// source directory are considered. Matches are sorted by file name for
    /// deterministic output. A missing source directory yields no matches.
    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        if !self.config.source_dir.exists() {
            warn!(
                source = %self.config.source_dir.display(),
                "Source directory does not exist"
            );
            return Ok(files);
        }

        for entry in WalkDir::new(&self.config.source_dir)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry?;
            let path = entry.path();
            if path.is_file()
                && let Some(ext) = path.extension().and_then(|e| e.to_str())
                && self.config.matches_extension(ext)
            {
                files.push(path.to_path_buf());
            }
        }

        files.sort();

        debug!(count = files.len(), "Collected matching files");

        Ok(files)
    }

    /// Copy a single file, or skip it if the destination already exists
    fn copy_single(&self, path: &Path) -> FileResult {
        let _file_span = span!(Level::DEBUG, "copy_file", ?path).entered();

        let Some(file_name) = path.file_name() else {
            let e = Error::Config(format!("Invalid source filename: {}", path.display()));
            error!(?path, error = %e, "Failed to copy file");
            return FileResult {
                source: path.to_path_buf(),
                destination: self.config.dest_dir.clone(),
                status: CopyStatus::Failed,
                error: Some(e.to_string()),
            };
        };
        let dest_path = self.config.dest_dir.join(file_name);

        if dest_path.exists() {
            debug!(?path, ?dest_path, "Destination already exists, skipping");
            return FileResult {
                source: path.to_path_buf(),
                destination: dest_path,
                status: CopyStatus::Skipped,
                error: None,
            };
        }

        if self.config.dry_run {
            info!(source = ?path, destination = ?dest_path, "Would copy file");
            return FileResult {
                source: path.to_path_buf(),
                destination: dest_path,
                status: CopyStatus::DryRun,
                error: None,
            };
        }

        match copy_with_metadata(path, &dest_path) {
            Ok(()) => {
                info!(source = ?path, destination = ?dest_path, "Copied file");
                FileResult {
                    source: path.to_path_buf(),
                    destination: dest_path,
                    status: CopyStatus::Copied,
                    error: None,
                }
            }
            Err(e) => {
                error!(?path, error = %e, "Failed to copy file");
                FileResult {
                    source: path.to_path_buf(),
                    destination: dest_path,
                    status: CopyStatus::Failed,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Get run statistics
    pub fn stats(&self) -> &CopyStats {
        &self.stats
    }
}

/// Copy a file's bytes, then restore its permissions and modification time
fn copy_with_metadata(source: &Path, dest: &Path) -> Result<()> {
    copy_bytes(source, dest).map_err(|e| Error::Copy {
        path: source.to_path_buf(),
        message: e.to_string(),
    })?;

    let metadata = fs::metadata(source).map_err(|e| Error::Copy {
        path: source.to_path_buf(),
        message: format!("Failed to read source metadata: {}", e),
    })?;

    fs::set_permissions(dest, metadata.permissions()).map_err(|e| Error::Copy {
        path: source.to_path_buf(),
        message: format!("Failed to set permissions: {}", e),
    })?;

    // Preserve modification time
    if let Ok(mtime) = metadata.modified() {
        let _ = filetime::set_file_mtime(dest, FileTime::from_system_time(mtime));
    }

    Ok(())
}

/// Copy file contents with buffered I/O for efficiency
fn copy_bytes(source: &Path, dest: &Path) -> std::io::Result<()> {
    let src_file = File::open(source)?;
    let dest_file = File::create(dest)?;

    let mut reader = BufReader::with_capacity(256 * 1024, src_file);
    let mut writer = BufWriter::with_capacity(256 * 1024, dest_file);

    let mut buffer = vec![0u8; 256 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_for(source: &Path, dest: &Path) -> Config {
        Config {
            source_dir: source.to_path_buf(),
            dest_dir: dest.to_path_buf(),
            ..Config::default()
        }
    }

    fn write_file(path: &Path, contents: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_copies_matching_files() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("downloads");
        let dest = tmp.path().join("project").join("downloads");

        write_file(&source.join("a.whl"), b"aaaaaaaaaa");
        write_file(&source.join("b.whl"), b"bbbbbbbbbbbbbbbbbbbb");

        let mut copier = Copier::new(config_for(&source, &dest));
        let results = copier.run().unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.status == CopyStatus::Copied));
        assert!(dest.is_dir());
        assert_eq!(fs::read(dest.join("a.whl")).unwrap(), b"aaaaaaaaaa");
        assert_eq!(
            fs::read(dest.join("b.whl")).unwrap(),
            b"bbbbbbbbbbbbbbbbbbbb"
        );

        let stats = copier.stats();
        assert_eq!(stats.found, 2);
        assert_eq!(stats.copied, 2);
        assert_eq!(stats.skipped, 0);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn test_skips_existing_destination_unchanged() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("src");
        let dest = tmp.path().join("dst");

        write_file(&source.join("a.whl"), b"new content");
        // Same name, different content - must be left untouched
        write_file(&dest.join("a.whl"), b"old content");

        let mut copier = Copier::new(config_for(&source, &dest));
        let results = copier.run().unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, CopyStatus::Skipped);
        assert_eq!(fs::read(dest.join("a.whl")).unwrap(), b"old content");

        let stats = copier.stats();
        assert_eq!(stats.copied, 0);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn test_counters_sum_to_found() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("src");
        let dest = tmp.path().join("dst");

        write_file(&source.join("a.whl"), b"a");
        write_file(&source.join("b.whl"), b"b");
        write_file(&source.join("c.whl"), b"c");
        write_file(&dest.join("b.whl"), b"existing");

        let mut copier = Copier::new(config_for(&source, &dest));
        copier.run().unwrap();

        let stats = copier.stats();
        assert_eq!(stats.found, 3);
        assert_eq!(stats.copied + stats.skipped + stats.errors, stats.found);
    }

    #[test]
    fn test_ignores_non_matching_and_nested_files() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("src");
        let dest = tmp.path().join("dst");

        write_file(&source.join("a.whl"), b"a");
        write_file(&source.join("readme.txt"), b"not a wheel");
        write_file(&source.join("nested").join("b.whl"), b"too deep");

        let mut copier = Copier::new(config_for(&source, &dest));
        let results = copier.run().unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(copier.stats().found, 1);
        assert!(dest.join("a.whl").exists());
        assert!(!dest.join("readme.txt").exists());
        assert!(!dest.join("b.whl").exists());
    }

    #[test]
    fn test_matches_extension_case_insensitively() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("src");
        let dest = tmp.path().join("dst");

        write_file(&source.join("a.WHL"), b"upper");

        let mut copier = Copier::new(config_for(&source, &dest));
        copier.run().unwrap();

        assert_eq!(copier.stats().copied, 1);
        assert!(dest.join("a.WHL").exists());
    }

    #[test]
    fn test_zero_matches_yields_no_entries() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("src");
        let dest = tmp.path().join("dst");

        fs::create_dir_all(&source).unwrap();
        write_file(&source.join("readme.txt"), b"no wheels here");

        let mut copier = Copier::new(config_for(&source, &dest));
        let results = copier.run().unwrap();

        assert!(results.is_empty());
        assert_eq!(copier.stats().found, 0);
        // Destination directory itself is still prepared
        assert!(dest.is_dir());
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_source_yields_no_matches() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("does_not_exist");
        let dest = tmp.path().join("dst");

        let mut copier = Copier::new(config_for(&source, &dest));
        let results = copier.run().unwrap();

        assert!(results.is_empty());
        assert_eq!(copier.stats().found, 0);
    }

    #[test]
    fn test_second_run_skips_everything() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("src");
        let dest = tmp.path().join("dst");

        write_file(&source.join("a.whl"), b"a");
        write_file(&source.join("b.whl"), b"b");

        let mut first = Copier::new(config_for(&source, &dest));
        first.run().unwrap();
        assert_eq!(first.stats().copied, 2);

        let mut second = Copier::new(config_for(&source, &dest));
        let results = second.run().unwrap();

        assert!(results.iter().all(|r| r.status == CopyStatus::Skipped));
        let stats = second.stats();
        assert_eq!(stats.copied, 0);
        assert_eq!(stats.skipped, 2);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("src");
        let dest = tmp.path().join("dst");

        write_file(&source.join("a.whl"), b"a");

        let config = Config {
            dry_run: true,
            ..config_for(&source, &dest)
        };
        let mut copier = Copier::new(config);
        let results = copier.run().unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, CopyStatus::DryRun);
        assert!(!dest.exists());
        assert_eq!(copier.stats().copied, 1);
    }

    #[test]
    fn test_results_sorted_by_file_name() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("src");
        let dest = tmp.path().join("dst");

        write_file(&source.join("c.whl"), b"c");
        write_file(&source.join("a.whl"), b"a");
        write_file(&source.join("b.whl"), b"b");

        let mut copier = Copier::new(config_for(&source, &dest));
        let results = copier.run().unwrap();

        let names: Vec<_> = results
            .iter()
            .map(|r| r.source.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.whl", "b.whl", "c.whl"]);
    }

    #[test]
    fn test_preserves_modification_time() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("src");
        let dest = tmp.path().join("dst");

        let src_file = source.join("a.whl");
        write_file(&src_file, b"timed");
        filetime::set_file_mtime(&src_file, FileTime::from_unix_time(1_700_000_000, 0)).unwrap();

        let mut copier = Copier::new(config_for(&source, &dest));
        copier.run().unwrap();

        let src_meta = fs::metadata(&src_file).unwrap();
        let dst_meta = fs::metadata(dest.join("a.whl")).unwrap();
        assert_eq!(
            FileTime::from_last_modification_time(&src_meta),
            FileTime::from_last_modification_time(&dst_meta)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_failure_is_counted_and_run_continues() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let source = tmp.path().join("src");
        let dest = tmp.path().join("dst");

        write_file(&source.join("a.whl"), b"a");
        write_file(&source.join("b.whl"), b"b");
        // b.whl is already present; a.whl will fail against a read-only destination
        write_file(&dest.join("b.whl"), b"existing");
        fs::set_permissions(&dest, fs::Permissions::from_mode(0o555)).unwrap();

        let mut copier = Copier::new(config_for(&source, &dest));
        let results = copier.run().unwrap();

        fs::set_permissions(&dest, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, CopyStatus::Failed);
        assert!(results[0].error.is_some());
        assert_eq!(results[1].status, CopyStatus::Skipped);

        let stats = copier.stats();
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.copied + stats.skipped + stats.errors, stats.found);
    }

    #[test]
    fn test_stats_summary() {
        let stats = CopyStats {
            found: 4,
            copied: 2,
            skipped: 1,
            errors: 1,
        };
        let summary = stats.summary();
        assert!(summary.contains("Copied: 2"));
        assert!(summary.contains("Skipped: 1"));
        assert!(summary.contains("Errors: 1"));
    }
}
