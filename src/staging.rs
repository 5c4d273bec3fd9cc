use crate::error::Result;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Private temporary directory holding retrieved documents until they are
/// parsed. The directory is removed when the area is closed or dropped, so
/// an early return on any error path still cleans up.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("report-joiner-")
            .tempdir()?;
        debug!("Staging documents in {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `contents` under `name` and returns the staged file path.
    pub fn stage(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents)?;
        debug!("Staged {} ({} bytes)", path.display(), contents.len());
        Ok(path)
    }

    pub fn read(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }

    /// Removes the directory, reporting removal failures instead of ignoring
    /// them as a plain drop would.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!("Failed to remove staging directory {}: {}", path.display(), e);
            return Err(e.into());
        }
        debug!("Removed staging directory {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_and_read() {
        let staging = StagingArea::new().unwrap();
        let path = staging.stage("annual.csv", ";2022\nRevenue;1\n").unwrap();

        assert!(path.starts_with(staging.path()));
        assert_eq!(staging.read(&path).unwrap(), ";2022\nRevenue;1\n");
    }

    #[test]
    fn test_close_removes_directory() {
        let staging = StagingArea::new().unwrap();
        staging.stage("quarterly.csv", "x").unwrap();
        let dir = staging.path().to_path_buf();

        staging.close().unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn test_drop_removes_directory() {
        let dir = {
            let staging = StagingArea::new().unwrap();
            staging.stage("annual.csv", "x").unwrap();
            staging.path().to_path_buf()
        };
        assert!(!dir.exists());
    }
}
