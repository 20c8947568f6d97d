//! Evidence screenshots.
//!
//! Alerts persist the annotated frame that triggered them as sequentially
//! numbered JPEG files in a fixed directory. Indices come from the engine's
//! `AlertState` counter and are never reused; names are zero-padded to at
//! least three digits and simply grow wider past 999.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbImage;

/// Writes numbered screenshots into a fixed directory.
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    /// Create the store, creating the directory if absent (idempotent).
    /// Failure here is a startup error.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("create screenshot directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, index: u64) -> PathBuf {
        self.dir.join(format!("screenshot_{index:03}.jpg"))
    }

    /// Persist one frame snapshot under the given index.
    pub fn save(&self, image: &RgbImage, index: u64) -> Result<PathBuf> {
        let path = self.path_for(index);
        image
            .save(&path)
            .with_context(|| format!("write screenshot {}", path.display()))?;
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creating_the_store_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("shots");
        ScreenshotStore::new(&target).unwrap();
        ScreenshotStore::new(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn filenames_are_zero_padded_and_grow_past_three_digits() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScreenshotStore::new(dir.path()).unwrap();
        assert!(store.path_for(0).ends_with("screenshot_000.jpg"));
        assert!(store.path_for(42).ends_with("screenshot_042.jpg"));
        assert!(store.path_for(1000).ends_with("screenshot_1000.jpg"));
    }

    #[test]
    fn save_writes_a_jpeg_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScreenshotStore::new(dir.path()).unwrap();
        let image = RgbImage::new(8, 8);
        let path = store.save(&image, 7).unwrap();
        assert!(path.is_file());
        assert!(path.ends_with("screenshot_007.jpg"));
    }
}
