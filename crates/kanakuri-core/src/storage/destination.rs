//! Append-only destination handle.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Open destination file. Writes always append; reads go through a cloned
/// handle positioned at byte 0.
#[derive(Debug)]
pub struct Destination {
    file: File,
    path: PathBuf,
}

impl Destination {
    /// Open (creating if needed) `path` for read + append. With `truncate`,
    /// existing content is discarded; without it the file is resumed as-is.
    pub fn open(path: &Path, truncate: bool) -> io::Result<Self> {
        let file = File::options()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?;
        // `truncate(true)` is rejected together with `append(true)`.
        if truncate {
            file.set_len(0)?;
        }
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current on-disk length.
    pub fn len(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Append `data` at end-of-file.
    pub fn append(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)
    }

    /// Cut the file back to `len` bytes if it has grown past it. Used to
    /// discard the tail of an append that failed partway.
    pub fn truncate_to(&self, len: u64) -> io::Result<()> {
        if self.len()? != len {
            self.file.set_len(len)?;
        }
        Ok(())
    }

    /// Reader over the whole file from byte 0.
    pub fn reader(&self) -> io::Result<impl Read> {
        let mut f = self.file.try_clone()?;
        f.seek(SeekFrom::Start(0))?;
        Ok(f)
    }

    /// Sync file data to disk.
    pub fn sync(&self) -> io::Result<()> {
        self.file.sync_all()
    }

    /// Sync and close the handle.
    pub fn close(self) -> io::Result<()> {
        self.sync()?;
        drop(self.file);
        Ok(())
    }
}
