//! Failing filesystem
//!
//! A [`Filesystem`] wrapper that can simulate device faults for testing the
//! menu core's failure paths without real hardware.

use crate::{DirEntry, FileStat, FsError, Filesystem, SequentialSource};
use std::cell::Cell;
use std::rc::Rc;

/// Policy for when faults should occur.
#[derive(Debug, Clone)]
pub enum FailurePolicy {
    /// Never fail (passthrough)
    Never,
    /// Every open fails
    FailOpen,
    /// Opening this specific path fails
    FailOpenOf(String),
    /// Opened sources fail once this many bytes have been read in total
    FailReadAfter(usize),
}

/// Wrapper around a [`Filesystem`] that injects faults.
pub struct FailingFilesystem<F: Filesystem> {
    inner: F,
    policy: FailurePolicy,
    open_count: usize,
    bytes_read: Rc<Cell<usize>>,
}

impl<F: Filesystem> FailingFilesystem<F> {
    /// Creates a new failing filesystem with the given policy.
    pub fn new(inner: F, policy: FailurePolicy) -> Self {
        Self {
            inner,
            policy,
            open_count: 0,
            bytes_read: Rc::new(Cell::new(0)),
        }
    }

    /// Returns the underlying filesystem.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Returns mutable access to the underlying filesystem.
    pub fn inner_mut(&mut self) -> &mut F {
        &mut self.inner
    }

    /// Returns how many opens have been attempted.
    pub fn open_count(&self) -> usize {
        self.open_count
    }

    /// Replaces the failure policy and resets the counters.
    pub fn set_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
        self.open_count = 0;
        self.bytes_read.set(0);
    }

    fn open_should_fail(&self, path: &str) -> bool {
        match &self.policy {
            FailurePolicy::FailOpen => true,
            FailurePolicy::FailOpenOf(target) => path.ends_with(target.as_str()),
            _ => false,
        }
    }
}

impl<F: Filesystem> Filesystem for FailingFilesystem<F> {
    fn stat(&self, path: &str) -> Result<FileStat, FsError> {
        self.inner.stat(path)
    }

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        self.inner.read_dir(path)
    }

    fn open(&mut self, path: &str) -> Result<Box<dyn SequentialSource>, FsError> {
        self.open_count += 1;
        if self.open_should_fail(path) {
            return Err(FsError::SourceOpenFailed(path.to_string()));
        }

        let source = self.inner.open(path)?;
        match self.policy {
            FailurePolicy::FailReadAfter(limit) => Ok(Box::new(FailingSource {
                inner: source,
                limit,
                bytes_read: Rc::clone(&self.bytes_read),
            })),
            _ => Ok(source),
        }
    }
}

/// Source wrapper that fails once a total read budget is spent.
///
/// The budget is shared across every source opened from the same wrapper and
/// is not refunded by rewinds: a device that has started failing keeps
/// failing.
struct FailingSource {
    inner: Box<dyn SequentialSource>,
    limit: usize,
    bytes_read: Rc<Cell<usize>>,
}

impl SequentialSource for FailingSource {
    fn rewind(&mut self) -> Result<(), FsError> {
        self.inner.rewind()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        if self.bytes_read.get() >= self.limit {
            return Err(FsError::ReadFailed);
        }
        let got = self.inner.read(buf)?;
        self.bytes_read.set(self.bytes_read.get() + got);
        Ok(got)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFilesystem;

    fn backing() -> MemoryFilesystem {
        let mut fs = MemoryFilesystem::new();
        fs.add_file("/data.bin", vec![0xAA; 256]);
        fs
    }

    #[test]
    fn test_passthrough() {
        let mut fs = FailingFilesystem::new(backing(), FailurePolicy::Never);
        assert!(fs.open("/data.bin").is_ok());
        assert_eq!(fs.open_count(), 1);
    }

    #[test]
    fn test_fail_open() {
        let mut fs = FailingFilesystem::new(backing(), FailurePolicy::FailOpen);
        assert!(matches!(
            fs.open("/data.bin"),
            Err(FsError::SourceOpenFailed(_))
        ));
    }

    #[test]
    fn test_fail_open_of_specific_path() {
        let mut fs = FailingFilesystem::new(
            backing(),
            FailurePolicy::FailOpenOf("data.bin".to_string()),
        );
        assert!(fs.open("/data.bin").is_err());

        fs.inner_mut().add_file("/other.bin", vec![1, 2, 3]);
        assert!(fs.open("/other.bin").is_ok());
    }

    #[test]
    fn test_fail_read_after_budget() {
        let mut fs = FailingFilesystem::new(backing(), FailurePolicy::FailReadAfter(100));
        let mut src = fs.open("/data.bin").unwrap();
        let mut buf = [0u8; 100];
        assert_eq!(src.read(&mut buf).unwrap(), 100);
        assert_eq!(src.read(&mut buf), Err(FsError::ReadFailed));

        // Rewinding does not refund the budget
        src.rewind().unwrap();
        assert_eq!(src.read(&mut buf), Err(FsError::ReadFailed));
    }
}
