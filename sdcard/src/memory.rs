//! In-memory filesystem
//!
//! Deterministic implementation of [`Filesystem`] used by tests and the
//! simulator. Listing order is fixed: subdirectories in insertion order,
//! then files in insertion order.

use crate::{DirEntry, FileStat, FsError, Filesystem, SequentialSource};

/// A filesystem held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    directories: Vec<String>,
    files: Vec<(String, Vec<u8>)>,
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "/",
    }
}

fn name_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

impl MemoryFilesystem {
    /// Creates an empty filesystem containing only the root directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory at the given absolute path.
    pub fn add_directory(&mut self, path: &str) {
        let path = normalize(path);
        if path != "/" && !self.directories.contains(&path) {
            self.directories.push(path);
        }
    }

    /// Adds a file with the given contents, replacing any previous file at
    /// the same path.
    pub fn add_file(&mut self, path: &str, data: Vec<u8>) {
        let path = normalize(path);
        if let Some(existing) = self.files.iter_mut().find(|(p, _)| *p == path) {
            existing.1 = data;
        } else {
            self.files.push((path, data));
        }
    }

    /// Removes a file, returning true if it existed.
    pub fn remove_file(&mut self, path: &str) -> bool {
        let path = normalize(path);
        let before = self.files.len();
        self.files.retain(|(p, _)| *p != path);
        self.files.len() != before
    }

    fn is_directory(&self, path: &str) -> bool {
        path == "/" || self.directories.iter().any(|d| d == path)
    }

    fn file_data(&self, path: &str) -> Option<&Vec<u8>> {
        self.files.iter().find(|(p, _)| p == path).map(|(_, d)| d)
    }
}

impl Filesystem for MemoryFilesystem {
    fn stat(&self, path: &str) -> Result<FileStat, FsError> {
        let path = normalize(path);
        if self.is_directory(&path) {
            return Ok(FileStat {
                is_directory: true,
                size: 0,
            });
        }
        match self.file_data(&path) {
            Some(data) => Ok(FileStat {
                is_directory: false,
                size: data.len() as u32,
            }),
            None => Err(FsError::NotFound(path)),
        }
    }

    fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let path = normalize(path);
        if self.file_data(&path).is_some() {
            return Err(FsError::NotADirectory(path));
        }
        if !self.is_directory(&path) {
            return Err(FsError::NotFound(path));
        }

        let mut entries = Vec::new();
        for dir in &self.directories {
            if parent_of(dir) == path {
                entries.push(DirEntry {
                    name: name_of(dir).to_string(),
                    size: 0,
                    is_directory: true,
                });
            }
        }
        for (file, data) in &self.files {
            if parent_of(file) == path {
                entries.push(DirEntry {
                    name: name_of(file).to_string(),
                    size: data.len() as u32,
                    is_directory: false,
                });
            }
        }
        Ok(entries)
    }

    fn open(&mut self, path: &str) -> Result<Box<dyn SequentialSource>, FsError> {
        let path = normalize(path);
        match self.file_data(&path) {
            Some(data) => Ok(Box::new(MemorySource {
                data: data.clone(),
                pos: 0,
            })),
            None => Err(FsError::NotFound(path)),
        }
    }
}

/// Forward-only stream over an in-memory byte vector.
struct MemorySource {
    data: Vec<u8>,
    pos: usize,
}

impl SequentialSource for MemorySource {
    fn rewind(&mut self) -> Result<(), FsError> {
        self.pos = 0;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_full;

    fn populated() -> MemoryFilesystem {
        let mut fs = MemoryFilesystem::new();
        fs.add_directory("/games");
        fs.add_file("/intro.prg", vec![0x01, 0x08, 0x00]);
        fs.add_file("/games/pitfall.prg", vec![0x01, 0x08, 0x60, 0x00]);
        fs
    }

    #[test]
    fn test_listing_order_dirs_then_files() {
        let fs = populated();
        let entries = fs.read_dir("/").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "games");
        assert!(entries[0].is_directory);
        assert_eq!(entries[1].name, "intro.prg");
        assert_eq!(entries[1].size, 3);
    }

    #[test]
    fn test_stat() {
        let fs = populated();
        assert!(fs.stat("/games").unwrap().is_directory);
        let stat = fs.stat("/games/pitfall.prg").unwrap();
        assert!(!stat.is_directory);
        assert_eq!(stat.size, 4);
        assert_eq!(
            fs.stat("/missing"),
            Err(FsError::NotFound("/missing".to_string()))
        );
    }

    #[test]
    fn test_read_dir_of_file_fails() {
        let fs = populated();
        assert!(matches!(
            fs.read_dir("/intro.prg"),
            Err(FsError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_open_and_rewind() {
        let mut fs = populated();
        let mut src = fs.open("/intro.prg").unwrap();
        let mut buf = [0u8; 3];
        assert_eq!(read_full(src.as_mut(), &mut buf).unwrap(), 3);
        assert_eq!(buf, [0x01, 0x08, 0x00]);
        assert_eq!(src.read(&mut buf).unwrap(), 0);

        src.rewind().unwrap();
        assert_eq!(src.read(&mut buf[..1]).unwrap(), 1);
        assert_eq!(buf[0], 0x01);
    }

    #[test]
    fn test_open_missing() {
        let mut fs = populated();
        assert!(matches!(fs.open("/nope.prg"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn test_path_normalization() {
        let fs = populated();
        assert!(fs.stat("games").unwrap().is_directory);
        assert!(fs.stat("/games/").unwrap().is_directory);
    }

    #[test]
    fn test_remove_file() {
        let mut fs = populated();
        assert!(fs.remove_file("/intro.prg"));
        assert!(!fs.remove_file("/intro.prg"));
        assert!(matches!(fs.stat("/intro.prg"), Err(FsError::NotFound(_))));
    }
}
