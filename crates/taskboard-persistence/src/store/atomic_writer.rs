use std::path::Path;

use taskboard_core::TaskboardResult;
use tokio::fs;

/// Writes a whole file at once: data goes to a temp file in the target's
/// directory, which is then renamed over the target.
pub struct AtomicWriter;

impl AtomicWriter {
    pub async fn write_atomic(path: &Path, data: &[u8]) -> TaskboardResult<()> {
        // Same directory so the rename stays on one filesystem.
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).await?;

        let temp_file = tempfile::NamedTempFile::new_in(parent)?;
        let temp_path = temp_file.into_temp_path();
        fs::write(&temp_path, data).await?;
        temp_path
            .persist(path)
            .map_err(|e| taskboard_core::TaskboardError::Io(e.error))?;

        tracing::debug!("Atomically wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    pub async fn read_all(path: &Path) -> TaskboardResult<Vec<u8>> {
        let data = fs::read(path).await?;
        tracing::debug!("Read {} bytes from {}", data.len(), path.display());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_atomic_write_overwrites() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("board.json");

        AtomicWriter::write_atomic(&file_path, b"First").await.unwrap();
        AtomicWriter::write_atomic(&file_path, b"Second").await.unwrap();

        let read_data = AtomicWriter::read_all(&file_path).await.unwrap();
        assert_eq!(read_data, b"Second");
    }

    #[tokio::test]
    async fn test_creates_missing_parent_directory() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("nested/dir/board.json");

        AtomicWriter::write_atomic(&file_path, b"{}").await.unwrap();
        assert!(file_path.exists());
        // Only the target remains; the temp file was renamed away.
        let entries = std::fs::read_dir(dir.path().join("nested/dir")).unwrap().count();
        assert_eq!(entries, 1);
    }
}
