//! Artifact transfer to disk.
//!
//! Bytes are streamed into `<destination>.part` and renamed into place only after
//! the last chunk was written. [`PartialFile`] removes the partial file on every
//! other path: transfer errors, idle timeouts, panics and task cancellation.

use crate::domain::error::{BrowseError, Result};
use futures_util::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Removes the partial file on drop unless the transfer completed.
#[derive(Debug)]
struct PartialFile {
    path: PathBuf,
    armed: bool,
}

impl PartialFile {
    fn for_destination(destination: &Path) -> Self {
        let mut name = destination.as_os_str().to_owned();
        name.push(".part");
        Self {
            path: PathBuf::from(name),
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed partial download"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "failed to remove partial download"),
        }
    }
}

/// Writes `stream` to `destination` atomically.
///
/// Every chunk must arrive within `idle_timeout`. Returns the final path.
///
/// # Errors
///
/// Returns the stream's error, [`BrowseError::Timeout`] when the stream stalls, or
/// an IO error. The destination is untouched and no partial file remains.
pub async fn write_stream_atomically<S, B, E>(stream: S, destination: &Path, idle_timeout: Duration) -> Result<PathBuf>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<BrowseError>,
{
    if let Some(parent) = destination.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut partial = PartialFile::for_destination(destination);
    let mut file = tokio::fs::File::create(&partial.path).await?;
    let mut stream = std::pin::pin!(stream);
    let mut written: u64 = 0;

    loop {
        let next = tokio::time::timeout(idle_timeout, stream.next())
            .await
            .map_err(|_| BrowseError::Timeout(idle_timeout))?;
        let Some(chunk) = next else {
            break;
        };
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => return Err(e.into()),
        };
        file.write_all(chunk.as_ref()).await?;
        written += chunk.as_ref().len() as u64;
    }

    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&partial.path, destination).await?;
    partial.disarm();
    tracing::debug!(destination = %destination.display(), bytes = written, "transfer complete");
    Ok(destination.to_path_buf())
}

/// Downloads `url` to `destination`.
///
/// `timeout` bounds the wait for the response headers and for every body chunk.
///
/// # Errors
///
/// Returns an error for unreachable hosts, non-success statuses, stalled transfers
/// and filesystem failures.
#[tracing::instrument(level = "debug", skip(client))]
pub async fn download_to_path(
    client: &reqwest::Client,
    url: &str,
    destination: &Path,
    timeout: Duration,
) -> Result<PathBuf> {
    let response = tokio::time::timeout(timeout, client.get(url).send())
        .await
        .map_err(|_| BrowseError::Timeout(timeout))??;

    let status = response.status();
    if !status.is_success() {
        return Err(BrowseError::Download(format!("server answered {status}")));
    }

    write_stream_atomically(response.bytes_stream(), destination, timeout).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn chunk(bytes: &[u8]) -> std::result::Result<Vec<u8>, BrowseError> {
        Ok(bytes.to_vec())
    }

    fn part_path(destination: &Path) -> PathBuf {
        PartialFile::for_destination(destination).path.clone()
    }

    #[tokio::test]
    async fn writes_all_chunks_and_renames() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("demo-1.0-0.conda");

        let chunks = stream::iter(vec![chunk(b"con"), chunk(b"da")]);
        let path = write_stream_atomically(chunks, &destination, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(path, destination);
        assert_eq!(std::fs::read(&destination).unwrap(), b"conda");
        assert!(!part_path(&destination).exists());
    }

    #[tokio::test]
    async fn stream_error_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("broken.conda");

        let chunks = stream::iter(vec![
            chunk(b"partial"),
            Err(BrowseError::Download("connection reset".to_string())),
        ]);
        let error = write_stream_atomically(chunks, &destination, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(matches!(error, BrowseError::Download(_)));
        assert!(!destination.exists());
        assert!(!part_path(&destination).exists());
    }

    #[tokio::test]
    async fn stalled_stream_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("stalled.conda");

        let chunks = stream::iter(vec![chunk(b"abc")]).chain(stream::pending());
        let error = write_stream_atomically(chunks, &destination, Duration::from_millis(50))
            .await
            .unwrap_err();

        assert!(matches!(error, BrowseError::Timeout(_)));
        assert!(!destination.exists());
        assert!(!part_path(&destination).exists());
    }

    #[tokio::test]
    async fn existing_destination_survives_failure() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("kept.conda");
        std::fs::write(&destination, b"old").unwrap();

        let chunks = stream::iter(vec![Err::<Vec<u8>, _>(BrowseError::Download("boom".to_string()))]);
        write_stream_atomically(chunks, &destination, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert_eq!(std::fs::read(&destination).unwrap(), b"old");
    }

    #[tokio::test]
    async fn aborted_task_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("aborted.conda");
        let part = part_path(&destination);

        let task_destination = destination.clone();
        let task = tokio::spawn(async move {
            let chunks = stream::iter(vec![chunk(b"abc")]).chain(stream::pending());
            write_stream_atomically(chunks, &task_destination, Duration::from_secs(60)).await
        });

        for _ in 0..100 {
            if part.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(!part.exists());
        assert!(!destination.exists());
    }
}
