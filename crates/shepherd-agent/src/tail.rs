//! Asynchronous line-oriented log tailing.
//!
//! [`LogTailer`] follows a growing file the way `tail -f` does: read
//! complete lines as they appear, sleep a poll interval at end-of-file,
//! and hold partial lines in a buffer until their newline arrives so a
//! write that races the reader never yields a truncated record.

use std::io::SeekFrom;
use std::path::Path;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, AsyncWriteExt, BufReader};

/// Sample lines written when the target log does not exist yet, so a
/// first run has something to demonstrate the pipeline with.
const SAMPLE_LINES: &str = concat!(
    "127.0.0.1 - - [09/Nov/2025:10:00:00 +0000] \"GET /index.html HTTP/1.1\" 200 612 \"-\" \"curl/7.68.0\"\n",
    "127.0.0.1 - - [09/Nov/2025:10:00:02 +0000] \"GET /api/data HTTP/1.1\" 500 234 \"-\" \"curl/7.68.0\"\n",
);

/// Create the log file with sample content when it is missing.
///
/// Returns whether the file was created.
pub async fn ensure_sample_log(path: &Path) -> std::io::Result<bool> {
    if tokio::fs::try_exists(path).await? {
        return Ok(false);
    }
    let mut file = File::create(path).await?;
    file.write_all(SAMPLE_LINES.as_bytes()).await?;
    file.flush().await?;
    Ok(true)
}

/// A follower over one growing log file.
#[derive(Debug)]
pub struct LogTailer {
    /// Buffered reader positioned at the next unread byte.
    reader: BufReader<File>,
    /// Sleep duration when no new data is available.
    poll_interval: Duration,
    /// Accumulator for the line currently being assembled.
    buf: String,
}

impl LogTailer {
    /// Open a tailer over `path`.
    ///
    /// With `from_end` set the tailer skips everything already in the
    /// file and reports only lines appended afterwards, which is the
    /// normal agent behavior; tests read from the start.
    pub async fn open(
        path: &Path,
        poll_interval: Duration,
        from_end: bool,
    ) -> std::io::Result<Self> {
        let mut file = File::open(path).await?;
        if from_end {
            file.seek(SeekFrom::End(0)).await?;
        }
        Ok(Self {
            reader: BufReader::new(file),
            poll_interval,
            buf: String::new(),
        })
    }

    /// Wait for and return the next complete, non-blank line.
    ///
    /// Blocks (asynchronously) until a newline-terminated line is
    /// available, polling at the configured interval while the file is
    /// quiet.
    pub async fn next_line(&mut self) -> std::io::Result<String> {
        loop {
            let read = self.reader.read_line(&mut self.buf).await?;
            if read == 0 {
                tokio::time::sleep(self.poll_interval).await;
                continue;
            }
            if !self.buf.ends_with('\n') {
                // Partial line: keep accumulating until the writer
                // finishes it.
                continue;
            }
            let line = self.buf.trim_end().to_owned();
            self.buf.clear();
            if line.is_empty() {
                continue;
            }
            return Ok(line);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::io::Write;

    fn temp_log(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn reads_lines_from_the_start() {
        let file = temp_log("first line\nsecond line\n");
        let mut tailer = LogTailer::open(file.path(), Duration::from_millis(10), false)
            .await
            .unwrap();

        assert_eq!(tailer.next_line().await.unwrap(), "first line");
        assert_eq!(tailer.next_line().await.unwrap(), "second line");
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let file = temp_log("one\n\n\ntwo\n");
        let mut tailer = LogTailer::open(file.path(), Duration::from_millis(10), false)
            .await
            .unwrap();

        assert_eq!(tailer.next_line().await.unwrap(), "one");
        assert_eq!(tailer.next_line().await.unwrap(), "two");
    }

    #[tokio::test]
    async fn from_end_sees_only_appended_lines() {
        let file = temp_log("old line\n");
        let mut tailer = LogTailer::open(file.path(), Duration::from_millis(10), true)
            .await
            .unwrap();

        {
            let mut writer = std::fs::OpenOptions::new()
                .append(true)
                .open(file.path())
                .unwrap();
            writer.write_all(b"fresh line\n").unwrap();
            writer.flush().unwrap();
        }

        assert_eq!(tailer.next_line().await.unwrap(), "fresh line");
    }

    #[tokio::test]
    async fn sample_log_is_created_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");

        assert_eq!(ensure_sample_log(&path).await.ok(), Some(true));
        assert_eq!(ensure_sample_log(&path).await.ok(), Some(false));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("GET /index.html"));
    }
}
