use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum TrimError {
    #[error("failed to launch {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ffmpeg exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// A time window of a source video, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrimRange {
    pub start: f64,
    pub end: f64,
}

impl TrimRange {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Cuts a window out of a video into a new file.
#[async_trait]
pub trait VideoTrimmer: Send + Sync {
    async fn trim(&self, source: &Path, range: TrimRange, output: &Path) -> Result<(), TrimError>;
}

/// Stream-copying trimmer backed by an `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct FfmpegTrimmer {
    bin: PathBuf,
}

impl FfmpegTrimmer {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    fn command(&self, source: &Path, range: TrimRange, output: &Path) -> Command {
        let mut command = Command::new(&self.bin);
        command
            .arg("-y")
            .arg("-i")
            .arg(source)
            .arg("-ss")
            .arg(range.start.to_string())
            .arg("-t")
            .arg(range.duration().to_string())
            .arg("-c")
            .arg("copy")
            .arg(output)
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl VideoTrimmer for FfmpegTrimmer {
    #[instrument(skip(self), fields(bin = %self.bin.display()))]
    async fn trim(&self, source: &Path, range: TrimRange, output: &Path) -> Result<(), TrimError> {
        let result = self
            .command(source, range, output)
            .output()
            .await
            .map_err(|source| TrimError::Spawn {
                bin: self.bin.display().to_string(),
                source,
            })?;

        if !result.status.success() {
            return Err(TrimError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        debug!("ffmpeg finished");
        Ok(())
    }
}
