//! Background input surface that replays matrices from a text file.
//!
//! One matrix per line, blank lines and `#` comments skipped. The file is
//! parsed up front so a bad line is reported before anything is published.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use linviz_core::{parse_matrix, MatrixPublisher, ParseError};
use nalgebra::Matrix3;
use tracing::{info, warn};

/// How often a waiting feeder checks for shutdown
const STOP_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("script line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("script contains no matrices")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    matrices: Vec<Matrix3<f64>>,
}

impl Script {
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut matrices = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let matrix = parse_matrix(line).map_err(|source| ScriptError::Line {
                line: index + 1,
                source,
            })?;
            matrices.push(matrix);
        }

        if matrices.is_empty() {
            return Err(ScriptError::Empty);
        }
        Ok(Self { matrices })
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn matrices(&self) -> &[Matrix3<f64>] {
        &self.matrices
    }
}

/// Running feeder thread. Stops and joins on [`ScriptFeeder::stop`] or drop.
pub struct ScriptFeeder {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<usize>>,
}

impl ScriptFeeder {
    /// Publish each matrix in turn, waiting `interval` between them
    pub fn spawn(script: Script, publisher: MatrixPublisher, interval: Duration) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let count = script.matrices.len();

        let thread = thread::Builder::new()
            .name("linviz-script".into())
            .spawn(move || feed(script, publisher, interval, &flag))?;

        info!(matrices = count, ?interval, "script feeder started");
        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Signal the thread and wait for it. Returns how many matrices were published.
    pub fn stop(mut self) -> usize {
        self.shutdown()
    }

    fn shutdown(&mut self) -> usize {
        self.stop.store(true, Ordering::SeqCst);
        let Some(thread) = self.thread.take() else {
            return 0;
        };
        match thread.join() {
            Ok(published) => {
                info!(published, "script feeder stopped");
                published
            }
            Err(_) => {
                warn!("script feeder thread panicked");
                0
            }
        }
    }
}

impl Drop for ScriptFeeder {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn feed(script: Script, publisher: MatrixPublisher, interval: Duration, stop: &AtomicBool) -> usize {
    let mut published = 0;
    for (index, matrix) in script.matrices.into_iter().enumerate() {
        if index > 0 && !wait(interval, stop) {
            break;
        }
        if stop.load(Ordering::SeqCst) {
            break;
        }
        publisher.publish(matrix);
        published += 1;
    }
    published
}

/// Sleep for `interval` in short slices. False if asked to stop meanwhile.
fn wait(interval: Duration, stop: &AtomicBool) -> bool {
    let deadline = Instant::now() + interval;
    loop {
        if stop.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(STOP_POLL.min(deadline - now));
    }
}
