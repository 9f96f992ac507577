use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use super::{VoteSender, VoteSource, VoteToken};

/// Pause before reopening the device after a failure or EOF.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Read button bytes from `reader` until EOF, offering every vote byte.
///
/// Returns the number of votes offered.
pub fn read_votes<R: Read>(mut reader: R, votes: &VoteSender) -> std::io::Result<usize> {
    let mut buf = [0u8; 1024];
    let mut offered = 0;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if n == 0 {
            return Ok(offered);
        }
        for vote in buf[..n].iter().copied().filter_map(VoteToken::from_byte) {
            votes.offer(vote, VoteSource::Serial);
            offered += 1;
        }
    }
}

/// Background reader for the button device file.
///
/// The device is read with blocking I/O on its own OS thread, outside the
/// async runtime, so an idle device never holds up runtime shutdown.
pub struct SerialReader {
    device: PathBuf,
    votes: VoteSender,
    retry_delay: Duration,
}

impl SerialReader {
    pub fn new(device: impl Into<PathBuf>, votes: VoteSender) -> Self {
        Self {
            device: device.into(),
            votes,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Start the reader thread. It reopens the device until stopped.
    pub fn spawn(self) -> std::io::Result<SerialReaderHandle> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let thread = thread::Builder::new()
            .name("button-reader".into())
            .spawn(move || self.run(&flag))?;

        Ok(SerialReaderHandle { stop, thread })
    }

    fn run(self, stop: &AtomicBool) {
        let device = self.device.display().to_string();
        info!(device = %device, "Button reader started");

        while !stop.load(Ordering::Relaxed) {
            match File::open(&self.device) {
                Ok(file) => match read_votes(file, &self.votes) {
                    Ok(offered) => {
                        warn!(device = %device, offered, "Button device reached EOF, reopening");
                    }
                    Err(e) => {
                        warn!(device = %device, "Button device read failed: {}", e);
                    }
                },
                Err(e) => {
                    warn!(device = %device, "Failed to open button device: {}", e);
                }
            }
            thread::sleep(self.retry_delay);
        }

        info!(device = %device, "Button reader stopped");
    }
}

/// Handle to a running [`SerialReader`].
///
/// The thread is never joined: a read blocked on an idle device only ends
/// when a byte arrives, and the process may exit underneath it.
pub struct SerialReaderHandle {
    stop: Arc<AtomicBool>,
    thread: thread::JoinHandle<()>,
}

impl SerialReaderHandle {
    /// Ask the reader to stop before its next reopen.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}
