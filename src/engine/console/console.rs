use std::io::BufRead;
use std::sync::mpsc;

/// Stdin-driven console.
///
/// A background thread blocks on stdin and forwards each line to the host
/// thread, which drains the channel once per frame.
pub struct Console {
    rx: mpsc::Receiver<String>,
    _thread: std::thread::JoinHandle<()>,
}

impl Console {
    pub fn spawn() -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel::<String>();

        let handle = std::thread::Builder::new()
            .name("console".to_string())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    match line {
                        Ok(cmd) => {
                            if tx.send(cmd).is_err() {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
            })?;

        Ok(Self {
            rx,
            _thread: handle,
        })
    }

    /// Drain all currently queued lines without blocking.
    pub fn try_recv_all(&self) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(cmd) = self.rx.try_recv() {
            out.push(cmd);
        }
        out
    }

    /// Block until the next line; `None` once stdin is closed.
    pub fn recv(&self) -> Option<String> {
        self.rx.recv().ok()
    }
}
