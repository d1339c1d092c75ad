//! The interactive read-eval-print loop.
//!
//! Input is read on a helper thread so the loop can notice an interrupt
//! while waiting for the next line. A request already on the wire is never
//! cancelled; the interrupt is seen once it returns.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use signal_hook::consts::SIGINT;

use crate::AppError;
use crate::shell::{Flow, Shell};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub(crate) const INTERRUPT_NOTICE: &str = "Signal received, quitting...";

/// Set once an interrupt arrives; checked between lines.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A token only cancelled through [`CancellationToken::cancel`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that SIGINT cancels.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Signal`] when the handler cannot be registered.
    pub fn install() -> Result<Self, AppError> {
        let token = Self::new();
        signal_hook::flag::register(SIGINT, Arc::clone(&token.0)).map_err(AppError::Signal)?;
        Ok(token)
    }

    /// Requests that the loop stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether an interrupt has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Prompts, reads and executes lines until quit, end of input or interrupt.
pub(crate) fn run_interactive<R, W, E>(
    shell: &mut Shell<'_, W, E>,
    input: R,
    token: &CancellationToken,
) -> Result<(), AppError>
where
    R: BufRead + Send + 'static,
    W: Write,
    E: Write,
{
    let lines = spawn_reader(input);
    loop {
        shell.prompt()?;
        let Some(line) = next_line(&lines, token)? else {
            if token.is_cancelled() {
                shell.print(INTERRUPT_NOTICE)?;
            } else {
                shell.print("")?;
            }
            return Ok(());
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        shell.record(line);
        if shell.execute_line(line) == Flow::Quit {
            return Ok(());
        }
    }
}

/// Waits for a line; `None` on end of input or interrupt.
fn next_line(
    lines: &Receiver<io::Result<String>>,
    token: &CancellationToken,
) -> Result<Option<String>, AppError> {
    loop {
        if token.is_cancelled() {
            return Ok(None);
        }
        match lines.recv_timeout(POLL_INTERVAL) {
            Ok(line) => return line.map(Some).map_err(AppError::Input),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(None),
        }
    }
}

fn spawn_reader<R>(mut input: R) -> Receiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        loop {
            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    if sender.send(Ok(line)).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    let _ = sender.send(Err(error));
                    break;
                }
            }
        }
    });
    receiver
}
