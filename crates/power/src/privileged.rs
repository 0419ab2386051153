use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use wattson_core::{Result, WattsonError};

/// Upper bound on how long a privileged write may keep a request waiting.
const HELPER_TIMEOUT: Duration = Duration::from_secs(5);

/// Writes a value to a hardware control file on behalf of a caller that
/// lacks direct permission.
///
/// Kept as a single-method trait so tests can substitute a recording fake
/// and never touch real hardware.
pub trait PrivilegedWriter: Send + Sync {
    fn write(&self, path: &Path, value: u8) -> Result<()>;
}

/// Production implementation: `pkexec tee <path>`, with the value passed
/// via stdin so it never appears in a process listing.
#[derive(Debug, Default)]
pub struct PkexecWriter;

impl PrivilegedWriter for PkexecWriter {
    fn write(&self, path: &Path, value: u8) -> Result<()> {
        let mut child = Command::new("pkexec")
            .arg("tee")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| WattsonError::WriteFailed(format!("cannot launch pkexec: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(value.to_string().as_bytes())
                .map_err(|e| WattsonError::WriteFailed(format!("pkexec stdin: {e}")))?;
        } // dropping stdin closes the pipe, letting tee finish

        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if status.success() {
                        return Ok(());
                    }
                    let mut err = Vec::new();
                    if let Some(mut stderr) = child.stderr.take() {
                        let _ = stderr.read_to_end(&mut err);
                    }
                    return Err(WattsonError::WriteFailed(format!(
                        "pkexec exited with {status}: {}",
                        String::from_utf8_lossy(&err).trim()
                    )));
                }
                Ok(None) => {
                    if start.elapsed() >= HELPER_TIMEOUT {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(WattsonError::WriteFailed(
                            "privileged helper timed out".into(),
                        ));
                    }
                    std::thread::sleep(Duration::from_millis(20));
                }
                Err(e) => {
                    return Err(WattsonError::WriteFailed(format!(
                        "waiting on pkexec: {e}"
                    )))
                }
            }
        }
    }
}
