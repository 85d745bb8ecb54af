//! Hand-off of generated artifacts to an OS print facility.
//!
//! Dispatch is best-effort: its result only feeds the advisory
//! `print_status` field and never fails a request.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::str::FromStr;
use std::time::Duration;
use tokio::process::Command;

use super::registry::PrinterSelection;
use crate::report::ReportLabels;

/// One artifact to print.
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub path: PathBuf,
    pub filename: String,
    pub printer: PrinterSelection,
}

/// Outcome of a dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    Submitted,
    /// No print facility on this host.
    Unsupported,
    Failed(String),
}

impl DispatchResult {
    /// Advisory status string for responses.
    pub fn status_text(&self, labels: &ReportLabels) -> String {
        match self {
            Self::Submitted => labels.print_sent.to_string(),
            Self::Unsupported => labels.print_unsupported.to_string(),
            Self::Failed(_) => labels.print_failed.to_string(),
        }
    }
}

/// Capability to submit an artifact to a printer.
#[async_trait]
pub trait PrintDispatcher: Send + Sync {
    async fn submit(&self, job: &PrintJob) -> DispatchResult;
}

/// Which dispatcher the process uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintBackend {
    #[default]
    System,
    None,
}

impl FromStr for PrintBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "none" | "off" => Ok(Self::None),
            other => Err(format!(
                "unknown print backend '{}' (expected system or none)",
                other
            )),
        }
    }
}

/// Dispatcher for hosts without printing.
pub struct UnsupportedDispatcher;

#[async_trait]
impl PrintDispatcher for UnsupportedDispatcher {
    async fn submit(&self, _job: &PrintJob) -> DispatchResult {
        DispatchResult::Unsupported
    }
}

/// Dispatcher that shells out to the platform print command: the shell
/// "Print" verb on Windows and `lp` elsewhere. Jobs go to the system default
/// printer; the selected registry entry is only logged.
pub struct SystemDispatcher;

impl SystemDispatcher {
    #[cfg(windows)]
    fn command(job: &PrintJob) -> Option<Command> {
        let path = job.path.to_string_lossy().replace('\'', "''");
        let mut command = Command::new("powershell");
        command
            .args(["-NoProfile", "-NonInteractive", "-Command"])
            .arg(format!("Start-Process -FilePath '{}' -Verb Print", path));
        Some(command)
    }

    #[cfg(unix)]
    fn command(job: &PrintJob) -> Option<Command> {
        let mut command = Command::new("lp");
        command.arg("-t").arg(&job.filename).arg(&job.path);
        Some(command)
    }

    #[cfg(not(any(unix, windows)))]
    fn command(_job: &PrintJob) -> Option<Command> {
        None
    }
}

#[async_trait]
impl PrintDispatcher for SystemDispatcher {
    async fn submit(&self, job: &PrintJob) -> DispatchResult {
        let Some(mut command) = Self::command(job) else {
            return DispatchResult::Unsupported;
        };

        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match command.output().await {
            Ok(output) if output.status.success() => DispatchResult::Submitted,
            Ok(output) => DispatchResult::Failed(format!(
                "print command exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => DispatchResult::Unsupported,
            Err(e) => DispatchResult::Failed(e.to_string()),
        }
    }
}

/// Submit `job`, giving up after `timeout`.
pub async fn dispatch_with_timeout(
    dispatcher: &dyn PrintDispatcher,
    job: &PrintJob,
    timeout: Duration,
) -> DispatchResult {
    let result = tokio::time::timeout(timeout, dispatcher.submit(job))
        .await
        .unwrap_or_else(|_| {
            DispatchResult::Failed(format!("timed out after {}s", timeout.as_secs()))
        });

    match &result {
        DispatchResult::Submitted => log::info!(
            "{} sent to printer {} ({})",
            job.filename,
            job.printer.name,
            job.printer.key
        ),
        DispatchResult::Unsupported => log::warn!(
            "printing is not supported on this host, {} was not sent to {}",
            job.filename,
            job.printer.name
        ),
        DispatchResult::Failed(reason) => log::warn!(
            "failed to print {} on {}: {}",
            job.filename,
            job.printer.name,
            reason
        ),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowDispatcher;

    #[async_trait]
    impl PrintDispatcher for SlowDispatcher {
        async fn submit(&self, _job: &PrintJob) -> DispatchResult {
            tokio::time::sleep(Duration::from_secs(5)).await;
            DispatchResult::Submitted
        }
    }

    fn job() -> PrintJob {
        PrintJob {
            path: PathBuf::from("/tmp/order_1.xlsx"),
            filename: "order_1.xlsx".into(),
            printer: PrinterSelection {
                key: "p1".into(),
                name: "Canon LBP6030".into(),
            },
        }
    }

    #[tokio::test]
    async fn test_unsupported_dispatcher() {
        let result = dispatch_with_timeout(&UnsupportedDispatcher, &job(), Duration::from_secs(1)).await;
        assert_eq!(result, DispatchResult::Unsupported);
    }

    #[tokio::test]
    async fn test_dispatch_times_out() {
        let result = dispatch_with_timeout(&SlowDispatcher, &job(), Duration::from_millis(20)).await;
        assert!(matches!(result, DispatchResult::Failed(reason) if reason.contains("timed out")));
    }

    #[test]
    fn test_status_text() {
        let labels = ReportLabels::default();
        assert_eq!(DispatchResult::Submitted.status_text(&labels), "sent");
        assert_eq!(
            DispatchResult::Unsupported.status_text(&labels),
            "printing not supported"
        );
        assert_eq!(
            DispatchResult::Failed("x".into()).status_text(&labels),
            "print failed"
        );
    }

    #[test]
    fn test_print_backend_parsing() {
        assert_eq!("System".parse::<PrintBackend>(), Ok(PrintBackend::System));
        assert_eq!("none".parse::<PrintBackend>(), Ok(PrintBackend::None));
        assert!("cups".parse::<PrintBackend>().is_err());
    }
}
