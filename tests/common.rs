#![allow(dead_code)]

use actix_web::web;
use async_trait::async_trait;
use excel_print_server::notify::{ErrorNotifier, NotificationError, Notifier};
use excel_print_server::printer::{DispatchResult, PrintDispatcher, PrintJob};
use excel_print_server::report::ValidationMode;
use excel_print_server::{AppConfig, AppState};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Dispatcher that records every job and answers with a fixed result.
pub struct MockPrintDispatcher {
    result: DispatchResult,
    jobs: Mutex<Vec<PrintJob>>,
}

impl MockPrintDispatcher {
    pub fn new(result: DispatchResult) -> Self {
        Self {
            result,
            jobs: Mutex::new(Vec::new()),
        }
    }

    pub fn jobs(&self) -> Vec<PrintJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl PrintDispatcher for MockPrintDispatcher {
    async fn submit(&self, job: &PrintJob) -> DispatchResult {
        self.jobs.lock().unwrap().push(job.clone());
        self.result.clone()
    }
}

/// Notifier that keeps every message in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Wait for spawned deliveries to land, up to about a second.
    pub async fn wait_for(&self, count: usize) -> Vec<String> {
        for _ in 0..50 {
            if self.messages.lock().unwrap().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.messages()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), NotificationError> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Application state rooted in a private scratch directory.
pub struct TestContext {
    pub scratch: TempDir,
    pub dispatcher: Arc<MockPrintDispatcher>,
    pub notifier: Arc<RecordingNotifier>,
    pub state: web::Data<AppState>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with(ValidationMode::Lenient, DispatchResult::Submitted)
    }

    pub fn with(mode: ValidationMode, result: DispatchResult) -> Self {
        let scratch = tempfile::tempdir().unwrap();
        let scratch_dir = scratch.path().to_path_buf();
        Self::build(scratch, scratch_dir, mode, result)
    }

    /// Scratch directory nested under a regular file, so it can never be
    /// created.
    pub fn unwritable() -> Self {
        let scratch = tempfile::tempdir().unwrap();
        let blocker = scratch.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        Self::build(
            scratch,
            blocker.join("orders"),
            ValidationMode::Lenient,
            DispatchResult::Submitted,
        )
    }

    fn build(
        scratch: TempDir,
        scratch_dir: PathBuf,
        mode: ValidationMode,
        result: DispatchResult,
    ) -> Self {
        let config = AppConfig {
            scratch_dir,
            validation_mode: mode,
            ..AppConfig::default()
        };
        let dispatcher = Arc::new(MockPrintDispatcher::new(result));
        let notifier = Arc::new(RecordingNotifier::default());
        let state = AppState::from_parts(
            config,
            dispatcher.clone(),
            ErrorNotifier::with_sink(notifier.clone()),
        );

        Self {
            scratch,
            dispatcher,
            notifier,
            state: web::Data::new(state),
        }
    }

    pub fn artifacts(&self) -> Vec<PathBuf> {
        list_xlsx(self.scratch.path())
    }
}

pub fn list_xlsx(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "xlsx"))
        .collect();
    files.sort();
    files
}
