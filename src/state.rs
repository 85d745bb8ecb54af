//! Shared, read-only application state.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::notify::ErrorNotifier;
use crate::printer::{dispatcher_for, PrintDispatcher};
use crate::report::{OrderSheetGenerator, ReportLabels, ValidationPolicy};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub generator: Arc<OrderSheetGenerator>,
    pub dispatcher: Arc<dyn PrintDispatcher>,
    pub notifier: ErrorNotifier,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let dispatcher = dispatcher_for(config.print_backend);
        Self::with_dispatcher(config, dispatcher)
    }

    pub fn with_dispatcher(config: AppConfig, dispatcher: Arc<dyn PrintDispatcher>) -> Self {
        let notifier = match config.telegram.clone() {
            Some(telegram) => {
                let http_client = reqwest::Client::builder()
                    .pool_idle_timeout(Duration::from_secs(90))
                    .user_agent(concat!("excel-print-server/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .unwrap_or_else(|e| {
                        log::warn!("Falling back to default HTTP client: {}", e);
                        reqwest::Client::new()
                    });
                ErrorNotifier::new(Some(telegram), http_client)
            }
            None => ErrorNotifier::disabled(),
        };

        Self::from_parts(config, dispatcher, notifier)
    }

    pub fn from_parts(
        config: AppConfig,
        dispatcher: Arc<dyn PrintDispatcher>,
        notifier: ErrorNotifier,
    ) -> Self {
        let labels = ReportLabels::for_locale(config.locale);
        let generator = OrderSheetGenerator::new(labels, config.scratch_dir.clone());

        log::info!(
            "Scratch directory: {}, locale: {}, validation: {}, notifications: {}",
            config.scratch_dir.display(),
            config.locale,
            config.validation_mode,
            if notifier.is_enabled() { "on" } else { "off" }
        );

        Self {
            config: Arc::new(config),
            generator: Arc::new(generator),
            dispatcher,
            notifier,
        }
    }

    pub fn labels(&self) -> &ReportLabels {
        self.generator.labels()
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        self.generator.policy(self.config.validation_mode)
    }
}
