//! Printer registry and print dispatch.

pub mod dispatch;
pub mod registry;

pub use dispatch::{
    dispatch_with_timeout, DispatchResult, PrintBackend, PrintDispatcher, PrintJob,
    SystemDispatcher, UnsupportedDispatcher,
};
pub use registry::{PrinterRegistry, PrinterSelection, DEFAULT_PRINTER_KEY};

use std::sync::Arc;

/// Build the dispatcher for a configured backend.
pub fn dispatcher_for(backend: PrintBackend) -> Arc<dyn PrintDispatcher> {
    match backend {
        PrintBackend::System => Arc::new(SystemDispatcher),
        PrintBackend::None => Arc::new(UnsupportedDispatcher),
    }
}
