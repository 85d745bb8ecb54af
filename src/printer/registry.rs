use serde::Serialize;
use std::collections::BTreeMap;

use crate::report::ValidationError;

pub const DEFAULT_PRINTER_KEY: &str = "p1";

const BUILTIN_PRINTERS: [(&str, &str); 4] = [
    ("p1", "Canon LBP6030"),
    ("p2", "HP LaserJet 1020"),
    ("p3", "Epson L3150"),
    ("p4", "Brother HL-1110"),
];

/// A printer chosen for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterSelection {
    pub key: String,
    pub name: String,
}

/// Immutable mapping from selector key to printer display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PrinterRegistry {
    printers: BTreeMap<String, String>,
}

impl PrinterRegistry {
    pub fn new(printers: BTreeMap<String, String>) -> Self {
        let printers = printers
            .into_iter()
            .map(|(key, name)| (key.trim().to_ascii_lowercase(), name.trim().to_string()))
            .collect();
        Self { printers }
    }

    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_PRINTERS
                .iter()
                .map(|(key, name)| (key.to_string(), name.to_string()))
                .collect(),
        )
    }

    /// Parse `key=Name,key=Name`. Entries without `=` or with empty parts are
    /// rejected.
    pub fn parse(list: &str) -> Result<Self, String> {
        let mut printers = BTreeMap::new();
        for entry in list.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let (key, name) = entry
                .split_once('=')
                .ok_or_else(|| format!("printer entry '{}' must look like key=Name", entry))?;
            let (key, name) = (key.trim(), name.trim());
            if key.is_empty() || name.is_empty() {
                return Err(format!("printer entry '{}' has an empty key or name", entry));
            }
            printers.insert(key.to_string(), name.to_string());
        }

        if printers.is_empty() {
            return Err("printer list is empty".to_string());
        }
        Ok(Self::new(printers))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.printers.get(&key.trim().to_ascii_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.printers.keys().map(String::as_str).collect()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.printers
    }

    /// Resolve a request's selector, falling back to `default_key` when the
    /// selector is absent. Keys are case-insensitive.
    pub fn resolve(
        &self,
        selector: Option<&str>,
        default_key: &str,
    ) -> Result<PrinterSelection, ValidationError> {
        let key = selector.unwrap_or(default_key).trim().to_ascii_lowercase();
        match self.printers.get(&key) {
            Some(name) => Ok(PrinterSelection {
                key,
                name: name.clone(),
            }),
            None => Err(ValidationError::unknown_printer(&key, &self.keys())),
        }
    }
}

impl Default for PrinterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
