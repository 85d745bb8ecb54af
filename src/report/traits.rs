//! Traits for generator system standardization.

use super::validation::{ValidationError, ValidationPolicy};
use super::{GeneratedDocument, ReportError};

/// Trait for validating request objects.
pub trait Validator {
    /// Normalized form produced by a successful validation.
    type Output;

    /// Validate the request under the given policy.
    fn validate(&self, policy: &ValidationPolicy) -> Result<Self::Output, ValidationError>;
}

/// Trait for document generators.
pub trait Generator<Req> {
    /// Generate a document from the request.
    fn generate(&self, request: Req) -> Result<GeneratedDocument, ReportError>;
}
