mod validator;

pub use validator::{ValidationIssue, ValidationReport, validate_catalog};
