//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - The port must be non-zero
//! - The base path must start and end with `/`
//! - At least one interpreter candidate must be configured
//! - The ASGI target must look like `module:attribute`

use crate::config::schema::DepotConfig;
use crate::error::{DepotError, Result};

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
///
/// This function collects all validation errors rather than stopping
/// at the first one, allowing users to fix multiple issues at once.
pub fn validate_config(config: &DepotConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_server(config));
    errors.extend(validate_backend(config));
    errors.extend(validate_frontend(config));

    errors
}

fn validate_server(config: &DepotConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push(ValidationError::new(
            "invalid-port",
            "server.port must be between 1 and 65535",
        ));
    }

    for (field, host) in [
        ("server.dev_host", &config.server.dev_host),
        ("server.prod_host", &config.server.prod_host),
    ] {
        if host.trim().is_empty() {
            errors.push(ValidationError::new(
                "empty-host",
                format!("{} must not be empty", field),
            ));
        }
    }

    errors
}

fn validate_backend(config: &DepotConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.backend.interpreters.iter().all(|i| i.trim().is_empty()) {
        errors.push(ValidationError::new(
            "no-interpreters",
            "backend.interpreters must list at least one interpreter name",
        ));
    }

    let app = config.backend.app.trim();
    match app.split_once(':') {
        Some((module, attr)) if !module.is_empty() && !attr.is_empty() => {}
        _ => errors.push(ValidationError::new(
            "invalid-app",
            format!("backend.app must look like 'module:attribute', got '{}'", app),
        )),
    }

    errors
}

fn validate_frontend(config: &DepotConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let base = &config.frontend.base_path;

    if base.is_empty() || !base.starts_with('/') || !base.ends_with('/') {
        errors.push(ValidationError::new(
            "invalid-base-path",
            format!(
                "frontend.base_path must start and end with '/', got '{}'",
                base
            ),
        ));
    }

    if config.frontend.index_file.trim().is_empty() {
        errors.push(ValidationError::new(
            "empty-index-file",
            "frontend.index_file must not be empty",
        ));
    }

    if config.frontend.base_path_var.trim().is_empty() {
        errors.push(ValidationError::new(
            "empty-base-path-var",
            "frontend.base_path_var must not be empty",
        ));
    }

    errors
}

/// Validate and return a single error summarizing every problem.
pub fn validate(config: &DepotConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(DepotError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
