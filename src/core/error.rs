//! Typed error handling for the catalog query engine
//!
//! Query resolution itself never fails: remote failures are recovered by the
//! offline fallback inside [`ProductQueryService`](crate::engine::ProductQueryService).
//! The types here surface from the other seams, where failures propagate to
//! the caller as-is.
//!
//! # Error Categories
//!
//! - [`ProductError`]: CRUD failures against a product repository
//! - [`ValidationError`]: rejected mutation input
//! - [`ConfigError`]: configuration parsing and validation
//! - [`SourceError`]: the remote collection could not be read
//!
//! # Example
//!
//! ```rust,ignore
//! match repository.get(42).await {
//!     Ok(product) => println!("Found: {}", product.name),
//!     Err(CatalogError::Product(ProductError::NotFound { id })) => {
//!         println!("Product {} not found", id);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// The main error type for the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Product CRUD errors
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Remote collection errors
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl CatalogError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::Product(e) => e.error_code(),
            CatalogError::Validation(_) => "VALIDATION_ERROR",
            CatalogError::Config(_) => "CONFIG_ERROR",
            CatalogError::Source(e) => e.error_code(),
        }
    }
}

// =============================================================================
// Product Errors
// =============================================================================

/// Errors related to product CRUD operations
#[derive(Debug, Error)]
pub enum ProductError {
    /// Product was not found
    #[error("product with id '{id}' not found")]
    NotFound { id: u32 },

    /// A product with this id already exists
    #[error("product with id '{id}' already exists")]
    AlreadyExists { id: u32 },

    /// Product operation failed
    #[error("Failed to {operation} product: {message}")]
    OperationFailed { operation: String, message: String },
}

impl ProductError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ProductError::NotFound { .. } => "PRODUCT_NOT_FOUND",
            ProductError::AlreadyExists { .. } => "PRODUCT_ALREADY_EXISTS",
            ProductError::OperationFailed { .. } => "PRODUCT_OPERATION_FAILED",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Multiple field validation errors
    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

// =============================================================================
// Source Errors
// =============================================================================

/// Reasons the remote collection could not be read
///
/// Every variant sends [`resolve`](crate::engine::ProductQueryService::resolve)
/// down the fallback path.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Connection refused, DNS failure, reset, ...
    #[error("remote collection unreachable: {message}")]
    Network { message: String },

    /// No response within the configured bound
    #[error("remote collection timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The collection answered with a non-success status
    #[error("remote collection answered {status} for {url}")]
    Status { status: u16, url: String },

    /// The body was not an array of products
    #[error("malformed response body: {message}")]
    MalformedResponse { message: String },

    /// An in-process source could not be read
    #[error("product source unavailable: {message}")]
    Unavailable { message: String },
}

impl SourceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SourceError::Network { .. } => "SOURCE_UNREACHABLE",
            SourceError::Timeout { .. } => "SOURCE_TIMEOUT",
            SourceError::Status { .. } => "SOURCE_STATUS",
            SourceError::MalformedResponse { .. } => "SOURCE_MALFORMED_RESPONSE",
            SourceError::Unavailable { .. } => "SOURCE_UNAVAILABLE",
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for CatalogError {
    fn from(err: serde_yaml::Error) -> Self {
        CatalogError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for CatalogError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CatalogError::Validation(errors.into())
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::MalformedResponse {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            SourceError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            SourceError::Network {
                message: err.to_string(),
            }
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
