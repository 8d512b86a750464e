//! Error types for measurement store operations.
//!
//! Every failure talking to the store surfaces as a [`RepositoryError`] with a
//! structured [`ErrorContext`] naming the operation that failed. Only
//! [`RepositoryError::ConnectionError`] means the store is unreachable; every
//! other kind means the store answered but the call could not be completed.

use std::fmt;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where a repository error happened.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Store call or setup step, e.g. `aggregate_range` or `create_pool`
    pub operation: Option<String>,
    /// Relation involved, normally `measurement`
    pub entity: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("operation", &self.operation),
            ("entity", &self.entity),
            ("details", &self.details),
        ];
        let parts: Vec<String> = fields
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| format!("{}={}", name, v)))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No session could be opened: file unreadable, pool exhausted or timed out.
    #[error("Connection error: {message} {context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    /// The store rejected or failed a query (missing table, bad SQL).
    #[error("Query error: {message} {context}")]
    QueryError {
        message: String,
        context: ErrorContext,
    },

    /// A stored value could not be read as the expected type (e.g. a malformed date).
    #[error("Data validation error: {message} {context}")]
    ValidationError {
        message: String,
        context: ErrorContext,
    },

    /// The store could not be set up from the given settings.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// A blocking task died before returning.
    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Replace the whole context.
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        *self.context_mut() = context;
        self
    }

    /// Tag the error with the store call it came from, keeping entity and details.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// True when the store itself is unreachable rather than the query failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ConnectionError { .. })
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }
}

#[cfg(feature = "sqlite-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::Error;

        match err {
            Error::DatabaseError(kind, info) => RepositoryError::query(info.message())
                .with_context(
                    ErrorContext::default().with_details(format!("db_error_kind={:?}", kind)),
                ),
            Error::DeserializationError(e) => {
                RepositoryError::validation(format!("Unreadable stored value: {}", e))
            }
            other => RepositoryError::query(other.to_string()),
        }
    }
}

/// Checkout failures, including the pool's connection timeout.
#[cfg(feature = "sqlite-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::connection(err.to_string())
            .with_context(ErrorContext::default().with_details("pool_error"))
    }
}
