//! Reportable JSON-RPC failures.
//!
//! [`RpcFailure`] is what a method implementation returns (or a client hands to
//! its caller) when a call fails. Each variant wraps exactly one set of error
//! details plus an optional cause. The cause is kept for local diagnostics and
//! is dropped when the failure becomes a wire error.

use serde_json::Value;
use thiserror::Error;

use crate::error::{
    CustomError, ErrorDetails, JsonRpcErrorCode, JsonRpcErrorObject, PredefinedError,
    PredefinedErrorKind, ToJsonRpcError,
};

/// Boxed underlying condition that triggered a failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A JSON-RPC failure: one of the five protocol-defined kinds or a custom server error
#[derive(Debug, Error)]
pub enum RpcFailure {
    /// Invalid JSON was received by the server.
    #[error("{}", .details.message())]
    ParseError {
        details: PredefinedError,
        #[source]
        cause: Option<BoxError>,
    },

    /// The JSON sent is not a valid Request object.
    #[error("{}", .details.message())]
    InvalidRequest {
        details: PredefinedError,
        #[source]
        cause: Option<BoxError>,
    },

    /// The method does not exist / is not available.
    #[error("{}", .details.message())]
    MethodNotFound {
        details: PredefinedError,
        #[source]
        cause: Option<BoxError>,
    },

    /// Invalid method parameter(s).
    #[error("{}", .details.message())]
    InvalidParams {
        details: PredefinedError,
        #[source]
        cause: Option<BoxError>,
    },

    /// Internal JSON-RPC error.
    #[error("{}", .details.message())]
    InternalError {
        details: PredefinedError,
        #[source]
        cause: Option<BoxError>,
    },

    /// Implementation-defined server error, code in `-32099..=-32000`.
    #[error("{}", .details.message())]
    CustomServerError {
        details: CustomError,
        #[source]
        cause: Option<BoxError>,
    },
}

/// Application-defined failures that travel as custom server errors.
///
/// ```
/// use json_rpc_types::{CustomError, CustomFailure, ErrorDetails, RpcFailure};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("too many requests")]
/// struct RateLimited;
///
/// impl CustomFailure for RateLimited {
///     fn custom_error(&self) -> CustomError {
///         CustomError::new(-32050, self.to_string(), None)
///     }
/// }
///
/// let failure = RpcFailure::custom(RateLimited);
/// assert_eq!(failure.code(), -32050);
/// ```
pub trait CustomFailure: std::error::Error + Send + Sync + 'static {
    /// The details sent to the peer for this failure
    fn custom_error(&self) -> CustomError;
}

impl RpcFailure {
    pub fn parse_error(message: impl Into<String>, data: Option<Value>) -> Self {
        PredefinedError::new(PredefinedErrorKind::ParseError, message, data).into()
    }

    pub fn invalid_request(message: impl Into<String>, data: Option<Value>) -> Self {
        PredefinedError::new(PredefinedErrorKind::InvalidRequest, message, data).into()
    }

    pub fn method_not_found(message: impl Into<String>, data: Option<Value>) -> Self {
        PredefinedError::new(PredefinedErrorKind::MethodNotFound, message, data).into()
    }

    pub fn invalid_params(message: impl Into<String>, data: Option<Value>) -> Self {
        PredefinedError::new(PredefinedErrorKind::InvalidParams, message, data).into()
    }

    pub fn internal_error(message: impl Into<String>, data: Option<Value>) -> Self {
        PredefinedError::new(PredefinedErrorKind::InternalError, message, data).into()
    }

    /// Custom server error from already validated details
    pub fn custom_error(details: CustomError) -> Self {
        details.into()
    }

    /// Custom server error from an application failure; the failure itself
    /// becomes the cause
    pub fn custom<F>(failure: F) -> Self
    where
        F: CustomFailure,
    {
        RpcFailure::CustomServerError {
            details: failure.custom_error(),
            cause: Some(Box::new(failure)),
        }
    }

    /// Attach the condition that triggered this failure, replacing any earlier one
    pub fn with_cause(mut self, new_cause: impl Into<BoxError>) -> Self {
        match &mut self {
            RpcFailure::ParseError { cause, .. }
            | RpcFailure::InvalidRequest { cause, .. }
            | RpcFailure::MethodNotFound { cause, .. }
            | RpcFailure::InvalidParams { cause, .. }
            | RpcFailure::InternalError { cause, .. }
            | RpcFailure::CustomServerError { cause, .. } => *cause = Some(new_cause.into()),
        }
        self
    }

    pub fn kind(&self) -> JsonRpcErrorCode {
        self.details().error_code()
    }

    pub fn details(&self) -> &dyn ErrorDetails {
        match self {
            RpcFailure::ParseError { details, .. }
            | RpcFailure::InvalidRequest { details, .. }
            | RpcFailure::MethodNotFound { details, .. }
            | RpcFailure::InvalidParams { details, .. }
            | RpcFailure::InternalError { details, .. } => details,
            RpcFailure::CustomServerError { details, .. } => details,
        }
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            RpcFailure::ParseError { cause, .. }
            | RpcFailure::InvalidRequest { cause, .. }
            | RpcFailure::MethodNotFound { cause, .. }
            | RpcFailure::InvalidParams { cause, .. }
            | RpcFailure::InternalError { cause, .. }
            | RpcFailure::CustomServerError { cause, .. } => cause.as_deref(),
        }
    }
}

impl ErrorDetails for RpcFailure {
    fn error_code(&self) -> JsonRpcErrorCode {
        self.details().error_code()
    }

    fn message(&self) -> &str {
        self.details().message()
    }

    fn data(&self) -> Option<&Value> {
        self.details().data()
    }
}

impl ToJsonRpcError for RpcFailure {
    fn to_error_object(&self) -> JsonRpcErrorObject {
        if let Some(cause) = self.cause() {
            tracing::debug!(
                code = self.code(),
                cause = %cause,
                "Dropping failure cause from wire error"
            );
        }
        JsonRpcErrorObject::from_details(self.details())
    }
}

impl From<PredefinedError> for RpcFailure {
    fn from(details: PredefinedError) -> Self {
        let cause = None;
        match details.kind() {
            PredefinedErrorKind::ParseError => RpcFailure::ParseError { details, cause },
            PredefinedErrorKind::InvalidRequest => RpcFailure::InvalidRequest { details, cause },
            PredefinedErrorKind::MethodNotFound => RpcFailure::MethodNotFound { details, cause },
            PredefinedErrorKind::InvalidParams => RpcFailure::InvalidParams { details, cause },
            PredefinedErrorKind::InternalError => RpcFailure::InternalError { details, cause },
        }
    }
}

impl From<CustomError> for RpcFailure {
    fn from(details: CustomError) -> Self {
        RpcFailure::CustomServerError {
            details,
            cause: None,
        }
    }
}

impl From<&RpcFailure> for JsonRpcErrorObject {
    fn from(failure: &RpcFailure) -> Self {
        failure.to_error_object()
    }
}

impl From<RpcFailure> for JsonRpcErrorObject {
    fn from(failure: RpcFailure) -> Self {
        failure.to_error_object()
    }
}

/// Rebuild a failure from an error received over the wire.
///
/// Predefined codes map to their variants and reserved-band codes to
/// [`RpcFailure::CustomServerError`]. A wire error with any other code is
/// already rejected when the response is parsed.
impl From<JsonRpcErrorObject> for RpcFailure {
    fn from(object: JsonRpcErrorObject) -> Self {
        let (code, message, data) = object.into_parts();
        match code {
            JsonRpcErrorCode::Predefined(kind) => PredefinedError::new(kind, message, data).into(),
            JsonRpcErrorCode::ServerError(code) => {
                CustomError::with_code(code, message, data).into()
            }
        }
    }
}
