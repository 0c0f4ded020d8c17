//! # JSON-RPC 2.0 Error and Response Model
//!
//! A pure, transport-agnostic data model for the outcome of a JSON-RPC 2.0 call.
//! This crate provides the error taxonomy and the response envelope without any
//! transport, dispatch or batching code.
//!
//! ## Features
//! - The five protocol-defined errors with their fixed codes
//! - Custom server errors, validated against the reserved `-32099..=-32000` band
//! - A response type that is always exactly one of success or error
//! - Causal chains for local diagnostics that never reach the wire

pub mod error;
pub mod failure;
pub mod prelude;
pub mod response;
pub mod types;

// Re-export main types
pub use error::{
    CustomError, ErrorDetails, JsonRpcErrorCode, JsonRpcErrorObject, PredefinedError,
    PredefinedErrorKind, RangeViolation, ServerErrorCode, ToJsonRpcError,
};
pub use failure::{BoxError, CustomFailure, RpcFailure};
pub use response::{JsonRpcErrorResponse, JsonRpcResponse, JsonRpcSuccess};
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;

    /// Whether `code` lies in the band reserved for implementation-defined server errors
    pub const fn is_server_error(code: i64) -> bool {
        code >= SERVER_ERROR_START && code <= SERVER_ERROR_END
    }
}
