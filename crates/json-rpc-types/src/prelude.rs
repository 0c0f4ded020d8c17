//! # JSON-RPC Types Prelude
//!
//! This module provides convenient re-exports of the most commonly used types
//! from the JSON-RPC types library.
//!
//! ```rust
//! use json_rpc_types::prelude::*;
//! ```

// Error taxonomy
pub use crate::error::{
    CustomError, ErrorDetails, JsonRpcErrorCode, JsonRpcErrorObject, PredefinedError,
    PredefinedErrorKind, RangeViolation, ServerErrorCode, ToJsonRpcError,
};
pub use crate::failure::{CustomFailure, RpcFailure};

// Response model
pub use crate::response::{JsonRpcErrorResponse, JsonRpcResponse, JsonRpcSuccess};
pub use crate::types::{JsonRpcVersion, RequestId};

// Standard error codes
pub use crate::error_codes::*;
