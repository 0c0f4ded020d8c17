use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrorDetails, JsonRpcErrorObject, ToJsonRpcError};
use crate::types::{JsonRpcVersion, RequestId};

/// A successful JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcSuccess<T = Value> {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: Option<RequestId>,
    pub result: T,
}

impl<T> JsonRpcSuccess<T> {
    pub fn new(id: Option<RequestId>, result: T) -> Self {
        Self {
            version: JsonRpcVersion,
            id,
            result,
        }
    }
}

/// JSON-RPC Error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: Option<RequestId>,
    pub error: JsonRpcErrorObject,
}

impl JsonRpcErrorResponse {
    pub fn new(id: Option<RequestId>, error: JsonRpcErrorObject) -> Self {
        Self {
            version: JsonRpcVersion,
            id,
            error,
        }
    }
}

/// The outcome of one JSON-RPC call: exactly one of a result or an error.
///
/// Serializes to the flat JSON-RPC envelope. Deserialization rejects envelopes
/// that carry both `result` and `error`, or neither.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsonRpcResponse<T = Value> {
    /// Successful response with result field
    Success(JsonRpcSuccess<T>),
    /// Error response with error field
    Error(JsonRpcErrorResponse),
}

impl<T> JsonRpcResponse<T> {
    /// Create a success response
    pub fn success(id: Option<RequestId>, result: T) -> Self {
        Self::Success(JsonRpcSuccess::new(id, result))
    }

    /// Create an error response, copying code, message and data out of `details`
    pub fn error<D>(id: Option<RequestId>, details: &D) -> Self
    where
        D: ErrorDetails + ?Sized,
    {
        Self::Error(JsonRpcErrorResponse::new(
            id,
            JsonRpcErrorObject::from_details(details),
        ))
    }

    /// Create an error response from a failure; any cause stays behind
    pub fn from_failure<E>(id: Option<RequestId>, failure: &E) -> Self
    where
        E: ToJsonRpcError,
    {
        Self::Error(JsonRpcErrorResponse::new(id, failure.to_error_object()))
    }

    pub fn version(&self) -> JsonRpcVersion {
        match self {
            JsonRpcResponse::Success(resp) => resp.version,
            JsonRpcResponse::Error(err) => err.version,
        }
    }

    /// Get the request ID from either response or error
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            JsonRpcResponse::Success(resp) => resp.id.as_ref(),
            JsonRpcResponse::Error(err) => err.id.as_ref(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JsonRpcResponse::Success(_))
    }

    /// Check if this is an error response
    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcResponse::Error(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            JsonRpcResponse::Success(resp) => Some(&resp.result),
            JsonRpcResponse::Error(_) => None,
        }
    }

    pub fn error_object(&self) -> Option<&JsonRpcErrorObject> {
        match self {
            JsonRpcResponse::Success(_) => None,
            JsonRpcResponse::Error(err) => Some(&err.error),
        }
    }

    /// Consume the response, yielding the result or the wire error.
    /// `RpcFailure::from` turns the error back into a taxonomy failure.
    pub fn into_result(self) -> Result<T, JsonRpcErrorObject> {
        match self {
            JsonRpcResponse::Success(resp) => Ok(resp.result),
            JsonRpcResponse::Error(err) => Err(err.error),
        }
    }

    /// Transform the success result, leaving an error response untouched
    pub fn map<U, F>(self, f: F) -> JsonRpcResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            JsonRpcResponse::Success(resp) => {
                JsonRpcResponse::Success(JsonRpcSuccess::new(resp.id, f(resp.result)))
            }
            JsonRpcResponse::Error(err) => JsonRpcResponse::Error(err),
        }
    }
}

impl<T> From<JsonRpcSuccess<T>> for JsonRpcResponse<T> {
    fn from(response: JsonRpcSuccess<T>) -> Self {
        Self::Success(response)
    }
}

impl<T> From<JsonRpcErrorResponse> for JsonRpcResponse<T> {
    fn from(error: JsonRpcErrorResponse) -> Self {
        Self::Error(error)
    }
}

/// Envelope as read off the wire, before the branch is decided
#[derive(Deserialize)]
struct RawResponse {
    jsonrpc: JsonRpcVersion,
    #[serde(default)]
    id: Option<RequestId>,
    // `"result": null` is a valid result, so presence is tracked separately from value
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl<'de, T> Deserialize<'de> for JsonRpcResponse<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawResponse::deserialize(deserializer)?;
        match (raw.result, raw.error) {
            (Some(result), None) => {
                let result =
                    T::deserialize(result).map_err(<D::Error as de::Error>::custom)?;
                Ok(JsonRpcResponse::Success(JsonRpcSuccess {
                    version: raw.jsonrpc,
                    id: raw.id,
                    result,
                }))
            }
            (None, Some(error)) => Ok(JsonRpcResponse::Error(JsonRpcErrorResponse {
                version: raw.jsonrpc,
                id: raw.id,
                error,
            })),
            (Some(_), Some(_)) => Err(de::Error::custom(
                "JSON-RPC response must not contain both result and error",
            )),
            (None, None) => Err(de::Error::custom(
                "JSON-RPC response must contain either result or error",
            )),
        }
    }
}
