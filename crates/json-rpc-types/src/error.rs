use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::error_codes;

/// The five error kinds defined by the JSON-RPC 2.0 specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedErrorKind {
    /// Invalid JSON was received
    ParseError,
    /// The JSON sent is not a valid Request object
    InvalidRequest,
    /// The method does not exist / is not available
    MethodNotFound,
    /// Invalid method parameter(s)
    InvalidParams,
    /// Internal JSON-RPC error
    InternalError,
}

impl PredefinedErrorKind {
    pub const ALL: [PredefinedErrorKind; 5] = [
        PredefinedErrorKind::ParseError,
        PredefinedErrorKind::InvalidRequest,
        PredefinedErrorKind::MethodNotFound,
        PredefinedErrorKind::InvalidParams,
        PredefinedErrorKind::InternalError,
    ];

    pub const fn code(&self) -> i64 {
        match self {
            PredefinedErrorKind::ParseError => error_codes::PARSE_ERROR,
            PredefinedErrorKind::InvalidRequest => error_codes::INVALID_REQUEST,
            PredefinedErrorKind::MethodNotFound => error_codes::METHOD_NOT_FOUND,
            PredefinedErrorKind::InvalidParams => error_codes::INVALID_PARAMS,
            PredefinedErrorKind::InternalError => error_codes::INTERNAL_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PredefinedErrorKind::ParseError => "Parse error",
            PredefinedErrorKind::InvalidRequest => "Invalid Request",
            PredefinedErrorKind::MethodNotFound => "Method not found",
            PredefinedErrorKind::InvalidParams => "Invalid params",
            PredefinedErrorKind::InternalError => "Internal error",
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

/// A code inside the reserved server error band, `-32099..=-32000`.
/// Only obtainable through [`ServerErrorCode::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServerErrorCode(i64);

impl ServerErrorCode {
    pub fn new(code: i64) -> Result<Self, RangeViolation> {
        if error_codes::is_server_error(code) {
            Ok(Self(code))
        } else {
            Err(RangeViolation { code })
        }
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

/// JSON-RPC error codes.
///
/// Every value is either one of the five predefined kinds or a code inside the
/// reserved server error band; there is no way to hold any other integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonRpcErrorCode {
    Predefined(PredefinedErrorKind),
    ServerError(ServerErrorCode),
}

impl JsonRpcErrorCode {
    pub const PARSE_ERROR: Self = Self::Predefined(PredefinedErrorKind::ParseError);
    pub const INVALID_REQUEST: Self = Self::Predefined(PredefinedErrorKind::InvalidRequest);
    pub const METHOD_NOT_FOUND: Self = Self::Predefined(PredefinedErrorKind::MethodNotFound);
    pub const INVALID_PARAMS: Self = Self::Predefined(PredefinedErrorKind::InvalidParams);
    pub const INTERNAL_ERROR: Self = Self::Predefined(PredefinedErrorKind::InternalError);

    /// A server error code, rejected unless it lies in `-32099..=-32000`
    pub fn server_error(code: i64) -> Result<Self, RangeViolation> {
        ServerErrorCode::new(code).map(JsonRpcErrorCode::ServerError)
    }

    /// Classify a raw code as a predefined kind or a server error
    pub fn from_code(code: i64) -> Result<Self, RangeViolation> {
        match PredefinedErrorKind::from_code(code) {
            Some(kind) => Ok(kind.into()),
            None => Self::server_error(code),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::Predefined(kind) => kind.code(),
            JsonRpcErrorCode::ServerError(code) => code.get(),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::Predefined(kind) => kind.message(),
            JsonRpcErrorCode::ServerError(_) => "Server error",
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, JsonRpcErrorCode::ServerError(_))
    }
}

impl From<PredefinedErrorKind> for JsonRpcErrorCode {
    fn from(kind: PredefinedErrorKind) -> Self {
        JsonRpcErrorCode::Predefined(kind)
    }
}

impl From<ServerErrorCode> for JsonRpcErrorCode {
    fn from(code: ServerErrorCode) -> Self {
        JsonRpcErrorCode::ServerError(code)
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl Serialize for JsonRpcErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for JsonRpcErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = i64::deserialize(deserializer)?;
        JsonRpcErrorCode::from_code(code).map_err(|violation| {
            tracing::warn!(code, "Unclassified JSON-RPC error code: {}", violation);
            <D::Error as de::Error>::custom(violation)
        })
    }
}

/// The `{ code, message, data? }` triple every JSON-RPC error carries.
///
/// Implemented by the two constructible detail types ([`PredefinedError`] and
/// [`CustomError`]), by the wire record [`JsonRpcErrorObject`], and by
/// [`RpcFailure`](crate::RpcFailure), so any of them can become the error branch
/// of a response.
pub trait ErrorDetails {
    fn error_code(&self) -> JsonRpcErrorCode;
    fn message(&self) -> &str;
    fn data(&self) -> Option<&Value>;

    fn code(&self) -> i64 {
        self.error_code().code()
    }
}

// `data: null` carries nothing and is stored as absent
fn non_null(data: Option<Value>) -> Option<Value> {
    data.filter(|value| !value.is_null())
}

/// Error details for one of the five protocol-defined kinds.
/// The code is derived from the kind and cannot be chosen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct PredefinedError {
    kind: PredefinedErrorKind,
    message: String,
    data: Option<Value>,
}

impl PredefinedError {
    pub fn new(kind: PredefinedErrorKind, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: non_null(data),
        }
    }

    /// Details carrying the standard message for `kind`, e.g. "Method not found"
    pub fn with_default_message(kind: PredefinedErrorKind) -> Self {
        Self::new(kind, kind.message(), None)
    }

    pub fn kind(&self) -> PredefinedErrorKind {
        self.kind
    }
}

impl ErrorDetails for PredefinedError {
    fn error_code(&self) -> JsonRpcErrorCode {
        self.kind.into()
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

/// A custom code was outside the reserved server error band.
///
/// This signals misuse of [`CustomError`] by the implementer. It has no
/// conversion into a wire error and must not be sent to a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "custom error code {code} is outside the reserved server error range {start}..={end}",
    start = error_codes::SERVER_ERROR_START,
    end = error_codes::SERVER_ERROR_END
)]
pub struct RangeViolation {
    pub code: i64,
}

/// Error details for an implementation-defined server error.
/// Holds a code in `-32099..=-32000`; construction rejects anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomError {
    code: ServerErrorCode,
    message: String,
    data: Option<Value>,
}

impl CustomError {
    /// Build custom error details, panicking if `code` is outside the reserved band.
    ///
    /// Use this where the code is a constant chosen by the implementer; an
    /// out-of-range value is a bug and is reported immediately.
    /// [`CustomError::try_new`] is the non-panicking form.
    pub fn new(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        match Self::try_new(code, message, data) {
            Ok(error) => error,
            Err(violation) => {
                tracing::error!(code, "{}", violation);
                panic!("{}", violation);
            }
        }
    }

    pub fn try_new(
        code: i64,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Result<Self, RangeViolation> {
        let code = ServerErrorCode::new(code)?;
        Ok(Self::with_code(code, message, data))
    }

    /// Details for a code that has already been validated
    pub fn with_code(
        code: ServerErrorCode,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            data: non_null(data),
        }
    }
}

impl ErrorDetails for CustomError {
    fn error_code(&self) -> JsonRpcErrorCode {
        self.code.into()
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

/// JSON-RPC Error object, as it appears under `"error"` on the wire.
///
/// The code is a [`JsonRpcErrorCode`], so an object with a code outside the
/// taxonomy can neither be built nor parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    code: JsonRpcErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcErrorObject {
    pub fn new(code: JsonRpcErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.unwrap_or_else(|| code.message().to_string()),
            data: non_null(data),
        }
    }

    /// Copy the code, message and data out of any error details
    pub fn from_details<D>(details: &D) -> Self
    where
        D: ErrorDetails + ?Sized,
    {
        Self {
            code: details.error_code(),
            message: details.message().to_string(),
            data: non_null(details.data().cloned()),
        }
    }

    pub fn into_parts(self) -> (JsonRpcErrorCode, String, Option<Value>) {
        (self.code, self.message, self.data)
    }
}

impl ErrorDetails for JsonRpcErrorObject {
    fn error_code(&self) -> JsonRpcErrorCode {
        self.code
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

impl From<PredefinedError> for JsonRpcErrorObject {
    fn from(details: PredefinedError) -> Self {
        Self {
            code: details.kind.into(),
            message: details.message,
            data: details.data,
        }
    }
}

impl From<CustomError> for JsonRpcErrorObject {
    fn from(details: CustomError) -> Self {
        Self {
            code: details.code.into(),
            message: details.message,
            data: details.data,
        }
    }
}

/// Trait for errors that can be converted to JSON-RPC error objects.
///
/// A dispatcher holding a domain error of type `E: ToJsonRpcError` can always
/// produce the error branch of a response without knowing the concrete type.
pub trait ToJsonRpcError: std::error::Error + Send + Sync + 'static {
    /// Convert this error to a JSON-RPC error object
    fn to_error_object(&self) -> JsonRpcErrorObject;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_codes() {
        assert_eq!(JsonRpcErrorCode::PARSE_ERROR.code(), -32700);
        assert_eq!(JsonRpcErrorCode::INVALID_REQUEST.code(), -32600);
        assert_eq!(JsonRpcErrorCode::METHOD_NOT_FOUND.code(), -32601);
        assert_eq!(JsonRpcErrorCode::INVALID_PARAMS.code(), -32602);
        assert_eq!(JsonRpcErrorCode::INTERNAL_ERROR.code(), -32603);
        assert_eq!(JsonRpcErrorCode::server_error(-32050).unwrap().code(), -32050);
    }

    #[test]
    fn test_predefined_code_ignores_message_and_data() {
        for kind in PredefinedErrorKind::ALL {
            let bare = PredefinedError::new(kind, "", None);
            let rich = PredefinedError::new(kind, "something else", Some(json!({"a": [1, 2]})));
            assert_eq!(bare.code(), kind.code());
            assert_eq!(rich.code(), kind.code());
            assert_eq!(rich.error_code(), JsonRpcErrorCode::Predefined(kind));
        }
    }

    #[test]
    fn test_default_messages() {
        let details = PredefinedError::with_default_message(PredefinedErrorKind::MethodNotFound);
        assert_eq!(details.message(), "Method not found");
        assert_eq!(details.data(), None);
        assert_eq!(
            JsonRpcErrorCode::INVALID_REQUEST.to_string(),
            "-32600: Invalid Request"
        );
        assert_eq!(
            JsonRpcErrorCode::server_error(-32000).unwrap().to_string(),
            "-32000: Server error"
        );
    }

    #[test]
    fn test_custom_error_accepts_whole_band() {
        for code in -32099..=-32000 {
            let details = CustomError::try_new(code, "custom", None).unwrap();
            assert_eq!(details.code(), code);
            assert!(details.error_code().is_server_error());
        }
    }

    #[test]
    fn test_custom_error_rejects_outside_band() {
        let outside = [
            -32100,
            -31999,
            0,
            1,
            42,
            i64::MIN,
            i64::MAX,
            error_codes::PARSE_ERROR,
            error_codes::INVALID_REQUEST,
            error_codes::METHOD_NOT_FOUND,
            error_codes::INVALID_PARAMS,
            error_codes::INTERNAL_ERROR,
        ];
        for code in outside {
            assert_eq!(
                CustomError::try_new(code, "custom", None),
                Err(RangeViolation { code })
            );
        }
    }

    #[test]
    fn test_custom_error_rate_limited() {
        let details = CustomError::new(-32050, "rate limited", None);
        assert_eq!(details.code(), -32050);
        assert_eq!(details.message(), "rate limited");
    }

    #[test]
    #[should_panic(
        expected = "custom error code -31999 is outside the reserved server error range"
    )]
    fn test_custom_error_new_panics_outside_band() {
        let _ = CustomError::new(-31999, "rate limited", None);
    }

    #[test]
    fn test_server_error_code_is_validated() {
        for code in [5, 404, -31999, -32100, error_codes::INTERNAL_ERROR] {
            assert_eq!(
                JsonRpcErrorCode::server_error(code),
                Err(RangeViolation { code })
            );
            assert_eq!(ServerErrorCode::new(code), Err(RangeViolation { code }));
        }
        assert_eq!(ServerErrorCode::new(-32099).unwrap().get(), -32099);
    }

    #[test]
    fn test_classify_codes() {
        assert_eq!(
            JsonRpcErrorCode::from_code(-32601),
            Ok(JsonRpcErrorCode::METHOD_NOT_FOUND)
        );
        assert_eq!(
            JsonRpcErrorCode::from_code(-32001),
            JsonRpcErrorCode::server_error(-32001)
        );
        assert!(JsonRpcErrorCode::from_code(-32001).unwrap().is_server_error());
        assert_eq!(
            JsonRpcErrorCode::from_code(-32604),
            Err(RangeViolation { code: -32604 })
        );
        assert_eq!(
            JsonRpcErrorCode::from_code(404),
            Err(RangeViolation { code: 404 })
        );
    }

    #[test]
    fn test_error_object_rejects_unclassified_code_on_input() {
        let err = serde_json::from_value::<JsonRpcErrorObject>(json!({"code": 5, "message": "x"}))
            .unwrap_err();
        assert!(err.to_string().contains("custom error code 5 is outside"));

        let object: JsonRpcErrorObject =
            serde_json::from_value(json!({"code": -32005, "message": "x"})).unwrap();
        assert_eq!(object.error_code(), JsonRpcErrorCode::server_error(-32005).unwrap());
    }

    #[test]
    fn test_error_object_omits_absent_data() {
        let object = JsonRpcErrorObject::new(JsonRpcErrorCode::INTERNAL_ERROR, None, None);
        assert_eq!(
            serde_json::to_value(&object).unwrap(),
            json!({"code": -32603, "message": "Internal error"})
        );

        let parsed: JsonRpcErrorObject =
            serde_json::from_value(json!({"code": -32603, "message": "Internal error"})).unwrap();
        assert_eq!(parsed, object);
    }

    #[test]
    fn test_null_data_is_absent() {
        let predefined =
            PredefinedError::new(PredefinedErrorKind::InvalidParams, "bad", Some(Value::Null));
        let custom = CustomError::new(-32001, "busy", Some(Value::Null));
        let object = JsonRpcErrorObject::new(
            JsonRpcErrorCode::INTERNAL_ERROR,
            None,
            Some(Value::Null),
        );
        assert_eq!(predefined.data(), None);
        assert_eq!(custom.data(), None);
        assert_eq!(object.data(), None);

        let text = serde_json::to_string(&object).unwrap();
        assert_eq!(text, r#"{"code":-32603,"message":"Internal error"}"#);
        let parsed: JsonRpcErrorObject = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, object);

        let parsed: JsonRpcErrorObject =
            serde_json::from_str(r#"{"code":-32603,"message":"Internal error","data":null}"#)
                .unwrap();
        assert_eq!(parsed, object);
    }

    #[test]
    fn test_error_object_from_details() {
        let details = PredefinedError::new(
            PredefinedErrorKind::InvalidParams,
            "bad param",
            Some(json!({"field": "x"})),
        );
        let object = JsonRpcErrorObject::from_details(&details);
        assert_eq!(object, JsonRpcErrorObject::from(details));
        assert_eq!(
            serde_json::to_value(&object).unwrap(),
            json!({"code": -32602, "message": "bad param", "data": {"field": "x"}})
        );
        assert_eq!(object.error_code(), JsonRpcErrorCode::INVALID_PARAMS);

        let (code, message, data) = object.into_parts();
        assert_eq!(code, JsonRpcErrorCode::INVALID_PARAMS);
        assert_eq!(message, "bad param");
        assert_eq!(data, Some(json!({"field": "x"})));
    }
}
