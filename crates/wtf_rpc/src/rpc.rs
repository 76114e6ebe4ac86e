//! JSON-RPC 2.0 envelope and dispatch onto the procedure catalog.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use wtf_core::{find_procedure, LookupService, Procedure, ProcedureDoc};

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// Incoming call. `params` may be positional (array) or named (object).
#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default)]
    pub id: Value,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Value, id: Value) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            method: method.into(),
            params: Some(params),
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// Outgoing reply; exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
    pub id: Value,
}

impl RpcResponse {
    pub fn success(id: Value, result: Vec<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn failure(id: Value, err: &RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(RpcErrorObject {
                code: err.code(),
                message: err.to_string(),
            }),
            id,
        }
    }
}

/// Call-level failure, reported to the caller as a JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    Parse(String),
    InvalidRequest(String),
    MethodNotFound(String),
    InvalidParams {
        method: &'static str,
        message: String,
    },
    Internal(String),
}

impl RpcError {
    pub fn code(&self) -> i64 {
        match self {
            Self::Parse(_) => PARSE_ERROR,
            Self::InvalidRequest(_) => INVALID_REQUEST,
            Self::MethodNotFound(_) => METHOD_NOT_FOUND,
            Self::InvalidParams { .. } => INVALID_PARAMS,
            Self::Internal(_) => INTERNAL_ERROR,
        }
    }
}

impl Display for RpcError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "parse error: {message}"),
            Self::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            Self::MethodNotFound(method) => write!(f, "method not found: `{method}`"),
            Self::InvalidParams { method, message } => {
                write!(f, "invalid params for `{method}`: {message}")
            }
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for RpcError {}

/// Resolves `request` against the procedure catalog and runs it.
///
/// Blocks on storage; call from a blocking context.
pub fn dispatch(lookup: &LookupService, request: &RpcRequest) -> Result<Vec<String>, RpcError> {
    if let Some(version) = request.jsonrpc.as_deref() {
        if version != JSONRPC_VERSION {
            return Err(RpcError::InvalidRequest(format!(
                "unsupported jsonrpc version `{version}`"
            )));
        }
    }

    let doc = find_procedure(&request.method)
        .ok_or_else(|| RpcError::MethodNotFound(request.method.clone()))?;
    let args = bind_params(doc, request.params.as_ref())?;

    match (doc.procedure, args.as_slice()) {
        (Procedure::WtfIs, [acronym]) => Ok(lookup.wtf_is(acronym)),
        (Procedure::List, []) => Ok(lookup.list()),
        _ => Err(RpcError::Internal(format!(
            "catalog arity mismatch for `{}`",
            doc.name
        ))),
    }
}

fn bind_params(doc: &ProcedureDoc, params: Option<&Value>) -> Result<Vec<String>, RpcError> {
    let invalid = |message: String| RpcError::InvalidParams {
        method: doc.name,
        message,
    };

    let values: Vec<&Value> = match params {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(map)) => {
            if let Some(unknown) = map
                .keys()
                .find(|key| !doc.params.iter().any(|param| *param == key.as_str()))
            {
                return Err(invalid(format!("unexpected parameter `{unknown}`")));
            }
            doc.params
                .iter()
                .map(|name| {
                    map.get(*name)
                        .ok_or_else(|| invalid(format!("missing parameter `{name}`")))
                })
                .collect::<Result<_, _>>()?
        }
        Some(other) => {
            return Err(invalid(format!(
                "params must be an array or object, got {other}"
            )))
        }
    };

    if values.len() != doc.params.len() {
        return Err(invalid(format!(
            "expected {} parameter(s), got {}",
            doc.params.len(),
            values.len()
        )));
    }

    values
        .into_iter()
        .zip(doc.params)
        .map(|(value, name)| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(format!("parameter `{name}` must be a string")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{dispatch, RpcError, RpcRequest, RpcResponse, INVALID_PARAMS};
    use serde_json::{json, Value};
    use wtf_core::{Database, DbError, LookupService};

    fn lookup() -> LookupService {
        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| {
            conn.execute_batch(
                "INSERT INTO acronyms (id, acronym, translation) VALUES
                    ('00000000-0000-4000-8000-000000000001', 'RPC', 'Remote Procedure Call');",
            )
            .map_err(DbError::from)
        })
        .unwrap();
        LookupService::new(db)
    }

    #[test]
    fn wtf_is_accepts_positional_and_named_params() {
        let lookup = lookup();

        let positional = RpcRequest::new("wtf_is", json!(["rpc"]), json!(1));
        assert_eq!(
            dispatch(&lookup, &positional).unwrap(),
            vec!["Remote Procedure Call"]
        );

        let named = RpcRequest::new("wtf_is", json!({ "acronym": "RPC" }), json!(2));
        assert_eq!(
            dispatch(&lookup, &named).unwrap(),
            vec!["Remote Procedure Call"]
        );
    }

    #[test]
    fn list_accepts_missing_or_empty_params() {
        let lookup = lookup();
        let request = RpcRequest {
            jsonrpc: None,
            method: "list".to_string(),
            params: None,
            id: Value::Null,
        };
        assert_eq!(dispatch(&lookup, &request).unwrap(), vec!["RPC"]);

        let empty = RpcRequest::new("list", json!([]), json!("a"));
        assert_eq!(dispatch(&lookup, &empty).unwrap(), vec!["RPC"]);
    }

    #[test]
    fn unknown_method_is_reported() {
        let request = RpcRequest::new("system.listMethods", json!([]), json!(1));
        assert_eq!(
            dispatch(&lookup(), &request).unwrap_err(),
            RpcError::MethodNotFound("system.listMethods".to_string())
        );
    }

    #[test]
    fn bad_params_are_rejected() {
        let lookup = lookup();
        for params in [
            json!([]),
            json!(["A", "B"]),
            json!([42]),
            json!({ "acronim": "A" }),
            json!("A"),
        ] {
            let request = RpcRequest::new("wtf_is", params.clone(), json!(1));
            let err = dispatch(&lookup, &request).unwrap_err();
            assert_eq!(err.code(), INVALID_PARAMS, "params {params} should be rejected");
        }
    }

    #[test]
    fn wrong_protocol_version_is_invalid_request() {
        let mut request = RpcRequest::new("list", json!([]), json!(1));
        request.jsonrpc = Some("1.0".to_string());
        assert!(matches!(
            dispatch(&lookup(), &request),
            Err(RpcError::InvalidRequest(_))
        ));
    }

    #[test]
    fn failure_response_omits_result() {
        let response = RpcResponse::failure(json!(7), &RpcError::MethodNotFound("x".into()));
        let encoded = serde_json::to_value(&response).unwrap();
        assert_eq!(encoded["error"]["code"], json!(-32601));
        assert!(encoded.get("result").is_none());
        assert_eq!(encoded["id"], json!(7));
    }
}
