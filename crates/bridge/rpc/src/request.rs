use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Correlation id chosen by the widget.
///
/// The bridge never interprets it, it is copied verbatim into the response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(pub String);

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Id {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A request posted by the widget: `{ "id": string, "method": string, "params"?: [..] }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// The correlation id
    pub id: Id,
    /// Name of the method to execute
    pub method: String,
    /// Positional parameters, an absent field is the same as `[]`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Value>,
}

impl RpcRequest {
    pub fn new(id: impl Into<Id>, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self { id: id.into(), method: method.into(), params }
    }

    /// Reads a request out of an arbitrary message payload.
    ///
    /// Returns `None` unless the payload is an object with a string `id`, a string `method` and
    /// `params` that is either missing or an array. A present but non-array `params`, including
    /// `null`, is rejected.
    pub fn from_message(data: &Value) -> Option<Self> {
        let obj = data.as_object()?;
        let id = obj.get("id")?.as_str()?;
        let method = obj.get("method")?.as_str()?;
        let params = match obj.get("params") {
            None => Vec::new(),
            Some(Value::Array(params)) => params.clone(),
            Some(_) => return None,
        };
        Some(Self::new(id, method, params))
    }

    /// Returns the `{ "method": <name>, "params": [..] }` object handler requests are
    /// deserialized from.
    pub fn to_call(&self) -> Value {
        let mut call = Map::with_capacity(2);
        call.insert("method".to_string(), Value::String(self.method.clone()));
        call.insert("params".to_string(), Value::Array(self.params.clone()));
        Value::Object(call)
    }
}
