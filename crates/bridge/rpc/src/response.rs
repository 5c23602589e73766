use crate::{error::RpcError, request::Id};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::Error as _,
    ser::SerializeStruct,
};

/// Response to a _single_ widget call
///
/// Serialized as `{ "id", "success": true, "data" }` or `{ "id", "success": false, "error" }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RpcResponse {
    pub id: Id,
    pub result: ResponseResult,
}

impl RpcResponse {
    pub fn new(id: Id, content: impl Into<ResponseResult>) -> Self {
        Self { id, result: content.into() }
    }

    /// Returns true if the call succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self.result, ResponseResult::Success(_))
    }
}

impl Serialize for RpcResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("RpcResponse", 3)?;
        s.serialize_field("id", &self.id)?;
        match &self.result {
            ResponseResult::Success(data) => {
                s.serialize_field("success", &true)?;
                s.serialize_field("data", data)?;
            }
            ResponseResult::Error(error) => {
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
            }
        }
        s.end()
    }
}

impl<'de> Deserialize<'de> for RpcResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Envelope {
            id: Id,
            success: bool,
            #[serde(default)]
            data: serde_json::Value,
            error: Option<RpcError>,
        }

        let Envelope { id, success, data, error } = Envelope::deserialize(deserializer)?;
        let result = match (success, error) {
            (true, None) => ResponseResult::Success(data),
            (false, Some(error)) => ResponseResult::Error(error),
            (true, Some(_)) => return Err(D::Error::custom("successful response carries an error")),
            (false, None) => return Err(D::Error::missing_field("error")),
        };
        Ok(Self { id, result })
    }
}

/// Represents the result of a call either success or error
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseResult {
    Success(serde_json::Value),
    Error(RpcError),
}

impl ResponseResult {
    pub fn error(error: RpcError) -> Self {
        Self::Error(error)
    }

    /// Returns the success value, if any.
    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Success(data) => Some(data),
            Self::Error(_) => None,
        }
    }

    /// Returns the error, if any.
    pub fn as_error(&self) -> Option<&RpcError> {
        match self {
            Self::Success(_) => None,
            Self::Error(err) => Some(err),
        }
    }
}

impl From<RpcError> for ResponseResult {
    fn from(err: RpcError) -> Self {
        Self::error(err)
    }
}
