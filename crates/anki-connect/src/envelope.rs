use serde::{Deserialize, Serialize};

/// AnkiConnect API version sent with every request.
pub const PROTOCOL_VERSION: u8 = 6;

/// Action name identifier.
///
/// The set is closed: the relay issues no other actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "version")]
    Version,
    #[serde(rename = "importPackage")]
    ImportPackage,
    #[serde(rename = "exportPackage")]
    ExportPackage,
}

impl Action {
    /// The wire name of this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Version => "version",
            Action::ImportPackage => "importPackage",
            Action::ExportPackage => "exportPackage",
        }
    }
}

/// Request body for a single AnkiConnect call.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRequest<P: Serialize> {
    pub action: Action,
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<P>,
}

impl<P: Serialize> ActionRequest<P> {
    /// Builds a request carrying [`PROTOCOL_VERSION`].
    pub fn new(action: Action, params: Option<P>) -> Self {
        Self {
            action,
            version: PROTOCOL_VERSION,
            params,
        }
    }
}

/// Response body of an AnkiConnect call.
///
/// The endpoint populates either `result` or `error`, never both.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Params for `importPackage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportParams {
    pub path: String,
}

/// Params for `exportPackage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    pub deck: String,
    pub path: String,
    pub include_sched: bool,
}
