//! AnkiConnect automation client.
//!
//! Speaks the AnkiConnect JSON action protocol: a single POST per call
//! with a `{action, version, params?}` body, answered by `{result, error}`
//! where exactly one of the two carries information. The relay only ever
//! issues the `version`, `importPackage` and `exportPackage` actions.

mod client;
mod envelope;

pub use client::{Client, DEFAULT_ENDPOINT, Error};
pub use envelope::{
    Action, ActionRequest, ActionResponse, ExportParams, ImportParams, PROTOCOL_VERSION,
};
