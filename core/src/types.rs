//! Records decoded from the Pokemon API.
//!
//! # Design
//! Only `name` and `height` are required. The remaining fields are optional
//! so that minimal payloads (and older servers) still decode, and any field
//! the type does not know about is ignored. New fields should be added as
//! `Option` with `#[serde(default)]` to keep that property.

use serde::{Deserialize, Serialize};

/// A single Pokemon as returned by `GET /api/v2/pokemon/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pokemon {
    pub name: String,
    pub height: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_experience: Option<i64>,
}
