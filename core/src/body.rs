//! Body field accumulation and encoding.

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::error::Result;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// How body fields are serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyEncoding {
    #[default]
    Form,
    Json,
}

impl BodyEncoding {
    pub fn content_type(&self) -> &'static str {
        match self {
            BodyEncoding::Form => FORM_CONTENT_TYPE,
            BodyEncoding::Json => JSON_CONTENT_TYPE,
        }
    }
}

/// Body fields for one request.
///
/// Keys are unique. A repeated key overwrites the earlier value but keeps
/// the earlier position, so form output follows first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyFieldSet {
    fields: Vec<(String, String)>,
}

impl BodyFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(field) => field.1 = value.to_string(),
            None => self.fields.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn encode(&self, encoding: BodyEncoding) -> Result<Vec<u8>> {
        match encoding {
            BodyEncoding::Form => Ok(self.encode_form().into_bytes()),
            BodyEncoding::Json => self.encode_json(),
        }
    }

    /// `k=v&k2=v2`, both sides form-urlencoded (space becomes `+`).
    pub fn encode_form(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.fields)
            .finish()
    }

    /// A flat object of string values, in insertion order.
    pub fn encode_json(&self) -> Result<Vec<u8>> {
        let object: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Ok(serde_json::to_vec(&object)?)
    }
}
