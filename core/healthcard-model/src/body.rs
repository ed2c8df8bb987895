//! Request bodies built from a submitted form.

use crate::form::{FieldValue, FormValues};
use crate::schema::{BodyEncoding, EmptyValue, FieldDefault, FieldKind, FormField, ModuleSchema};
use healthcard_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What a save sends to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/json`
    Json(Map<String, Value>),
    /// `multipart/form-data`
    Multipart(MultipartBody),
    /// No body at all (e.g. a POST-based delete).
    Empty,
}

impl RequestBody {
    pub fn as_json(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Json(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&MultipartBody> {
        match self {
            Self::Multipart(body) => Some(body),
            _ => None,
        }
    }

    /// Adds the record id as an `id` key. An empty body becomes `{"id": ..}`.
    pub fn with_record_id(self, id: RecordId) -> Self {
        match self {
            Self::Json(mut map) => {
                map.insert("id".to_string(), Value::from(id.get()));
                Self::Json(map)
            }
            Self::Multipart(mut body) => {
                body.fields.push(("id".to_string(), id.to_string()));
                Self::Multipart(body)
            }
            Self::Empty => {
                let mut map = Map::new();
                map.insert("id".to_string(), Value::from(id.get()));
                Self::Json(map)
            }
        }
    }
}

/// Text parts plus file parts of a multipart form.
///
/// Text parts keep insertion order and may repeat a name, as checkbox groups do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, Attachment)>,
}

impl MultipartBody {
    /// All values sent under `name`, in order.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// The first value sent under `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A file picked in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Wraps file contents, guessing the content type from the extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = match extension(&file_name).as_deref() {
            Some("pdf") => "application/pdf",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("png") => "image/png",
            _ => "application/octet-stream",
        }
        .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the file name ends in one of `allowed` (case-insensitive).
    pub fn has_extension_in(&self, allowed: &[&str]) -> bool {
        extension(&self.file_name).is_some_and(|ext| allowed.contains(&ext.as_str()))
    }
}

fn extension(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

impl ModuleSchema {
    /// Serializes a form into the body this module sends on create/update.
    ///
    /// Keys are the form field names. Empty text follows the field's
    /// [`EmptyValue`] rule.
    pub fn body_from_form(&self, form: &FormValues) -> RequestBody {
        match self.encoding {
            BodyEncoding::Json => RequestBody::Json(self.json_body(form)),
            BodyEncoding::Multipart => RequestBody::Multipart(self.multipart_body(form)),
        }
    }

    fn json_body(&self, form: &FormValues) -> Map<String, Value> {
        let mut map = Map::new();
        for field in self.fields {
            map.insert(field.name.to_string(), json_value(field, form.get(field.name)));
        }
        map
    }

    fn multipart_body(&self, form: &FormValues) -> MultipartBody {
        let mut body = MultipartBody::default();
        for field in self.fields {
            match form.get(field.name) {
                Some(FieldValue::List(items)) => {
                    for item in items {
                        body.fields.push((field.name.to_string(), item.clone()));
                    }
                }
                Some(FieldValue::Flag(b)) => {
                    body.fields.push((field.name.to_string(), b.to_string()));
                }
                Some(FieldValue::Text(s)) => {
                    body.fields
                        .push((field.name.to_string(), multipart_text(field, s)));
                }
                None if !matches!(field.kind, FieldKind::Multi(_)) => {
                    body.fields
                        .push((field.name.to_string(), multipart_text(field, "")));
                }
                None => {}
            }
        }
        if let Some(policy) = self.attachments {
            for file in form.attachments() {
                body.files.push((policy.field.to_string(), file.clone()));
            }
        }
        body
    }
}

fn json_value(field: &FormField, value: Option<&FieldValue>) -> Value {
    match value {
        Some(FieldValue::Flag(b)) => Value::Bool(*b),
        Some(FieldValue::List(items)) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        Some(FieldValue::Text(s)) if !s.is_empty() => Value::String(s.clone()),
        _ => match field.kind {
            FieldKind::Flag => match field.default {
                FieldDefault::Flag(b) => Value::Bool(b),
                _ => Value::Bool(false),
            },
            FieldKind::Multi(_) => Value::Array(Vec::new()),
            _ => match field.empty {
                EmptyValue::Blank => Value::String(String::new()),
                EmptyValue::Null => Value::Null,
                EmptyValue::Fallback(s) => Value::String(s.to_string()),
            },
        },
    }
}

fn multipart_text(field: &FormField, value: &str) -> String {
    if !value.is_empty() {
        return value.to_string();
    }
    match field.empty {
        EmptyValue::Fallback(s) => s.to_string(),
        EmptyValue::Blank | EmptyValue::Null => String::new(),
    }
}
