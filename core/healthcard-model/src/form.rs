//! Modal form state and constraint validation.

use crate::body::Attachment;
use crate::schema::{FieldDefault, FieldKind, ModuleSchema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The value held by one form control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether the control counts as unfilled for `required` purposes.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Flag(_) => false,
            Self::List(items) => items.is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Values of every control of a modal form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    values: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
}

impl FormValues {
    /// An empty form with no controls set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The form as the add modal shows it: every field cleared, defaults applied.
    pub fn blank(schema: &ModuleSchema) -> Self {
        let mut form = Self::new();
        for field in schema.fields {
            let value = match (field.kind, field.default) {
                (FieldKind::Flag, FieldDefault::Flag(b)) => FieldValue::Flag(b),
                (FieldKind::Flag, _) => FieldValue::Flag(false),
                (FieldKind::Multi(_), _) => FieldValue::List(Vec::new()),
                (_, FieldDefault::Text(s)) => FieldValue::Text(s.to_string()),
                _ => FieldValue::Text(String::new()),
            };
            form.values.insert(field.name.to_string(), value);
        }
        form
    }

    /// Sets a control's value, returning `self` for chaining.
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Sets a text control from an optional value, clearing it on `None`.
    pub fn set_text(&mut self, name: &str, value: Option<&str>) {
        self.set(name, value.unwrap_or_default());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Text content of a control, empty when unset or not text.
    pub fn text(&self, name: &str) -> &str {
        self.values
            .get(name)
            .and_then(FieldValue::as_text)
            .unwrap_or("")
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(FieldValue::as_flag)
    }

    pub fn list(&self, name: &str) -> &[String] {
        self.values
            .get(name)
            .and_then(FieldValue::as_list)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Runs the module's constraint validation, collecting every violation.
    pub fn validate(&self, schema: &ModuleSchema) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        for field in schema.fields {
            let value = self.values.get(field.name);
            let blank = value.is_none_or(FieldValue::is_blank);

            if blank {
                if field.required {
                    errors.push(FieldError::new(field.name, FieldErrorKind::Missing));
                }
                continue;
            }

            let Some(FieldValue::Text(text)) = value else {
                continue;
            };
            let text = text.trim();

            if let FieldKind::Choice(options) = field.kind {
                if !options.iter().any(|o| o.eq_ignore_ascii_case(text)) {
                    errors.push(FieldError::new(
                        field.name,
                        FieldErrorKind::NotAnOption(text.to_string()),
                    ));
                }
            }

            if let Some(pattern) = field.pattern {
                if !pattern.matches(text) {
                    errors.push(FieldError::new(
                        field.name,
                        FieldErrorKind::Pattern(pattern.describe()),
                    ));
                }
            }
        }

        if let Some(group) = schema.any_of {
            let filled = group
                .fields
                .iter()
                .any(|name| self.values.get(*name).is_some_and(|v| !v.is_blank()));
            if !filled {
                errors.push(FieldError::new(
                    schema.name,
                    FieldErrorKind::NoneFilled(group.message),
                ));
            }
        }

        if let Some(policy) = schema.attachments {
            if self.attachments.len() > policy.max_files {
                errors.push(FieldError::new(
                    policy.field,
                    FieldErrorKind::TooManyFiles(policy.max_files),
                ));
            }
            for file in &self.attachments {
                if !file.has_extension_in(policy.extensions) {
                    errors.push(FieldError::new(
                        policy.field,
                        FieldErrorKind::FileType(file.file_name.clone()),
                    ));
                }
                if file.len() as u64 > policy.max_bytes {
                    errors.push(FieldError::new(
                        policy.field,
                        FieldErrorKind::FileTooLarge(file.file_name.clone()),
                    ));
                }
            }
        } else if !self.attachments.is_empty() {
            errors.push(FieldError::new(
                "attachments",
                FieldErrorKind::AttachmentsNotAccepted,
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// A constraint violation on one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: &str, kind: FieldErrorKind) -> Self {
        Self {
            field: field.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    Missing,
    NotAnOption(String),
    Pattern(String),
    TooManyFiles(usize),
    FileType(String),
    FileTooLarge(String),
    AttachmentsNotAccepted,
    /// None of a required group was filled; carries the alert text.
    NoneFilled(&'static str),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Missing => write!(f, "{} is required", self.field),
            FieldErrorKind::NotAnOption(v) => {
                write!(f, "{}: `{v}` is not one of the allowed options", self.field)
            }
            FieldErrorKind::Pattern(rule) => write!(f, "{} {rule}", self.field),
            FieldErrorKind::TooManyFiles(max) => {
                write!(f, "{}: at most {max} files can be attached", self.field)
            }
            FieldErrorKind::FileType(name) => {
                write!(f, "{}: {name} has an unsupported file type", self.field)
            }
            FieldErrorKind::FileTooLarge(name) => {
                write!(f, "{}: {name} exceeds the size limit", self.field)
            }
            FieldErrorKind::AttachmentsNotAccepted => {
                write!(f, "this form does not accept attachments")
            }
            FieldErrorKind::NoneFilled(message) => f.write_str(message),
        }
    }
}
