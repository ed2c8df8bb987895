use crate::suggestions::SuggestionCatalog;
use healthcard_types::RecordId;

/// Describes one record module: where it lives on the server, what its
/// modal form contains and how that form is encoded when saved.
#[derive(Debug, Clone, Copy)]
pub struct ModuleSchema {
    /// Stable module name (e.g. `"allergy"`), used in logs and markup.
    pub name: &'static str,
    /// Lower-case noun used in user-facing messages.
    pub noun: &'static str,
    /// Capitalised noun used in modal titles.
    pub title: &'static str,
    /// Envelope key holding the collection on list responses.
    pub collection_key: &'static str,
    /// Envelope key holding server-computed stats, if the module has any.
    pub stats_key: Option<&'static str>,
    pub endpoints: Endpoints,
    pub encoding: BodyEncoding,
    pub fields: &'static [FormField],
    pub suggestions: Option<&'static SuggestionCatalog>,
    pub attachments: Option<AttachmentPolicy>,
    /// Fields of which at least one must be filled.
    pub any_of: Option<AnyOf>,
    pub messages: Messages,
}

impl ModuleSchema {
    /// Looks up a form field by name.
    pub fn field(&self, name: &str) -> Option<&'static FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether the module only supports listing.
    pub fn is_read_only(&self) -> bool {
        self.endpoints.create.is_none()
            && self.endpoints.update.is_none()
            && self.endpoints.delete.is_none()
    }

    pub fn add_title(&self) -> String {
        format!("Add {}", self.title)
    }

    pub fn edit_title(&self) -> String {
        format!("Edit {}", self.title)
    }

    pub fn view_title(&self) -> String {
        format!("View {}", self.title)
    }

    /// Confirmation text shown before a delete.
    pub fn delete_prompt(&self) -> String {
        match self.messages.confirm_delete {
            Some(text) => text.to_string(),
            None => format!("Are you sure you want to delete this {} record?", self.noun),
        }
    }

    /// Alert text for a save that failed in transport.
    pub fn save_failure_text(&self) -> String {
        format!("Failed to save {}", self.noun)
    }

    /// Alert text for a delete that failed in transport.
    pub fn delete_failure_text(&self) -> String {
        format!("Failed to delete {}", self.noun)
    }

    /// Alert text for a load that failed in transport.
    pub fn load_failure_text(&self) -> String {
        format!("Failed to load {} records", self.noun)
    }
}

/// The routes a module exposes. Read-only modules leave the mutations unset.
#[derive(Debug, Clone, Copy)]
pub struct Endpoints {
    pub list: &'static str,
    pub create: Option<Route>,
    pub update: Option<Route>,
    pub delete: Option<Route>,
}

impl Endpoints {
    /// Conventional REST routes: GET/POST on `base`, PUT/DELETE on `base/{id}`.
    pub const fn rest(base: &'static str, item: &'static str) -> Self {
        Self {
            list: base,
            create: Some(Route::new(HttpMethod::Post, base)),
            update: Some(Route::new(HttpMethod::Put, item)),
            delete: Some(Route::new(HttpMethod::Delete, item)),
        }
    }

    /// A list endpoint with no mutations.
    pub const fn read_only(list: &'static str) -> Self {
        Self {
            list,
            create: None,
            update: None,
            delete: None,
        }
    }
}

/// A method plus a path template. `{id}` is replaced with the record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub method: HttpMethod,
    pub path: &'static str,
    /// The record id travels as an `id` key of the body instead of the path.
    pub id_in_body: bool,
}

impl Route {
    pub const fn new(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            path,
            id_in_body: false,
        }
    }

    /// A route on a fixed path that identifies the record by a body key.
    pub const fn keyed_by_body(method: HttpMethod, path: &'static str) -> Self {
        Self {
            id_in_body: true,
            ..Self::new(method, path)
        }
    }

    /// Expands the path template for `id`.
    pub fn path_for(&self, id: Option<RecordId>) -> String {
        match id {
            Some(id) => self.path.replace("{id}", &id.to_string()),
            None => self.path.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// How a saved form travels to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Json,
    Multipart,
}

/// Limits on files attached to a multipart form.
#[derive(Debug, Clone, Copy)]
pub struct AttachmentPolicy {
    /// Multipart part name the files are sent under.
    pub field: &'static str,
    pub max_files: usize,
    pub max_bytes: u64,
    /// Allowed extensions, lower-case, without the dot.
    pub extensions: &'static [&'static str],
}

/// Texts a module shows in place of the generic ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Messages {
    /// Alerted after a successful create.
    pub created: Option<&'static str>,
    /// Alerted after a successful update.
    pub updated: Option<&'static str>,
    /// Asked before a delete.
    pub confirm_delete: Option<&'static str>,
}

impl Messages {
    pub const NONE: Self = Self {
        created: None,
        updated: None,
        confirm_delete: None,
    };
}

/// A group of optional fields of which at least one must be filled.
#[derive(Debug, Clone, Copy)]
pub struct AnyOf {
    pub fields: &'static [&'static str],
    /// Alerted when every field of the group is empty.
    pub message: &'static str,
}

/// One control of a module's modal form.
///
/// The field name doubles as the key in the request body.
#[derive(Debug, Clone, Copy)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub pattern: Option<Pattern>,
    pub empty: EmptyValue,
    pub default: FieldDefault,
}

impl FormField {
    const fn simple(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            pattern: None,
            empty: EmptyValue::Blank,
            default: FieldDefault::None,
        }
    }

    /// Shorthand for a free-text input.
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::simple(name, label, FieldKind::Text)
    }

    /// Shorthand for a date input (`YYYY-MM-DD`).
    pub const fn date(name: &'static str, label: &'static str) -> Self {
        Self::simple(name, label, FieldKind::Date)
    }

    /// Shorthand for a numeric input. The value is still sent as text.
    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self::simple(name, label, FieldKind::Number)
    }

    /// Shorthand for a select or radio group with fixed options.
    pub const fn choice(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self::simple(name, label, FieldKind::Choice(options))
    }

    /// Shorthand for a yes/no select sent as a JSON boolean.
    pub const fn flag(name: &'static str, label: &'static str, default: bool) -> Self {
        Self {
            default: FieldDefault::Flag(default),
            ..Self::simple(name, label, FieldKind::Flag)
        }
    }

    /// Shorthand for a checkbox group.
    pub const fn multi(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self::simple(name, label, FieldKind::Multi(options))
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// Send `null` instead of `""` when left empty.
    pub const fn null_when_empty(self) -> Self {
        Self {
            empty: EmptyValue::Null,
            ..self
        }
    }

    /// Pre-fill with `value` on add and send `value` when left empty.
    pub const fn defaulting_to(self, value: &'static str) -> Self {
        Self {
            empty: EmptyValue::Fallback(value),
            default: FieldDefault::Text(value),
            ..self
        }
    }

    /// Require exactly `len` ASCII digits when non-empty.
    pub const fn digits(self, len: usize) -> Self {
        Self {
            pattern: Some(Pattern::Digits(len)),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Number,
    Choice(&'static [&'static str]),
    Flag,
    Multi(&'static [&'static str]),
}

/// Value-shape constraints checked before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Exactly this many ASCII digits.
    Digits(usize),
}

impl Pattern {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Digits(len) => value.len() == *len && value.bytes().all(|b| b.is_ascii_digit()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Digits(len) => format!("must be exactly {len} digits"),
        }
    }
}

/// What an empty text field turns into in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyValue {
    /// `""`
    Blank,
    /// `null` (JSON only; multipart sends `""`)
    Null,
    /// A fixed replacement value.
    Fallback(&'static str),
}

/// Initial value of a field when the add modal opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    None,
    Text(&'static str),
    Flag(bool),
}
