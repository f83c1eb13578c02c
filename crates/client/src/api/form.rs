//! Multipart form field encoding.
//!
//! Every API parameter travels as a multipart text part with no
//! filename. Values are stringified on encode: booleans become the
//! literal `"true"`/`"false"`, absent values become the empty string,
//! everything else keeps its text/decimal form. Encoding never fails.

use reqwest::multipart::Form;

/// A typed parameter value prior to wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Text, passed through unchanged.
    Text(String),
    /// Integer, rendered in decimal.
    Int(i64),
    /// Boolean, rendered as `"true"` / `"false"`.
    Bool(bool),
    /// Absent value, rendered as the empty string.
    Absent,
}

impl FormValue {
    /// Wire representation of this value.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Int(value) => value.to_string(),
            Self::Bool(true) => "true".to_string(),
            Self::Bool(false) => "false".to_string(),
            Self::Absent => String::new(),
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for FormValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<FormValue>> From<Option<T>> for FormValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// An ordered set of named form parameters.
#[derive(Debug, Clone, Default)]
pub struct FormParams {
    fields: Vec<(String, FormValue)>,
}

impl FormParams {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, builder style.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Replace an existing field or append it. Used for the token merge
    /// and for cursor advancement between pages.
    pub fn set(&mut self, name: &str, value: impl Into<FormValue>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    /// Rendered `(name, value)` pairs in insertion order.
    pub fn rendered(&self) -> impl Iterator<Item = (&str, String)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value.render()))
    }

    /// Look up a field's rendered value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.render())
    }

    /// Build a fresh multipart form. Called once per transport attempt
    /// since multipart bodies cannot be reused.
    #[must_use]
    pub fn to_multipart(&self) -> Form {
        let mut form = Form::new();
        for (name, value) in self.rendered() {
            form = form.text(name.to_string(), value);
        }
        form
    }
}
