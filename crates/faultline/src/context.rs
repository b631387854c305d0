//! Structured failure context and `{token}` message rendering.
//!
//! A [`Context`] is an immutable record of named fields describing one
//! occurrence of a signal. Rendering replaces every `{field}` in a template
//! with the field's string form, then resolves `{cause}` through the
//! [`ContextLedger`]. A template that still has an unresolved token after all
//! passes does not render at all; callers fall back to the bare signal code.
//!
//! Each context carries a [`ContextId`]; clones share it, fresh contexts get
//! a new one. The ledger keys on this id, never on field values.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{FaultlineError, FaultlineResult};
use crate::ledger::ContextLedger;

/// Token resolved from the ledger rather than from fields.
pub const CAUSE_TOKEN: &str = "{cause}";

// ── Identity ────────────────────────────────────────────────────────────

/// Identity handle for a context instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(pub Uuid);

impl ContextId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context:{}", self.0)
    }
}

// ── Context ─────────────────────────────────────────────────────────────

/// Immutable structured payload attached to a failure.
#[derive(Clone, Debug, Serialize)]
pub struct Context {
    id: ContextId,
    fields: Vec<(String, Value)>,
    template: Option<String>,
    more: Option<Box<Context>>,
}

impl Context {
    /// A context with no fields and no template.
    pub fn empty() -> Self {
        Self {
            id: ContextId::new(),
            fields: Vec::new(),
            template: None,
            more: None,
        }
    }

    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Build a context from any record that serializes to an object.
    ///
    /// Each top-level key becomes a field.
    pub fn from_record<R: Serialize + ?Sized>(record: &R) -> FaultlineResult<Self> {
        match serde_json::to_value(record)? {
            Value::Object(map) => Ok(Self {
                fields: map.into_iter().collect(),
                ..Self::empty()
            }),
            other => Err(FaultlineError::InvalidRecord(json_type(&other).to_string())),
        }
    }

    /// Build a context from a [`ContextRecord`], keeping its template.
    pub fn record<R: ContextRecord + ?Sized>(record: &R) -> FaultlineResult<Self> {
        let mut context = Self::from_record(record)?;
        context.template = record.template().map(str::to_string);
        Ok(context)
    }

    /// Same context with a template override.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Same context with another context layered underneath.
    pub fn with_more(mut self, more: Context) -> Self {
        self.more = Some(Box::new(more));
        self
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn more(&self) -> Option<&Context> {
        self.more.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.more.is_none()
    }

    /// This context followed by each `more` layer.
    pub fn layers(&self) -> impl Iterator<Item = &Context> {
        std::iter::successors(Some(self), |c| c.more())
    }

    /// Render this context's own template.
    ///
    /// `None` when there is no template or a token stays unresolved.
    pub fn message(&self) -> Option<String> {
        self.render_with(None)
    }

    /// Render the template override, else `fallback`, against the global ledger.
    pub fn render_with(&self, fallback: Option<&str>) -> Option<String> {
        self.render_using(fallback, ContextLedger::global())
    }

    /// [`Context::render_with`] against a specific ledger.
    pub fn render_using(&self, fallback: Option<&str>, ledger: &ContextLedger) -> Option<String> {
        let template = self.template().or(fallback)?;
        self.render_in(template, ledger)
    }

    /// Render `template` using this context's fields and `ledger` for `{cause}`.
    pub fn render_in(&self, template: &str, ledger: &ContextLedger) -> Option<String> {
        if !has_token(template) {
            return Some(template.to_string());
        }

        let mut text = template.to_string();
        for layer in self.layers() {
            for (name, value) in &layer.fields {
                let token = format!("{{{}}}", name);
                if text.contains(&token) {
                    text = text.replace(&token, &render_value(value));
                }
            }
        }

        if text.contains(CAUSE_TOKEN) {
            if let Some(cause) = self.layers().find_map(|c| ledger.cause_for(c.id())) {
                text = text.replace(CAUSE_TOKEN, &cause.to_string());
            }
        }

        if has_token(&text) {
            None
        } else {
            Some(text)
        }
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields && self.template == other.template && self.more == other.more
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", name, render_value(value))?;
        }
        f.write_str("}")?;
        if let Some(more) = self.more() {
            write!(f, " + {}", more)?;
        }
        Ok(())
    }
}

// ── Records ─────────────────────────────────────────────────────────────

/// A typed record usable as context.
///
/// Implementors serialize to an object whose keys are the field names; they
/// may also supply a template of their own.
pub trait ContextRecord: Serialize {
    fn template(&self) -> Option<&str> {
        None
    }

    fn to_context(&self) -> FaultlineResult<Context> {
        Context::record(self)
    }
}

// ── Builder ─────────────────────────────────────────────────────────────

/// Builder for ad-hoc contexts.
#[derive(Debug, Default)]
pub struct ContextBuilder {
    fields: Vec<(String, Value)>,
    template: Option<String>,
    more: Option<Context>,
}

impl ContextBuilder {
    /// Set a field. Values that cannot be represented as JSON become `null`.
    pub fn field<V: Serialize>(mut self, name: impl Into<String>, value: V) -> Self {
        let name = name.into();
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn more(mut self, more: Context) -> Self {
        self.more = Some(more);
        self
    }

    pub fn build(self) -> Context {
        Context {
            id: ContextId::new(),
            fields: self.fields,
            template: self.template,
            more: self.more.map(Box::new),
        }
    }
}

// ── Rendering helpers ───────────────────────────────────────────────────

/// String form of a field value.
///
/// Strings are inserted raw, scalars in their natural form, `null` as
/// `null`, sequences as `[a, b]`, and objects as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(_) => value.to_string(),
    }
}

/// Does `text` contain a `{identifier}` token?
pub fn has_token(text: &str) -> bool {
    let bytes = text.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'{' {
            continue;
        }
        let start = i + 1;
        let mut end = start;
        while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
            end += 1;
        }
        if end > start && end < bytes.len() && bytes[end] == b'}' {
            return true;
        }
    }
    false
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
