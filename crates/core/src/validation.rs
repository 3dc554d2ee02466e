//! Field-level validation errors surfaced to forms.
//!
//! A failed validation is a normal outcome: the form is re-rendered with the
//! messages attached to the offending fields. [`FieldErrors`] is the shape
//! every layer uses to carry them.

use std::collections::BTreeMap;

use serde::Serialize;

/// Messages keyed by field name, in stable field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a message to `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Attach the error of a `Result<(), String>` check, if any.
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if `field` carries at least one message.
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages for `field`.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Merge derive-based validation results (`validator` crate).
    pub fn merge_validator(&mut self, errors: &validator::ValidationErrors) {
        for (field, list) in errors.field_errors() {
            for error in list.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid ({})", error.code));
                self.add(&field.to_string(), message);
            }
        }
    }

    /// One-line summary used in logs and error envelopes.
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .map(|(field, msgs)| format!("{field}: {}", msgs.join("; ")))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_query() {
        let mut errors = FieldErrors::new();
        assert!(errors.is_empty());
        errors.add("title", "Title is required");
        errors.add("title", "Title is too long");
        errors.add("path", "Path is taken");

        assert_eq!(errors.len(), 2);
        assert!(errors.has("title"));
        assert_eq!(errors.messages("title").len(), 2);
        assert!(errors.messages("parent_id").is_empty());
    }

    #[test]
    fn check_only_records_failures() {
        let mut errors = FieldErrors::new();
        errors.check("title", Ok(()));
        errors.check("path", Err("bad".to_string()));
        assert!(!errors.has("title"));
        assert_eq!(errors.messages("path"), ["bad".to_string()]);
    }

    #[test]
    fn summary_is_field_ordered() {
        let mut errors = FieldErrors::new();
        errors.add("title", "required");
        errors.add("path", "taken");
        assert_eq!(errors.summary(), "path: taken, title: required");
    }

    #[test]
    fn serializes_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("title", "required");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"title": ["required"]}));
    }
}
