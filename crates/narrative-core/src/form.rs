//! Post entry form and its validation rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Post;

/// Longest title the store accepts, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

const REQUIRED: &str = "This field is required.";

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All validation messages produced for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages attached to `field`, in insertion order.
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Raw title/text as submitted or as pre-filled from a stored post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

/// Cleaned values of a form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPost {
    pub title: String,
    pub text: String,
}

impl PostForm {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// Pre-fill from an existing post for the edit page.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
        }
    }

    /// Trim both fields and check them; surrounding whitespace does not count as content.
    pub fn validate(&self) -> Result<ValidPost, FieldErrors> {
        let title = self.title.trim();
        let text = self.text.trim();
        let mut errors = FieldErrors::new();

        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else {
            let len = title.chars().count();
            if len > TITLE_MAX_CHARS {
                errors.add(
                    "title",
                    format!(
                        "Ensure this value has at most {TITLE_MAX_CHARS} characters (it has {len})."
                    ),
                );
            }
        }

        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        if errors.is_empty() {
            Ok(ValidPost {
                title: title.to_string(),
                text: text.to_string(),
            })
        } else {
            Err(errors)
        }
    }
}
