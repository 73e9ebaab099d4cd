//! Client-side field validation for catalog drafts.
//!
//! Drafts are checked and normalized (trimmed, blank optionals dropped)
//! before any request is made, so a rejected draft never reaches the backend.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;

use crate::error::{Result, StoreError};
use crate::models::{CategoryDraft, ProductDraft};

pub const CATEGORY_NAME_MIN_CHARS: usize = 2;
pub const CATEGORY_DESCRIPTION_MAX_CHARS: usize = 500;

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn into_result<T>(self, value: T) -> Result<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(StoreError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

fn trimmed_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validate a product draft and return its normalized form.
pub fn validate_product(draft: &ProductDraft) -> Result<ProductDraft> {
    let mut errors = FieldErrors::new();

    let name = draft.name.trim().to_string();
    if name.is_empty() {
        errors.insert("name", "name is required");
    }
    if draft.unit_price <= Decimal::ZERO {
        errors.insert("unit_price", "price must be greater than 0");
    }
    if draft.category_id.is_none() {
        errors.insert("category_id", "category is required");
    }

    errors.into_result(ProductDraft {
        name,
        description: trimmed_optional(draft.description.as_deref()),
        unit_price: draft.unit_price,
        stock: draft.stock,
        barcode: trimmed_optional(draft.barcode.as_deref()),
        category_id: draft.category_id,
        image_url: trimmed_optional(draft.image_url.as_deref()),
    })
}

/// Validate a category draft and return its normalized form.
pub fn validate_category(draft: &CategoryDraft) -> Result<CategoryDraft> {
    let mut errors = FieldErrors::new();

    let name = draft.name.trim().to_string();
    if name.is_empty() {
        errors.insert("name", "name is required");
    } else if name.chars().count() < CATEGORY_NAME_MIN_CHARS {
        errors.insert(
            "name",
            format!("name must be at least {CATEGORY_NAME_MIN_CHARS} characters"),
        );
    }

    if let Some(description) = &draft.description {
        if description.chars().count() > CATEGORY_DESCRIPTION_MAX_CHARS {
            errors.insert(
                "description",
                format!("description cannot exceed {CATEGORY_DESCRIPTION_MAX_CHARS} characters"),
            );
        }
    }

    errors.into_result(CategoryDraft {
        name,
        description: trimmed_optional(draft.description.as_deref()),
    })
}
