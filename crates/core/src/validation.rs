//! Input validation utilities.
//!
//! Converts raw operator input into the validated text types before anything
//! touches the registry, so a rejected call never leaves partial state behind.

use crate::{RegistryError, RegistryResult};
use prs_types::{CategoryLabel, RecordText};

/// Validates a single record field, naming the field in the error.
///
/// # Errors
///
/// Returns `RegistryError::InvalidInput` if the value is blank or contains a
/// line break or `;`.
pub fn record_field(field: &str, value: &str) -> RegistryResult<RecordText> {
    RecordText::new(value).map_err(|e| RegistryError::invalid_field(field, e))
}

/// Validates the allowed labels of a category observation type.
///
/// The labels keep the order they were given in. The list must be non-empty and
/// a label may only appear once.
///
/// # Errors
///
/// Returns `RegistryError::InvalidInput` if:
/// - no labels are given,
/// - a label is blank or contains a line break, `;` or `,`,
/// - a label is repeated.
pub fn category_labels<I, S>(categories: I) -> RegistryResult<Vec<CategoryLabel>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut labels: Vec<CategoryLabel> = Vec::new();
    for raw in categories {
        let label = CategoryLabel::new(raw.as_ref())
            .map_err(|e| RegistryError::invalid_field("category", e))?;
        if labels.contains(&label) {
            return Err(RegistryError::InvalidInput(format!(
                "category '{label}' is listed more than once"
            )));
        }
        labels.push(label);
    }

    if labels.is_empty() {
        return Err(RegistryError::InvalidInput(
            "a category observation type needs at least one category".into(),
        ));
    }

    Ok(labels)
}
