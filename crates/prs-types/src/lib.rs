//! Validated text types for the patient record system.
//!
//! Every piece of operator-supplied text ends up as a field of a `;`-separated
//! record on disk. The types here guarantee at construction time that a value
//! can be written and read back without changing the record layout.

/// Separates the fields of one persisted record.
pub const FIELD_SEPARATOR: char = ';';

/// Separates the labels of a category list inside a single field.
pub const LIST_SEPARATOR: char = ',';

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
    /// The input text contained a line break or a separator character
    #[error("text cannot contain {0:?}")]
    ReservedCharacter(char),
}

fn validate(input: &str, reserved: &[char]) -> Result<String, TextError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TextError::Empty);
    }
    if let Some(c) = trimmed
        .chars()
        .find(|c| matches!(c, '\n' | '\r') || reserved.contains(c))
    {
        return Err(TextError::ReservedCharacter(c));
    }
    Ok(trimmed.to_owned())
}

/// A single field of a persisted record: codes, ids, names and units.
///
/// The input is trimmed of leading and trailing whitespace. The trimmed value must
/// be non-empty and must not contain a line break or [`FIELD_SEPARATOR`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordText(String);

impl RecordText {
    /// Creates a new `RecordText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the trimmed input is empty, or
    /// [`TextError::ReservedCharacter`] if it contains a line break or `;`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        validate(input.as_ref(), &[FIELD_SEPARATOR]).map(Self)
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One allowed value of a category observation type.
///
/// Same rules as [`RecordText`], and additionally must not contain
/// [`LIST_SEPARATOR`] since labels are stored comma-joined in one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryLabel(String);

impl CategoryLabel {
    /// Creates a new `CategoryLabel` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the trimmed input is empty, or
    /// [`TextError::ReservedCharacter`] if it contains a line break, `;` or `,`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        validate(input.as_ref(), &[FIELD_SEPARATOR, LIST_SEPARATOR]).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! text_impls {
    ($ty:ident) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $ty {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl std::str::FromStr for $ty {
            type Err = TextError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $ty::new(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

text_impls!(RecordText);
text_impls!(CategoryLabel);
