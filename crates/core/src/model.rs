//! Registry entities.
//!
//! Entities are immutable once created and are only constructed by the
//! [`Registry`](crate::Registry). Observations refer to their patient and type by
//! key; the registry never deletes anything, so those keys always resolve.

use prs_types::{CategoryLabel, RecordText};
use serde::Serialize;
use std::fmt;

/// The two kinds of observation type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationKind {
    Measurement,
    Category,
}

impl fmt::Display for ObservationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationKind::Measurement => f.write_str("measurement"),
            ObservationKind::Category => f.write_str("category"),
        }
    }
}

/// A numeric observation type with a unit, e.g. blood pressure in psi.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeasurementType {
    code: RecordText,
    name: RecordText,
    unit: RecordText,
}

impl MeasurementType {
    pub(crate) fn new(code: RecordText, name: RecordText, unit: RecordText) -> Self {
        Self { code, name, unit }
    }

    pub fn code(&self) -> &RecordText {
        &self.code
    }

    pub fn name(&self) -> &RecordText {
        &self.name
    }

    pub fn unit(&self) -> &RecordText {
        &self.unit
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.code, self.name, self.unit)
    }
}

/// An enumerated observation type with an ordered set of allowed labels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryType {
    code: RecordText,
    name: RecordText,
    categories: Vec<CategoryLabel>,
}

impl CategoryType {
    pub(crate) fn new(code: RecordText, name: RecordText, categories: Vec<CategoryLabel>) -> Self {
        Self {
            code,
            name,
            categories,
        }
    }

    pub fn code(&self) -> &RecordText {
        &self.code
    }

    pub fn name(&self) -> &RecordText {
        &self.name
    }

    /// Allowed labels in the order they were defined.
    pub fn categories(&self) -> &[CategoryLabel] {
        &self.categories
    }

    /// Looks up an allowed label, ignoring surrounding whitespace in `label`.
    pub fn category(&self, label: &str) -> Option<&CategoryLabel> {
        let label = label.trim();
        self.categories.iter().find(|c| c.as_str() == label)
    }

    fn joined_categories(&self) -> String {
        self.categories
            .iter()
            .map(CategoryLabel::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.code,
            self.name,
            self.joined_categories()
        )
    }
}

/// Either kind of observation type, borrowed from the registry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObservationType<'a> {
    Measurement(&'a MeasurementType),
    Category(&'a CategoryType),
}

impl ObservationType<'_> {
    pub fn kind(&self) -> ObservationKind {
        match self {
            ObservationType::Measurement(_) => ObservationKind::Measurement,
            ObservationType::Category(_) => ObservationKind::Category,
        }
    }

    pub fn code(&self) -> &RecordText {
        match self {
            ObservationType::Measurement(t) => t.code(),
            ObservationType::Category(t) => t.code(),
        }
    }

    pub fn name(&self) -> &RecordText {
        match self {
            ObservationType::Measurement(t) => t.name(),
            ObservationType::Category(t) => t.name(),
        }
    }
}

/// Multi-line detail view used by the "display an observation type" actions.
impl fmt::Display for ObservationType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationType::Measurement(t) => {
                writeln!(f, "Measurement Observation Type:")?;
                writeln!(f, "Code: {}", t.code)?;
                writeln!(f, "Name: {}", t.name)?;
                write!(f, "Unit: {}", t.unit)
            }
            ObservationType::Category(t) => {
                writeln!(f, "Category Observation Type:")?;
                writeln!(f, "Code: {}", t.code)?;
                writeln!(f, "Name: {}", t.name)?;
                write!(f, "Categories: {}", t.joined_categories())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Patient {
    id: RecordText,
    name: RecordText,
}

impl Patient {
    pub(crate) fn new(id: RecordText, name: RecordText) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> &RecordText {
        &self.id
    }

    pub fn name(&self) -> &RecordText {
        &self.name
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeasurementObservation {
    patient_id: RecordText,
    type_code: RecordText,
    value: f64,
}

impl MeasurementObservation {
    pub(crate) fn new(patient_id: RecordText, type_code: RecordText, value: f64) -> Self {
        Self {
            patient_id,
            type_code,
            value,
        }
    }

    pub fn patient_id(&self) -> &RecordText {
        &self.patient_id
    }

    pub fn type_code(&self) -> &RecordText {
        &self.type_code
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryObservation {
    patient_id: RecordText,
    type_code: RecordText,
    category: CategoryLabel,
}

impl CategoryObservation {
    pub(crate) fn new(patient_id: RecordText, type_code: RecordText, category: CategoryLabel) -> Self {
        Self {
            patient_id,
            type_code,
            category,
        }
    }

    pub fn patient_id(&self) -> &RecordText {
        &self.patient_id
    }

    pub fn type_code(&self) -> &RecordText {
        &self.type_code
    }

    pub fn category(&self) -> &CategoryLabel {
        &self.category
    }
}

/// A patient together with all of their observations, each paired with its type.
#[derive(Clone, Debug, PartialEq)]
pub struct PatientRecord<'a> {
    pub patient: &'a Patient,
    pub measurements: Vec<(&'a MeasurementType, &'a MeasurementObservation)>,
    pub categories: Vec<(&'a CategoryType, &'a CategoryObservation)>,
}

impl fmt::Display for PatientRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Patient Record:")?;
        writeln!(f, "ID: {}", self.patient.id)?;
        writeln!(f, "Name: {}", self.patient.name)?;
        writeln!(f, "Measurement Observations:")?;
        for (kind, obs) in &self.measurements {
            writeln!(f, "Type: {}, Value: {}", kind.name, obs.value)?;
        }
        write!(f, "Category Observations:")?;
        for (kind, obs) in &self.categories {
            write!(f, "\nType: {}, Category: {}", kind.name, obs.category)?;
        }
        Ok(())
    }
}
