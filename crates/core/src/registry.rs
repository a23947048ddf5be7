//! The in-memory patient observation registry.
//!
//! [`Registry`] owns every entity and enforces all invariants on insertion:
//!
//! - observation type codes are unique within their kind, and across kinds under
//!   [`ObservationPolicy::Strict`]
//! - patient ids are unique
//! - observations reference an existing patient and an existing type of the right kind
//! - a category observation's label is one of its type's allowed labels
//! - under [`ObservationPolicy::Strict`], a patient has at most one observation per type
//!
//! Every add operation validates completely before mutating anything, so a rejected
//! call has no observable effect. Observation checks run in a fixed order (patient,
//! type, category, duplicate) so the reported error is deterministic when several
//! rules are broken at once.
//!
//! Collections are kept in insertion order. Key lookups go through position maps
//! that are updated alongside the vectors.

use crate::config::ObservationPolicy;
use crate::model::{
    CategoryObservation, CategoryType, MeasurementObservation, MeasurementType, ObservationKind,
    ObservationType, Patient, PatientRecord,
};
use crate::validation::{category_labels, record_field};
use crate::{RegistryError, RegistryResult};
use prs_types::RecordText;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Default, Serialize)]
pub struct Registry {
    policy: ObservationPolicy,
    measurement_types: Vec<MeasurementType>,
    category_types: Vec<CategoryType>,
    patients: Vec<Patient>,
    measurement_observations: Vec<MeasurementObservation>,
    category_observations: Vec<CategoryObservation>,
    #[serde(skip)]
    measurement_type_positions: HashMap<String, usize>,
    #[serde(skip)]
    category_type_positions: HashMap<String, usize>,
    #[serde(skip)]
    patient_positions: HashMap<String, usize>,
}

impl Registry {
    /// Creates an empty registry enforcing the given policy.
    pub fn new(policy: ObservationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ObservationPolicy {
        self.policy
    }

    /// True when all five collections are empty.
    pub fn is_empty(&self) -> bool {
        self.measurement_types.is_empty()
            && self.category_types.is_empty()
            && self.patients.is_empty()
            && self.measurement_observations.is_empty()
            && self.category_observations.is_empty()
    }

    /// Adds a measurement observation type.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if:
    /// - any field is blank or contains a line break or `;` ([`RegistryError::InvalidInput`]),
    /// - `code` is already a measurement type code, or under the strict policy any
    ///   type code ([`RegistryError::DuplicateCode`]).
    pub fn add_measurement_type(&mut self, code: &str, name: &str, unit: &str) -> RegistryResult<()> {
        let code = record_field("code", code)?;
        let name = record_field("name", name)?;
        let unit = record_field("unit", unit)?;
        self.ensure_code_available(&code, ObservationKind::Measurement)?;

        tracing::info!(code = %code, "added measurement observation type");
        self.measurement_type_positions
            .insert(code.as_str().to_owned(), self.measurement_types.len());
        self.measurement_types
            .push(MeasurementType::new(code, name, unit));
        Ok(())
    }

    /// Adds a category observation type with its allowed labels, in display order.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if:
    /// - a field or label is invalid, `categories` is empty, or a label repeats
    ///   ([`RegistryError::InvalidInput`]),
    /// - `code` is already a category type code, or under the strict policy any
    ///   type code ([`RegistryError::DuplicateCode`]).
    pub fn add_category_type<I, S>(&mut self, code: &str, name: &str, categories: I) -> RegistryResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let code = record_field("code", code)?;
        let name = record_field("name", name)?;
        let categories = category_labels(categories)?;
        self.ensure_code_available(&code, ObservationKind::Category)?;

        tracing::info!(code = %code, categories = categories.len(), "added category observation type");
        self.category_type_positions
            .insert(code.as_str().to_owned(), self.category_types.len());
        self.category_types
            .push(CategoryType::new(code, name, categories));
        Ok(())
    }

    fn ensure_code_available(&self, code: &RecordText, kind: ObservationKind) -> RegistryResult<()> {
        let (same, other) = match kind {
            ObservationKind::Measurement => {
                (&self.measurement_type_positions, &self.category_type_positions)
            }
            ObservationKind::Category => {
                (&self.category_type_positions, &self.measurement_type_positions)
            }
        };

        let taken = same.contains_key(code.as_str())
            || (self.policy == ObservationPolicy::Strict && other.contains_key(code.as_str()));
        if taken {
            return Err(RegistryError::DuplicateCode(code.to_string()));
        }
        Ok(())
    }

    pub fn measurement_type(&self, code: &str) -> Option<&MeasurementType> {
        self.measurement_type_positions
            .get(code.trim())
            .map(|&i| &self.measurement_types[i])
    }

    pub fn category_type(&self, code: &str) -> Option<&CategoryType> {
        self.category_type_positions
            .get(code.trim())
            .map(|&i| &self.category_types[i])
    }

    /// Finds a type of either kind, checking measurement types first.
    pub fn observation_type(&self, code: &str) -> Option<ObservationType<'_>> {
        self.measurement_type(code)
            .map(ObservationType::Measurement)
            .or_else(|| self.category_type(code).map(ObservationType::Category))
    }

    pub fn measurement_types(&self) -> &[MeasurementType] {
        &self.measurement_types
    }

    pub fn category_types(&self) -> &[CategoryType] {
        &self.category_types
    }

    /// Registers a patient.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidInput`] for an invalid field, or
    /// [`RegistryError::DuplicatePatientId`] if `id` is already registered.
    pub fn add_patient(&mut self, id: &str, name: &str) -> RegistryResult<()> {
        let id = record_field("id", id)?;
        let name = record_field("name", name)?;
        if self.patient_positions.contains_key(id.as_str()) {
            return Err(RegistryError::DuplicatePatientId(id.to_string()));
        }

        tracing::info!(patient_id = %id, "added patient");
        self.patient_positions
            .insert(id.as_str().to_owned(), self.patients.len());
        self.patients.push(Patient::new(id, name));
        Ok(())
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patient_positions
            .get(id.trim())
            .map(|&i| &self.patients[i])
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    fn require_patient(&self, patient_id: &str) -> RegistryResult<&Patient> {
        self.patient(patient_id)
            .ok_or_else(|| RegistryError::PatientNotFound(patient_id.trim().to_string()))
    }

    fn type_not_found(kind: ObservationKind, code: &str) -> RegistryError {
        RegistryError::ObservationTypeNotFound {
            kind,
            code: code.trim().to_string(),
        }
    }

    fn duplicate_observation(patient: &Patient, code: &RecordText) -> RegistryError {
        RegistryError::DuplicateObservationForType {
            patient_id: patient.id().to_string(),
            code: code.to_string(),
        }
    }

    /// Records a measurement for a patient. `value` is stored as given.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`RegistryError::PatientNotFound`]
    /// - [`RegistryError::ObservationTypeNotFound`] if `type_code` is not a measurement type
    /// - [`RegistryError::DuplicateObservationForType`] under the strict policy
    pub fn add_measurement_observation(
        &mut self,
        patient_id: &str,
        type_code: &str,
        value: f64,
    ) -> RegistryResult<()> {
        let patient = self.require_patient(patient_id)?;
        let kind = self
            .measurement_type(type_code)
            .ok_or_else(|| Self::type_not_found(ObservationKind::Measurement, type_code))?;

        if self.policy == ObservationPolicy::Strict
            && self
                .measurement_observations
                .iter()
                .any(|o| o.patient_id() == patient.id() && o.type_code() == kind.code())
        {
            return Err(Self::duplicate_observation(patient, kind.code()));
        }

        let observation =
            MeasurementObservation::new(patient.id().clone(), kind.code().clone(), value);
        tracing::info!(
            patient_id = %observation.patient_id(),
            code = %observation.type_code(),
            "added measurement observation"
        );
        self.measurement_observations.push(observation);
        Ok(())
    }

    /// Records a category observation for a patient.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`RegistryError::PatientNotFound`]
    /// - [`RegistryError::ObservationTypeNotFound`] if `type_code` is not a category type
    /// - [`RegistryError::InvalidCategoryValue`] if `category` is not an allowed label
    /// - [`RegistryError::DuplicateObservationForType`] under the strict policy
    pub fn add_category_observation(
        &mut self,
        patient_id: &str,
        type_code: &str,
        category: &str,
    ) -> RegistryResult<()> {
        let patient = self.require_patient(patient_id)?;
        let kind = self
            .category_type(type_code)
            .ok_or_else(|| Self::type_not_found(ObservationKind::Category, type_code))?;
        let label = kind
            .category(category)
            .ok_or_else(|| RegistryError::InvalidCategoryValue {
                code: kind.code().to_string(),
                category: category.trim().to_string(),
            })?;

        if self.policy == ObservationPolicy::Strict
            && self
                .category_observations
                .iter()
                .any(|o| o.patient_id() == patient.id() && o.type_code() == kind.code())
        {
            return Err(Self::duplicate_observation(patient, kind.code()));
        }

        let observation =
            CategoryObservation::new(patient.id().clone(), kind.code().clone(), label.clone());
        tracing::info!(
            patient_id = %observation.patient_id(),
            code = %observation.type_code(),
            "added category observation"
        );
        self.category_observations.push(observation);
        Ok(())
    }

    pub fn measurement_observations(&self) -> &[MeasurementObservation] {
        &self.measurement_observations
    }

    pub fn category_observations(&self) -> &[CategoryObservation] {
        &self.category_observations
    }

    /// Measurement observations in insertion order, each paired with its type.
    pub fn measurement_entries(
        &self,
    ) -> impl Iterator<Item = (&MeasurementType, &MeasurementObservation)> + '_ {
        self.measurement_observations
            .iter()
            .filter_map(|o| self.measurement_type(o.type_code().as_str()).map(|t| (t, o)))
    }

    /// Category observations in insertion order, each paired with its type.
    pub fn category_entries(
        &self,
    ) -> impl Iterator<Item = (&CategoryType, &CategoryObservation)> + '_ {
        self.category_observations
            .iter()
            .filter_map(|o| self.category_type(o.type_code().as_str()).map(|t| (t, o)))
    }

    /// Collects a patient's observations for display.
    ///
    /// Returns `None` if no patient has the given id.
    pub fn patient_record(&self, patient_id: &str) -> Option<PatientRecord<'_>> {
        let patient = self.patient(patient_id)?;
        Some(PatientRecord {
            patient,
            measurements: self
                .measurement_entries()
                .filter(|(_, o)| o.patient_id() == patient.id())
                .collect(),
            categories: self
                .category_entries()
                .filter(|(_, o)| o.patient_id() == patient.id())
                .collect(),
        })
    }
}

/// Full listing of every collection, used by the "display all data" actions.
impl std::fmt::Display for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines = vec!["Measurement Observation Types:".to_string()];
        lines.extend(self.measurement_types.iter().map(ToString::to_string));

        lines.push("Category Observation Types:".into());
        lines.extend(self.category_types.iter().map(ToString::to_string));

        lines.push("Patients:".into());
        lines.extend(self.patients.iter().map(ToString::to_string));

        lines.push("Measurement Observations:".into());
        lines.extend(self.measurement_entries().map(|(t, o)| {
            format!(
                "Patient ID: {}, Type: {}, Value: {}",
                o.patient_id(),
                t.name(),
                o.value()
            )
        }));

        lines.push("Category Observations:".into());
        lines.extend(self.category_entries().map(|(t, o)| {
            format!(
                "Patient ID: {}, Type: {}, Category: {}",
                o.patient_id(),
                t.name(),
                o.category()
            )
        }));

        f.write_str(&lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOOD_GROUPS: [&str; 3] = ["Group A", "Group B1", "Group B2"];

    fn seeded(policy: ObservationPolicy) -> Registry {
        let mut registry = Registry::new(policy);
        registry
            .add_measurement_type("T100", "Blood Pressure", "psi")
            .unwrap();
        registry
            .add_category_type("T200", "blood type", BLOOD_GROUPS)
            .unwrap();
        registry.add_patient("P100", "Smith").unwrap();
        registry.add_patient("P200", "Adams").unwrap();
        registry
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = Registry::new(ObservationPolicy::Strict);
        assert!(registry.is_empty());
        assert_eq!(registry.policy(), ObservationPolicy::Strict);
    }

    #[test]
    fn duplicate_measurement_code_is_rejected() {
        let mut registry = Registry::new(ObservationPolicy::Strict);
        registry
            .add_measurement_type("T100", "Blood Pressure", "psi")
            .unwrap();

        let err = registry
            .add_measurement_type("T100", "Height", "cm")
            .unwrap_err();

        assert!(matches!(err, RegistryError::DuplicateCode(code) if code == "T100"));
        assert_eq!(registry.measurement_types().len(), 1);
        assert_eq!(
            registry.measurement_type("T100").unwrap().name().as_str(),
            "Blood Pressure"
        );
    }

    #[test]
    fn duplicate_category_code_is_rejected() {
        let mut registry = seeded(ObservationPolicy::Permissive);
        let err = registry
            .add_category_type("T200", "eye colour", ["Blue"])
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCode(_)));
        assert_eq!(registry.category_types().len(), 1);
    }

    #[test]
    fn strict_policy_rejects_code_reuse_across_kinds() {
        let mut registry = seeded(ObservationPolicy::Strict);
        let err = registry
            .add_category_type("T100", "posture", ["Standing", "Sitting"])
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCode(_)));

        let err = registry
            .add_measurement_type("T200", "Height", "cm")
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCode(_)));
    }

    #[test]
    fn permissive_policy_allows_code_reuse_across_kinds() {
        let mut registry = seeded(ObservationPolicy::Permissive);
        registry
            .add_category_type("T100", "posture", ["Standing", "Sitting"])
            .unwrap();

        // Measurement types take precedence in the combined lookup.
        let found = registry.observation_type("T100").unwrap();
        assert_eq!(found.kind(), ObservationKind::Measurement);
        assert_eq!(registry.category_type("T100").unwrap().name().as_str(), "posture");
    }

    #[test]
    fn category_type_requires_categories() {
        let mut registry = Registry::new(ObservationPolicy::Strict);
        let err = registry
            .add_category_type("T200", "blood type", Vec::<&str>::new())
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn category_type_preserves_label_order() {
        let registry = seeded(ObservationPolicy::Strict);
        let labels: Vec<&str> = registry
            .category_type("T200")
            .unwrap()
            .categories()
            .iter()
            .map(|c| c.as_str())
            .collect();
        assert_eq!(labels, BLOOD_GROUPS);
    }

    #[test]
    fn invalid_text_is_rejected_before_duplicate_check() {
        let mut registry = seeded(ObservationPolicy::Strict);
        let err = registry.add_patient("P100", "Smith;Jones").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput(_)));
        assert_eq!(registry.patients().len(), 2);
    }

    #[test]
    fn duplicate_patient_id_is_rejected() {
        let mut registry = seeded(ObservationPolicy::Strict);
        let err = registry.add_patient("P200", "Blake").unwrap_err();
        assert!(matches!(err, RegistryError::DuplicatePatientId(id) if id == "P200"));
        assert_eq!(registry.patients().len(), 2);
        assert_eq!(registry.patient("P200").unwrap().name().as_str(), "Adams");
    }

    #[test]
    fn lookups_ignore_surrounding_whitespace() {
        let registry = seeded(ObservationPolicy::Strict);
        assert!(registry.patient(" P100 ").is_some());
        assert!(registry.measurement_type("T100\t").is_some());
        assert!(registry.observation_type("nope").is_none());
    }

    #[test]
    fn listings_follow_insertion_order() {
        let registry = seeded(ObservationPolicy::Strict);
        let ids: Vec<&str> = registry.patients().iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["P100", "P200"]);
    }

    #[test]
    fn measurement_observation_for_unknown_patient_is_rejected() {
        let mut registry = seeded(ObservationPolicy::Strict);
        let err = registry
            .add_measurement_observation("P999", "T100", 120.0)
            .unwrap_err();
        assert!(matches!(err, RegistryError::PatientNotFound(id) if id == "P999"));
        assert!(registry.measurement_observations().is_empty());
    }

    #[test]
    fn measurement_observation_requires_measurement_type() {
        let mut registry = seeded(ObservationPolicy::Strict);
        // T200 exists, but as a category type.
        let err = registry
            .add_measurement_observation("P100", "T200", 1.0)
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::ObservationTypeNotFound {
                kind: ObservationKind::Measurement,
                ..
            }
        ));
    }

    #[test]
    fn strict_policy_rejects_repeated_measurement() {
        let mut registry = seeded(ObservationPolicy::Strict);
        registry
            .add_measurement_observation("P100", "T100", 120.0)
            .unwrap();

        let err = registry
            .add_measurement_observation("P100", "T100", 140.0)
            .unwrap_err();

        assert!(matches!(err, RegistryError::DuplicateObservationForType { .. }));
        assert_eq!(registry.measurement_observations().len(), 1);
        assert_eq!(registry.measurement_observations()[0].value(), 120.0);

        // A different patient may still record the same type.
        registry
            .add_measurement_observation("P200", "T100", 110.0)
            .unwrap();
    }

    #[test]
    fn permissive_policy_allows_repeated_observations() {
        let mut registry = seeded(ObservationPolicy::Permissive);
        registry
            .add_measurement_observation("P100", "T100", 120.0)
            .unwrap();
        registry
            .add_measurement_observation("P100", "T100", 140.0)
            .unwrap();
        registry
            .add_category_observation("P100", "T200", "Group A")
            .unwrap();
        registry
            .add_category_observation("P100", "T200", "Group B1")
            .unwrap();

        assert_eq!(registry.measurement_observations().len(), 2);
        assert_eq!(registry.category_observations().len(), 2);
    }

    #[test]
    fn measurement_value_is_stored_as_given() {
        let mut registry = seeded(ObservationPolicy::Strict);
        registry
            .add_measurement_observation("P100", "T100", -3.25)
            .unwrap();
        assert_eq!(registry.measurement_observations()[0].value(), -3.25);
    }

    #[test]
    fn category_outside_allowed_set_is_rejected() {
        let mut registry = seeded(ObservationPolicy::Strict);
        let err = registry
            .add_category_observation("P200", "T200", "Group D")
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidCategoryValue { ref category, .. } if category == "Group D"
        ));
        assert!(registry.category_observations().is_empty());
    }

    #[test]
    fn category_observation_stores_canonical_label() {
        let mut registry = seeded(ObservationPolicy::Strict);
        registry
            .add_category_observation("P100", "T200", "  Group B1 ")
            .unwrap();
        assert_eq!(
            registry.category_observations()[0].category().as_str(),
            "Group B1"
        );
    }

    #[test]
    fn strict_policy_rejects_repeated_category_even_with_other_label() {
        let mut registry = seeded(ObservationPolicy::Strict);
        registry
            .add_category_observation("P100", "T200", "Group A")
            .unwrap();
        let err = registry
            .add_category_observation("P100", "T200", "Group B2")
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateObservationForType { .. }));
    }

    #[test]
    fn duplicate_rule_is_scoped_per_kind() {
        let mut strict = Registry::new(ObservationPolicy::Strict);
        strict.add_patient("P1", "Smith").unwrap();
        strict.add_measurement_type("M1", "Weight", "kg").unwrap();
        strict.add_category_type("C1", "Smoker", ["Yes", "No"]).unwrap();
        strict.add_measurement_observation("P1", "M1", 70.0).unwrap();
        strict.add_category_observation("P1", "C1", "No").unwrap();

        assert_eq!(strict.measurement_observations().len(), 1);
        assert_eq!(strict.category_observations().len(), 1);
    }

    #[test]
    fn observation_errors_follow_check_order() {
        let mut registry = seeded(ObservationPolicy::Strict);
        registry
            .add_category_observation("P100", "T200", "Group A")
            .unwrap();

        // Unknown patient wins over unknown type and bad category.
        let err = registry
            .add_category_observation("P999", "T999", "Group D")
            .unwrap_err();
        assert!(matches!(err, RegistryError::PatientNotFound(_)));

        // Unknown type wins over bad category.
        let err = registry
            .add_category_observation("P100", "T999", "Group D")
            .unwrap_err();
        assert!(matches!(err, RegistryError::ObservationTypeNotFound { .. }));

        // Bad category wins over duplicate observation.
        let err = registry
            .add_category_observation("P100", "T200", "Group D")
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidCategoryValue { .. }));
    }

    #[test]
    fn measurement_errors_follow_check_order() {
        let mut registry = seeded(ObservationPolicy::Strict);
        registry
            .add_measurement_observation("P100", "T100", 120.0)
            .unwrap();

        let err = registry
            .add_measurement_observation("P999", "T999", 1.0)
            .unwrap_err();
        assert!(matches!(err, RegistryError::PatientNotFound(ref id) if id == "P999"));

        let err = registry
            .add_measurement_observation("P999", "T100", 1.0)
            .unwrap_err();
        assert!(matches!(err, RegistryError::PatientNotFound(_)));

        // P100 already holds a T100 reading, but the type lookup fails first.
        let err = registry
            .add_measurement_observation("P100", "T999", 130.0)
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::ObservationTypeNotFound {
                kind: ObservationKind::Measurement,
                ref code,
            } if code == "T999"
        ));

        let err = registry
            .add_measurement_observation("P100", "T100", 130.0)
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateObservationForType { .. }
        ));
        assert_eq!(registry.measurement_observations().len(), 1);
    }

    #[test]
    fn patient_record_collects_only_that_patients_observations() {
        let mut registry = seeded(ObservationPolicy::Strict);
        registry
            .add_measurement_observation("P100", "T100", 120.0)
            .unwrap();
        registry
            .add_measurement_observation("P200", "T100", 90.0)
            .unwrap();
        registry
            .add_category_observation("P100", "T200", "Group A")
            .unwrap();

        let record = registry.patient_record("P100").unwrap();
        assert_eq!(record.patient.name().as_str(), "Smith");
        assert_eq!(record.measurements.len(), 1);
        assert_eq!(record.measurements[0].1.value(), 120.0);
        assert_eq!(record.categories.len(), 1);
        assert_eq!(record.categories[0].0.name().as_str(), "blood type");

        assert!(registry.patient_record("P999").is_none());
    }

    #[test]
    fn patient_record_renders_for_display() {
        let mut registry = seeded(ObservationPolicy::Strict);
        registry
            .add_measurement_observation("P100", "T100", 120.0)
            .unwrap();
        registry
            .add_category_observation("P100", "T200", "Group A")
            .unwrap();

        let rendered = registry.patient_record("P100").unwrap().to_string();
        assert_eq!(
            rendered,
            "Patient Record:\n\
             ID: P100\n\
             Name: Smith\n\
             Measurement Observations:\n\
             Type: Blood Pressure, Value: 120\n\
             Category Observations:\n\
             Type: blood type, Category: Group A"
        );
    }

    #[test]
    fn observation_type_renders_details() {
        let registry = seeded(ObservationPolicy::Strict);
        let rendered = registry.observation_type("T200").unwrap().to_string();
        assert!(rendered.starts_with("Category Observation Type:\n"));
        assert!(rendered.ends_with("Categories: Group A, Group B1, Group B2"));
    }

    #[test]
    fn registry_renders_full_listing() {
        let mut registry = seeded(ObservationPolicy::Strict);
        registry
            .add_measurement_observation("P100", "T100", 120.5)
            .unwrap();
        registry
            .add_category_observation("P200", "T200", "Group B2")
            .unwrap();

        assert_eq!(
            registry.to_string(),
            "Measurement Observation Types:\n\
             T100: Blood Pressure (psi)\n\
             Category Observation Types:\n\
             T200: blood type (Group A, Group B1, Group B2)\n\
             Patients:\n\
             P100: Smith\n\
             P200: Adams\n\
             Measurement Observations:\n\
             Patient ID: P100, Type: Blood Pressure, Value: 120.5\n\
             Category Observations:\n\
             Patient ID: P200, Type: blood type, Category: Group B2"
        );
    }

    #[test]
    fn registry_serialises_to_json() {
        let mut registry = seeded(ObservationPolicy::Strict);
        registry
            .add_measurement_observation("P100", "T100", 120.0)
            .unwrap();

        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(json["policy"], "strict");
        assert_eq!(json["patients"][0]["id"], "P100");
        assert_eq!(json["measurement_observations"][0]["value"], 120.0);
        assert!(json.get("patient_positions").is_none());
    }
}
