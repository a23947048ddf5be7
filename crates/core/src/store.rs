//! Flat-file persistence for the registry.
//!
//! The registry is stored as five text files in one data directory, one record per
//! line with `;`-separated fields:
//!
//! ```text
//! <data_dir>/
//!   PRS-MeasurementObservationTypes.txt   # code;name;unit
//!   PRS-CategoryObservationTypes.txt      # code;name;cat1,cat2,...
//!   PRS-Patients.txt                      # id;name
//!   PRS-MeasurementObservations.txt       # patientId;typeCode;value
//!   PRS-CategoryObservations.txt          # patientId;typeCode;category
//! ```
//!
//! Loading rebuilds a fresh [`Registry`] through its add operations, so a loaded
//! registry obeys the same invariants as one built interactively. Rows that do not
//! parse, or that the registry rejects, are skipped, logged at warn level and counted
//! in the returned [`LoadReport`].

use crate::config::{CoreConfig, ObservationPolicy};
use crate::constants::{
    CATEGORY_OBSERVATIONS_FILENAME, CATEGORY_TYPES_FILENAME, MEASUREMENT_OBSERVATIONS_FILENAME,
    MEASUREMENT_TYPES_FILENAME, PATIENTS_FILENAME, REGISTRY_FILENAMES,
};
use crate::{Registry, RegistryError, RegistryResult};
use prs_types::{FIELD_SEPARATOR, LIST_SEPARATOR};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of [`RegistryStore::load`].
#[derive(Debug)]
pub struct LoadReport {
    pub registry: Registry,
    /// Rows present on disk that did not make it into `registry`.
    pub skipped: usize,
}

impl LoadReport {
    /// Checks that saving `registry` back would not drop rows from disk.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IncompleteLoad`] if any row was skipped.
    pub fn ensure_complete(&self) -> RegistryResult<()> {
        if self.skipped > 0 {
            return Err(RegistryError::IncompleteLoad(self.skipped));
        }
        Ok(())
    }
}

/// Reads and writes a [`Registry`] in a data directory.
#[derive(Clone, Debug)]
pub struct RegistryStore {
    data_dir: PathBuf,
}

impl RegistryStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(cfg.data_dir())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// True if any registry file exists in the data directory.
    pub fn has_saved_data(&self) -> bool {
        REGISTRY_FILENAMES
            .iter()
            .any(|name| self.data_dir.join(name).is_file())
    }

    /// Writes every collection to its own file, replacing existing files.
    ///
    /// All five files are first written next to their targets with a `.tmp` suffix and
    /// only renamed into place once every write succeeded. A failed write leaves the
    /// previous files untouched.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if:
    /// - the data directory cannot be created ([`RegistryError::StorageDirCreation`]),
    /// - a file cannot be written ([`RegistryError::FileWrite`]).
    pub fn save(&self, registry: &Registry) -> RegistryResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(RegistryError::StorageDirCreation)?;

        let mut measurement_types = String::new();
        for t in registry.measurement_types() {
            push_record(&mut measurement_types, &[t.code().as_str(), t.name().as_str(), t.unit().as_str()]);
        }

        let mut category_types = String::new();
        for t in registry.category_types() {
            let categories = t
                .categories()
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR.to_string().as_str());
            push_record(&mut category_types, &[t.code().as_str(), t.name().as_str(), &categories]);
        }

        let mut patients = String::new();
        for p in registry.patients() {
            push_record(&mut patients, &[p.id().as_str(), p.name().as_str()]);
        }

        let mut measurements = String::new();
        for o in registry.measurement_observations() {
            let value = o.value().to_string();
            push_record(&mut measurements, &[o.patient_id().as_str(), o.type_code().as_str(), &value]);
        }

        let mut categories = String::new();
        for o in registry.category_observations() {
            push_record(
                &mut categories,
                &[o.patient_id().as_str(), o.type_code().as_str(), o.category().as_str()],
            );
        }

        let files = [
            (MEASUREMENT_TYPES_FILENAME, measurement_types),
            (CATEGORY_TYPES_FILENAME, category_types),
            (PATIENTS_FILENAME, patients),
            (MEASUREMENT_OBSERVATIONS_FILENAME, measurements),
            (CATEGORY_OBSERVATIONS_FILENAME, categories),
        ];

        for (staged, (name, contents)) in files.iter().enumerate() {
            if let Err(e) = fs::write(self.staging_path(name), contents) {
                self.discard_staged(&files[..staged]);
                return Err(RegistryError::FileWrite(e));
            }
        }
        for (name, _) in &files {
            fs::rename(self.staging_path(name), self.data_dir.join(name))
                .map_err(RegistryError::FileWrite)?;
        }

        tracing::info!(data_dir = %self.data_dir.display(), "saved registry");
        Ok(())
    }

    /// Reads all five files into a new registry enforcing `policy`.
    ///
    /// The caller's current registry is untouched; replace it with the result only
    /// once this returns `Ok`. Before saving the loaded registry over the same
    /// directory, check [`LoadReport::ensure_complete`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::FileRead`] if any of the files is missing or unreadable.
    pub fn load(&self, policy: ObservationPolicy) -> RegistryResult<LoadReport> {
        let mut registry = Registry::new(policy);
        let mut skipped = 0;

        for (line_no, fields) in self.records(MEASUREMENT_TYPES_FILENAME)? {
            let outcome = match fields.as_slice() {
                [code, name, unit] => registry.add_measurement_type(code, name, unit),
                _ => Err(wrong_field_count(3, fields.len())),
            };
            skipped += skip_on_error(MEASUREMENT_TYPES_FILENAME, line_no, outcome);
        }

        for (line_no, fields) in self.records(CATEGORY_TYPES_FILENAME)? {
            let outcome = match fields.as_slice() {
                [code, name, categories] => {
                    // Tolerate a trailing separator after the last label.
                    let labels = categories
                        .split(LIST_SEPARATOR)
                        .filter(|label| !label.trim().is_empty());
                    registry.add_category_type(code, name, labels)
                }
                _ => Err(wrong_field_count(3, fields.len())),
            };
            skipped += skip_on_error(CATEGORY_TYPES_FILENAME, line_no, outcome);
        }

        for (line_no, fields) in self.records(PATIENTS_FILENAME)? {
            let outcome = match fields.as_slice() {
                [id, name] => registry.add_patient(id, name),
                _ => Err(wrong_field_count(2, fields.len())),
            };
            skipped += skip_on_error(PATIENTS_FILENAME, line_no, outcome);
        }

        for (line_no, fields) in self.records(MEASUREMENT_OBSERVATIONS_FILENAME)? {
            let outcome = match fields.as_slice() {
                [patient_id, code, value] => match value.trim().parse::<f64>() {
                    Ok(value) => registry.add_measurement_observation(patient_id, code, value),
                    Err(e) => Err(RegistryError::InvalidInput(format!(
                        "value '{value}' is not a number: {e}"
                    ))),
                },
                _ => Err(wrong_field_count(3, fields.len())),
            };
            skipped += skip_on_error(MEASUREMENT_OBSERVATIONS_FILENAME, line_no, outcome);
        }

        for (line_no, fields) in self.records(CATEGORY_OBSERVATIONS_FILENAME)? {
            let outcome = match fields.as_slice() {
                [patient_id, code, category] => {
                    registry.add_category_observation(patient_id, code, category)
                }
                _ => Err(wrong_field_count(3, fields.len())),
            };
            skipped += skip_on_error(CATEGORY_OBSERVATIONS_FILENAME, line_no, outcome);
        }

        tracing::info!(
            data_dir = %self.data_dir.display(),
            patients = registry.patients().len(),
            measurements = registry.measurement_observations().len(),
            categories = registry.category_observations().len(),
            skipped,
            "loaded registry"
        );
        Ok(LoadReport { registry, skipped })
    }

    fn staging_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.tmp"))
    }

    fn discard_staged(&self, files: &[(&str, String)]) {
        for (name, _) in files {
            if let Err(e) = fs::remove_file(self.staging_path(name)) {
                tracing::warn!(file = name, error = %e, "failed to remove staged registry file");
            }
        }
    }

    /// Reads a file and splits each non-blank line into fields.
    ///
    /// Line numbers are 1-based for logging.
    fn records(&self, name: &str) -> RegistryResult<Vec<(usize, Vec<String>)>> {
        let contents =
            fs::read_to_string(self.data_dir.join(name)).map_err(RegistryError::FileRead)?;

        Ok(contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                let fields = line.split(FIELD_SEPARATOR).map(str::to_owned).collect();
                (i + 1, fields)
            })
            .collect())
    }
}

fn push_record(out: &mut String, fields: &[&str]) {
    out.push_str(&fields.join(FIELD_SEPARATOR.to_string().as_str()));
    out.push('\n');
}

fn wrong_field_count(expected: usize, found: usize) -> RegistryError {
    RegistryError::InvalidInput(format!("expected {expected} fields, found {found}"))
}

/// Logs a rejected row and returns how many rows were skipped (0 or 1).
fn skip_on_error(file: &str, line_no: usize, outcome: RegistryResult<()>) -> usize {
    match outcome {
        Ok(()) => 0,
        Err(e) => {
            tracing::warn!(file, line = line_no, error = %e, "skipped registry record");
            1
        }
    }
}
