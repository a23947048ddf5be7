//! # PRS Core
//!
//! Core business logic for the PRS patient record system.
//!
//! This crate contains the in-memory registry and its flat-file store:
//! - Observation type definitions (measurements with a unit, categories with allowed labels)
//! - Patient registration
//! - Measurement and category observations, validated against their patient and type
//! - Save/load of the whole registry as `;`-separated text files under the data directory
//!
//! **No shell concerns**: prompting, menus and argument parsing belong in the `prs-run`
//! and `prs-cli` binaries.

pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod registry;
pub mod store;
pub mod validation;

pub use config::{CoreConfig, ObservationPolicy};
pub use error::{RegistryError, RegistryResult};
pub use model::{
    CategoryObservation, CategoryType, MeasurementObservation, MeasurementType, ObservationKind,
    ObservationType, Patient, PatientRecord,
};
pub use prs_types::{CategoryLabel, RecordText, TextError};
pub use registry::Registry;
pub use store::{LoadReport, RegistryStore};
