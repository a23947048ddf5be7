//! Constants used throughout the PRS core crate.
//!
//! File names are shared by the save and load paths so the two can never drift apart.

/// Default data directory when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = ".";

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "PRS_DATA_DIR";

/// Environment variable selecting the observation policy.
pub const POLICY_ENV: &str = "PRS_OBSERVATION_POLICY";

/// Filename for measurement observation type records (`code;name;unit`).
pub const MEASUREMENT_TYPES_FILENAME: &str = "PRS-MeasurementObservationTypes.txt";

/// Filename for category observation type records (`code;name;cat1,cat2,...`).
pub const CATEGORY_TYPES_FILENAME: &str = "PRS-CategoryObservationTypes.txt";

/// Filename for patient records (`id;name`).
pub const PATIENTS_FILENAME: &str = "PRS-Patients.txt";

/// Filename for measurement observation records (`patientId;typeCode;value`).
pub const MEASUREMENT_OBSERVATIONS_FILENAME: &str = "PRS-MeasurementObservations.txt";

/// Filename for category observation records (`patientId;typeCode;category`).
pub const CATEGORY_OBSERVATIONS_FILENAME: &str = "PRS-CategoryObservations.txt";

/// All registry files, in the order they are written and read.
pub const REGISTRY_FILENAMES: [&str; 5] = [
    MEASUREMENT_TYPES_FILENAME,
    CATEGORY_TYPES_FILENAME,
    PATIENTS_FILENAME,
    MEASUREMENT_OBSERVATIONS_FILENAME,
    CATEGORY_OBSERVATIONS_FILENAME,
];
