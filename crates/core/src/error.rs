use prs_types::TextError;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("observation type code already exists: {0}")]
    DuplicateCode(String),
    #[error("patient ID already exists: {0}")]
    DuplicatePatientId(String),
    #[error("patient not found: {0}")]
    PatientNotFound(String),
    #[error("{kind} observation type not found: {code}")]
    ObservationTypeNotFound {
        kind: crate::ObservationKind,
        code: String,
    },
    #[error("invalid category for observation type {code}: {category}")]
    InvalidCategoryValue { code: String, category: String },
    #[error("patient {patient_id} already has an observation of type {code}")]
    DuplicateObservationForType { patient_id: String, code: String },

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read registry file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write registry file: {0}")]
    FileWrite(std::io::Error),
    #[error("refusing to overwrite saved data: {0} saved record(s) could not be loaded")]
    IncompleteLoad(usize),
}

impl RegistryError {
    /// Wraps a text validation failure with the name of the offending field.
    pub(crate) fn invalid_field(field: &str, err: TextError) -> Self {
        RegistryError::InvalidInput(format!("{field}: {err}"))
    }
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
