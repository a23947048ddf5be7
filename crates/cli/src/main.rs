use clap::{Parser, Subcommand};
use prs_core::{
    config::{data_dir_from_env_value, policy_from_env_value},
    constants::{DATA_DIR_ENV, POLICY_ENV},
    CoreConfig, ObservationPolicy, Registry, RegistryStore,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "prs")]
#[command(about = "PRS patient record system CLI")]
struct Cli {
    /// Directory holding the registry files (overrides PRS_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Observation policy: strict or permissive (overrides PRS_OBSERVATION_POLICY)
    #[arg(long, global = true)]
    policy: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a measurement observation type
    AddMeasurementType {
        /// Observation type code
        code: String,
        /// Observation type name
        name: String,
        /// Unit of measurement
        unit: String,
    },
    /// Add a category observation type
    AddCategoryType {
        /// Observation type code
        code: String,
        /// Observation type name
        name: String,
        /// Allowed categories (comma-separated)
        categories: String,
    },
    /// Add a patient
    AddPatient {
        /// Patient ID
        id: String,
        /// Patient name
        name: String,
    },
    /// Add a measurement observation
    AddMeasurement {
        /// Patient ID
        patient_id: String,
        /// Measurement observation type code
        type_code: String,
        /// Observed value
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Add a category observation
    AddCategory {
        /// Patient ID
        patient_id: String,
        /// Category observation type code
        type_code: String,
        /// Observed category
        category: String,
    },
    /// Display details of an observation type
    ShowType {
        /// Observation type code
        code: String,
    },
    /// Display a patient record
    ShowPatient {
        /// Patient ID
        id: String,
    },
    /// Display all data
    List {
        /// Print the registry as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::AddMeasurementType { .. }
                | Commands::AddCategoryType { .. }
                | Commands::AddPatient { .. }
                | Commands::AddMeasurement { .. }
                | Commands::AddCategory { .. }
        )
    }
}

/// Applies one command to the registry and returns the text to print.
fn execute(command: &Commands, registry: &mut Registry) -> Result<String, Box<dyn Error>> {
    let message = match command {
        Commands::AddMeasurementType { code, name, unit } => {
            registry.add_measurement_type(code, name, unit)?;
            "Measurement observation type added successfully.".to_string()
        }
        Commands::AddCategoryType {
            code,
            name,
            categories,
        } => {
            registry.add_category_type(code, name, categories.split(','))?;
            "Category observation type added successfully.".to_string()
        }
        Commands::AddPatient { id, name } => {
            registry.add_patient(id, name)?;
            "Patient added successfully.".to_string()
        }
        Commands::AddMeasurement {
            patient_id,
            type_code,
            value,
        } => {
            registry.add_measurement_observation(patient_id, type_code, *value)?;
            "Measurement observation added successfully.".to_string()
        }
        Commands::AddCategory {
            patient_id,
            type_code,
            category,
        } => {
            registry.add_category_observation(patient_id, type_code, category)?;
            "Category observation added successfully.".to_string()
        }
        Commands::ShowType { code } => match registry.observation_type(code) {
            Some(found) => found.to_string(),
            None => "Observation type not found.".to_string(),
        },
        Commands::ShowPatient { id } => match registry.patient_record(id) {
            Some(record) => record.to_string(),
            None => "Patient not found.".to_string(),
        },
        Commands::List { json: true } => serde_json::to_string_pretty(&*registry)?,
        Commands::List { json: false } => registry.to_string(),
    };
    Ok(message)
}

/// Loads the data directory, applies `command` and saves if it mutated.
///
/// A mutating command fails without touching the files when the load skipped rows,
/// since saving the loaded registry would erase them.
fn apply(
    store: &RegistryStore,
    policy: ObservationPolicy,
    command: &Commands,
) -> Result<String, Box<dyn Error>> {
    let mut registry = if store.has_saved_data() {
        let report = store.load(policy)?;
        if command.mutates() {
            report.ensure_complete()?;
        }
        report.registry
    } else {
        Registry::new(policy)
    };

    let message = execute(command, &mut registry)?;
    if command.mutates() {
        store.save(&registry)?;
    }
    Ok(message)
}

fn config(data_dir: Option<PathBuf>, policy: Option<String>) -> Result<CoreConfig, Box<dyn Error>> {
    let data_dir =
        data_dir.unwrap_or_else(|| data_dir_from_env_value(std::env::var(DATA_DIR_ENV).ok()));
    let policy = policy_from_env_value(policy.or_else(|| std::env::var(POLICY_ENV).ok()))?;
    Ok(CoreConfig::new(data_dir, policy)?)
}

/// Exits non-zero when the command was rejected or the data could not be read or written.
fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'prs --help' for commands");
        return ExitCode::SUCCESS;
    };

    let outcome = config(cli.data_dir, cli.policy)
        .and_then(|cfg| apply(&RegistryStore::from_config(&cfg), cfg.policy(), &command));

    match outcome {
        Ok(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prs_core::constants::{MEASUREMENT_OBSERVATIONS_FILENAME, PATIENTS_FILENAME};
    use prs_core::RegistryError;
    use std::fs;
    use tempfile::TempDir;

    fn command(args: &[&str]) -> Commands {
        let mut argv = vec!["prs"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv)
            .expect("valid arguments")
            .command
            .expect("a subcommand")
    }

    fn run(registry: &mut Registry, args: &[&str]) -> Result<String, Box<dyn Error>> {
        execute(&command(args), registry)
    }

    #[test]
    fn add_commands_mutate_and_report_success() {
        let mut registry = Registry::new(ObservationPolicy::Strict);

        let cmd = command(&["add-measurement-type", "T100", "Blood Pressure", "psi"]);
        assert!(cmd.mutates());
        assert_eq!(
            execute(&cmd, &mut registry).unwrap(),
            "Measurement observation type added successfully."
        );

        run(&mut registry, &["add-category-type", "T200", "blood type", "Group A, Group B1"]).unwrap();
        run(&mut registry, &["add-patient", "P100", "Smith"]).unwrap();
        run(&mut registry, &["add-measurement", "P100", "T100", "-1.5"]).unwrap();
        run(&mut registry, &["add-category", "P100", "T200", "Group B1"]).unwrap();

        assert_eq!(registry.measurement_observations()[0].value(), -1.5);
        assert_eq!(
            registry.category_type("T200").unwrap().categories()[1].as_str(),
            "Group B1"
        );
    }

    #[test]
    fn registry_errors_are_returned() {
        let mut registry = Registry::new(ObservationPolicy::Strict);
        let err = run(&mut registry, &["add-measurement", "P100", "T100", "120"]).unwrap_err();
        let err = err.downcast::<RegistryError>().expect("a registry error");
        assert!(matches!(*err, RegistryError::PatientNotFound(_)));
    }

    #[test]
    fn show_commands_do_not_mutate() {
        let mut registry = Registry::new(ObservationPolicy::Strict);
        let cmd = command(&["show-type", "T100"]);
        assert!(!cmd.mutates());
        assert_eq!(
            execute(&cmd, &mut registry).unwrap(),
            "Observation type not found."
        );
        assert_eq!(
            run(&mut registry, &["show-patient", "P100"]).unwrap(),
            "Patient not found."
        );
    }

    #[test]
    fn list_json_is_valid_json() {
        let mut registry = Registry::new(ObservationPolicy::Permissive);
        registry.add_patient("P100", "Smith").unwrap();

        let output = run(&mut registry, &["list", "--json"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["policy"], "permissive");
        assert_eq!(value["patients"][0]["name"], "Smith");
    }

    fn apply_in(
        store: &RegistryStore,
        policy: ObservationPolicy,
        args: &[&str],
    ) -> Result<String, Box<dyn Error>> {
        apply(store, policy, &command(args))
    }

    #[test]
    fn apply_persists_mutations_between_runs() {
        let temp = TempDir::new().unwrap();
        let store = RegistryStore::new(temp.path());

        assert_eq!(
            apply_in(&store, ObservationPolicy::Strict, &["show-patient", "P100"]).unwrap(),
            "Patient not found."
        );
        assert!(!store.has_saved_data());

        apply_in(&store, ObservationPolicy::Strict, &["add-patient", "P100", "Smith"]).unwrap();
        apply_in(&store, ObservationPolicy::Strict, &["add-patient", "P200", "Adams"]).unwrap();

        let err = apply_in(&store, ObservationPolicy::Strict, &["add-patient", "P200", "Again"])
            .unwrap_err()
            .downcast::<RegistryError>()
            .expect("a registry error");
        assert!(matches!(*err, RegistryError::DuplicatePatientId(_)));

        assert_eq!(
            fs::read_to_string(temp.path().join(PATIENTS_FILENAME)).unwrap(),
            "P100;Smith\nP200;Adams\n"
        );
    }

    #[test]
    fn apply_refuses_to_overwrite_rows_the_policy_skips() {
        let temp = TempDir::new().unwrap();
        let store = RegistryStore::new(temp.path());
        let permissive = ObservationPolicy::Permissive;

        apply_in(&store, permissive, &["add-measurement-type", "T100", "Blood Pressure", "psi"])
            .unwrap();
        apply_in(&store, permissive, &["add-patient", "P100", "Smith"]).unwrap();
        apply_in(&store, permissive, &["add-measurement", "P100", "T100", "120"]).unwrap();
        apply_in(&store, permissive, &["add-measurement", "P100", "T100", "130"]).unwrap();

        let measurements = temp.path().join(MEASUREMENT_OBSERVATIONS_FILENAME);
        assert_eq!(
            fs::read_to_string(&measurements).unwrap(),
            "P100;T100;120\nP100;T100;130\n"
        );

        let err = apply_in(&store, ObservationPolicy::Strict, &["add-patient", "P200", "Adams"])
            .unwrap_err()
            .downcast::<RegistryError>()
            .expect("a registry error");
        assert!(matches!(*err, RegistryError::IncompleteLoad(1)));

        assert_eq!(
            fs::read_to_string(&measurements).unwrap(),
            "P100;T100;120\nP100;T100;130\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join(PATIENTS_FILENAME)).unwrap(),
            "P100;Smith\n"
        );

        // Read-only commands still work on the partial view.
        let listing = apply_in(&store, ObservationPolicy::Strict, &["list"]).unwrap();
        assert!(listing.contains("Patient ID: P100, Type: Blood Pressure, Value: 120"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["prs", "list", "--data-dir", "/tmp/prs", "--policy", "permissive"])
            .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/prs")));
        assert_eq!(cli.policy.as_deref(), Some("permissive"));
    }
}
