//! Interactive console menu over a [`Registry`].
//!
//! The menu is generic over its input and output so it can be driven from stdin in
//! the binary and from in-memory buffers in tests. Registry errors are printed and the
//! loop carries on; only I/O errors on the console itself end the session early.
//!
//! After a load that skipped rows, saving is refused so the skipped rows are not
//! erased from the data directory.

use prs_core::{Registry, RegistryError, RegistryStore};
use std::io::{self, BufRead, Write};

const MENU: &str = "\
=====================
Patient Record System
=====================
1. Add a measurement observation type
2. Add a category observation type
3. Add a patient
4. Add a measurement observation
5. Add a category observation
6. Display details of an observation type
7. Display a patient record by the patient id
8. Save data
9. Load data
D. Display all data for inspection
X. Exit
Please enter an option (1-9 or D or X): ";

pub struct Menu<R, W> {
    registry: Registry,
    store: RegistryStore,
    /// Rows skipped by the last load.
    skipped_on_load: usize,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(registry: Registry, store: RegistryStore, input: R, output: W) -> Self {
        Self {
            registry,
            store,
            skipped_on_load: 0,
            input,
            output,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs until the operator chooses `X` or the input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "{MENU}")?;
            self.output.flush()?;

            let Some(option) = self.read_line()? else {
                writeln!(self.output)?;
                writeln!(self.output, "Exiting...")?;
                return Ok(());
            };

            match option.trim().to_uppercase().as_str() {
                "1" => self.add_measurement_type()?,
                "2" => self.add_category_type()?,
                "3" => self.add_patient()?,
                "4" => self.add_measurement_observation()?,
                "5" => self.add_category_observation()?,
                "6" => self.display_observation_type()?,
                "7" => self.display_patient_record()?,
                "8" => self.save_data()?,
                "9" => self.load_data()?,
                "D" => writeln!(self.output, "{}", self.registry)?,
                "X" => {
                    writeln!(self.output, "Exiting...")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid option. Please try again.")?,
            }
        }
    }

    /// Reads one line without its line ending. `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        self.read_line()
    }

    fn report(&mut self, outcome: prs_core::RegistryResult<()>, success: &str) -> io::Result<()> {
        match outcome {
            Ok(()) => writeln!(self.output, "{success}"),
            Err(e) => {
                tracing::debug!(error = %e, "operation rejected");
                writeln!(self.output, "{e}")
            }
        }
    }

    fn add_measurement_type(&mut self) -> io::Result<()> {
        let Some(code) = self.prompt("Enter observation type code")? else {
            return Ok(());
        };
        let Some(name) = self.prompt("Enter observation type name")? else {
            return Ok(());
        };
        let Some(unit) = self.prompt("Enter unit")? else {
            return Ok(());
        };
        let outcome = self.registry.add_measurement_type(&code, &name, &unit);
        self.report(outcome, "Measurement observation type added successfully.")
    }

    fn add_category_type(&mut self) -> io::Result<()> {
        let Some(code) = self.prompt("Enter observation type code")? else {
            return Ok(());
        };
        let Some(name) = self.prompt("Enter observation type name")? else {
            return Ok(());
        };
        let Some(categories) = self.prompt("Enter categories (separated by commas)")? else {
            return Ok(());
        };
        let outcome = self
            .registry
            .add_category_type(&code, &name, categories.split(','));
        self.report(outcome, "Category observation type added successfully.")
    }

    fn add_patient(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt("Enter patient ID")? else {
            return Ok(());
        };
        let Some(name) = self.prompt("Enter patient name")? else {
            return Ok(());
        };
        let outcome = self.registry.add_patient(&id, &name);
        self.report(outcome, "Patient added successfully.")
    }

    fn add_measurement_observation(&mut self) -> io::Result<()> {
        let Some(patient_id) = self.prompt("Enter patient ID")? else {
            return Ok(());
        };
        let Some(code) = self.prompt("Enter observation type code")? else {
            return Ok(());
        };
        let Some(value) = self.prompt("Enter observation value")? else {
            return Ok(());
        };
        let value = match value.trim().parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                return writeln!(self.output, "Invalid observation value: '{}'", value.trim());
            }
        };
        let outcome = self
            .registry
            .add_measurement_observation(&patient_id, &code, value);
        self.report(outcome, "Measurement observation added successfully.")
    }

    fn add_category_observation(&mut self) -> io::Result<()> {
        let Some(patient_id) = self.prompt("Enter patient ID")? else {
            return Ok(());
        };
        let Some(code) = self.prompt("Enter observation type code")? else {
            return Ok(());
        };
        let Some(category) = self.prompt("Enter category")? else {
            return Ok(());
        };
        let outcome = self
            .registry
            .add_category_observation(&patient_id, &code, &category);
        self.report(outcome, "Category observation added successfully.")
    }

    fn display_observation_type(&mut self) -> io::Result<()> {
        let Some(code) = self.prompt("Enter observation type code")? else {
            return Ok(());
        };
        match self.registry.observation_type(&code) {
            Some(found) => writeln!(self.output, "{found}"),
            None => writeln!(self.output, "Observation type not found."),
        }
    }

    fn display_patient_record(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt("Enter patient ID")? else {
            return Ok(());
        };
        match self.registry.patient_record(&id) {
            Some(record) => writeln!(self.output, "{record}"),
            None => writeln!(self.output, "Patient not found."),
        }
    }

    fn save_data(&mut self) -> io::Result<()> {
        if self.skipped_on_load > 0 {
            let e = RegistryError::IncompleteLoad(self.skipped_on_load);
            return writeln!(self.output, "Error saving data: {e}");
        }
        match self.store.save(&self.registry) {
            Ok(()) => writeln!(self.output, "Data saved successfully."),
            Err(e) => writeln!(self.output, "Error saving data: {e}"),
        }
    }

    fn load_data(&mut self) -> io::Result<()> {
        match self.store.load(self.registry.policy()) {
            Ok(report) => {
                self.registry = report.registry;
                self.skipped_on_load = report.skipped;
                if report.skipped > 0 {
                    writeln!(
                        self.output,
                        "Data loaded with {} record(s) skipped; saving is disabled.",
                        report.skipped
                    )
                } else {
                    writeln!(self.output, "Data loaded successfully.")
                }
            }
            Err(e) => writeln!(self.output, "Error loading data: {e}"),
        }
    }
}
