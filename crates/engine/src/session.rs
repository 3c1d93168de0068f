//! Session state machine: one reference table, one active input, one
//! result set.
//!
//! All mutable session state (base rows + view state) is confined here;
//! a processing run either replaces the whole result set or leaves the
//! prior state untouched.

use std::fmt;
use std::path::{Path, PathBuf};

use alvara_recon::{
    extract, extract_pages, reconcile, Profile, ReconError, ReconResult, ReferenceTable, Row,
    Schema,
};

use crate::view::ViewState;

/// Document types a session accepts as file input.
pub const ACCEPTED_DOCUMENT_EXTENSIONS: &[&str] = &["pdf"];

/// Exactly one input is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Document(PathBuf),
    Text(String),
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum SessionError {
    /// Reference table not loaded (or failed to load); processing blocked.
    ReferenceNotLoaded,
    /// Neither a document nor text is active.
    NoInput,
    /// A processing run is already in flight.
    Busy,
    /// Rejected at selection time: extension not in the accepted set.
    InvalidInputFile { extension: String },
    /// The document collaborator failed to produce page text.
    DocumentRead(String),
    Recon(ReconError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReferenceNotLoaded => write!(f, "reference table is not loaded"),
            Self::NoInput => write!(f, "no document or text input is active"),
            Self::Busy => write!(f, "a processing run is already in progress"),
            Self::InvalidInputFile { extension } => {
                write!(
                    f,
                    "invalid input file '.{extension}' (accepted: {})",
                    ACCEPTED_DOCUMENT_EXTENSIONS.join(", ")
                )
            }
            Self::DocumentRead(msg) => write!(f, "cannot read document: {msg}"),
            Self::Recon(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ReconError> for SessionError {
    fn from(err: ReconError) -> Self {
        Self::Recon(err)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session {
    profile: Profile,
    reference: Option<ReferenceTable>,
    input: Option<InputSource>,
    result: Option<ReconResult>,
    view: ViewState,
    in_flight: bool,
}

impl Session {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            reference: None,
            input: None,
            result: None,
            view: ViewState::new(),
            in_flight: false,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn schema(&self) -> Schema {
        self.profile.schema()
    }

    /// Install the reference table after a fail-fast schema check. On
    /// error the reference stays unset and processing remains blocked.
    pub fn load_reference(
        &mut self,
        table: ReferenceTable,
    ) -> Result<usize, SessionError> {
        self.reference = None;
        table.validate()?;
        for column in self.profile.schema().columns() {
            if table.schema().index_of(column).is_none() {
                return Err(ReconError::MissingColumn {
                    column: column.clone(),
                }
                .into());
            }
        }
        let rows = table.len();
        self.reference = Some(table);
        Ok(rows)
    }

    pub fn has_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Activate a document input. Rejected files leave any prior input
    /// untouched.
    pub fn set_document(&mut self, path: &Path) -> Result<(), SessionError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !ACCEPTED_DOCUMENT_EXTENSIONS.contains(&extension.as_str()) {
            return Err(SessionError::InvalidInputFile { extension });
        }
        self.input = Some(InputSource::Document(path.to_path_buf()));
        Ok(())
    }

    /// Activate a raw-text input, replacing whatever was active.
    pub fn set_text(&mut self, text: &str) {
        self.input = Some(InputSource::Text(text.to_string()));
    }

    pub fn clear_input(&mut self) {
        self.input = None;
    }

    pub fn input(&self) -> Option<&InputSource> {
        self.input.as_ref()
    }

    /// Whether the processing control would be enabled.
    pub fn can_process(&self) -> bool {
        !self.in_flight && self.reference.is_some() && self.input.is_some()
    }

    /// Run the full pipeline: extract → reconcile → replace result set.
    ///
    /// `read_document` pages through a document input (in page order,
    /// fully, before reconciliation starts); text inputs bypass it. Any
    /// failure leaves the previous result set and view state in place.
    pub fn run_processing<F>(&mut self, read_document: F) -> Result<&ReconResult, SessionError>
    where
        F: FnOnce(&Path) -> Result<Vec<String>, String>,
    {
        if self.in_flight {
            return Err(SessionError::Busy);
        }
        self.in_flight = true;
        let outcome = self.run_inner(read_document);
        self.in_flight = false;

        match outcome {
            Ok(result) => {
                self.view.reset();
                Ok(self.result.insert(result))
            }
            Err(err) => Err(err),
        }
    }

    fn run_inner<F>(&self, read_document: F) -> Result<ReconResult, SessionError>
    where
        F: FnOnce(&Path) -> Result<Vec<String>, String>,
    {
        let reference = self
            .reference
            .as_ref()
            .ok_or(SessionError::ReferenceNotLoaded)?;
        let input = self.input.as_ref().ok_or(SessionError::NoInput)?;

        let extracted = match input {
            InputSource::Document(path) => {
                let pages = read_document(path).map_err(SessionError::DocumentRead)?;
                extract_pages(self.profile.pattern, pages.iter().map(String::as_str))
            }
            InputSource::Text(text) => extract(self.profile.pattern, text),
        };

        Ok(reconcile(&self.profile, reference, &extracted)?)
    }

    pub fn result(&self) -> Option<&ReconResult> {
        self.result.as_ref()
    }

    /// The reconciled base rows (empty before the first run).
    pub fn base_rows(&self) -> &[Row] {
        self.result.as_ref().map(|r| r.rows.as_slice()).unwrap_or(&[])
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn set_filter(&mut self, column: &str, value: &str) {
        self.view.set_filter(column, value);
    }

    pub fn toggle_sort(&mut self, column: &str) {
        self.view.toggle_sort(column);
    }

    /// Derived view over the current base rows.
    pub fn compute_view(&self) -> Vec<&Row> {
        self.view.compute_view(&self.profile.schema(), self.base_rows())
    }

    #[cfg(test)]
    fn force_in_flight(&mut self) {
        self.in_flight = true;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
