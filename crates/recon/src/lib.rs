//! `alvara-recon` — CNAE extraction and reference reconciliation engine.
//!
//! Pure engine crate: receives raw text and a pre-loaded reference table,
//! returns classified result rows. No CLI or file-path dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod model;
pub mod normalize;

pub use config::Profile;
pub use engine::{load_reference_csv, reconcile};
pub use error::ReconError;
pub use extract::{extract, extract_pages, CodePattern, ExtractedCode, ExtractedCodes};
pub use model::{ReconMeta, ReconResult, ReconSummary, ReferenceTable, Row, Schema};
pub use normalize::normalize;
