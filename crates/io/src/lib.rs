//! `alvara-io` — file collaborators around the reconciliation core:
//! reference-table import (XLSX/CSV), document text extraction, and
//! risk-colored XLSX export.

pub mod pdf;
pub mod reference;
pub mod xlsx;
