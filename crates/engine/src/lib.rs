//! `alvara-engine` — interactive result-set engine.
//!
//! Owns the reconciled base rows and the view state (per-column filters
//! + tri-state single-column sort), and recomputes the derived view
//! deterministically from the base set on every change. Also hosts the
//! session state machine that guards a processing run and the debounce
//! policy for bursty filter input.

pub mod debounce;
pub mod natural;
pub mod session;
pub mod view;

pub use debounce::{Debouncer, FilterEdit, DEFAULT_QUIET_PERIOD};
pub use natural::natural_cmp;
pub use session::{InputSource, Session, SessionError, ACCEPTED_DOCUMENT_EXTENSIONS};
pub use view::{SortDirection, SortState, ViewState};
