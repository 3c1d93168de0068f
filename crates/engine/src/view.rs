//! Filter + sort view state over the reconciled base rows.
//!
//! The base row set is read-only here; every change to the view state
//! recomputes the derived view from the full base set. Filters and sort
//! never compound destructively and are order-independent with respect
//! to each other.

use std::collections::BTreeMap;

use serde::Serialize;

use alvara_recon::{Row, Schema};

use crate::natural::natural_cmp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Per-column substring filters plus a single-column tri-state sort.
///
/// Reset to default whenever a processing run completes; mutated only by
/// user interaction on the existing result set.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    sort: Option<SortState>,
    filters: BTreeMap<String, String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Store the lowercased, trimmed needle for `column`; an empty value
    /// clears the constraint.
    pub fn set_filter(&mut self, column: &str, value: &str) {
        let needle = value.trim().to_lowercase();
        if needle.is_empty() {
            self.filters.remove(column);
        } else {
            self.filters.insert(column.to_string(), needle);
        }
    }

    /// Same column: ascending↔descending (never back to none). New
    /// column: ascending.
    pub fn toggle_sort(&mut self, column: &str) {
        match &mut self.sort {
            Some(state) if state.column == column => {
                state.direction = match state.direction {
                    SortDirection::Ascending => SortDirection::Descending,
                    SortDirection::Descending => SortDirection::Ascending,
                };
            }
            _ => {
                self.sort = Some(SortState {
                    column: column.to_string(),
                    direction: SortDirection::Ascending,
                });
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Derive the current view from the base set: AND-combined
    /// case-insensitive substring filters, then a stable natural sort.
    /// With no filters and no sort this is the identity.
    pub fn compute_view<'a>(&self, schema: &Schema, base: &'a [Row]) -> Vec<&'a Row> {
        let mut view: Vec<&Row> = base
            .iter()
            .filter(|row| self.row_passes(schema, row))
            .collect();

        if let Some(sort) = &self.sort {
            if let Some(idx) = schema.index_of(&sort.column) {
                view.sort_by(|a, b| {
                    let ord = natural_cmp(cell(a, idx), cell(b, idx));
                    match sort.direction {
                        SortDirection::Ascending => ord,
                        SortDirection::Descending => ord.reverse(),
                    }
                });
            }
        }

        view
    }

    fn row_passes(&self, schema: &Schema, row: &Row) -> bool {
        self.filters.iter().all(|(column, needle)| {
            match schema.index_of(column) {
                Some(idx) => cell(row, idx).to_lowercase().contains(needle.as_str()),
                // Unknown columns constrain nothing; callers validate names
                None => true,
            }
        })
    }
}

fn cell(row: &Row, idx: usize) -> &str {
    row.values().get(idx).map(String::as_str).unwrap_or("")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
