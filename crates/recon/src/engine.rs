use std::collections::HashSet;

use crate::config::Profile;
use crate::error::ReconError;
use crate::extract::ExtractedCodes;
use crate::model::{ReconMeta, ReconResult, ReconSummary, ReferenceTable, Row, Schema};
use crate::normalize::normalize;

/// Join extracted codes against the reference table.
///
/// Output contract: matched reference rows first, in reference-table
/// order; then (when the profile enables synthesis) one synthesized row
/// per unmatched extracted key, in extraction-encounter order. Reference
/// rows sharing a normalized code all appear; only the extraction side
/// dedups.
pub fn reconcile(
    profile: &Profile,
    reference: &ReferenceTable,
    extracted: &ExtractedCodes,
) -> Result<ReconResult, ReconError> {
    profile.validate()?;
    reference.validate()?;

    let schema = profile.schema();

    // Project reference columns into profile-schema order; a missing
    // column aborts before any row is produced.
    let mut projection = Vec::with_capacity(schema.len());
    for column in schema.columns() {
        let idx = reference
            .schema()
            .index_of(column)
            .ok_or_else(|| ReconError::MissingColumn {
                column: column.clone(),
            })?;
        projection.push(idx);
    }

    let mut rows = Vec::new();
    let mut matched = 0usize;
    let mut reference_keys: HashSet<String> = HashSet::new();

    for row in reference.rows() {
        let key = normalize(&row.values()[projection[0]]);
        if extracted.contains_key(&key) {
            rows.push(Row::new(
                projection.iter().map(|&i| row.values()[i].clone()).collect(),
            ));
            matched += 1;
        }
        reference_keys.insert(key);
    }

    let mut unmatched = 0usize;
    if profile.synthesize_unmatched {
        let risk_idx = schema
            .index_of(&profile.risk_column)
            .ok_or_else(|| ReconError::ProfileValidation(format!(
                "risk column '{}' is not in the column list",
                profile.risk_column
            )))?;

        for entry in extracted.iter() {
            if reference_keys.contains(&entry.key) {
                continue;
            }
            let mut values = vec![String::new(); schema.len()];
            values[0] = entry.original.clone();
            values[1] = profile.sentinel_description.clone();
            values[risk_idx] = profile.high_risk_label.clone();
            rows.push(Row::new(values));
            unmatched += 1;
        }
    }

    Ok(ReconResult {
        meta: ReconMeta {
            profile: profile.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary: ReconSummary {
            matched,
            unmatched,
            total: matched + unmatched,
        },
        schema,
        rows,
    })
}

/// Load reference rows from CSV data, projecting headers onto the
/// profile schema. Header matching is case-insensitive and trimmed; a
/// required column absent from the header is a hard error and blank
/// lines are skipped.
pub fn load_reference_csv(
    csv_data: &str,
    profile: &Profile,
    delimiter: u8,
) -> Result<ReferenceTable, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let header_schema = Schema::new(headers);

    let schema = profile.schema();
    let mut projection = Vec::with_capacity(schema.len());
    for column in schema.columns() {
        let idx = header_schema
            .index_of(column)
            .ok_or_else(|| ReconError::MissingColumn {
                column: column.clone(),
            })?;
        projection.push(idx);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        let values: Vec<String> = projection
            .iter()
            .map(|&i| record.get(i).unwrap_or("").to_string())
            .collect();
        if values.iter().all(|v| v.trim().is_empty()) {
            continue;
        }
        rows.push(Row::new(values));
    }

    if rows.is_empty() {
        return Err(ReconError::EmptyReference);
    }

    Ok(ReferenceTable::new(schema, rows))
}
