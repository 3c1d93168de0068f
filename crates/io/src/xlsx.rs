//! Result-set export to a risk-colored spreadsheet.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, Workbook};

use alvara_recon::{Profile, Row};

/// Solid fill applied to every cell of a high-risk row.
pub const HIGH_RISK_FILL: Color = Color::RGB(0xFF0000);
/// Solid fill applied to every cell of a medium-risk row.
pub const MEDIUM_RISK_FILL: Color = Color::RGB(0xFFFF00);

const SHEET_NAME: &str = "Resultados";

/// Export the reconciled rows to `path`.
///
/// Headers use the profile's display names, column widths come from the
/// profile, and rows whose risk cell contains the high/medium marker
/// (case-insensitive) get a solid fill. An empty row set writes nothing
/// and returns `Ok(false)`.
pub fn export(path: &Path, profile: &Profile, rows: &[Row]) -> Result<bool, String> {
    if rows.is_empty() {
        return Ok(false);
    }

    let schema = profile.schema();
    let risk_idx = schema
        .index_of(&profile.risk_column)
        .ok_or_else(|| format!("risk column '{}' missing from schema", profile.risk_column))?;

    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(SHEET_NAME)
        .map_err(|e| format!("Failed to create sheet '{SHEET_NAME}': {e}"))?;

    let header_format = Format::new().set_bold();
    for (col, column) in schema.columns().iter().enumerate() {
        worksheet
            .write_with_format(
                0,
                col as u16,
                profile.display_name(column).as_str(),
                &header_format,
            )
            .map_err(|e| format!("Failed to write header '{column}': {e}"))?;
        worksheet
            .set_column_width(col as u16, profile.export_width(column))
            .map_err(|e| format!("Failed to set column '{column}' width: {e}"))?;
    }

    let high_format = Format::new().set_background_color(HIGH_RISK_FILL);
    let medium_format = Format::new().set_background_color(MEDIUM_RISK_FILL);

    for (i, row) in rows.iter().enumerate() {
        let risk = row
            .values()
            .get(risk_idx)
            .map(|v| v.to_lowercase())
            .unwrap_or_default();
        let fill = if risk.contains(&profile.high_risk_marker) {
            Some(&high_format)
        } else if risk.contains(&profile.medium_risk_marker) {
            Some(&medium_format)
        } else {
            None
        };

        for (col, value) in row.values().iter().enumerate() {
            let r = (i + 1) as u32;
            let c = col as u16;
            match fill {
                Some(format) => worksheet.write_with_format(r, c, value.as_str(), format),
                None => worksheet.write(r, c, value.as_str()),
            }
            .map_err(|e| format!("Failed to write row {}: {e}", i + 1))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {e}"))?;

    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
