//! Reference-table import.
//!
//! The lookup table ships as an Excel workbook or a CSV export of one.
//! Either way the first row is the header, matched case-insensitively
//! against the profile schema, and rows come back in schema column
//! order.

use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use alvara_recon::{load_reference_csv, Profile, ReferenceTable, Row, Schema};

/// Import a reference file, dispatching on extension.
pub fn import(path: &Path, profile: &Profile) -> Result<ReferenceTable, String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "xlsx" | "xls" | "xlsm" | "ods" => import_excel(path, profile),
        "csv" | "txt" => import_csv(path, profile),
        other => Err(format!(
            "unsupported reference file type '.{other}' (use xlsx, xls, ods, or csv)"
        )),
    }
}

fn import_excel(path: &Path, profile: &Profile) -> Result<ReferenceTable, String> {
    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| format!("Failed to open Excel file: {e}"))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names
        .first()
        .ok_or_else(|| "Excel file contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| format!("Failed to read sheet '{first_sheet}': {e}"))?;

    let mut rows_iter = range.rows();
    let header: Vec<String> = rows_iter
        .next()
        .ok_or_else(|| format!("sheet '{first_sheet}' is empty"))?
        .iter()
        .map(|cell| cell_to_string(cell).trim().to_string())
        .collect();
    let header_schema = Schema::new(header);

    let schema = profile.schema();
    let mut projection = Vec::with_capacity(schema.len());
    for column in schema.columns() {
        let idx = header_schema
            .index_of(column)
            .ok_or_else(|| format!("reference data: missing column '{column}'"))?;
        projection.push(idx);
    }

    let mut rows = Vec::new();
    for record in rows_iter {
        let values: Vec<String> = projection
            .iter()
            .map(|&i| record.get(i).map(cell_to_string).unwrap_or_default())
            .collect();
        if values.iter().all(|v| v.trim().is_empty()) {
            continue;
        }
        rows.push(Row::new(values));
    }

    if rows.is_empty() {
        return Err("reference data contains no rows".to_string());
    }

    Ok(ReferenceTable::new(schema, rows))
}

fn import_csv(path: &Path, profile: &Profile) -> Result<ReferenceTable, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    load_reference_csv(&content, profile, delimiter).map_err(|e| e.to_string())
}

/// Codes frequently arrive as numeric cells; render them without a
/// trailing `.0`.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                format!("{f}")
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        other => other.to_string(),
    }
}

/// Read a file as UTF-8, falling back to Windows-1252 (common for
/// Excel-exported CSVs with Portuguese accents).
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Detect the most likely field delimiter by checking consistency across
/// the first few lines. The delimiter producing the most consistent
/// field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn import_csv_comma() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "base.csv",
            "CNAE,DESCRICAO,GRAU_RISCO,CONDICIONANTES\n4721-1/02,Padaria,Médio,\n".as_bytes(),
        );
        let table = import(&path, &Profile::pmf()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].code(), "4721-1/02");
    }

    #[test]
    fn import_csv_sniffs_semicolons() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "base.csv",
            "CNAE;DESCRICAO;GRAU_RISCO;CONDICIONANTES\n4721-1/02;Padaria;Médio;\n5611-2/01;Restaurante;Alto;\n"
                .as_bytes(),
        );
        let table = import(&path, &Profile::pmf()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].values()[1], "Restaurante");
    }

    #[test]
    fn import_csv_windows_1252_fallback() {
        let dir = tempfile::tempdir().unwrap();
        // "Padaria com conservação" in Windows-1252 (0xE7 0xE3 are ç ã)
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"CNAE,DESCRICAO,GRAU_RISCO,CONDICIONANTES\n");
        bytes.extend_from_slice(b"4721-1/02,Padaria com conserva\xe7\xe3o,M\xe9dio,\n");
        let path = write_file(&dir, "base.csv", &bytes);

        let table = import(&path, &Profile::pmf()).unwrap();
        assert_eq!(table.rows()[0].values()[1], "Padaria com conservação");
        assert_eq!(table.rows()[0].values()[2], "Médio");
    }

    #[test]
    fn import_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "base.pdf", b"whatever");
        let err = import(&path, &Profile::pmf()).unwrap_err();
        assert!(err.contains("unsupported reference file type"));
    }

    #[test]
    fn import_csv_missing_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "base.csv", b"CNAE,DESCRICAO\n4721-1/02,Padaria\n");
        let err = import(&path, &Profile::pmf()).unwrap_err();
        assert!(err.contains("missing column"));
    }

    #[test]
    fn import_xlsx_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["CNAE", "DESCRICAO", "GRAU_RISCO", "CONDICIONANTES"]
            .iter()
            .enumerate()
        {
            sheet.write(0, col as u16, *header).unwrap();
        }
        sheet.write(1, 0, "4721-1/02").unwrap();
        sheet.write(1, 1, "Padaria").unwrap();
        sheet.write(1, 2, "Médio").unwrap();
        // Code stored as a number in the second row
        sheet.write(2, 0, 5611201.0).unwrap();
        sheet.write(2, 1, "Restaurante").unwrap();
        sheet.write(2, 2, "Alto").unwrap();
        workbook.save(&path).unwrap();

        let table = import(&path, &Profile::pmf()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].code(), "4721-1/02");
        assert_eq!(table.rows()[1].code(), "5611201");
        assert_eq!(table.rows()[1].values()[3], "");
    }

    #[test]
    fn cell_to_string_drops_integral_float_suffix() {
        assert_eq!(cell_to_string(&Data::Float(4721102.0)), "4721102");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
