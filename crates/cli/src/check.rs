//! `alvara check` — the full extract → reconcile → classify pipeline.

use alvara_engine::Session;
use alvara_recon::Schema;

use crate::table;
use crate::{resolve_input, resolve_profile, CheckArgs, CliError, RawInput};

pub(crate) fn cmd_check(args: CheckArgs) -> Result<(), CliError> {
    let profile = resolve_profile(&args.profile)?;
    let quiet = args.quiet;
    let mut session = Session::new(profile);

    // Reference table first: processing stays blocked without it.
    if !args.base.exists() {
        return Err(CliError::io(format!(
            "cannot read {}: file not found",
            args.base.display()
        )));
    }
    if !quiet {
        eprintln!("loading reference table {}", args.base.display());
    }
    let table = alvara_io::reference::import(&args.base, session.profile())
        .map_err(CliError::schema)?;
    let row_count = session
        .load_reference(table)
        .map_err(CliError::from_session)?;
    if !quiet {
        eprintln!("reference loaded: {row_count} rows");
    }

    match resolve_input(args.pdf, args.text, args.text_file)? {
        RawInput::Pdf(path) => session
            .set_document(&path)
            .map_err(CliError::from_session)?,
        RawInput::Text(text) => session.set_text(&text),
    }

    if !quiet {
        eprintln!("extracting codes...");
    }
    let (matched, unmatched, total) = {
        let result = session
            .run_processing(|path| alvara_io::pdf::extract_pages(path))
            .map_err(CliError::from_session)?;
        (
            result.summary.matched,
            result.summary.unmatched,
            result.summary.total,
        )
    };
    if !quiet {
        eprintln!("{total} rows reconciled ({matched} matched, {unmatched} not in reference)");
    }

    if total == 0 {
        if !quiet {
            eprintln!("no codes matched the reference data");
        }
        return Ok(());
    }

    let schema = session.schema();
    for spec in &args.filter {
        let (column, value) = spec.split_once('=').ok_or_else(|| {
            CliError::args(format!("invalid --filter '{spec}' (expected COL=SUBSTR)"))
        })?;
        let canonical = canonical_column(&schema, column)?;
        session.set_filter(&canonical, value);
    }
    for spec in &args.sort {
        let (column, descending) = parse_sort(spec)?;
        let canonical = canonical_column(&schema, column)?;
        session.toggle_sort(&canonical);
        if descending {
            session.toggle_sort(&canonical);
        }
    }

    let view = session.compute_view();

    if args.json {
        let rows: Vec<serde_json::Value> = view
            .iter()
            .map(|row| {
                let cells: serde_json::Map<String, serde_json::Value> = schema
                    .columns()
                    .iter()
                    .zip(row.values())
                    .map(|(col, val)| (col.clone(), serde_json::Value::String(val.clone())))
                    .collect();
                serde_json::Value::Object(cells)
            })
            .collect();

        let payload = serde_json::json!({
            "meta": session.result().map(|r| &r.meta),
            "summary": session.result().map(|r| &r.summary),
            "columns": schema.columns(),
            "rows": rows,
        });
        let json_str = serde_json::to_string_pretty(&payload)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        print!("{}", table::render(session.profile(), &schema, &view));
    }

    if let Some(ref path) = args.output {
        let wrote = alvara_io::xlsx::export(path, session.profile(), session.base_rows())
            .map_err(CliError::io)?;
        if !quiet {
            if wrote {
                eprintln!("wrote {}", path.display());
            } else {
                eprintln!("nothing to export");
            }
        }
    }

    Ok(())
}

/// Resolve a user-typed column name to its canonical schema spelling.
fn canonical_column(schema: &Schema, column: &str) -> Result<String, CliError> {
    match schema.index_of(column) {
        Some(idx) => Ok(schema.columns()[idx].clone()),
        None => Err(CliError::args(format!(
            "unknown column '{}' (available: {})",
            column.trim(),
            schema.columns().join(", ")
        ))),
    }
}

/// Parse `COL`, `COL:asc`, or `COL:desc`.
fn parse_sort(spec: &str) -> Result<(&str, bool), CliError> {
    match spec.split_once(':') {
        None => Ok((spec, false)),
        Some((column, "asc")) => Ok((column, false)),
        Some((column, "desc")) => Ok((column, true)),
        Some((_, other)) => Err(CliError::args(format!(
            "invalid sort direction '{other}' (use asc or desc)"
        ))),
    }
}
