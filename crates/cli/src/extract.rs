//! `alvara extract` — extraction without reconciliation.

use std::path::Path;

use alvara_engine::ACCEPTED_DOCUMENT_EXTENSIONS;
use alvara_recon::ExtractedCodes;

use crate::{resolve_input, resolve_profile, CliError, ExtractArgs, RawInput};

pub(crate) fn cmd_extract(args: ExtractArgs) -> Result<(), CliError> {
    let profile = resolve_profile(&args.profile)?;

    let codes: ExtractedCodes = match resolve_input(args.pdf, args.text, args.text_file)? {
        RawInput::Pdf(path) => {
            validate_document(&path)?;
            let pages = alvara_io::pdf::extract_pages(&path).map_err(CliError::extract)?;
            alvara_recon::extract_pages(profile.pattern, pages.iter().map(String::as_str))
        }
        RawInput::Text(text) => alvara_recon::extract(profile.pattern, &text),
    };

    if args.json {
        let items: Vec<serde_json::Value> = codes
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "key": entry.key,
                    "original": entry.original,
                })
            })
            .collect();
        let json_str = serde_json::to_string_pretty(&serde_json::Value::Array(items))
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        for entry in codes.iter() {
            println!("{}\t{}", entry.key, entry.original);
        }
    }

    if !args.quiet {
        eprintln!("{} unique codes found", codes.len());
    }

    Ok(())
}

fn validate_document(path: &Path) -> Result<(), CliError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if ACCEPTED_DOCUMENT_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(CliError::input_type(format!(
            "invalid input file '.{extension}' (accepted: {})",
            ACCEPTED_DOCUMENT_EXTENSIONS.join(", ")
        )))
    }
}
