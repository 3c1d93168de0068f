//! `alvara base` — reference-table inspection.

use std::path::Path;

use crate::{resolve_profile, CliError};

pub(crate) fn cmd_base_validate(base: &Path, profile_name: &str) -> Result<(), CliError> {
    let profile = resolve_profile(profile_name)?;

    if !base.exists() {
        return Err(CliError::io(format!(
            "cannot read {}: file not found",
            base.display()
        )));
    }

    let table = alvara_io::reference::import(base, &profile).map_err(CliError::schema)?;
    table
        .validate()
        .map_err(|e| CliError::schema(e.to_string()))?;

    println!(
        "{} rows, columns: {}",
        table.len(),
        profile.columns.join(", ")
    );
    Ok(())
}
