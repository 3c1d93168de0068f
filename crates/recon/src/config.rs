use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ReconError;
use crate::extract::CodePattern;
use crate::model::Schema;

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// One tool variant: which columns the reference table carries, which
/// extraction pattern applies, and how non-matches are handled.
///
/// Two profiles ship built in (`pmf`, `sanitario`); custom ones load from
/// TOML. The profile's column list is the reference schema, first column
/// = code column, second column = description column (used for the
/// not-found sentinel when synthesis is enabled).
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub name: String,
    pub columns: Vec<String>,
    /// On-screen / export header names. Undeclared columns fall back to
    /// the capitalized raw name.
    #[serde(default)]
    pub display_names: HashMap<String, String>,
    /// Export column widths in characters. Undeclared columns use
    /// `DEFAULT_EXPORT_WIDTH`.
    #[serde(default)]
    pub export_widths: HashMap<String, f64>,
    #[serde(default = "default_pattern")]
    pub pattern: CodePattern,
    /// Column whose value carries the risk classification.
    pub risk_column: String,
    /// Whether extracted codes absent from the reference table produce a
    /// synthesized high-risk row.
    #[serde(default)]
    pub synthesize_unmatched: bool,
    #[serde(default = "default_sentinel")]
    pub sentinel_description: String,
    #[serde(default = "default_high_risk_label")]
    pub high_risk_label: String,
    /// Substring (lowercase) marking a high-risk classification value.
    pub high_risk_marker: String,
    /// Substring (lowercase) marking a medium-risk classification value.
    pub medium_risk_marker: String,
}

pub const DEFAULT_EXPORT_WIDTH: f64 = 25.0;

fn default_pattern() -> CodePattern {
    CodePattern::Lenient
}

fn default_sentinel() -> String {
    "Atividade não encontrada na base de dados".into()
}

fn default_high_risk_label() -> String {
    "Alto".into()
}

impl Profile {
    /// Four-column municipal profile with not-found synthesis. This is
    /// the canonical behavior; `sanitario` is the same pipeline with
    /// synthesis disabled.
    pub fn pmf() -> Self {
        Self {
            name: "pmf".into(),
            columns: vec![
                "CNAE".into(),
                "DESCRICAO".into(),
                "GRAU_RISCO".into(),
                "CONDICIONANTES".into(),
            ],
            display_names: HashMap::from([
                ("CNAE".into(), "CNAE".into()),
                ("DESCRICAO".into(), "Descrição da Atividade".into()),
                ("GRAU_RISCO".into(), "Classificação".into()),
                ("CONDICIONANTES".into(), "Condicionantes".into()),
            ]),
            export_widths: HashMap::from([("DESCRICAO".into(), 85.0)]),
            pattern: CodePattern::Lenient,
            risk_column: "GRAU_RISCO".into(),
            synthesize_unmatched: true,
            sentinel_description: default_sentinel(),
            high_risk_label: default_high_risk_label(),
            high_risk_marker: "alto".into(),
            medium_risk_marker: "médio".into(),
        }
    }

    /// Three-column sanitary-license profile: strict pattern, no
    /// synthesized rows.
    pub fn sanitario() -> Self {
        Self {
            name: "sanitario".into(),
            columns: vec!["CNAE".into(), "descricao".into(), "classificacao".into()],
            display_names: HashMap::from([
                ("CNAE".into(), "CNAE".into()),
                ("descricao".into(), "Descrição da Atividade".into()),
                ("classificacao".into(), "Classificação".into()),
            ]),
            export_widths: HashMap::from([("descricao".into(), 85.0)]),
            pattern: CodePattern::Strict,
            risk_column: "classificacao".into(),
            synthesize_unmatched: false,
            sentinel_description: default_sentinel(),
            high_risk_label: default_high_risk_label(),
            high_risk_marker: "iii - alto".into(),
            medium_risk_marker: "ii - médio".into(),
        }
    }

    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "pmf" => Some(Self::pmf()),
            "sanitario" => Some(Self::sanitario()),
            _ => None,
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let profile: Profile =
            toml::from_str(input).map_err(|e| ReconError::ProfileParse(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.columns.len() < 2 {
            return Err(ReconError::ProfileValidation(format!(
                "at least 2 columns are required, got {}",
                self.columns.len()
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for col in &self.columns {
            if !seen.insert(col.trim().to_lowercase()) {
                return Err(ReconError::ProfileValidation(format!(
                    "duplicate column '{col}'"
                )));
            }
        }

        let schema = self.schema();
        match schema.index_of(&self.risk_column) {
            None => {
                return Err(ReconError::ProfileValidation(format!(
                    "risk column '{}' is not in the column list",
                    self.risk_column
                )))
            }
            Some(0) => {
                return Err(ReconError::ProfileValidation(
                    "risk column cannot be the code column".into(),
                ))
            }
            Some(_) => {}
        }

        Ok(())
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.iter().cloned())
    }

    /// Header label for a column: declared display name, or the raw name
    /// with its first letter capitalized.
    pub fn display_name(&self, column: &str) -> String {
        if let Some(name) = self.display_names.get(column) {
            return name.clone();
        }
        let mut chars = column.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }

    pub fn export_width(&self, column: &str) -> f64 {
        self.export_widths
            .get(column)
            .copied()
            .unwrap_or(DEFAULT_EXPORT_WIDTH)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
