// Integration tests for `alvara check` — full pipeline over text input.
// Run with: cargo test -p alvara-cli --test check_tests -- --nocapture

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

fn alvara() -> Command {
    Command::new(env!("CARGO_BIN_EXE_alvara"))
}

const SENTINEL: &str = "Atividade não encontrada na base de dados";

fn write_base_csv(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("base.csv");
    std::fs::write(
        &path,
        "CNAE,DESCRICAO,GRAU_RISCO,CONDICIONANTES\n\
         4721-1/02,Padaria,médio risco,Vigilância sanitária\n\
         5611-2/01,Restaurante,alto risco,Alvará\n",
    )
    .unwrap();
    path
}

fn run_check(base: &Path, extra: &[&str]) -> std::process::Output {
    let mut args = vec!["check", "--base", base.to_str().unwrap()];
    args.extend_from_slice(extra);
    alvara().args(&args).output().expect("alvara check")
}

// ---------------------------------------------------------------------------
// End-to-end: one matched row, one synthesized row
// ---------------------------------------------------------------------------

#[test]
fn check_matches_and_synthesizes() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_base_csv(&dir);

    let output = run_check(&base, &["--text", "contrato cita 47.21-1-02 e 99.99-9-99"]);
    assert!(output.status.success(), "exit was {:?}", output.status);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Padaria"));
    assert!(stdout.contains("99.99-9-99"));
    assert!(stdout.contains(SENTINEL));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("2 rows reconciled"));
    assert!(stderr.contains("1 matched"));
}

#[test]
fn check_filter_isolates_matched_row() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_base_csv(&dir);

    let output = run_check(
        &base,
        &[
            "--text",
            "47.21-1-02 e 99.99-9-99",
            "--filter",
            "GRAU_RISCO=médio",
        ],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Padaria"));
    assert!(!stdout.contains("99.99-9-99"));
}

#[test]
fn check_sort_reorders_rows_numerically() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_base_csv(&dir);

    // Unsorted output is matched-then-synthesized; an ascending CNAE sort
    // leads with the synthesized row (99 < 4721 numerically).
    let output = run_check(
        &base,
        &["--text", "47.21-1-02 e 99.99-9-99", "--sort", "CNAE"],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let synthesized = stdout.find("99.99-9-99").unwrap();
    let matched = stdout.find("4721-1/02").unwrap();
    assert!(synthesized < matched, "ascending sort should lead with 99.99-9-99");

    // :desc flips it back
    let output = run_check(
        &base,
        &["--text", "47.21-1-02 e 99.99-9-99", "--sort", "CNAE:desc"],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let synthesized = stdout.find("99.99-9-99").unwrap();
    let matched = stdout.find("4721-1/02").unwrap();
    assert!(matched < synthesized, "descending sort should lead with 4721-1/02");
}

#[test]
fn check_json_contract() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_base_csv(&dir);

    let output = run_check(&base, &["--text", "47.21-1-02 e 99.99-9-99", "--json", "-q"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");

    assert_eq!(payload["meta"]["profile"], "pmf");
    assert_eq!(payload["summary"]["matched"], 1);
    assert_eq!(payload["summary"]["unmatched"], 1);
    assert_eq!(payload["columns"][0], "CNAE");

    let rows = payload["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["DESCRICAO"], "Padaria");
    assert_eq!(rows[1]["CNAE"], "99.99-9-99");
    assert_eq!(rows[1]["GRAU_RISCO"], "Alto");
}

#[test]
fn check_reads_text_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_base_csv(&dir);

    let mut child = alvara()
        .args([
            "check",
            "--base",
            base.to_str().unwrap(),
            "--text-file",
            "-",
            "-q",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all("CNAE 56.11-2-01".as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Restaurante"));
}

// ---------------------------------------------------------------------------
// Zero matches: informational, exit 0, no result view
// ---------------------------------------------------------------------------

#[test]
fn check_zero_matches_is_success_without_table() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_base_csv(&dir);
    let export = dir.path().join("resultado.xlsx");

    let output = run_check(
        &base,
        &[
            "--text",
            "nenhum código aqui",
            "-o",
            export.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim().is_empty(), "no result view on zero matches");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no codes matched"));

    // Empty result set produces no downloadable file and no error
    assert!(!export.exists());
}

// ---------------------------------------------------------------------------
// XLSX export
// ---------------------------------------------------------------------------

#[test]
fn check_exports_xlsx() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_base_csv(&dir);
    let export = dir.path().join("resultado.xlsx");

    let output = run_check(
        &base,
        &[
            "--text",
            "47.21-1-02 e 99.99-9-99",
            "-o",
            export.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());
    assert!(export.exists());

    let mut workbook = calamine::open_workbook_auto(&export).unwrap();
    use calamine::Reader;
    let range = workbook.worksheet_range("Resultados").unwrap();
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect();

    assert_eq!(rows.len(), 3, "header + 2 data rows");
    assert_eq!(rows[0][1], "Descrição da Atividade");
    assert_eq!(rows[1][1], "Padaria");
    assert_eq!(rows[2][1], SENTINEL);
}

// ---------------------------------------------------------------------------
// Failure modes map onto the exit-code registry
// ---------------------------------------------------------------------------

#[test]
fn check_missing_reference_column_exits_5() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.csv");
    std::fs::write(&base, "CNAE,DESCRICAO\n4721-1/02,Padaria\n").unwrap();

    let output = run_check(&base, &["--text", "47.21-1-02"]);
    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GRAU_RISCO"));
}

#[test]
fn check_reference_without_rows_exits_5() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.csv");
    std::fs::write(&base, "CNAE,DESCRICAO,GRAU_RISCO,CONDICIONANTES\n").unwrap();

    let output = run_check(&base, &["--text", "47.21-1-02"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn check_missing_reference_file_exits_3() {
    let output = run_check(Path::new("/nonexistent/base.csv"), &["--text", "47.21-1-02"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn check_rejects_non_pdf_document_exits_6() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_base_csv(&dir);
    let doc = dir.path().join("documento.docx");
    std::fs::write(&doc, b"not a pdf").unwrap();

    let output = run_check(&base, &["--pdf", doc.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(6));
}

#[test]
fn check_conflicting_inputs_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_base_csv(&dir);

    let output = run_check(&base, &["--text", "x", "--pdf", "doc.pdf"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn check_no_input_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_base_csv(&dir);

    let output = run_check(&base, &[]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no input provided"));
}

#[test]
fn check_unknown_filter_column_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_base_csv(&dir);

    let output = run_check(&base, &["--text", "47.21-1-02", "--filter", "RISCO=alto"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown column"));
}

#[test]
fn check_unknown_profile_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_base_csv(&dir);

    let output = run_check(&base, &["--text", "x", "--profile", "inexistente"]);
    assert_eq!(output.status.code(), Some(2));
}

// ---------------------------------------------------------------------------
// Custom profile from TOML
// ---------------------------------------------------------------------------

#[test]
fn check_custom_profile_toml() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.csv");
    std::fs::write(&base, "codigo;atividade;risco\n47.21-1-02;Padaria;alto\n").unwrap();

    let profile = dir.path().join("municipal.toml");
    std::fs::write(
        &profile,
        r#"
name = "municipal"
columns = ["codigo", "atividade", "risco"]
pattern = "strict"
risk_column = "risco"
synthesize_unmatched = false
high_risk_marker = "alto"
medium_risk_marker = "médio"
"#,
    )
    .unwrap();

    let output = run_check(
        &base,
        &[
            "--text",
            "licença para 47.21-1-02",
            "--profile",
            profile.to_str().unwrap(),
            "--json",
            "-q",
        ],
    );
    assert!(output.status.success(), "exit was {:?}", output.status);

    let payload: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(payload["meta"]["profile"], "municipal");
    assert_eq!(payload["rows"][0]["atividade"], "Padaria");
}
