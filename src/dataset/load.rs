use anyhow::{Context, Result};
use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

use super::{cell, Dataset};

/// Questions carrying this marker are derived columns recomputed by the
/// publisher, not reported survey items; they never have prevalence rows.
static CALCULATED_QUESTION: Lazy<Regex> =
    Lazy::new(|| Regex::new("(?i)variable calculated").expect("hardcoded pattern"));

/// Read a delimited survey export into memory.
///
/// Ragged rows are tolerated: rows shorter than the header are padded with
/// empty cells, longer rows are cut back to the header width. Cell contents
/// are kept verbatim; coercion happens per question during normalization.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open dataset file: {:?}", path.as_ref()))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = rdr
        .headers()
        .context("reading CSV header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut ragged = 0usize;
    for (idx, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("CSV parse error at record {}", idx))?;
        if record.len() != headers.len() {
            ragged += 1;
        }
        let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }
    if ragged > 0 {
        warn!(ragged, "rows did not match header width; padded or truncated");
    }
    debug!(rows = rows.len(), columns = headers.len(), "dataset loaded");

    Ok(Dataset::new(headers, rows))
}

/// Drop rows whose question text marks a calculated variable. Calculated
/// variables never appear in the prevalence rows, so keeping them would only
/// pollute the question options. No `Question` column means nothing to do.
pub fn strip_calculated_questions(dataset: &mut Dataset) {
    let Some(question_col) = dataset.column("Question") else {
        warn!("dataset has no Question column; nothing to strip");
        return;
    };
    let before = dataset.len();
    dataset.retain_rows(|row| !CALCULATED_QUESTION.is_match(cell(row, Some(question_col))));
    debug!(
        dropped = before - dataset.len(),
        "stripped calculated-variable rows"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().expect("temp file");
        tmp.write_all(content.as_bytes()).expect("write fixture");
        tmp
    }

    #[test]
    fn loads_headers_and_rows() -> Result<()> {
        let tmp = write_csv(
            "Question,Locationabbr,Sample_Size\n\
             Do you smoke?,CA,120\n\
             Do you smoke?,NY,95\n",
        );
        let ds = load_csv(tmp.path())?;
        assert_eq!(ds.headers(), &["Question", "Locationabbr", "Sample_Size"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(cell(&ds.rows()[1], ds.column("Locationabbr")), "NY");
        Ok(())
    }

    #[test]
    fn pads_short_rows_to_header_width() -> Result<()> {
        let tmp = write_csv(
            "Question,Locationabbr,Sample_Size\n\
             Do you smoke?,CA\n",
        );
        let ds = load_csv(tmp.path())?;
        assert_eq!(ds.rows()[0].len(), 3);
        assert_eq!(cell(&ds.rows()[0], ds.column("Sample_Size")), "");
        Ok(())
    }

    #[test]
    fn strips_calculated_questions_case_insensitively() -> Result<()> {
        let tmp = write_csv(
            "Question,Locationabbr\n\
             Do you smoke?,CA\n\
             Obesity (Variable Calculated from BMI),CA\n\
             heavy drinkers (variable calculated),NY\n",
        );
        let mut ds = load_csv(tmp.path())?;
        strip_calculated_questions(&mut ds);
        assert_eq!(ds.len(), 1);
        assert_eq!(cell(&ds.rows()[0], Some(0)), "Do you smoke?");
        Ok(())
    }

    #[test]
    fn strip_is_a_noop_without_question_column() -> Result<()> {
        let tmp = write_csv("Locationabbr,Sample_Size\nCA,120\n");
        let mut ds = load_csv(tmp.path())?;
        strip_calculated_questions(&mut ds);
        assert_eq!(ds.len(), 1);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_csv("/no/such/file.csv").is_err());
    }
}
