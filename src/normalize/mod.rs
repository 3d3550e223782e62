pub mod merges;

use tracing::{debug, warn};

use crate::dataset::{cell, parse_numeric, Dataset};

/// Demographic lens a survey row belongs to. Source values `CAT1`..`CAT6`.
///
/// This is the partition key that decides which panel a row contributes to.
/// It is read straight off the raw row and never rewritten by normalization;
/// deriving it from the (merged) breakout id instead would corrupt every
/// category-based aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakoutCategory {
    Overall,
    Gender,
    Age,
    Race,
    Education,
    Income,
}

impl BreakoutCategory {
    /// Parse a source category code. Unknown codes yield `None` and match
    /// no panel selector.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "CAT1" => Some(Self::Overall),
            "CAT2" => Some(Self::Gender),
            "CAT3" => Some(Self::Age),
            "CAT4" => Some(Self::Race),
            "CAT5" => Some(Self::Education),
            "CAT6" => Some(Self::Income),
            _ => None,
        }
    }
}

/// One cleaned observation row for a single question: identifier codes
/// normalized, labels rederived, numerics coerced (`None` when the source
/// cell was absent or non-numeric).
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRow {
    pub location: String,
    pub year: Option<i32>,
    pub category: Option<BreakoutCategory>,
    pub breakout_id: String,
    pub break_out: String,
    pub response_id: String,
    pub response: String,
    pub sample_size: Option<f64>,
    pub value: Option<f64>,
}

/// National / territory rollup codes, excluded from per-location analysis.
const NATIONAL_ROLLUPS: &[&str] = &["US", "UW"];

/// Extract and clean all rows for a selected question.
///
/// The question match is exact (case- and text-sensitive). Identifier
/// columns go through the four merge passes in order: response id, response
/// label (from the merged id), breakout id, breakout label (from the merged
/// id). National rollup rows are dropped. A question with no matching rows
/// yields an empty vector; a missing expected column degrades to missing
/// fields with a warning, never a failure.
pub fn load_question(dataset: &Dataset, question_text: &str) -> Vec<QuestionRow> {
    let Some(question_col) = dataset.column("Question") else {
        warn!("dataset has no Question column");
        return Vec::new();
    };

    let location_col = dataset.column("Locationabbr");
    let year_col = dataset.column("Year");
    let category_col = dataset.column("BreakOutCategoryID");
    let breakout_id_col = dataset.column("BreakoutID");
    let break_out_col = dataset.column("Break_Out");
    let response_id_col = dataset.column("ResponseID");
    let response_col = dataset.column("Response");
    let sample_col = dataset.column("Sample_Size");
    // covers both published spellings, `Data_Value` and `Data_value`
    let value_col = dataset.column("Data_Value");
    if sample_col.is_none() {
        warn!("dataset has no Sample_Size column");
    }
    if value_col.is_none() {
        warn!("dataset has no data-value column");
    }

    let mut rows = Vec::new();
    for raw in dataset.rows() {
        if cell(raw, Some(question_col)) != question_text {
            continue;
        }

        let location = cell(raw, location_col).trim().to_string();
        if NATIONAL_ROLLUPS.contains(&location.as_str()) {
            continue;
        }

        let response_id = merges::merge_response_id(cell(raw, response_id_col));
        let response = merges::merge_response_label(&response_id, cell(raw, response_col));
        let breakout_id = merges::merge_breakout_id(cell(raw, breakout_id_col));
        let break_out = merges::merge_breakout_label(&breakout_id, cell(raw, break_out_col));

        rows.push(QuestionRow {
            location,
            year: parse_numeric(cell(raw, year_col)).map(|y| y as i32),
            category: BreakoutCategory::from_code(cell(raw, category_col)),
            breakout_id,
            break_out,
            response_id,
            response,
            sample_size: parse_numeric(cell(raw, sample_col)),
            value: parse_numeric(cell(raw, value_col)),
        });
    }

    debug!(
        question = question_text,
        rows = rows.len(),
        "question slice normalized"
    );
    rows
}
