//! Code-consolidation tables for survey identifier columns.
//!
//! Historical survey waves split or renamed response and breakout codes;
//! these tables collapse them back onto canonical codes so strata from
//! different years pool together. Matching is by substring containment:
//! codes are embedded in composite identifier strings, so a rewrite must
//! hit the code wherever it appears in the field. Table order is applied
//! top to bottom and is significant.

/// Older / alternative ResponseID codes -> unified codes.
static RESPONSE_ID_MERGES: &[(&str, &str)] = &[
    ("RESP025", "RESP137"),
    ("RESP026", "RESP172"),
    ("RESP029", "RESP141"),
    ("RESP230", "RESP020"),
    ("RESP231", "RESP020"),
    ("RESP232", "RESP020"),
    ("RESP196", "RESP199"),
    ("RESP197", "RESP199"),
    ("RESP198", "RESP199"),
    ("RESP199", "RESP199"),
    ("RESP200", "RESP008"),
    ("RESP194", "RESP005"),
    ("RESP195", "RESP006"),
];

/// Canonical ResponseID codes -> standardized response labels.
static RESPONSE_LABELS: &[(&str, &str)] = &[
    ("RESP137", "Employed"),
    ("RESP172", "Self-employed"),
    ("RESP141", "Homemaker"),
    ("RESP020", "$50,000+"),
    ("RESP199", "A/A Native, Asian,Other"),
    ("RESP008", "Multiracial"),
    ("RESP005", "White"),
    ("RESP006", "Black"),
];

/// BreakoutID values where brackets were refined over time.
static BREAKOUT_ID_MERGES: &[(&str, &str)] = &[
    ("INCOME01", "INCOME1"),
    ("INCOME02", "INCOME2"),
    ("INCOME03", "INCOME3"),
    ("INCOME04", "INCOME4"),
    ("INCOME05", "INCOME5"),
    ("INCOME06", "INCOME5"),
    ("INCOME07", "INCOME5"),
    ("RACE01", "RACE1"),
    ("RACE02", "RACE2"),
    ("RACE08", "RACE3"),
    ("RACE04", "RACE4"),
    ("RACE05", "RACE4"),
    ("RACE06", "RACE4"),
    ("RACE03", "RACE4"),
    ("RACE07", "RACE5"),
];

/// Canonical BreakoutID codes -> standardized group labels.
static BREAKOUT_LABELS: &[(&str, &str)] = &[
    ("INCOME5", "$50,000+"),
    ("RACE1", "White"),
    ("RACE2", "Black"),
    ("RACE3", "Hispanic"),
    ("RACE4", "A/A Native, Asian,Other"),
    ("RACE5", "Multiracial"),
];

/// Apply each substitution in table order, rewriting the code wherever it
/// appears inside the field.
fn substitute(value: &str, table: &[(&str, &str)]) -> String {
    let mut out = value.to_string();
    for (old, new) in table {
        if out.contains(old) {
            out = out.replace(old, new);
        }
    }
    out
}

/// Overwrite the label for each code the id contains, in table order; a
/// later matching rule wins. Ids matching no rule keep the original label.
fn relabel(id: &str, label: &str, table: &[(&str, &str)]) -> String {
    let mut out = label.to_string();
    for (code, canonical) in table {
        if id.contains(code) {
            out = (*canonical).to_string();
        }
    }
    out
}

/// Merge older / alternative ResponseID codes into unified ones.
pub fn merge_response_id(response_id: &str) -> String {
    substitute(response_id, RESPONSE_ID_MERGES)
}

/// Standardize a response label from its merged ResponseID.
///
/// Two independent steps: the conditional relabel (only ids containing a
/// known code are overwritten), then an unconditional lower-casing of every
/// label, matched or not. Keep them separate; folding the lower-casing into
/// the conditional would skip it for unmatched rows.
pub fn merge_response_label(response_id: &str, label: &str) -> String {
    let relabeled = relabel(response_id, label, RESPONSE_LABELS);
    relabeled.to_lowercase()
}

/// Merge BreakoutID values where brackets were consolidated over time.
pub fn merge_breakout_id(breakout_id: &str) -> String {
    substitute(breakout_id, BREAKOUT_ID_MERGES)
}

/// Standardize a breakout label from its merged BreakoutID. Unlike response
/// labels, breakout labels keep their original casing.
pub fn merge_breakout_label(breakout_id: &str, label: &str) -> String {
    relabel(breakout_id, label, BREAKOUT_LABELS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_id_rewrites_embedded_codes() {
        assert_eq!(merge_response_id("RESP025"), "RESP137");
        // codes embedded in composite identifiers are rewritten in place
        assert_eq!(merge_response_id("2013_RESP230_B"), "2013_RESP020_B");
        assert_eq!(merge_response_id("RESP999"), "RESP999");
    }

    #[test]
    fn response_label_rederived_then_lowercased() {
        assert_eq!(merge_response_label("RESP137", "was employed"), "employed");
        assert_eq!(merge_response_label("X_RESP006_Y", "African American"), "black");
        assert_eq!(merge_response_label("RESP020", "$75,000+"), "$50,000+");
    }

    #[test]
    fn unmatched_response_label_is_still_lowercased() {
        assert_eq!(merge_response_label("RESP999", "Retired"), "retired");
    }

    #[test]
    fn breakout_id_consolidates_brackets() {
        assert_eq!(merge_breakout_id("INCOME06"), "INCOME5");
        assert_eq!(merge_breakout_id("INCOME07"), "INCOME5");
        assert_eq!(merge_breakout_id("RACE08"), "RACE3");
        assert_eq!(merge_breakout_id("RACE03"), "RACE4");
        assert_eq!(merge_breakout_id("AGE01"), "AGE01");
    }

    #[test]
    fn breakout_label_keeps_casing() {
        assert_eq!(merge_breakout_label("INCOME5", "$35,000-$49,999"), "$50,000+");
        assert_eq!(merge_breakout_label("RACE3", "hispanic"), "Hispanic");
        assert_eq!(merge_breakout_label("AGE01", "Age 18-24"), "Age 18-24");
    }
}
