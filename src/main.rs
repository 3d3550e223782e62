use anyhow::{anyhow, Result};
use rayon::prelude::*;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use prevpanel::aggregate::{
    self, apply_filter, best_response_by_location, FilterMode, GroupRecord,
};
use prevpanel::config::Config;
use prevpanel::dataset;
use prevpanel::normalize::{self, QuestionRow};

type PanelFn = fn(&[QuestionRow]) -> Vec<GroupRecord>;

/// The eight named panels, in display order.
static PANELS: &[(&str, PanelFn)] = &[
    ("overall", aggregate::aggregate_overall),
    ("gender", aggregate::aggregate_gender),
    ("age", aggregate::aggregate_age),
    ("race", aggregate::aggregate_race),
    ("education", aggregate::aggregate_education),
    ("income", aggregate::aggregate_income),
    ("temporal", aggregate::aggregate_temporal),
    ("location", aggregate::aggregate_location),
];

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("startup");

    // ─── 2) resolve config + arguments ───────────────────────────────
    let config = Config::load()?;
    let mut args = env::args().skip(1);
    let dataset_path = args
        .next()
        .map(PathBuf::from)
        .or_else(|| config.dataset.clone())
        .ok_or_else(|| anyhow!("usage: prevpanel <DATASET_CSV> <QUESTION> [all|more|less]"))?;
    let question = args
        .next()
        .or_else(|| config.question.clone())
        .ok_or_else(|| anyhow!("no question given (argument or config file)"))?;
    let mode = match args.next() {
        Some(raw) => raw.parse::<FilterMode>()?,
        None => config.filter.unwrap_or(FilterMode::All),
    };

    // ─── 3) load + clean the dataset ─────────────────────────────────
    let mut ds = dataset::load_csv(&dataset_path)?;
    dataset::strip_calculated_questions(&mut ds);
    info!(rows = ds.len(), "dataset ready");

    // ─── 4) normalize the selected question ──────────────────────────
    let rows = normalize::load_question(&ds, &question);
    info!(question = %question, rows = rows.len(), "question normalized");

    // ─── 5) compute panels in parallel ───────────────────────────────
    // each panel is a pure function of the normalized slice, so they
    // fan out with no coordination
    let panels: Vec<(&str, Vec<GroupRecord>)> = PANELS
        .par_iter()
        .map(|(name, panel)| (*name, apply_filter(panel(&rows), mode)))
        .collect();

    // the map reduction works off the unfiltered geographic panel
    let map = best_response_by_location(&aggregate::aggregate_location(&rows));

    // ─── 6) emit JSON on stdout ──────────────────────────────────────
    let mut panel_map = serde_json::Map::new();
    for (name, records) in panels {
        panel_map.insert(name.to_string(), serde_json::to_value(records)?);
    }
    panel_map.insert("map".to_string(), serde_json::to_value(map)?);

    let mut output = serde_json::Map::new();
    output.insert("question".to_string(), question.clone().into());
    output.insert("filter".to_string(), serde_json::to_value(mode)?);
    output.insert("panels".to_string(), panel_map.into());
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::Value::Object(output))?
    );

    info!("done");
    Ok(())
}
