use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use alertsift_analysis::{cluster, similar_pairs, ClusterConfig, QueryRecord};
use alertsift_harvest::api::{AlertsClient, ConditionRecord, HttpTransport};
use alertsift_harvest::config::HarvestConfig;
use alertsift_harvest::flatten::{column_union, flatten_record};
use alertsift_harvest::walk::walk;

use crate::{artifact, report, Opts};

const PAIRS_FILE: &str = "similar.csv";

pub async fn run(opts: Opts) -> Result<()> {
    let artifact_path = if opts.json {
        opts.output_file.with_extension("json")
    } else {
        opts.output_file.clone()
    };

    if opts.purge_cache && artifact_path.exists() {
        std::fs::remove_file(&artifact_path)
            .with_context(|| format!("purging {}", artifact_path.display()))?;
        tracing::info!(path = %artifact_path.display(), "purged cached artifact");
    }

    let records = if artifact_path.exists() {
        tracing::info!(path = %artifact_path.display(), "reusing cached artifact");
        load_cached(&artifact_path, opts.json)?
    } else {
        harvest_and_write(&opts, &artifact_path).await?
    };

    if opts.similarity > 0 {
        tracing::info!(threshold = opts.similarity, "discovering similar pairs");
        let pairs = similar_pairs(&records, opts.similarity);
        artifact::write_pairs_csv(Path::new(PAIRS_FILE), &pairs)?;
        report::print_pair_report(&pairs, PAIRS_FILE);
    } else {
        tracing::info!(records = records.len(), "clustering queries");
        let clustering = cluster(&records, &ClusterConfig::default());
        report::print_cluster_report(&clustering);
    }

    Ok(())
}

async fn harvest_and_write(opts: &Opts, artifact_path: &Path) -> Result<Vec<QueryRecord>> {
    let mut config = HarvestConfig::new(opts.api_key.clone());
    if let Some(id) = opts.account_id {
        config = config.with_account(id);
    }
    config.validate().map_err(anyhow::Error::msg)?;

    tracing::info!(account = ?config.account_id, "collecting alert conditions");
    let account_id = config.account_id;
    let transport = HttpTransport::new(&config.endpoint, &config.api_key);
    let client = AlertsClient::new(transport, config.retry);

    let spinner = spinner("Walking accounts, policies and conditions...");
    let walked = walk(&client, account_id).await;
    spinner.finish_and_clear();
    let records = walked.context("harvest failed")?;
    tracing::info!(records = records.len(), "harvest complete");

    if opts.json {
        artifact::write_json(artifact_path, &records)?;
    } else {
        let flat: Vec<_> = records.iter().map(flatten_record).collect();
        let columns = column_union(&flat);
        artifact::write_flat_csv(artifact_path, &columns, &flat)?;
    }
    tracing::info!(path = %artifact_path.display(), "artifact written");

    Ok(records.iter().map(to_query_record).collect())
}

fn to_query_record(record: &ConditionRecord) -> QueryRecord {
    QueryRecord {
        key: record.key(),
        enabled: record.enabled,
        query: record.nrql.query.clone(),
    }
}

fn load_cached(path: &Path, json: bool) -> Result<Vec<QueryRecord>> {
    if json {
        let records = artifact::read_json(path)?;
        Ok(records.iter().map(to_query_record).collect())
    } else {
        let (headers, rows) = artifact::read_flat_csv(path)?;
        query_records_from_table(&headers, &rows)
    }
}

/// Rebuilds analysis input from a cached flattened table. Cells are
/// string-typed after the CSV round trip, so `enabled` is re-parsed.
pub(crate) fn query_records_from_table(
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<Vec<QueryRecord>> {
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("cached table is missing the {name} column"))
    };
    let id = column("id")?;
    let name = column("name")?;
    let enabled = column("enabled")?;
    let query = column("nrql.query")?;

    Ok(rows
        .iter()
        .map(|row| {
            let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or("");
            QueryRecord {
                key: format!("{}:{}", cell(id), cell(name)),
                enabled: cell(enabled).eq_ignore_ascii_case("true"),
                query: cell(query).to_string(),
            }
        })
        .collect())
}

fn spinner(msg: &str) -> ProgressBar {
    let sp = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg}") {
        sp.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "]));
    }
    sp.set_message(msg.to_string());
    sp.enable_steady_tick(Duration::from_millis(80));
    sp
}
