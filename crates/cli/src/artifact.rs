//! Output artifacts: the flattened table (CSV), the raw-record JSON array,
//! and the pair report CSV. An existing table doubles as a cache so analysis
//! reruns skip the API walk.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};

use alertsift_analysis::SimilarPair;
use alertsift_harvest::api::ConditionRecord;
use alertsift_harvest::flatten::FlatRecord;

pub fn write_flat_csv(path: &Path, columns: &[String], records: &[FlatRecord]) -> Result<()> {
    if columns.is_empty() {
        // Nothing harvested; an empty artifact still marks the run as done.
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
        return Ok(());
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|column| record.cell(column)))?;
    }
    writer.flush()?;
    Ok(())
}

/// Headers plus string-typed rows, exactly as written. Cells for columns a
/// given record never had come back as empty strings.
pub fn read_flat_csv(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok((headers, rows))
}

pub fn write_json(path: &Path, records: &[ConditionRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), records)?;
    Ok(())
}

pub fn read_json(path: &Path) -> Result<Vec<ConditionRecord>> {
    let file = File::open(path).with_context(|| format!("reading {}", path.display()))?;
    let records = serde_json::from_reader(BufReader::new(file))?;
    Ok(records)
}

pub fn write_pairs_csv(path: &Path, pairs: &[SimilarPair]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["first", "second", "score"])?;
    for pair in pairs {
        writer.serialize(pair)?;
    }
    writer.flush()?;
    Ok(())
}
