use serde_json::Value;

use crate::api::ConditionRecord;

/// A condition record flattened to dotted-path scalar fields, in first-seen
/// field order. Threshold terms become `threshold.<index>.<key>` fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    fields: Vec<(String, Value)>,
}

impl FlatRecord {
    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.fields.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Cell rendered for tabular output. Bare strings are unquoted; anything
    /// else keeps its JSON form. Null renders as the empty cell.
    pub fn cell(&self, key: &str) -> String {
        match self.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

pub fn flatten_record(record: &ConditionRecord) -> FlatRecord {
    let mut flat = FlatRecord::default();
    flat.push("id", Value::String(record.id.clone()));
    flat.push("name", Value::String(record.name.clone()));
    flat.push("enabled", Value::Bool(record.enabled));
    if let Some(policy_name) = &record.policy_name {
        flat.push("policyName", Value::String(policy_name.clone()));
    }
    flat.push("nrql.query", Value::String(record.nrql.query.clone()));
    for (key, value) in &record.extra {
        flatten_into(&mut flat, key, value);
    }
    for (index, term) in record.terms.iter().enumerate() {
        for (key, value) in term {
            flat.push(format!("threshold.{index}.{key}"), value.clone());
        }
    }
    flat
}

fn flatten_into(flat: &mut FlatRecord, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(flat, &format!("{prefix}.{key}"), child);
            }
        }
        other => flat.push(prefix.to_string(), other.clone()),
    }
}

/// Union of every column across the record set, first-seen ordered. Term
/// lists vary per record, so the schema can only be known after seeing all of
/// them; a record missing a column gets an empty cell.
pub fn column_union(records: &[FlatRecord]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut columns = Vec::new();
    for record in records {
        for (key, _) in record.fields() {
            if seen.insert(key.clone()) {
                columns.push(key.clone());
            }
        }
    }
    columns
}
