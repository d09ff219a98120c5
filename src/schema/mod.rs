// src/schema/mod.rs
use std::collections::HashMap;

/// One column of the unified summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub unit: String,
}

/// Ordered union of every column seen across the processed files.
///
/// Append-only: a column keeps its first-seen position and unit for the
/// whole pipeline run, so the final table has a stable shape even when the
/// input files disagree about which channels they logged.
#[derive(Debug, Clone, Default)]
pub struct ColumnSchema {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
}

impl ColumnSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn unit_of(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&i| self.columns[i].unit.as_str())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Append a column unless it is already present. The first file to
    /// introduce a column also fixes its unit.
    pub fn push(&mut self, name: &str, unit: &str) {
        if self.index.contains_key(name) {
            return;
        }
        self.index.insert(name.to_string(), self.columns.len());
        self.columns.push(Column {
            name: name.to_string(),
            unit: unit.to_string(),
        });
    }

    /// Merge one file's local columns, in that file's order.
    pub fn merge<'a, I>(&mut self, local: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, unit) in local {
            self.push(name, unit);
        }
    }
}

/// Make duplicate header names unique by suffixing the occurrence count:
/// `Temp`, `Temp_2`, `Temp_3`, … The first occurrence keeps its plain name.
pub fn dedup_names(raw: &[String]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    raw.iter()
        .map(|name| {
            let count = seen.entry(name.as_str()).or_insert(0);
            *count += 1;
            if *count == 1 {
                name.clone()
            } else {
                format!("{}_{}", name, count)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn duplicates_get_occurrence_suffixes() {
        let deduped = dedup_names(&names(&["Temp", "Temp", "Press", "Temp"]));
        assert_eq!(deduped, vec!["Temp", "Temp_2", "Press", "Temp_3"]);
    }

    #[test]
    fn merge_is_append_only_and_order_preserving() {
        let mut schema = ColumnSchema::new();
        schema.merge([("Heure", "s"), ("EngSpeed", "tr/min")]);
        let after_a: Vec<String> = schema.names().map(String::from).collect();

        schema.merge([("EngSpeed", "rpm"), ("R_EC.TORQUE", "N.m")]);
        let after_b: Vec<String> = schema.names().map(String::from).collect();

        // schema after A is an ordered prefix of schema after A+B
        assert_eq!(&after_b[..after_a.len()], &after_a[..]);
        assert_eq!(after_b, vec!["Heure", "EngSpeed", "R_EC.TORQUE"]);
        // first-seen unit wins
        assert_eq!(schema.unit_of("EngSpeed"), Some("tr/min"));
    }
}
