use csv::StringRecord;

/// One CSV record keyed by its header names, in file column order.
///
/// Institutions rename and drop columns between export vintages, so lookups
/// are by name and a column may simply be absent. A short record (fewer
/// values than headers) has no entry for the trailing columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn from_record(headers: &StringRecord, record: &StringRecord) -> Self {
        headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.trim().to_string(), value.to_string()))
            .collect()
    }

    /// Value of the first column named `column`, if present.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// First present column out of `aliases`, tried in order.
    pub fn get_first(&self, aliases: &[&'static str]) -> Option<(&'static str, &str)> {
        aliases
            .iter()
            .find_map(|alias| self.get(alias).map(|value| (*alias, value)))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
