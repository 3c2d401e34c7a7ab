use std::collections::HashSet;

use crate::results::{ListingRecord, RawListing};

/// Records harvested during a run, in discovery order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<ListingRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes a raw listing and appends it
    pub fn push(&mut self, raw: RawListing) -> &ListingRecord {
        self.records.push(ListingRecord::from(raw));
        &self.records[self.records.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListingRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ListingRecord> {
        self.records
    }

    /// A copy keeping only the first record for each id
    pub fn deduplicated(&self) -> Dataset {
        let mut seen = HashSet::new();
        let records = self
            .records
            .iter()
            .filter(|record| seen.insert(record.id.as_str()))
            .cloned()
            .collect();
        Dataset { records }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a ListingRecord;
    type IntoIter = std::slice::Iter<'a, ListingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
