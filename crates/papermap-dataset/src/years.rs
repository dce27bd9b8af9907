use crate::documents::{PaperRecord, YearValue};
use papermap_core::PaperId;
use std::collections::{BTreeMap, HashMap};

/// `paperIdToYear`, with years normalized to strings.
#[derive(Debug, Default, Clone)]
pub struct YearIndex {
    years: HashMap<PaperId, String>,
}

impl YearIndex {
    pub fn from_records(records: impl IntoIterator<Item = PaperRecord>) -> Self {
        let years = records
            .into_iter()
            .filter_map(|record| {
                let year = record.year.as_ref().and_then(YearValue::normalized)?;
                Some((record.id, year))
            })
            .collect();
        Self { years }
    }

    pub fn extend(&mut self, years: BTreeMap<String, String>) {
        self.years
            .extend(years.into_iter().map(|(id, year)| (PaperId(id), year)));
    }

    pub fn year_of(&self, paper: &str) -> Option<&str> {
        self.years.get(paper).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}
