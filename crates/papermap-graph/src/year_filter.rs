use papermap_core::PaperId;
use papermap_dataset::{Dataset, YearIndex};

/// Narrows paper lists to one publication year.
///
/// Papers without a known year are kept. Without a selection, or when the
/// dataset has no year index, the filter is the identity.
#[derive(Debug, Clone, Copy)]
pub struct YearFilter<'a> {
    active: Option<(&'a YearIndex, &'a str)>,
}

impl<'a> YearFilter<'a> {
    pub fn new(dataset: &'a Dataset, selected_year: Option<&'a str>) -> Self {
        let active = match selected_year {
            Some(year) if !dataset.check_year_index() => Some((&dataset.years, year)),
            _ => None,
        };
        Self { active }
    }

    pub fn identity() -> Self {
        Self { active: None }
    }

    pub fn is_identity(&self) -> bool {
        self.active.is_none()
    }

    pub fn keeps(&self, paper: &str) -> bool {
        match self.active {
            Some((years, selected)) => years.year_of(paper).is_none_or(|year| year == selected),
            None => true,
        }
    }

    pub fn filter_papers<'p>(&self, paper_ids: impl IntoIterator<Item = &'p PaperId>) -> Vec<PaperId> {
        paper_ids
            .into_iter()
            .filter(|paper| self.keeps(paper.as_str()))
            .cloned()
            .collect()
    }
}
