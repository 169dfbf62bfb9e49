//! Passive result table with a local, fetch-free filter.

use std::sync::Arc;

use rickdex_model::{
    CharacterId, CharacterQuery, CharacterRecord, FilterField, PageIndex,
    PageResult,
};

use crate::query::{FetchFailure, QueryOutcome};

/// Paging limits derived from the latest result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageBounds {
    /// Matching records across all pages.
    pub total_count: u32,
    /// Number of pages the API reported.
    pub page_count: u32,
}

impl PageBounds {
    /// Highest valid page index, or `None` when nothing matched.
    pub fn last_index(&self) -> Option<PageIndex> {
        self.page_count.checked_sub(1).map(PageIndex::new)
    }

    /// True when `index` names an existing page.
    pub fn contains(&self, index: PageIndex) -> bool {
        index.get() < self.page_count
    }

    /// The page after `index`, if the server has one.
    pub fn next(&self, index: PageIndex) -> Option<PageIndex> {
        let next = index.next();
        self.contains(next).then_some(next)
    }

    /// Page before `index`, if any.
    pub fn previous(&self, index: PageIndex) -> Option<PageIndex> {
        index.previous()
    }
}

/// Latest page of records plus a client-side filter over one field.
///
/// The table never requests anything; the host feeds it outcomes from the
/// coordinator. Filtering only narrows what is visible: totals always
/// describe the server result.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    page: Option<Arc<PageResult>>,
    query: Option<CharacterQuery>,
    filter: String,
    field: FilterField,
    visible: Vec<usize>,
    last_error: Option<FetchFailure>,
}

impl ResultTable {
    /// Empty table filtering on `field`.
    pub fn new(field: FilterField) -> Self {
        Self {
            field,
            ..Self::default()
        }
    }

    /// Fold one coordinator outcome into the table.
    ///
    /// A failure keeps the previously shown page.
    pub fn apply(&mut self, outcome: &QueryOutcome) {
        match outcome {
            QueryOutcome::Loaded(update) => {
                self.query = Some(update.query.clone());
                self.last_error = None;
                self.replace(Arc::clone(&update.result));
            }
            QueryOutcome::Failed(failure) => {
                self.last_error = Some(failure.clone());
            }
        }
    }

    /// Swap in a new page wholesale.
    pub fn replace(&mut self, page: Arc<PageResult>) {
        self.page = Some(page);
        self.refilter();
    }

    /// Set the filter text. Surrounding whitespace is ignored and matching
    /// is case-insensitive; an empty filter shows every record.
    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.trim().to_lowercase();
        self.refilter();
    }

    /// Change the field the filter matches against.
    pub fn set_filter_field(&mut self, field: FilterField) {
        self.field = field;
        self.refilter();
    }

    /// Normalised filter text.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Field the filter matches against.
    pub fn filter_field(&self) -> FilterField {
        self.field
    }

    /// Records passing the filter, in server order.
    pub fn visible(&self) -> impl Iterator<Item = &CharacterRecord> + '_ {
        let records = self.records();
        self.visible.iter().map(move |&index| &records[index])
    }

    /// Rows passing the filter.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Every record of the stored page, ignoring the filter.
    pub fn records(&self) -> &[CharacterRecord] {
        self.page
            .as_deref()
            .map(|page| page.records.as_slice())
            .unwrap_or_default()
    }

    /// Total matches reported with the latest page.
    pub fn total_count(&self) -> u32 {
        self.page.as_ref().map_or(0, |page| page.total_count)
    }

    /// Pages reported with the latest page.
    pub fn page_count(&self) -> u32 {
        self.page.as_ref().map_or(0, |page| page.page_count)
    }

    /// Paging limits of the latest page.
    pub fn bounds(&self) -> PageBounds {
        PageBounds {
            total_count: self.total_count(),
            page_count: self.page_count(),
        }
    }

    /// Query that produced the stored page.
    pub fn current_query(&self) -> Option<&CharacterQuery> {
        self.query.as_ref()
    }

    /// Failure since the last loaded page, if any.
    pub fn last_error(&self) -> Option<&FetchFailure> {
        self.last_error.as_ref()
    }

    /// Record with `id` on the latest page, ignoring the filter.
    pub fn record(&self, id: CharacterId) -> Option<&CharacterRecord> {
        self.records().iter().find(|record| record.id == id)
    }

    fn refilter(&mut self) {
        let field = self.field;
        let filter = self.filter.as_str();
        let records = self
            .page
            .as_deref()
            .map(|page| page.records.as_slice())
            .unwrap_or_default();

        self.visible = records
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                filter.is_empty()
                    || field.text(record).to_lowercase().contains(filter)
            })
            .map(|(index, _)| index)
            .collect();
    }
}
