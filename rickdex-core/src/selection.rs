//! Detail dialog state and the hand-off of a chosen value to the search.

use rickdex_model::{CharacterRecord, FilterField};
use tracing::debug;

use crate::error::Result;

/// Receiver of search terms picked outside the search input.
pub trait SearchTermSink {
    /// Submit `term` as the new search term.
    fn set_search_term(&self, term: String) -> Result<()>;
}

/// Which record, if any, the detail dialog is showing.
#[derive(Debug, Clone, Default)]
pub struct DialogSelection {
    open: Option<CharacterRecord>,
}

impl DialogSelection {
    /// Closed dialog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `record`, replacing whatever was open.
    pub fn open(&mut self, record: CharacterRecord) {
        debug!(id = %record.id, "dialog opened");
        self.open = Some(record);
    }

    /// Record shown in the dialog, if open.
    pub fn current(&self) -> Option<&CharacterRecord> {
        self.open.as_ref()
    }

    /// True while a record is shown.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Text of `field` on the open record.
    pub fn value_of(&self, field: FilterField) -> Option<&str> {
        self.open.as_ref().map(|record| field.text(record))
    }

    /// Close the dialog. A non-empty `value` becomes the new search term and
    /// is returned so the host can show it in its input; `None` or `""`
    /// closes without side effects.
    pub fn close<S>(
        &mut self,
        value: Option<&str>,
        sink: &S,
    ) -> Result<Option<String>>
    where
        S: SearchTermSink + ?Sized,
    {
        self.open = None;
        match value {
            Some(value) if !value.is_empty() => {
                debug!(term = %value, "dialog closed with search term");
                sink.set_search_term(value.to_string())?;
                Ok(Some(value.to_string()))
            }
            _ => Ok(None),
        }
    }
}
