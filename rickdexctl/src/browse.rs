//! Interactive browsing over stdin: one line per input event.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::StreamExt;
use rickdex_config::Config;
use rickdex_core::{
    CharacterApi, DialogSelection, QueryCoordinator, QueryOutcome,
    ResultTable,
};
use rickdex_model::{CharacterId, CharacterStatus, FilterField, PageIndex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render;

/// One parsed line of browse input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Anything not starting with `:`.
    Term(String),
    /// `:page N` with a one-based page number.
    Page(PageIndex),
    Next,
    Prev,
    Status(Option<CharacterStatus>),
    Filter(String),
    Field(FilterField),
    Show(CharacterId),
    Pick(CharacterId, FilterField),
    Help,
    Quit,
}

pub const HELP: &str = "\
<text>            search by name (empty line clears)
:page N           jump to page N
:next | :prev     step one page
:status S|any     alive, dead, unknown or any
:filter TEXT      filter shown rows (empty clears)
:field FIELD      status, name, species, type, gender, origin, location
:show ID          show one character
:pick ID FIELD    search for a field of a character
:help
:quit";

impl Input {
    pub fn parse(line: &str) -> Result<Self> {
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Input::Term(line.to_string()));
        };
        let (name, rest) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command.trim(), ""),
        };

        let input = match name {
            "page" => {
                let number: u32 = rest
                    .parse()
                    .with_context(|| format!("invalid page number '{rest}'"))?;
                let page = PageIndex::from_wire(number)
                    .context("page numbers start at 1")?;
                Input::Page(page)
            }
            "next" => Input::Next,
            "prev" => Input::Prev,
            "status" if rest.eq_ignore_ascii_case("any") => Input::Status(None),
            "status" => Input::Status(Some(rest.parse::<CharacterStatus>()?)),
            "filter" => Input::Filter(rest.to_string()),
            "field" => Input::Field(rest.parse::<FilterField>()?),
            "show" => Input::Show(parse_id(rest)?),
            "pick" => {
                let (id, field) = rest
                    .split_once(char::is_whitespace)
                    .context("usage: :pick ID FIELD")?;
                Input::Pick(parse_id(id)?, field.trim().parse::<FilterField>()?)
            }
            "help" => Input::Help,
            "quit" | "q" => Input::Quit,
            other => anyhow::bail!("unknown command ':{other}' (try :help)"),
        };
        Ok(input)
    }
}

fn parse_id(text: &str) -> Result<CharacterId> {
    text.parse()
        .with_context(|| format!("invalid character id '{text}'"))
}

/// Host-side view state: the table, the dialog and the coordinator handle.
struct Browser<W> {
    coordinator: QueryCoordinator,
    table: ResultTable,
    dialog: DialogSelection,
    out: W,
}

impl<W: Write> Browser<W> {
    fn current_page(&self) -> PageIndex {
        self.table
            .current_query()
            .map_or(PageIndex::FIRST, |query| query.page)
    }

    fn handle(&mut self, input: Input) -> Result<()> {
        match input {
            Input::Term(term) => self.coordinator.set_search_term(term)?,
            Input::Page(page) => {
                let bounds = self.table.bounds();
                if bounds.page_count > 0 && !bounds.contains(page) {
                    writeln!(
                        self.out,
                        "only {} pages available",
                        bounds.page_count
                    )?;
                } else {
                    self.coordinator.set_page(page)?;
                }
            }
            Input::Next => {
                match self.table.bounds().next(self.current_page()) {
                    Some(page) => self.coordinator.set_page(page)?,
                    None => writeln!(self.out, "already on the last page")?,
                }
            }
            Input::Prev => {
                match self.table.bounds().previous(self.current_page()) {
                    Some(page) => self.coordinator.set_page(page)?,
                    None => writeln!(self.out, "already on the first page")?,
                }
            }
            Input::Status(status) => self.coordinator.set_status(status)?,
            Input::Filter(filter) => {
                self.table.set_filter(&filter);
                render::table(&mut self.out, &self.table)?;
            }
            Input::Field(field) => {
                self.table.set_filter_field(field);
                render::table(&mut self.out, &self.table)?;
            }
            Input::Show(id) => match self.table.record(id) {
                Some(record) => {
                    render::detail(&mut self.out, record)?;
                    self.dialog.open(record.clone());
                }
                None => writeln!(self.out, "no character #{id} on this page")?,
            },
            Input::Pick(id, field) => {
                let Some(record) = self.table.record(id) else {
                    writeln!(self.out, "no character #{id} on this page")?;
                    return Ok(());
                };
                self.dialog.open(record.clone());
                let value = self.dialog.value_of(field).map(str::to_owned);
                match self.dialog.close(value.as_deref(), &self.coordinator)? {
                    Some(term) => writeln!(self.out, "searching for '{term}'")?,
                    None => writeln!(self.out, "#{id} has no {field}")?,
                }
            }
            Input::Help => writeln!(self.out, "{HELP}")?,
            // Handled by the read loop.
            Input::Quit => {}
        }
        Ok(())
    }

    fn show(&mut self, outcome: &QueryOutcome) -> Result<()> {
        self.table.apply(outcome);
        match outcome {
            QueryOutcome::Loaded(_) => {
                render::table(&mut self.out, &self.table)?
            }
            QueryOutcome::Failed(failure) => {
                render::failure(&mut self.out, failure)?
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Run the browse loop until `:quit` or end of input.
pub async fn run(config: &Config, api: Arc<dyn CharacterApi>) -> Result<()> {
    let coordinator = QueryCoordinator::spawn(api, &config.query);
    let mut results = coordinator.results();
    let mut browser = Browser {
        coordinator: coordinator.clone(),
        table: ResultTable::new(config.table.filter_field),
        dialog: DialogSelection::new(),
        out: std::io::stdout(),
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    debug!("stdin closed");
                    break;
                };
                match Input::parse(&line) {
                    Ok(Input::Quit) => break,
                    Ok(input) => browser.handle(input)?,
                    Err(err) => writeln!(browser.out, "{err:#}")?,
                }
            }
            Some(outcome) = results.next() => browser.show(&outcome)?,
        }
    }

    coordinator.shutdown().await;
    Ok(())
}
