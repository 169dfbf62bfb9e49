use std::io::{self, Write};

use rickdex_core::{FetchFailure, ResultTable};
use rickdex_model::{CharacterRecord, PageIndex};

const NAME_WIDTH: usize = 32;
const SPECIES_WIDTH: usize = 16;

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width - 1).collect();
    clipped.push('~');
    clipped
}

/// Filtered rows followed by the paging line.
pub fn table<W: Write>(out: &mut W, table: &ResultTable) -> io::Result<()> {
    writeln!(
        out,
        "{:>5}  {:<name$}  {:<8}  {:<species$}  ORIGIN",
        "ID",
        "NAME",
        "STATUS",
        "SPECIES",
        name = NAME_WIDTH,
        species = SPECIES_WIDTH,
    )?;
    for record in table.visible() {
        writeln!(
            out,
            "{:>5}  {:<name$}  {:<8}  {:<species$}  {}",
            record.id.get(),
            clip(&record.name, NAME_WIDTH),
            record.status.as_str(),
            clip(&record.species, SPECIES_WIDTH),
            record.origin.name,
            name = NAME_WIDTH,
            species = SPECIES_WIDTH,
        )?;
    }
    paging(out, table)
}

pub fn paging<W: Write>(out: &mut W, table: &ResultTable) -> io::Result<()> {
    let page = table
        .current_query()
        .map_or(PageIndex::FIRST, |query| query.page);
    write!(
        out,
        "page {}/{} | {} results",
        page.to_wire(),
        table.page_count(),
        table.total_count(),
    )?;
    if !table.filter().is_empty() {
        write!(
            out,
            " | {} shown ({} contains '{}')",
            table.visible_len(),
            table.filter_field(),
            table.filter(),
        )?;
    }
    writeln!(out)
}

pub fn detail<W: Write>(out: &mut W, record: &CharacterRecord) -> io::Result<()> {
    writeln!(out, "#{} {}", record.id, record.name)?;
    writeln!(out, "  status:   {}", record.status)?;
    writeln!(out, "  species:  {}", record.species)?;
    if !record.kind.is_empty() {
        writeln!(out, "  type:     {}", record.kind)?;
    }
    writeln!(out, "  gender:   {}", record.gender)?;
    writeln!(out, "  origin:   {}", record.origin.name)?;
    writeln!(out, "  location: {}", record.location.name)?;
    writeln!(out, "  episodes: {}", record.episode_count())?;
    writeln!(out, "  image:    {}", record.image)?;
    writeln!(out, "  created:  {}", record.created.format("%Y-%m-%d"))
}

pub fn failure<W: Write>(out: &mut W, failure: &FetchFailure) -> io::Result<()> {
    if failure.error.is_not_found() {
        writeln!(out, "no characters match '{}'", failure.query.name)
    } else {
        writeln!(out, "fetch failed: {}", failure.error)
    }
}
