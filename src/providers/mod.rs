use std::io::{BufRead, Write};

use crate::config::{ConfigStore, SELECTION_ATTEMPTS};
use crate::domain::{Location, Reading};
use crate::errors::SkycastResult;
use crate::fetch::PageSource;

pub mod accu;
pub mod rp5;

/// A weather source site: stable identity, a configured location, and the
/// extraction of a [`Reading`] from fetched HTML.
pub trait WeatherSource: Send + Sync {
    /// Registry id, also the CLI verb and the config section name.
    fn id(&self) -> &'static str;

    /// Human-readable site name.
    fn title(&self) -> &'static str;

    /// Built-in fallback when nothing is persisted for this provider.
    fn default_location(&self) -> Location;

    /// The location resolved at construction time.
    fn location(&self) -> &Location;

    /// Parse a fetched page into a reading. Missing elements omit their
    /// field; `pages` covers sources that need a secondary page.
    fn extract(&self, html: &str, pages: &dyn PageSource) -> Reading;

    /// Interactive location drill-down; persists the final pick under this
    /// provider's id.
    fn configure(
        &self,
        pages: &dyn PageSource,
        store: &mut ConfigStore,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
    ) -> SkycastResult<()>;

    /// Fetch the configured page and extract a reading from it.
    fn run(&self, pages: &dyn PageSource) -> SkycastResult<Reading> {
        let html = pages.page(&self.location().url)?;
        Ok(self.extract(&html, pages))
    }
}

/// Read the persisted location for `provider`, falling back to the built-in
/// default. Called by provider constructors.
pub fn resolve_location(store: &ConfigStore, provider: &str, default: Location) -> Location {
    store.location_for(provider).unwrap_or(default)
}

/// Outcome of one drill-down selection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the candidate list.
    Picked(usize),
    /// The retry budget ran out (or input ended).
    Aborted,
}

/// Prompt for a 1-based selection out of `count` candidates. Non-numeric or
/// out-of-range entries burn one attempt; `SELECTION_ATTEMPTS` failures in a
/// row abort. End of input aborts immediately.
pub fn select_index(
    prompt: &str,
    count: usize,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> SkycastResult<Selection> {
    for attempts_left in (1..=SELECTION_ATTEMPTS).rev() {
        write!(output, "{prompt}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Selection::Aborted);
        }

        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=count).contains(&choice) => {
                return Ok(Selection::Picked(choice - 1));
            }
            _ => {
                writeln!(
                    output,
                    "\nYou entered a wrong location.\n\
                     Enter a number from 1 to {count}.\n\
                     You have {} attempts left.",
                    attempts_left - 1
                )?;
            }
        }
    }

    Ok(Selection::Aborted)
}

/// Collapse an element's text nodes into single-spaced text.
pub(crate) fn element_text(element: scraper::ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a scraped href against the page it came from. Relative paths and
/// non-ASCII characters come out as a full, percent-encoded URL.
pub(crate) fn absolutize(base: &str, href: &str) -> Option<String> {
    let base = url::Url::parse(base).ok()?;
    base.join(href).ok().map(|url| url.to_string())
}

/// Print an enumerated candidate list, 1-based.
pub(crate) fn print_candidates(
    candidates: &[(String, String)],
    output: &mut dyn Write,
) -> SkycastResult<()> {
    for (index, (name, _)) in candidates.iter().enumerate() {
        writeln!(output, "{}. {}", index + 1, name)?;
    }
    writeln!(output)?;
    Ok(())
}
