//! # Check Engine
//! One run, start to finish: listings → cinema → Unlimited Screenings →
//! films not yet notified → SMS → notifications file → screenings table.
//!
//! Strictly sequential. Each stage hands its output to the next or ends the
//! run with a [`RunError`]; nothing is retried. Only films with at least one
//! unseen show are sent and recorded, but the final table lists every
//! matched screening.

use std::io::Write;

use crate::config::Settings;
use crate::dedup::filter_new_screenings;
use crate::error::RunError;
use crate::ledger::NotificationLedger;
use crate::listings::{Film, ListingsSource};
use crate::matcher::find_unlimited_screenings;
use crate::notify::{DispatchSummary, NotificationTransport, Notifier};
use crate::report::{cinemas_table, screenings_table, Console};
use crate::select::find_cinema;

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub cinema_name: String,
    /// Every Unlimited Screening at the cinema, as shown in the table.
    pub matched: Vec<Film>,
    /// Films with at least one show not in the notifications file.
    pub new_films: Vec<Film>,
    /// `None` when there were no recipients and the notifier never ran.
    pub dispatch: Option<DispatchSummary>,
    pub urls_written: usize,
}

pub async fn run_check<S, T, W>(
    source: &S,
    transport: &T,
    settings: &Settings,
    console: &mut Console<W>,
) -> Result<RunReport, RunError>
where
    S: ListingsSource + ?Sized,
    T: NotificationTransport + ?Sized,
    W: Write,
{
    console.begin("Fetching listings");
    tracing::debug!(source = source.name(), "fetching listings");
    let listings = console.finish(source.fetch_listings().await)?;

    console.begin("Finding cinema");
    let cinema = console.finish(find_cinema(&listings, settings.cinema_id))?;
    tracing::info!(cinema_id = cinema.id, cinema = %cinema.name, "cinema found");

    console.begin(format!(
        "Checking for Unlimited screenings at {}",
        cinema.name
    ));
    let matched = find_unlimited_screenings(&cinema.films);
    console.ok();

    console.begin("Filtering out old Unlimited screenings");
    let ledger = NotificationLedger::new(&settings.notifications_file);
    tracing::debug!(path = %ledger.path().display(), "loading notifications file");
    let seen = console.finish(ledger.load().await)?;
    let new_films = filter_new_screenings(&matched, &seen);
    tracing::info!(
        matched = matched.len(),
        new = new_films.len(),
        seen = seen.len(),
        "screenings filtered"
    );

    let dispatch = if settings.sms_numbers.is_empty() {
        None
    } else {
        console.begin("Sending SMS notifications");
        let res = Notifier::new(transport, &settings.twilio.from, &settings.sms_numbers)
            .with_suppressed(settings.disable_sms)
            .with_verbose(settings.verbose)
            .notify(&new_films, console)
            .await;
        Some(console.finish(res)?)
    };

    console.begin("Writing notifications file");
    let urls_written = console.finish(ledger.append(&new_films).await)?;

    let table = screenings_table(&matched)?;
    if table.is_empty() {
        tracing::info!(cinema = %cinema.name, "no Unlimited screenings listed");
    }
    console.blank();
    console.print(&table.render());

    tracing::info!(
        sent = dispatch.as_ref().map(|d| d.sent).unwrap_or(0),
        urls_written,
        "check finished"
    );

    Ok(RunReport {
        cinema_name: cinema.name.clone(),
        matched,
        new_films,
        dispatch,
        urls_written,
    })
}

/// Print every cinema in the listings as an (ID, Name) table.
pub async fn list_cinemas<S, W>(source: &S, console: &mut Console<W>) -> Result<usize, RunError>
where
    S: ListingsSource + ?Sized,
    W: Write,
{
    console.begin("Fetching listings");
    tracing::debug!(source = source.name(), "fetching listings");
    let listings = console.finish(source.fetch_listings().await)?;

    let table = cinemas_table(&listings.cinemas);
    console.blank();
    console.print(&table.render());
    Ok(table.len())
}
