// tests/listings_fixture.rs
mod common;

use common::{ledger_lines, settings, RecordingTransport};
use unliminotify::listings::{FixtureListingsSource, ListingsSource};
use unliminotify::report::Console;
use unliminotify::{list_cinemas, run_check};

const FIXTURE: &str = include_str!("fixtures/listings.xml");

#[tokio::test]
async fn fixture_parses_with_entities_decoded() {
    let source = FixtureListingsSource::from_fixture(FIXTURE);
    let listings = source.fetch_listings().await.unwrap();

    assert_eq!(source.name(), "fixture");
    assert_eq!(listings.cinemas.len(), 2);
    let aberdeen = &listings.cinemas[0];
    assert_eq!(aberdeen.films.len(), 2);
    assert_eq!(
        aberdeen.films[1].shows[0].url,
        "https://www.cineworld.co.uk/booking?performance=2001&site=1"
    );
}

#[tokio::test]
async fn check_against_fixture_feed() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("notifications");

    let source = FixtureListingsSource::from_fixture(FIXTURE);
    let transport = RecordingTransport::default();
    let mut cfg = settings(&ledger, &["+441111"]);
    cfg.cinema_id = 2;
    let mut console = Console::plain(Vec::new());

    let report = run_check(&source, &transport, &cfg, &mut console)
        .await
        .unwrap();
    assert_eq!(report.cinema_name, "Ashford");

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].body,
        "Y on Thu  8 Mar @ 19:45: https://www.cineworld.co.uk/booking?performance=3001&site=2"
    );
    assert_eq!(
        ledger_lines(&ledger),
        vec!["https://www.cineworld.co.uk/booking?performance=3001&site=2"]
    );
}

#[tokio::test]
async fn cinemas_table_lists_every_cinema() {
    let source = FixtureListingsSource::from_fixture(FIXTURE);
    let mut console = Console::plain(Vec::new());
    let n = list_cinemas(&source, &mut console).await.unwrap();
    assert_eq!(n, 2);

    let out = String::from_utf8(console.into_inner()).unwrap();
    assert!(out.contains("| 1  | Aberdeen - Queens Links |"));
    assert!(out.contains("| 2  | Ashford                 |"));
}

#[tokio::test]
async fn broken_feed_is_a_parse_failure() {
    let source = FixtureListingsSource::from_fixture("<cinemas><cinema id=\"x\"");
    let mut console = Console::plain(Vec::new());
    let err = list_cinemas(&source, &mut console).await.unwrap_err();
    assert_eq!(err.kind(), "parse");

    let out = String::from_utf8(console.into_inner()).unwrap();
    assert_eq!(out, "Fetching listings... ERROR\n");
}
