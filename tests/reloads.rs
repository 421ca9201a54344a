//! Platform commits and channel switches, including rollback on failure.

mod common;

use common::{config, gateway, Harness};
use conda_browse::app::Severity;
use conda_browse::domain::Platform;
use conda_browse::{Event, Mode};
use std::collections::BTreeSet;

fn default_selection() -> BTreeSet<Platform> {
    BTreeSet::from([Platform::Linux64, Platform::NoArch])
}

/// Opens the platform selector and adds osx-64 to the draft.
fn add_osx(harness: &mut Harness) {
    harness.send(Event::OpenPlatforms);
    assert_eq!(harness.state.mode, Mode::Platforms);
    harness.send(Event::MoveDown);
    harness.send(Event::TogglePlatform);
    assert_eq!(
        harness.state.status,
        "3 platforms selected. Press Enter to apply.\nSelect default platforms"
    );
}

#[tokio::test]
async fn applying_platforms_reloads_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let mut harness = Harness::start(gateway(), &config(dir.path()));
    harness.settle().await;

    add_osx(&mut harness);
    harness.send(Event::Select);
    assert!(harness.state.loading);
    assert!(harness.state.records.get("numpy").is_none());
    assert!(harness.state.details.is_empty());

    harness.settle().await;
    assert_eq!(harness.state.mode, Mode::Packages);
    assert_eq!(harness.state.catalog.selected.len(), 3);
    assert!(harness.state.visible.contains(&"zlib".to_string()));
    assert_eq!(harness.state.status, "6 packages in selection.");
}

#[tokio::test]
async fn failed_platform_apply_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    let flaky = gateway().with_unreachable(Platform::Osx64);
    let mut harness = Harness::start(flaky, &config(dir.path()));
    harness.settle().await;
    harness.send(Event::MoveDown);
    harness.send(Event::MoveDown);
    harness.settle().await;

    add_osx(&mut harness);
    harness.send(Event::Select);
    harness.settle().await;

    let state = &harness.state;
    assert_eq!(state.mode, Mode::Packages);
    assert_eq!(state.catalog.selected, default_selection());
    assert_eq!(state.visible.len(), 5);
    assert_eq!(state.highlighted_package(), Some("requests"));
    assert!(state.records.get("numpy").is_some());
    assert!(state.status.starts_with("Failed to load selected platforms:"));
    let notification = state.notification.as_ref().unwrap();
    assert_eq!(notification.severity, Severity::Error);
    assert_eq!(notification.title, "Platforms");
}

#[tokio::test]
async fn toggle_all_then_cancel_keeps_committed_selection() {
    let dir = tempfile::tempdir().unwrap();
    let mut harness = Harness::start(gateway(), &config(dir.path()));
    harness.settle().await;

    harness.send(Event::OpenPlatforms);
    harness.send(Event::ToggleAllPlatforms);
    assert_eq!(harness.state.editor.as_ref().unwrap().draft().len(), 3);
    harness.send(Event::ToggleAllPlatforms);
    assert_eq!(harness.state.editor.as_ref().unwrap().draft(), &default_selection());

    harness.send(Event::Back);
    assert_eq!(harness.in_flight(), 0);
    assert_eq!(harness.state.mode, Mode::Packages);
    assert_eq!(harness.state.catalog.selected, default_selection());
}

#[tokio::test]
async fn last_platform_cannot_be_deselected() {
    let dir = tempfile::tempdir().unwrap();
    let single = conda_browse::Config {
        platforms: vec![Platform::NoArch],
        ..config(dir.path())
    };
    let mut harness = Harness::start(gateway(), &single);
    harness.settle().await;

    harness.send(Event::OpenPlatforms);
    harness.send(Event::End);
    harness.send(Event::TogglePlatform);

    assert_eq!(harness.state.status, "At least one platform must remain selected.");
    assert_eq!(
        harness.state.editor.as_ref().unwrap().draft(),
        &BTreeSet::from([Platform::NoArch])
    );
}

#[tokio::test]
async fn switching_channel_loads_new_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let mut harness = Harness::start(gateway(), &config(dir.path()));
    harness.settle().await;

    harness.send(Event::EditChannel);
    harness.type_text("bioconda");
    harness.send(Event::Select);
    assert!(harness.state.channel_draft.is_none());
    harness.settle().await;

    assert_eq!(harness.state.channel, "bioconda");
    assert_eq!(harness.state.visible, vec!["bwa", "samtools"]);
    assert!(harness.detail().starts_with("# bwa"));
    let notification = harness.state.notification.as_ref().unwrap();
    assert_eq!(notification.message, "Switched to channel: bioconda");
}

#[tokio::test]
async fn failed_channel_switch_restores_previous_channel() {
    let dir = tempfile::tempdir().unwrap();
    let mut harness = Harness::start(gateway(), &config(dir.path()));
    harness.settle().await;
    harness.send(Event::MoveDown);
    harness.send(Event::MoveDown);
    harness.settle().await;
    assert_eq!(harness.state.highlighted_package(), Some("requests"));

    harness.send(Event::EditChannel);
    harness.type_text("nope");
    harness.send(Event::Select);
    assert_eq!(harness.state.channel, "nope");
    harness.settle().await;

    let state = &harness.state;
    assert_eq!(state.channel, "conda-forge");
    assert_eq!(state.visible.len(), 5);
    assert_eq!(state.highlighted_package(), Some("requests"));
    assert!(harness.detail().starts_with("# requests"));
    assert!(state.records.get("numpy").is_some());
    assert!(!state.loading);
    let notification = state.notification.as_ref().unwrap();
    assert_eq!(notification.severity, Severity::Error);
    assert_eq!(notification.message, "Failed to load channel: nope");
}

#[tokio::test]
async fn empty_or_unchanged_channel_does_not_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut harness = Harness::start(gateway(), &config(dir.path()));
    harness.settle().await;

    harness.send(Event::EditChannel);
    harness.send(Event::Select);
    assert_eq!(harness.state.notification.as_ref().unwrap().message, "Channel cannot be empty.");
    assert!(harness.state.channel_draft.is_some());

    harness.type_text("conda-forge");
    harness.send(Event::Select);
    assert!(harness.state.channel_draft.is_none());
    assert!(!harness.state.loading);
    assert_eq!(harness.in_flight(), 0);
}
