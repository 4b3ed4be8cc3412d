//! End-to-end scenarios: scripted provider -> concurrent scrape -> dated
//! directory on disk.

mod common;

use common::fixtures::{Scripted, ScriptedProvider, channels, scraper_with_output};
use iptv_dl::{Error, PlaylistWriter, ScrapeError, TimeWindow};
use tempfile::tempdir;

#[tokio::test]
async fn two_documents_become_two_numbered_files() {
    let base = tempdir().unwrap();
    let provider = ScriptedProvider::new().channel(
        "sky calcio",
        vec![
            Scripted::Payload(vec![b'a'; 100]),
            Scripted::Payload(vec![b'b'; 200]),
        ],
    );
    let (scraper, config) = scraper_with_output(provider, base.path());

    let playlists = scraper
        .scrape(&channels(&["sky calcio"]), TimeWindow::Day)
        .await
        .unwrap();
    assert_eq!(playlists.len(), 2);

    let persisted = PlaylistWriter::new(config.output)
        .persist(&playlists)
        .await
        .unwrap();

    let dir_name = persisted.directory.file_name().unwrap().to_string_lossy();
    assert!(dir_name.starts_with("data_"), "dated directory: {dir_name}");
    assert_eq!(
        std::fs::read(persisted.directory.join("iptv1.m3u"))
            .unwrap()
            .len(),
        100
    );
    assert_eq!(
        std::fs::read(persisted.directory.join("iptv2.m3u"))
            .unwrap()
            .len(),
        200
    );
    // exactly N files, no gaps or extras
    assert_eq!(std::fs::read_dir(&persisted.directory).unwrap().count(), 2);
}

#[tokio::test]
async fn channels_with_uneven_result_counts_aggregate() {
    let base = tempdir().unwrap();
    let provider = ScriptedProvider::new()
        .channel("a", vec![Scripted::Payload(b"only one".to_vec())])
        .channel("b", vec![]);
    let (scraper, _config) = scraper_with_output(provider, base.path());

    let playlists = scraper
        .scrape(&channels(&["a", "b"]), TimeWindow::Day)
        .await
        .unwrap();

    assert_eq!(playlists.len(), 1);
    assert_eq!(playlists[0].data(), b"only one");
}

#[tokio::test]
async fn failed_run_reaches_disk_with_nothing() {
    let base = tempdir().unwrap();
    let provider =
        ScriptedProvider::new().channel("a", vec![Scripted::Broken("stream went away")]);
    let (scraper, _config) = scraper_with_output(provider, base.path());

    let err = scraper
        .scrape(&channels(&["a"]), TimeWindow::Day)
        .await
        .unwrap_err();
    match err {
        Error::Scrape(ScrapeError::Read { channel, .. }) => assert_eq!(channel, "a"),
        other => panic!("unexpected error: {other}"),
    }

    // the writer is only invoked on success, so the base dir stays empty
    assert_eq!(std::fs::read_dir(base.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn empty_channel_list_persists_an_empty_dated_directory() {
    let base = tempdir().unwrap();
    let (scraper, config) = scraper_with_output(ScriptedProvider::new(), base.path());

    let playlists = scraper.scrape(&[], TimeWindow::Day).await.unwrap();
    assert!(playlists.is_empty());

    let persisted = PlaylistWriter::new(config.output)
        .persist(&playlists)
        .await
        .unwrap();
    assert!(persisted.directory.is_dir());
    assert!(persisted.files.is_empty());
}
