use std::{collections::HashMap, sync::Mutex};

use playlistsmith::sorter::{
    Criterion, Direction, PAGE_SIZE, SortError, SortKey, SortOutcome, TrackSnapshot, commit,
    fetch_all_tracks, plan_sort, resolve, sort_playlist,
};
use playlistsmith::spotify::{ApiError, CatalogClient, MAX_BATCH};
use playlistsmith::types::{
    Playlist, PlaylistItem, PlaylistOwner, PlaylistPage, PlaylistTrack, PlaylistTracksRef,
    TrackAlbum, TrackArtist,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Page { offset: u32, limit: u32 },
    Replace(Vec<String>),
    Append(Vec<String>),
}

// In-memory playlist that records every call made against it.
struct FakeCatalog {
    catalog: HashMap<String, PlaylistItem>,
    playlist: Mutex<Vec<PlaylistItem>>,
    calls: Mutex<Vec<Call>>,
    fail_page_at: Option<u32>,
    fail_write_at: Option<usize>,
}

impl FakeCatalog {
    fn new(items: Vec<PlaylistItem>) -> Self {
        let catalog = items
            .iter()
            .filter_map(|i| {
                let uri = i.track.as_ref()?.uri.clone()?;
                Some((uri, i.clone()))
            })
            .collect();

        FakeCatalog {
            catalog,
            playlist: Mutex::new(items),
            calls: Mutex::new(Vec::new()),
            fail_page_at: None,
            fail_write_at: None,
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn page_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Page { .. }))
            .count()
    }

    fn write_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Page { .. }))
            .collect()
    }

    fn remote_uris(&self) -> Vec<String> {
        self.playlist
            .lock()
            .unwrap()
            .iter()
            .filter_map(|i| i.track.as_ref().and_then(|t| t.uri.clone()))
            .collect()
    }

    fn write(&self, uris: &[String], call: Call) -> Result<(), ApiError> {
        let mut calls = self.calls.lock().unwrap();
        let write_index = calls
            .iter()
            .filter(|c| !matches!(c, Call::Page { .. }))
            .count();
        let replace = matches!(call, Call::Replace(_));
        calls.push(call);

        if self.fail_write_at == Some(write_index) {
            return Err(server_error());
        }

        let mut playlist = self.playlist.lock().unwrap();
        if replace {
            playlist.clear();
        }
        playlist.extend(uris.iter().map(|u| self.catalog[u].clone()));
        Ok(())
    }
}

impl CatalogClient for FakeCatalog {
    async fn get_playlist_page(
        &self,
        _playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<PlaylistPage, ApiError> {
        self.calls.lock().unwrap().push(Call::Page { offset, limit });
        if self.fail_page_at == Some(offset) {
            return Err(server_error());
        }

        let playlist = self.playlist.lock().unwrap();
        let start = (offset as usize).min(playlist.len());
        let end = (start + limit as usize).min(playlist.len());
        Ok(PlaylistPage {
            items: playlist[start..end].to_vec(),
            has_more: end < playlist.len(),
        })
    }

    async fn get_playlist_metadata(&self, playlist_id: &str) -> Result<Playlist, ApiError> {
        Ok(Playlist {
            id: playlist_id.to_string(),
            name: "Fake".to_string(),
            description: None,
            owner: PlaylistOwner {
                id: "owner".to_string(),
                display_name: None,
            },
            tracks: Some(PlaylistTracksRef {
                total: self.playlist.lock().unwrap().len() as u64,
            }),
            snapshot_id: None,
        })
    }

    async fn replace_playlist_items(
        &self,
        _playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        assert!(uris.len() <= MAX_BATCH);
        self.write(uris, Call::Replace(uris.to_vec()))
    }

    async fn append_playlist_items(
        &self,
        _playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        assert!(uris.len() <= MAX_BATCH);
        self.write(uris, Call::Append(uris.to_vec()))
    }
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        message: "Server error".to_string(),
    }
}

fn item(uri: &str, artist: &str, release_date: &str, duration_ms: u64, popularity: u32) -> PlaylistItem {
    PlaylistItem {
        track: Some(PlaylistTrack {
            id: Some(format!("{}_id", uri)),
            uri: Some(uri.to_string()),
            name: format!("Song {}", uri),
            artists: vec![TrackArtist {
                id: None,
                name: artist.to_string(),
            }],
            album: Some(TrackAlbum {
                name: Some("Album".to_string()),
                release_date: Some(release_date.to_string()),
            }),
            duration_ms,
            popularity,
        }),
    }
}

fn numbered_items(n: usize) -> Vec<PlaylistItem> {
    (0..n)
        .map(|i| item(&format!("spotify:track:{:04}", i), "Artist", "2020", 1000, 50))
        .collect()
}

fn uris(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("spotify:track:{:04}", i)).collect()
}

fn uris_of(tracks: &[TrackSnapshot]) -> Vec<&str> {
    tracks.iter().map(|t| t.uri.as_str()).collect()
}

#[tokio::test]
async fn test_fetch_requests_one_extra_page_for_full_last_page() {
    let client = FakeCatalog::new(numbered_items(200));

    let tracks = fetch_all_tracks(&client, "pl").await.unwrap();

    assert_eq!(tracks.len(), 200);
    assert_eq!(
        client.calls(),
        vec![
            Call::Page { offset: 0, limit: PAGE_SIZE },
            Call::Page { offset: 100, limit: PAGE_SIZE },
            Call::Page { offset: 200, limit: PAGE_SIZE },
        ]
    );
}

#[tokio::test]
async fn test_fetch_page_counts() {
    for (n, expected_pages) in [(0, 1), (1, 1), (99, 1), (100, 2), (101, 2), (250, 3), (300, 4)] {
        let client = FakeCatalog::new(numbered_items(n));
        let tracks = fetch_all_tracks(&client, "pl").await.unwrap();
        assert_eq!(tracks.len(), n, "tracks for n = {}", n);
        assert_eq!(client.page_calls(), expected_pages, "pages for n = {}", n);
    }
}

#[tokio::test]
async fn test_fetch_preserves_remote_order() {
    let client = FakeCatalog::new(numbered_items(150));

    let tracks = fetch_all_tracks(&client, "pl").await.unwrap();

    let expected = uris(150);
    assert_eq!(uris_of(&tracks), expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_fetch_drops_null_tracks_but_pages_on_raw_count() {
    let mut items = numbered_items(100);
    items[3] = PlaylistItem { track: None };
    items[50] = PlaylistItem { track: None };
    items[99] = PlaylistItem { track: None };
    let client = FakeCatalog::new(items);

    let tracks = fetch_all_tracks(&client, "pl").await.unwrap();

    assert_eq!(tracks.len(), 97);
    // A full raw page still means "maybe more".
    assert_eq!(client.page_calls(), 2);
    assert!(tracks.iter().all(|t| !t.uri.is_empty()));
}

#[tokio::test]
async fn test_fetch_failure_discards_earlier_pages() {
    let mut client = FakeCatalog::new(numbered_items(250));
    client.fail_page_at = Some(100);

    let err = fetch_all_tracks(&client, "pl").await.unwrap_err();

    assert!(matches!(err, SortError::Fetch { offset: 100, .. }));
    assert_eq!(client.page_calls(), 2);
}

#[test]
fn test_snapshot_from_item() {
    let snapshot = TrackSnapshot::from_item(item("spotify:track:x", "Björk", "1997-09-22", 312000, 61))
        .unwrap();
    assert_eq!(snapshot.id, "spotify:track:x_id");
    assert_eq!(snapshot.uri, "spotify:track:x");
    assert_eq!(snapshot.artists, vec!["Björk".to_string()]);
    assert_eq!(snapshot.album_name, "Album");
    assert_eq!(snapshot.release_date, "1997-09-22");
    assert_eq!(snapshot.duration_ms, 312000);
    assert_eq!(snapshot.popularity, 61);

    assert!(TrackSnapshot::from_item(PlaylistItem { track: None }).is_none());

    let mut no_uri = item("spotify:track:y", "A", "2000", 1, 1);
    no_uri.track.as_mut().unwrap().uri = None;
    assert!(TrackSnapshot::from_item(no_uri).is_none());

    // Local files have no catalog id but are still playlist entries.
    let mut local = item("spotify:local:a:b:c:1", "A", "", 1, 0);
    local.track.as_mut().unwrap().id = None;
    local.track.as_mut().unwrap().album = None;
    let local = TrackSnapshot::from_item(local).unwrap();
    assert_eq!(local.id, "");
    assert_eq!(local.release_date, "");
}

#[tokio::test]
async fn test_sort_by_duration_breaks_ties_by_input_order() {
    let client = FakeCatalog::new(vec![
        item("a", "X", "2000", 300000, 0),
        item("b", "X", "2000", 200000, 0),
        item("c", "X", "2000", 200000, 0),
    ]);

    let outcome = sort_playlist(&client, "pl", Criterion::Duration, Direction::Ascending)
        .await
        .unwrap();

    assert_eq!(outcome, SortOutcome::Sorted { tracks: 3, chunks: 1 });
    assert_eq!(client.remote_uris(), vec!["b", "c", "a"]);
}

#[tokio::test]
async fn test_sort_by_release_date_ascending() {
    let client = FakeCatalog::new(vec![
        item("a", "X", "2020", 0, 0),
        item("b", "X", "2019-06-01", 0, 0),
        item("c", "X", "2019", 0, 0),
    ]);

    sort_playlist(&client, "pl", Criterion::ReleaseDate, Direction::Ascending)
        .await
        .unwrap();

    assert_eq!(client.remote_uris(), vec!["c", "b", "a"]);
}

#[test]
fn test_release_date_keys() {
    let (key_fn, reverse) = resolve(Criterion::ReleaseDate, Direction::Ascending);
    assert!(!reverse);

    let keys: Vec<SortKey> = ["2020", "2019-06-01", "2019"]
        .iter()
        .map(|d| {
            let snapshot = TrackSnapshot::from_item(item("u", "X", d, 0, 0)).unwrap();
            key_fn(&snapshot)
        })
        .collect();

    assert_eq!(
        keys,
        vec![
            SortKey::Date(2020, 1, 1),
            SortKey::Date(2019, 6, 1),
            SortKey::Date(2019, 1, 1),
        ]
    );
}

#[tokio::test]
async fn test_sort_by_artist_ignores_case() {
    let client = FakeCatalog::new(vec![
        item("1", "beta", "2000", 0, 0),
        item("2", "Alpha", "2000", 0, 0),
        item("3", "Gamma", "2000", 0, 0),
        item("4", "alpha", "2000", 0, 0),
    ]);

    let tracks = plan_sort(&client, "pl", Criterion::Artist, Direction::Ascending)
        .await
        .unwrap();

    assert_eq!(uris_of(&tracks), vec!["2", "4", "1", "3"]);
    assert!(client.write_calls().is_empty());
}

#[tokio::test]
async fn test_sort_by_popularity_descending_is_stable() {
    let client = FakeCatalog::new(vec![
        item("a", "X", "2000", 0, 10),
        item("b", "X", "2000", 0, 90),
        item("c", "X", "2000", 0, 10),
        item("d", "X", "2000", 0, 90),
    ]);

    sort_playlist(&client, "pl", Criterion::Popularity, Direction::Descending)
        .await
        .unwrap();

    assert_eq!(client.remote_uris(), vec!["b", "d", "a", "c"]);
}

#[tokio::test]
async fn test_equal_keys_keep_input_order_for_every_criterion() {
    let items: Vec<PlaylistItem> = ["p", "q", "r", "s"]
        .iter()
        .map(|u| item(u, "Same Artist", "2011-02", 180000, 42))
        .collect();

    for criterion in Criterion::ALL {
        for direction in [Direction::Ascending, Direction::Descending] {
            let client = FakeCatalog::new(items.clone());
            let tracks = plan_sort(&client, "pl", criterion, direction).await.unwrap();
            assert_eq!(
                uris_of(&tracks),
                vec!["p", "q", "r", "s"],
                "{} {}",
                criterion,
                direction
            );
        }
    }
}

#[tokio::test]
async fn test_sorting_sorted_playlist_keeps_order() {
    let items: Vec<PlaylistItem> = (0..230)
        .map(|i| item(&format!("u{}", i), "X", "2000", (i % 7) as u64 * 1000, 0))
        .collect();
    let client = FakeCatalog::new(items);

    sort_playlist(&client, "pl", Criterion::Duration, Direction::Descending)
        .await
        .unwrap();
    let first = client.remote_uris();

    sort_playlist(&client, "pl", Criterion::Duration, Direction::Descending)
        .await
        .unwrap();
    let second = client.remote_uris();

    assert_eq!(first.len(), 230);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_commit_splits_into_replace_and_appends() {
    let client = FakeCatalog::new(numbered_items(250));
    let ordered = uris(250);

    let chunks = commit(&client, "pl", &ordered).await.unwrap();

    assert_eq!(chunks, 3);
    assert_eq!(
        client.write_calls(),
        vec![
            Call::Replace(ordered[..100].to_vec()),
            Call::Append(ordered[100..200].to_vec()),
            Call::Append(ordered[200..].to_vec()),
        ]
    );
    assert_eq!(client.remote_uris(), ordered);
}

#[tokio::test]
async fn test_commit_exactly_one_batch() {
    let client = FakeCatalog::new(numbered_items(100));

    let chunks = commit(&client, "pl", &uris(100)).await.unwrap();

    assert_eq!(chunks, 1);
    assert_eq!(client.write_calls(), vec![Call::Replace(uris(100))]);
}

#[tokio::test]
async fn test_commit_empty_is_noop() {
    let client = FakeCatalog::new(Vec::new());

    let chunks = commit(&client, "pl", &[]).await.unwrap();

    assert_eq!(chunks, 0);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_commit_stops_at_failed_chunk() {
    let mut client = FakeCatalog::new(numbered_items(250));
    client.fail_write_at = Some(1);
    let ordered = uris(250);

    let err = commit(&client, "pl", &ordered).await.unwrap_err();

    match err {
        SortError::Write {
            committed, total, ..
        } => {
            assert_eq!(committed, 1);
            assert_eq!(total, 3);
        }
        other => panic!("unexpected error: {}", other),
    }
    // The third chunk is never attempted; the playlist keeps only the first chunk.
    assert_eq!(client.write_calls().len(), 2);
    assert_eq!(client.remote_uris(), ordered[..100].to_vec());
}

#[tokio::test]
async fn test_sort_empty_playlist() {
    let client = FakeCatalog::new(Vec::new());

    let outcome = sort_playlist(&client, "pl", Criterion::Artist, Direction::Ascending)
        .await
        .unwrap();

    assert_eq!(outcome, SortOutcome::EmptyPlaylist);
    assert!(client.write_calls().is_empty());
}

#[tokio::test]
async fn test_sort_playlist_of_only_removed_tracks_is_empty() {
    let client = FakeCatalog::new(vec![PlaylistItem { track: None }; 3]);

    let outcome = sort_playlist(&client, "pl", Criterion::Popularity, Direction::Ascending)
        .await
        .unwrap();

    assert_eq!(outcome, SortOutcome::EmptyPlaylist);
    assert!(client.write_calls().is_empty());
}

#[tokio::test]
async fn test_sort_fetch_failure_writes_nothing() {
    let mut client = FakeCatalog::new(numbered_items(120));
    client.fail_page_at = Some(100);

    let err = sort_playlist(&client, "pl", Criterion::Duration, Direction::Ascending)
        .await
        .unwrap_err();

    assert!(matches!(err, SortError::Fetch { .. }));
    assert!(client.write_calls().is_empty());
}

#[tokio::test]
async fn test_sort_write_failure_is_returned() {
    let mut client = FakeCatalog::new(numbered_items(150));
    client.fail_write_at = Some(0);

    let err = sort_playlist(&client, "pl", Criterion::Duration, Direction::Ascending)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SortError::Write {
            committed: 0,
            total: 2,
            ..
        }
    ));
    assert!(err.to_string().contains("partially reordered"));
}

#[test]
fn test_resolve_reverse_flag() {
    for criterion in Criterion::ALL {
        assert!(!resolve(criterion, Direction::Ascending).1);
        assert!(resolve(criterion, Direction::Descending).1);
    }
}

#[test]
fn test_parse_criterion_and_direction() {
    assert_eq!("artist".parse::<Criterion>().unwrap(), Criterion::Artist);
    assert_eq!("Release-Date".parse::<Criterion>().unwrap(), Criterion::ReleaseDate);
    assert_eq!("release_date".parse::<Criterion>().unwrap(), Criterion::ReleaseDate);
    assert_eq!("date".parse::<Criterion>().unwrap(), Criterion::ReleaseDate);
    assert_eq!("DURATION".parse::<Criterion>().unwrap(), Criterion::Duration);
    assert_eq!("popularity".parse::<Criterion>().unwrap(), Criterion::Popularity);

    assert_eq!("asc".parse::<Direction>().unwrap(), Direction::Ascending);
    assert_eq!("Descending".parse::<Direction>().unwrap(), Direction::Descending);

    for criterion in Criterion::ALL {
        assert_eq!(criterion.to_string().parse::<Criterion>().unwrap(), criterion);
    }

    assert!(matches!(
        "tempo".parse::<Criterion>(),
        Err(SortError::UnsupportedCriterion(name)) if name == "tempo"
    ));
    assert!(matches!(
        "sideways".parse::<Direction>(),
        Err(SortError::UnsupportedCriterion(_))
    ));
}
