use crate::{
    sorter::SortError,
    spotify::{ApiError, CatalogClient},
    types::{PlaylistItem, PlaylistTrack},
};

/// Items requested per page. Also the largest page the Web API will serve.
pub const PAGE_SIZE: u32 = 100;

/// Normalized, immutable view of one playlist entry's sortable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSnapshot {
    pub id: String,
    /// Written back to the playlist exactly as received.
    pub uri: String,
    pub name: String,
    /// First entry is the primary artist.
    pub artists: Vec<String>,
    pub album_name: String,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, depending on the catalog entry.
    pub release_date: String,
    pub duration_ms: u64,
    pub popularity: u32,
}

impl TrackSnapshot {
    /// Builds a snapshot from a raw playlist item.
    ///
    /// Returns `None` for items without a track (removed from the catalog)
    /// or without a URI, since there is nothing to write back for those.
    pub fn from_item(item: PlaylistItem) -> Option<Self> {
        let PlaylistTrack {
            id,
            uri,
            name,
            artists,
            album,
            duration_ms,
            popularity,
        } = item.track?;
        let uri = uri.filter(|u| !u.is_empty())?;
        let album = album.unwrap_or_default();

        Some(TrackSnapshot {
            id: id.unwrap_or_default(),
            uri,
            name,
            artists: artists.into_iter().map(|a| a.name).collect(),
            album_name: album.name.unwrap_or_default(),
            release_date: album.release_date.unwrap_or_default(),
            duration_ms,
            popularity: popularity.min(100),
        })
    }

    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or_default()
    }
}

/// Lazy cursor over the pages of one playlist.
///
/// Starts at offset 0 and stops after the first page holding fewer than
/// [`PAGE_SIZE`] raw items, so a full last page costs one extra, empty
/// request. The reported total is ignored. Restart by creating a new cursor.
pub struct TrackPages<'a, C> {
    client: &'a C,
    playlist_id: &'a str,
    offset: u32,
    done: bool,
}

impl<'a, C: CatalogClient> TrackPages<'a, C> {
    pub fn new(client: &'a C, playlist_id: &'a str) -> Self {
        TrackPages {
            client,
            playlist_id,
            offset: 0,
            done: false,
        }
    }

    /// Fetches the next page, or `None` once the end has been seen.
    ///
    /// A failed request ends the cursor as well; the error carries the
    /// offset of the page that failed.
    pub async fn next_page(&mut self) -> Option<Result<Vec<PlaylistItem>, (u32, ApiError)>> {
        if self.done {
            return None;
        }

        let offset = self.offset;
        match self
            .client
            .get_playlist_page(self.playlist_id, offset, PAGE_SIZE)
            .await
        {
            Ok(page) => {
                if page.items.len() < PAGE_SIZE as usize {
                    self.done = true;
                }
                self.offset += PAGE_SIZE;
                Some(Ok(page.items))
            }
            Err(e) => {
                self.done = true;
                Some(Err((offset, e)))
            }
        }
    }
}

/// Fetches every track of a playlist in its current remote order.
///
/// Items without a track are skipped. Any failed page fails the whole
/// fetch; tracks from earlier pages are dropped with it.
pub async fn fetch_all_tracks<C: CatalogClient>(
    client: &C,
    playlist_id: &str,
) -> Result<Vec<TrackSnapshot>, SortError> {
    let mut pages = TrackPages::new(client, playlist_id);
    let mut tracks = Vec::new();

    while let Some(page) = pages.next_page().await {
        let items = page.map_err(|(offset, source)| SortError::Fetch { offset, source })?;
        tracks.extend(items.into_iter().filter_map(TrackSnapshot::from_item));
    }

    Ok(tracks)
}
