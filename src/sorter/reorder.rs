use crate::{
    sorter::SortError,
    spotify::{CatalogClient, MAX_BATCH},
};

/// Writes `ordered_uris` to the playlist, replacing its current content.
///
/// The first chunk of up to [`MAX_BATCH`] URIs replaces the playlist, every
/// further chunk is appended, one request at a time. An empty list issues
/// no request at all. Returns the number of chunks written.
///
/// # Errors
///
/// Stops at the first failed chunk with [`SortError::Write`]. The chunks
/// before it are already committed, so the remote playlist is left
/// partially reordered.
pub async fn commit<C: CatalogClient>(
    client: &C,
    playlist_id: &str,
    ordered_uris: &[String],
) -> Result<usize, SortError> {
    let total = ordered_uris.len().div_ceil(MAX_BATCH);

    for (index, chunk) in ordered_uris.chunks(MAX_BATCH).enumerate() {
        let written = if index == 0 {
            client.replace_playlist_items(playlist_id, chunk).await
        } else {
            client.append_playlist_items(playlist_id, chunk).await
        };

        written.map_err(|source| SortError::Write {
            committed: index,
            total,
            source,
        })?;
    }

    Ok(total)
}
