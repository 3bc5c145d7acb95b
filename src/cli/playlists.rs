use tabled::Table;

use crate::{
    cli::connect,
    config::Config,
    error, info,
    types::{Playlist, PlaylistTableRow},
};

pub async fn list_playlists(config: &Config, search: Option<String>) {
    let client = connect(config).await;

    let pb = crate::utils::spinner("Fetching your playlists...");
    let result = client.list_playlists().await;
    pb.finish_and_clear();

    let mut playlists = match result {
        Ok(playlists) => playlists,
        Err(e) => error!("Failed to load playlists. Err: {}", e),
    };

    if let Some(search) = search {
        let search_term = search.to_lowercase();
        playlists.retain(|p| p.name.to_lowercase().contains(&search_term));
    }

    if playlists.is_empty() {
        info!("No playlists found.");
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists.into_iter().map(to_row).collect();
    println!("{}", Table::new(rows));
}

fn to_row(playlist: Playlist) -> PlaylistTableRow {
    PlaylistTableRow {
        name: playlist.name,
        owner: playlist
            .owner
            .display_name
            .unwrap_or(playlist.owner.id),
        tracks: playlist.tracks.map(|t| t.total).unwrap_or(0),
        id: playlist.id,
    }
}
