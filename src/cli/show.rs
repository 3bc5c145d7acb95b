use tabled::Table;

use crate::{
    cli::{connect, track_rows},
    config::Config,
    error, info,
    sorter::fetch_all_tracks,
    spotify::CatalogClient,
    utils, warning,
};

pub async fn show(config: &Config, playlist_id: String) {
    let client = connect(config).await;

    match client.get_playlist_metadata(&playlist_id).await {
        Ok(playlist) => {
            let owner = playlist
                .owner
                .display_name
                .unwrap_or(playlist.owner.id);
            info!("{} by {}", playlist.name, owner);
            if let Some(description) = playlist.description.filter(|d| !d.is_empty()) {
                println!("{}", description);
            }
        }
        Err(e) => warning!("Failed to load playlist details: {}", e),
    }

    let pb = utils::spinner("Fetching playlist tracks...");
    let result = fetch_all_tracks(&client, &playlist_id).await;
    pb.finish_and_clear();

    match result {
        Ok(tracks) if tracks.is_empty() => info!("The playlist has no tracks."),
        Ok(tracks) => println!("{}", Table::new(track_rows(&tracks))),
        Err(e) => error!("{}", e),
    }
}
