use tabled::Table;

use crate::{
    cli::{connect, playlist_name, track_rows},
    config::Config,
    error, info,
    sorter::{self, Criterion, Direction, SortOutcome},
    success, utils,
};

pub async fn sort(
    config: &Config,
    playlist_id: String,
    criterion: Criterion,
    direction: Direction,
    dry_run: bool,
) {
    let client = connect(config).await;

    let name = playlist_name(&client, &playlist_id).await;

    if dry_run {
        let pb = utils::spinner("Fetching playlist tracks...");
        let result = sorter::plan_sort(&client, &playlist_id, criterion, direction).await;
        pb.finish_and_clear();

        match result {
            Ok(tracks) if tracks.is_empty() => info!("{} has no tracks, nothing to sort.", name),
            Ok(tracks) => {
                println!("{}", Table::new(track_rows(&tracks)));
                info!(
                    "Dry run: {} would be sorted by {} ({}). Nothing was written.",
                    name, criterion, direction
                );
            }
            Err(e) => error!("{}", e),
        }
        return;
    }

    info!("Sorting {} by {} ({})", name, criterion, direction);

    let pb = utils::spinner("Sorting playlist...");
    let result = sorter::sort_playlist(&client, &playlist_id, criterion, direction).await;
    pb.finish_and_clear();

    match result {
        Ok(SortOutcome::Sorted { tracks, chunks }) => {
            success!("Sorted {} tracks of {} in {} request(s).", tracks, name, chunks)
        }
        Ok(SortOutcome::EmptyPlaylist) => info!("{} has no tracks, nothing to sort.", name),
        Err(e) => error!("{}", e),
    }
}
