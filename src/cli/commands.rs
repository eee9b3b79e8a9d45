//! Subcommand logic

use super::{Cli, Command, init_logging};
use crate::{
    TraktClient,
    config::{ConfigLoader, default_config_path},
    types::{Item, ListIds, TraktList},
};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

/// Item counts of one list
#[derive(Debug, Serialize, PartialEq)]
pub struct ListSummary {
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trakt_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub is_watchlist: bool,
    pub items: usize,
}

impl From<&TraktList> for ListSummary {
    fn from(list: &TraktList) -> Self {
        Self {
            slug: list.slug().to_string(),
            trakt_id: list.ids.trakt,
            name: list.name.clone(),
            is_watchlist: list.is_watchlist,
            items: list.items.len(),
        }
    }
}

/// Per media kind counts of a collection
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct ItemsSummary {
    pub movies: usize,
    pub shows: usize,
    pub episodes: usize,
}

impl ItemsSummary {
    pub fn of(items: &[Item]) -> Self {
        items.iter().fold(Self::default(), |mut summary, item| {
            match item.media.type_name() {
                "movie" => summary.movies += 1,
                "show" => summary.shows += 1,
                _ => summary.episodes += 1,
            }
            summary
        })
    }
}

/// Load configuration, sign in and run the selected subcommand
pub async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().or_else(default_config_path);
    let settings = ConfigLoader::new()
        .load(config_path.as_deref())
        .context("failure loading configuration")?;

    init_logging(cli.verbose, &settings.logging);
    info!("Starting trakt-sync v{}", env!("CARGO_PKG_VERSION"));

    let client = TraktClient::new(&settings)
        .await
        .context("failure initialising trakt client")?;

    let output = match cli.command {
        Command::Lists => {
            let metadata = client.lists_metadata_get().await?;
            let ids: Vec<ListIds> = metadata.iter().map(|list| list.ids.clone()).collect();
            let lists = client.lists_get(&ids).await?;
            let summaries: Vec<ListSummary> = lists
                .iter()
                .map(|list| {
                    let mut summary = ListSummary::from(list);
                    summary.name = metadata
                        .iter()
                        .find(|meta| meta.ids == list.ids)
                        .and_then(|meta| meta.name.clone());
                    summary
                })
                .collect();
            serde_json::to_string_pretty(&summaries)?
        }
        Command::Watchlist => {
            let watchlist = client.watchlist_get().await?;
            serde_json::to_string_pretty(&ListSummary::from(&watchlist))?
        }
        Command::Ratings => {
            let ratings = client.ratings_get().await?;
            serde_json::to_string_pretty(&ItemsSummary::of(&ratings))?
        }
        Command::History { item_type, item_id } => {
            let history = client
                .history_get(&item_type, &item_id)
                .await
                .with_context(|| format!("failure fetching history of {} {}", item_type, item_id))?;
            serde_json::to_string_pretty(&serde_json::json!({
                "type": item_type,
                "id": item_id,
                "plays": history.len(),
            }))?
        }
    };

    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Ids;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_items_summary_counts_kinds() {
        let items = vec![
            Item::movie(Ids::imdb("tt1")),
            Item::movie(Ids::imdb("tt2")),
            Item::episode(Ids::imdb("tt3")),
        ];
        assert_eq!(
            ItemsSummary::of(&items),
            ItemsSummary {
                movies: 2,
                shows: 0,
                episodes: 1,
            }
        );
    }

    #[test]
    fn test_watchlist_summary() {
        let watchlist = TraktList::watchlist(vec![Item::show(Ids::imdb("tt4"))]);
        let summary = ListSummary::from(&watchlist);
        assert_eq!(summary.slug, "watchlist");
        assert!(summary.is_watchlist);
        assert_eq!(summary.items, 1);
    }
}
