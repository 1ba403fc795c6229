//! Bundled episode catalog. The app ships a fixed list of episodes instead of
//! talking to a podcast directory.

pub mod models;

pub use models::*;

use once_cell::sync::Lazy;

const CATALOG_JSON: &str = include_str!("../../assets/episodes.json");

static CATALOG: Lazy<Vec<Episode>> = Lazy::new(|| parse_catalog(CATALOG_JSON));

fn parse_catalog(raw: &str) -> Vec<Episode> {
    match serde_json::from_str::<Vec<Episode>>(raw) {
        Ok(episodes) => episodes,
        Err(err) => {
            tracing::warn!("bundled catalog is unreadable: {err}");
            Vec::new()
        }
    }
}

/// Every episode in the catalog, in file order.
pub fn all_episodes() -> &'static [Episode] {
    CATALOG.as_slice()
}

pub fn find_episode(episode_id: &str) -> Option<&'static Episode> {
    all_episodes().iter().find(|ep| ep.id == episode_id)
}

/// Episodes whose title or podcast title contains `query` (case-insensitive).
/// An empty query matches everything.
pub fn search_episodes(query: &str) -> Vec<&'static Episode> {
    let needle = query.trim().to_lowercase();
    all_episodes()
        .iter()
        .filter(|ep| {
            needle.is_empty()
                || ep.title.to_lowercase().contains(&needle)
                || ep.podcast_title.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn find_podcast(podcast_id: &str) -> Option<Podcast> {
    let episodes: Vec<Episode> = all_episodes()
        .iter()
        .filter(|ep| ep.podcast_id == podcast_id)
        .cloned()
        .collect();
    let first = episodes.first()?;
    Some(Podcast {
        id: podcast_id.to_string(),
        title: first.podcast_title.clone(),
        artwork_url: first.artwork_url.clone(),
        episodes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_loads() {
        assert!(!all_episodes().is_empty());
        assert!(all_episodes().iter().all(|ep| ep.duration_seconds().is_some()));
    }

    #[test]
    fn podcast_groups_its_episodes() {
        let first = &all_episodes()[0];
        let podcast = find_podcast(&first.podcast_id).unwrap();
        assert_eq!(podcast.title, first.podcast_title);
        assert!(podcast.episodes.iter().any(|ep| ep.id == first.id));
        assert!(find_podcast("no-such-podcast").is_none());
    }

    #[test]
    fn search_is_case_insensitive() {
        let first = &all_episodes()[0];
        let hits = search_episodes(&first.title.to_uppercase());
        assert!(hits.iter().any(|ep| ep.id == first.id));
        assert_eq!(search_episodes("").len(), all_episodes().len());
    }

    #[test]
    fn broken_catalog_is_empty() {
        assert!(parse_catalog("not json").is_empty());
    }
}
