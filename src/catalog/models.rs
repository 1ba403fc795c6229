use serde::{Deserialize, Serialize};

use crate::utils::parse_duration_label;

/// A playable podcast episode. Owned by the app shell and handed to the player
/// whole; the player never edits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Episode {
    #[serde(alias = "episodeId")]
    pub id: String,
    #[serde(default, alias = "podcastId")]
    pub podcast_id: String,
    #[serde(default, alias = "episodeTitle")]
    pub title: String,
    #[serde(default, alias = "podcastTitle")]
    pub podcast_title: String,
    #[serde(default, alias = "image", alias = "artworkUrl")]
    pub artwork_url: String,
    #[serde(default, alias = "audio", alias = "audioUrl")]
    pub audio_url: String,
    #[serde(default, alias = "duration", alias = "durationLabel")]
    pub duration_label: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Episode {
    /// Duration in seconds parsed from the label, when the label is readable.
    pub fn duration_seconds(&self) -> Option<f64> {
        parse_duration_label(&self.duration_label)
    }
}

/// A podcast grouping derived from the episodes that share a `podcast_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Podcast {
    pub id: String,
    pub title: String,
    pub artwork_url: String,
    pub episodes: Vec<Episode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_camel_case_snapshots() {
        let raw = r#"{
            "episodeId": "e1",
            "podcastId": "p1",
            "episodeTitle": "Pilot",
            "podcastTitle": "Show",
            "image": "https://img/1.jpg",
            "audio": "https://cdn/1.mp3",
            "duration": "00:42:00"
        }"#;
        let episode: Episode = serde_json::from_str(raw).unwrap();
        assert_eq!(episode.id, "e1");
        assert_eq!(episode.podcast_title, "Show");
        assert_eq!(episode.audio_url, "https://cdn/1.mp3");
        assert_eq!(episode.duration_seconds(), Some(2_520.0));
    }

    #[test]
    fn missing_duration_is_not_a_number() {
        let episode = Episode {
            id: "e2".to_string(),
            ..Default::default()
        };
        assert_eq!(episode.duration_seconds(), None);
    }
}
