//! Defines the application routes.

use crate::components::views::{EpisodeView, Home, PodcastView};
use crate::components::AppShell;
use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq, Debug)]
#[rustfmt::skip]
pub enum AppView {
    #[layout(AppShell)]
        #[route("/")]
        Home {},
        #[route("/episode/:episode_id")]
        EpisodeView { episode_id: String },
        #[route("/podcast/:podcast_id")]
        PodcastView { podcast_id: String },
}

pub fn view_label(view: &AppView) -> &'static str {
    match view {
        AppView::Home {} => "Home",
        AppView::EpisodeView { .. } => "Episode",
        AppView::PodcastView { .. } => "Podcast",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_links_render_expected_paths() {
        let episode = AppView::EpisodeView {
            episode_id: "1000453876310".to_string(),
        };
        let podcast = AppView::PodcastView {
            podcast_id: "1200361736".to_string(),
        };
        assert_eq!(episode.to_string(), "/episode/1000453876310");
        assert_eq!(podcast.to_string(), "/podcast/1200361736");
        assert_eq!(view_label(&episode), "Episode");
    }
}
