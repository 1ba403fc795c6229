use crate::catalog::{search_episodes, Episode};
use crate::components::{play_episode, AppView, Icon, SearchQuerySignal};
use crate::db::SharedStore;
use dioxus::prelude::*;

#[component]
pub fn Home() -> Element {
    let query = use_context::<SearchQuerySignal>().0;
    let episodes: Vec<Episode> = search_episodes(&query()).into_iter().cloned().collect();

    rsx! {
        section { class: "home",
            h1 { class: "page-title", "Episodes" }
            if episodes.is_empty() {
                p { class: "empty-state", "No episodes match \"{query}\"" }
            } else {
                div { class: "episode-list",
                    for (index , episode) in episodes.into_iter().enumerate() {
                        EpisodeRow { key: "{episode.id}", episode, index: index + 1 }
                    }
                }
            }
        }
    }
}

/// One catalog entry with a play/pause button bound to the shared player.
#[component]
pub fn EpisodeRow(episode: Episode, index: usize) -> Element {
    let store = use_context::<SharedStore>();
    let now_playing = use_context::<Signal<Option<Episode>>>();
    let is_playing = use_context::<Signal<bool>>();

    let is_current = now_playing()
        .as_ref()
        .map(|current| current.id == episode.id)
        .unwrap_or(false);
    let showing_pause = is_current && is_playing();

    let on_play = {
        let episode = episode.clone();
        move |evt: MouseEvent| {
            evt.stop_propagation();
            play_episode(episode.clone(), &store, now_playing, is_playing);
        }
    };

    rsx! {
        div { class: if is_current { "episode-row current" } else { "episode-row" },
            span { class: "episode-index", "{index}" }
            button {
                r#type: "button",
                class: "row-play",
                onclick: on_play,
                if showing_pause {
                    Icon { name: "pause".to_string(), class: "icon".to_string() }
                } else {
                    Icon { name: "play".to_string(), class: "icon".to_string() }
                }
            }
            div { class: "episode-titles",
                Link {
                    to: AppView::EpisodeView {
                        episode_id: episode.id.clone(),
                    },
                    class: "title1",
                    "{episode.title}"
                }
                Link {
                    to: AppView::PodcastView {
                        podcast_id: episode.podcast_id.clone(),
                    },
                    class: "title2",
                    "{episode.podcast_title}"
                }
            }
            span { class: "episode-duration", "{episode.duration_label}" }
        }
    }
}
