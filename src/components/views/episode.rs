use crate::catalog::{find_episode, Episode};
use crate::components::{play_episode, AppView, Icon};
use crate::db::SharedStore;
use dioxus::prelude::*;

#[component]
pub fn EpisodeView(episode_id: String) -> Element {
    let store = use_context::<SharedStore>();
    let now_playing = use_context::<Signal<Option<Episode>>>();
    let is_playing = use_context::<Signal<bool>>();

    let Some(episode) = find_episode(&episode_id).cloned() else {
        return rsx! {
            div { class: "empty-state",
                Icon { name: "podcast".to_string(), class: "icon-large".to_string() }
                p { "Episode not found" }
                Link { to: AppView::Home {}, class: "back-link",
                    Icon { name: "home".to_string(), class: "icon".to_string() }
                    "Back to episodes"
                }
            }
        };
    };

    let is_current = now_playing()
        .as_ref()
        .map(|current| current.id == episode.id)
        .unwrap_or(false);
    let showing_pause = is_current && is_playing();

    let on_play = {
        let episode = episode.clone();
        move |_| play_episode(episode.clone(), &store, now_playing, is_playing)
    };

    rsx! {
        article { class: "episode-detail",
            div { class: "detail-header",
                img {
                    class: "detail-artwork",
                    src: "{episode.artwork_url}",
                    alt: "podcast artwork",
                }
                div { class: "detail-titles",
                    p { class: "detail-kicker", "Episode" }
                    h1 { class: "page-title", "{episode.title}" }
                    Link {
                        to: AppView::PodcastView {
                            podcast_id: episode.podcast_id.clone(),
                        },
                        class: "title2",
                        "{episode.podcast_title}"
                    }
                    p { class: "episode-duration", "{episode.duration_label}" }
                    button {
                        r#type: "button",
                        class: "detail-play",
                        onclick: on_play,
                        if showing_pause {
                            Icon { name: "pause".to_string(), class: "icon".to_string() }
                            "Pause"
                        } else {
                            Icon { name: "play".to_string(), class: "icon".to_string() }
                            "Play"
                        }
                    }
                }
            }
            if let Some(description) = episode.description.as_ref() {
                p { class: "detail-description", "{description}" }
            }
        }
    }
}
