use crate::catalog::find_podcast;
use crate::components::views::EpisodeRow;
use crate::components::{AppView, Icon};
use dioxus::prelude::*;

#[component]
pub fn PodcastView(podcast_id: String) -> Element {
    let Some(podcast) = find_podcast(&podcast_id) else {
        return rsx! {
            div { class: "empty-state",
                Icon { name: "podcast".to_string(), class: "icon-large".to_string() }
                p { "Podcast not found" }
                Link { to: AppView::Home {}, class: "back-link",
                    Icon { name: "home".to_string(), class: "icon".to_string() }
                    "Back to episodes"
                }
            }
        };
    };

    let episode_count = podcast.episodes.len();

    rsx! {
        section { class: "podcast-detail",
            div { class: "detail-header",
                img {
                    class: "detail-artwork",
                    src: "{podcast.artwork_url}",
                    alt: "podcast artwork",
                }
                div { class: "detail-titles",
                    p { class: "detail-kicker", "Podcast" }
                    h1 { class: "page-title", "{podcast.title}" }
                    p { class: "episode-duration", "{episode_count} episodes" }
                }
            }
            div { class: "episode-list",
                for (index , episode) in podcast.episodes.into_iter().enumerate() {
                    EpisodeRow { key: "{episode.id}", episode, index: index + 1 }
                }
            }
        }
    }
}
