use crate::catalog::Episode;
use crate::components::{view_label, AppView, Icon, PlaybackWidget};
use crate::db::{
    clear_episode_on_play, load_episode_on_play, load_settings, open_default_store,
    save_episode_on_play, save_settings, AppSettings, SharedStore,
};
use crate::playback::ParentRequest;
use dioxus::prelude::*;

/// Current playback speed multiplier.
#[derive(Clone, Copy)]
pub struct SpeedSignal(pub Signal<f64>);

/// Whether the player bar is collapsed.
#[derive(Clone, Copy)]
pub struct HidePlayerSignal(pub Signal<bool>);

/// Text in the header search box.
#[derive(Clone, Copy)]
pub struct SearchQuerySignal(pub Signal<String>);

/// Bind `episode` to the player and start it. Selecting the episode that is
/// already bound toggles play/pause instead.
pub fn play_episode(
    episode: Episode,
    store: &SharedStore,
    mut now_playing: Signal<Option<Episode>>,
    mut is_playing: Signal<bool>,
) {
    let already_bound = now_playing
        .peek()
        .as_ref()
        .map(|current| current.id == episode.id)
        .unwrap_or(false);
    if already_bound {
        let playing = *is_playing.peek();
        is_playing.set(!playing);
        return;
    }

    if let Err(err) = save_episode_on_play(store.as_ref(), &episode) {
        tracing::warn!("failed to persist episode snapshot: {err}");
    }
    tracing::info!(episode = %episode.id, title = %episode.title, "now playing");
    now_playing.set(Some(episode));
    is_playing.set(true);
}

#[component]
pub fn AppShell() -> Element {
    let store = use_hook(open_default_store);
    let current_view = use_route::<AppView>();

    let app_settings = use_signal({
        let store = store.clone();
        move || load_settings(store.as_ref())
    });
    // Restored so the player can resume after a reload; playback waits for
    // the user to press play.
    let mut now_playing = use_signal({
        let store = store.clone();
        move || load_episode_on_play(store.as_ref())
    });
    let mut is_playing = use_signal(|| false);
    let mut speed = use_signal(move || app_settings.peek().default_speed);
    let mut hide_player = use_signal(|| false);
    let mut search_query = use_signal(String::new);

    use_context_provider(|| store.clone());
    use_context_provider(|| app_settings);
    use_context_provider(|| now_playing);
    use_context_provider(|| is_playing);
    use_context_provider(|| SpeedSignal(speed));
    use_context_provider(|| HidePlayerSignal(hide_player));
    use_context_provider(|| SearchQuerySignal(search_query));

    // Write back settings so fields added since the last save get their defaults.
    {
        let store = store.clone();
        use_effect(move || {
            let settings: AppSettings = app_settings();
            if let Err(err) = save_settings(store.as_ref(), &settings) {
                tracing::warn!("failed to save settings: {err}");
            }
        });
    }

    let on_control = move |request: ParentRequest| match request {
        ParentRequest::TogglePlay => {
            let playing = *is_playing.peek();
            is_playing.set(!playing);
        }
        ParentRequest::CycleSpeed => {
            let next = app_settings.peek().next_speed(*speed.peek());
            speed.set(next);
        }
        // Delivered through `on_remove`.
        ParentRequest::RemovePlayer => {}
    };

    let on_remove = {
        let store = store.clone();
        move |_| {
            is_playing.set(false);
            now_playing.set(None);
            if let Err(err) = clear_episode_on_play(store.as_ref()) {
                tracing::warn!("failed to clear episode snapshot: {err}");
            }
        }
    };

    let on_toggle_hidden = move |_| {
        let hidden = *hide_player.peek();
        if !hidden {
            is_playing.set(false);
        }
        hide_player.set(!hidden);
    };

    rsx! {
        div { class: "app-shell",
            header { class: "app-header",
                Link { to: AppView::Home {}, class: "brand",
                    Icon { name: "podcast".to_string(), class: "icon".to_string() }
                    span { "podplayer" }
                }
                span { class: "view-label", "{view_label(&current_view)}" }
                div { class: "searchbar",
                    Icon { name: "search".to_string(), class: "icon".to_string() }
                    input {
                        r#type: "search",
                        placeholder: "Search episodes",
                        value: "{search_query}",
                        oninput: move |e: Event<FormData>| search_query.set(e.value()),
                    }
                }
                if now_playing().is_some() {
                    button {
                        r#type: "button",
                        class: "hide-player-btn",
                        onclick: on_toggle_hidden,
                        if hide_player() {
                            "Show player"
                        } else {
                            "Hide player"
                        }
                    }
                }
            }
            main { class: "app-main", Outlet::<AppView> {} }
            PlaybackWidget {
                episode: now_playing(),
                playing: is_playing(),
                speed: speed(),
                hidden: hide_player(),
                on_control,
                on_ended: move |_| is_playing.set(false),
                on_remove,
                on_reset_search: move |_| search_query.set(String::new()),
            }
        }
    }
}
