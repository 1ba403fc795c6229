use crate::catalog::Episode;
use crate::components::audio_manager::{AudioHandle, AUDIO_ELEMENT_ID};
use crate::components::{AppView, Icon};
use crate::db::{AppSettings, SharedStore};
use crate::playback::{ControlRole, ParentRequest, PlaybackSession, RenderInputs, ScrubGesture};
use dioxus::prelude::*;
use std::rc::Rc;

async fn measure_width(bar: Rc<MountedData>) -> Option<f64> {
    bar.get_client_rect().await.ok().map(|rect| rect.size.width)
}

/// Bottom player bar for the episode bound by the shell.
///
/// Playing state and speed belong to the caller; the player asks for changes
/// through `on_control` and only drives the `<audio>` element itself.
#[component]
pub fn PlaybackWidget(
    episode: Option<Episode>,
    playing: bool,
    speed: f64,
    hidden: bool,
    on_control: EventHandler<ParentRequest>,
    on_ended: EventHandler<()>,
    on_remove: EventHandler<()>,
    on_reset_search: EventHandler<()>,
) -> Element {
    let store = use_context::<SharedStore>();
    let settings = use_context::<Signal<AppSettings>>();
    let audio = use_hook(AudioHandle::new);

    let mut session = use_signal({
        let store = store.clone();
        move || PlaybackSession::mount(store.as_ref(), settings.peek().skip_seconds)
    });
    let mut gesture = use_signal(ScrubGesture::default);
    let mut progress_bar = use_signal(|| None::<Rc<MountedData>>);
    let mut bar_width = use_signal(|| 0.0f64);

    use_effect(move || {
        let skip = settings().skip_seconds;
        session.write().set_skip_seconds(skip);
    });

    let episode_id = episode.as_ref().map(|ep| ep.id.clone());
    {
        let store = store.clone();
        let audio = audio.clone();
        use_effect(use_reactive!(|episode_id, playing, speed, hidden| {
            let inputs = RenderInputs {
                episode_id,
                playing,
                speed,
                hidden,
            };
            audio.with_media(|media| session.write().sync(&inputs, media, store.as_ref()));
        }));
    }

    let on_time_update = {
        let store = store.clone();
        let audio = audio.clone();
        move |_| {
            let store = store.clone();
            let audio = audio.clone();
            let mut session = session;
            spawn(async move {
                if audio.refresh().await {
                    audio.with_media(|media| session.write().on_time_update(media, store.as_ref()));
                }
            });
        }
    };

    // Single entry point for every transport button.
    let dispatch = {
        let store = store.clone();
        let audio = audio.clone();
        move |role: ControlRole| {
            let mut session = session;
            let request =
                audio.with_media(|media| session.write().on_control(role, media, store.as_ref()));
            match request {
                Some(ParentRequest::RemovePlayer) => on_remove.call(()),
                Some(request) => on_control.call(request),
                None => {}
            }
        }
    };

    let scrub_at = {
        let audio = audio.clone();
        move |offset_x: f64| {
            let mut session = session;
            let width = *bar_width.peek();
            audio.with_media(|media| session.write().scrub(offset_x, width, media));
        }
    };

    let remeasure = move || {
        if let Some(bar) = progress_bar.peek().clone() {
            let mut bar_width = bar_width;
            spawn(async move {
                if let Some(width) = measure_width(bar).await {
                    bar_width.set(width);
                }
            });
        }
    };

    let Some(episode) = episode.filter(|_| !hidden) else {
        return rsx! {};
    };

    let state = session.read().state().clone();
    let skip = session.read().skip_seconds();
    let percent = state.percent_complete;
    let episode_route = AppView::EpisodeView {
        episode_id: episode.id.clone(),
    };
    let podcast_route = AppView::PodcastView {
        podcast_id: episode.podcast_id.clone(),
    };

    rsx! {
        div { class: "player-wrapper",
            div { class: "player",
                div { class: "episode-info",
                    Link {
                        to: episode_route.clone(),
                        onclick: move |_| on_reset_search.call(()),
                        if episode.artwork_url.is_empty() {
                            div { class: "artwork-in-player artwork-fallback",
                                Icon { name: "podcast".to_string(), class: "icon".to_string() }
                            }
                        } else {
                            img {
                                class: "artwork-in-player",
                                src: "{episode.artwork_url}",
                                alt: "podcast artwork",
                            }
                        }
                    }
                    div { class: "titles-in-player",
                        Link {
                            to: episode_route,
                            class: "title1",
                            onclick: move |_| on_reset_search.call(()),
                            "{episode.title}"
                        }
                        Link {
                            to: podcast_route,
                            class: "title2",
                            onclick: move |_| on_reset_search.call(()),
                            "{episode.podcast_title}"
                        }
                    }
                }
                div { class: "player-controls",
                    div { class: "main-controls",
                        button {
                            id: ControlRole::Speed.element_id(),
                            r#type: "button",
                            class: "speed",
                            onclick: {
                                let dispatch = dispatch.clone();
                                move |_| dispatch(ControlRole::Speed)
                            },
                            "{speed}x"
                        }
                        span { class: "playcontrols",
                            button {
                                id: ControlRole::SkipBack.element_id(),
                                r#type: "button",
                                class: "replay",
                                title: "Back {skip} seconds",
                                onclick: {
                                    let dispatch = dispatch.clone();
                                    move |_| dispatch(ControlRole::SkipBack)
                                },
                                Icon { name: "replay-10".to_string(), class: "icon".to_string() }
                            }
                            button {
                                id: ControlRole::PlayPause.element_id(),
                                r#type: "button",
                                class: "playPause",
                                onclick: {
                                    let dispatch = dispatch.clone();
                                    move |_| dispatch(ControlRole::PlayPause)
                                },
                                if playing {
                                    Icon { name: "pause".to_string(), class: "icon".to_string() }
                                } else {
                                    Icon { name: "play".to_string(), class: "icon".to_string() }
                                }
                            }
                            button {
                                id: ControlRole::SkipForward.element_id(),
                                r#type: "button",
                                class: "forward",
                                title: "Forward {skip} seconds",
                                onclick: {
                                    let dispatch = dispatch.clone();
                                    move |_| dispatch(ControlRole::SkipForward)
                                },
                                Icon { name: "forward-10".to_string(), class: "icon".to_string() }
                            }
                        }
                        div { class: "tooltip",
                            button {
                                id: ControlRole::Remove.element_id(),
                                r#type: "button",
                                class: "remove",
                                onclick: {
                                    let dispatch = dispatch.clone();
                                    move |_| dispatch(ControlRole::Remove)
                                },
                                Icon { name: "trash".to_string(), class: "icon".to_string() }
                            }
                            span { class: "tooltiptext", "remove" }
                        }
                    }
                    div { class: "progress",
                        div {
                            class: "progressbar",
                            onmounted: move |evt: MountedEvent| {
                                let bar = evt.data();
                                progress_bar.set(Some(bar.clone()));
                                spawn(async move {
                                    if let Some(width) = measure_width(bar).await {
                                        bar_width.set(width);
                                    }
                                });
                            },
                            onclick: {
                                let scrub_at = scrub_at.clone();
                                move |evt: MouseEvent| scrub_at(evt.element_coordinates().x)
                            },
                            onmousedown: move |_| {
                                gesture.write().press();
                                remeasure();
                            },
                            onmousemove: move |evt: MouseEvent| {
                                if gesture.peek().is_dragging() {
                                    scrub_at(evt.element_coordinates().x);
                                }
                            },
                            onmouseup: move |_| gesture.write().release(),
                            onmouseleave: move |_| gesture.write().release(),
                            div {
                                class: "progressbar-filled",
                                style: "flex-basis: {percent}%",
                            }
                        }
                        div { class: "timer",
                            span { id: "time-elapsed", "{state.elapsed_label}" }
                            span { id: "total-time", "{episode.duration_label}" }
                        }
                    }
                }
                audio {
                    id: AUDIO_ELEMENT_ID,
                    src: "{episode.audio_url}",
                    preload: "metadata",
                    ontimeupdate: on_time_update,
                    onended: move |_| on_ended.call(()),
                    "Your browser does not support the audio element."
                }
            }
        }
    }
}
