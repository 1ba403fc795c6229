//! Player state transitions.
//!
//! Every entry point takes the current state plus one event, mutates the
//! state, issues commands to the media element and optionally hands a request
//! back to the owner of the playing/speed props.

use crate::db::{
    clear_time_played, load_resume_point, load_time_played, save_time_played, KeyValueStore,
};
use crate::playback::media::{known_duration, MediaElement};
use crate::playback::transport::{scrub_target, skip_back_target, skip_forward_target, ControlRole};
use crate::utils::{format_seconds, ELAPSED_PLACEHOLDER};

/// What the progress area shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub elapsed_label: String,
    /// Always within `0.0..=100.0`.
    pub percent_complete: f64,
    /// Armed at mount when a persisted position exists; applied and cleared on
    /// the first time-update tick.
    pub resume_requested: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            elapsed_label: ELAPSED_PLACEHOLDER.to_string(),
            percent_complete: 0.0,
            resume_requested: false,
        }
    }
}

/// The props that can change between renders.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInputs {
    pub episode_id: Option<String>,
    pub playing: bool,
    pub speed: f64,
    pub hidden: bool,
}

impl RenderInputs {
    fn is_visible(&self) -> bool {
        self.episode_id.is_some() && !self.hidden
    }
}

/// Requests for state the player does not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRequest {
    TogglePlay,
    CycleSpeed,
    RemovePlayer,
}

fn percent_of(elapsed: f64, duration: Option<f64>) -> f64 {
    match duration {
        Some(duration) => {
            let percent = elapsed / duration * 100.0;
            if percent.is_finite() {
                percent.clamp(0.0, 100.0)
            } else {
                0.0
            }
        }
        None => 0.0,
    }
}

#[derive(Debug, Clone)]
pub struct PlaybackSession {
    state: PlaybackState,
    skip_seconds: f64,
    previous: Option<RenderInputs>,
}

impl PlaybackSession {
    pub fn new(skip_seconds: f64) -> Self {
        Self {
            state: PlaybackState::default(),
            skip_seconds,
            previous: None,
        }
    }

    /// Build the session for a fresh mount, arming the resume protocol when
    /// the store holds a non-zero position and its episode snapshot.
    pub fn mount(store: &dyn KeyValueStore, skip_seconds: f64) -> Self {
        let mut session = Self::new(skip_seconds);
        let Some(point) = load_resume_point(store) else {
            return session;
        };
        if point.elapsed_seconds == 0.0 {
            return session;
        }

        session.state = PlaybackState {
            elapsed_label: format_seconds(point.elapsed_seconds),
            percent_complete: percent_of(point.elapsed_seconds, point.episode.duration_seconds()),
            resume_requested: true,
        };
        tracing::debug!(
            episode = %point.episode.id,
            elapsed = point.elapsed_seconds,
            "resume armed"
        );
        session
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn skip_seconds(&self) -> f64 {
        self.skip_seconds
    }

    pub fn set_skip_seconds(&mut self, skip_seconds: f64) {
        self.skip_seconds = skip_seconds;
    }

    /// Reconcile the media element with freshly rendered props.
    pub fn sync(
        &mut self,
        inputs: &RenderInputs,
        media: &mut dyn MediaElement,
        store: &dyn KeyValueStore,
    ) {
        let previous = self.previous.replace(inputs.clone());
        if !inputs.is_visible() {
            return;
        }

        if let Some(previous_id) = previous.as_ref().and_then(|p| p.episode_id.as_ref()) {
            if inputs.episode_id.as_ref() != Some(previous_id) {
                // The stored position belongs to the old episode.
                self.state = PlaybackState::default();
                tracing::debug!(episode = ?inputs.episode_id, "episode changed, progress reset");
            }
        }

        // Collapsing the player drops its media element; pick the stored
        // position back up once it is shown again.
        let revealed = previous
            .as_ref()
            .map_or(false, |p| p.hidden && p.episode_id == inputs.episode_id);
        if revealed && load_time_played(store).is_some() {
            self.state.resume_requested = true;
        }

        if inputs.playing && media.is_paused() {
            media.play();
        } else if !inputs.playing && !media.is_paused() {
            media.pause();
        }

        if self.state.resume_requested {
            if let Some(seconds) = load_time_played(store) {
                media.set_current_time(seconds);
            }
        }

        let media_is_new = previous.as_ref().map_or(true, |p| !p.is_visible());
        let speed_changed = previous.as_ref().map_or(true, |p| p.speed != inputs.speed);
        if media_is_new || speed_changed {
            media.set_playback_rate(inputs.speed);
        }
    }

    /// Native time-update tick.
    pub fn on_time_update(&mut self, media: &mut dyn MediaElement, store: &dyn KeyValueStore) {
        if self.state.resume_requested {
            if let Some(seconds) = load_time_played(store) {
                media.set_current_time(seconds);
            }
            self.state.resume_requested = false;
            tracing::debug!("resume applied");
            return;
        }

        let elapsed = media.current_time();
        self.state.elapsed_label = format_seconds(elapsed);
        self.state.percent_complete = percent_of(elapsed, known_duration(media));
        if let Err(err) = save_time_played(store, elapsed) {
            tracing::warn!("failed to persist playback position: {err}");
        }
    }

    /// Dispatch a click on one of the transport controls.
    pub fn on_control(
        &mut self,
        role: ControlRole,
        media: &mut dyn MediaElement,
        store: &dyn KeyValueStore,
    ) -> Option<ParentRequest> {
        match role {
            ControlRole::PlayPause => Some(ParentRequest::TogglePlay),
            ControlRole::Speed => Some(ParentRequest::CycleSpeed),
            ControlRole::SkipBack => {
                let target = skip_back_target(media.current_time(), self.skip_seconds);
                media.set_current_time(target);
                None
            }
            ControlRole::SkipForward => {
                let target = skip_forward_target(
                    media.current_time(),
                    known_duration(media),
                    self.skip_seconds,
                );
                media.set_current_time(target);
                None
            }
            ControlRole::Remove => {
                self.remove(media, store);
                Some(ParentRequest::RemovePlayer)
            }
        }
    }

    /// Click or drag on the progress bar.
    pub fn scrub(&mut self, offset_x: f64, bar_width: f64, media: &mut dyn MediaElement) {
        if let Some(target) = scrub_target(offset_x, bar_width, media.duration()) {
            media.set_current_time(target);
        }
    }

    /// Stop playback and forget the persisted position.
    pub fn remove(&mut self, media: &mut dyn MediaElement, store: &dyn KeyValueStore) {
        media.pause();
        if let Err(err) = clear_time_played(store) {
            tracing::warn!("failed to clear playback position: {err}");
        }
        self.state = PlaybackState::default();
        tracing::info!("player removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Episode;
    use crate::db::{save_episode_on_play, MemoryStore, TIME_PLAYED_KEY};
    use crate::playback::media::FakeMedia;

    fn episode(id: &str, duration_label: &str) -> Episode {
        Episode {
            id: id.to_string(),
            podcast_id: "pod".to_string(),
            title: format!("Episode {id}"),
            duration_label: duration_label.to_string(),
            ..Default::default()
        }
    }

    fn inputs(episode_id: &str, playing: bool) -> RenderInputs {
        RenderInputs {
            episode_id: Some(episode_id.to_string()),
            playing,
            speed: 1.0,
            hidden: false,
        }
    }

    fn store_with_position(elapsed: &str, ep: &Episode) -> MemoryStore {
        let store = MemoryStore::new();
        store.set(TIME_PLAYED_KEY, elapsed).unwrap();
        save_episode_on_play(&store, ep).unwrap();
        store
    }

    #[test]
    fn fresh_mount_has_placeholder_state() {
        let session = PlaybackSession::mount(&MemoryStore::new(), 10.0);
        assert_eq!(session.state(), &PlaybackState::default());
    }

    #[test]
    fn mount_arms_resume_from_store() {
        let store = store_with_position("150", &episode("a", "00:05:00"));
        let session = PlaybackSession::mount(&store, 10.0);
        assert_eq!(session.state().elapsed_label, "00:02:30");
        assert_eq!(session.state().percent_complete, 50.0);
        assert!(session.state().resume_requested);
    }

    #[test]
    fn zero_position_does_not_arm_resume() {
        let store = store_with_position("0", &episode("a", "00:05:00"));
        let session = PlaybackSession::mount(&store, 10.0);
        assert!(!session.state().resume_requested);
    }

    #[test]
    fn position_without_snapshot_does_not_arm_resume() {
        let store = MemoryStore::new();
        store.set(TIME_PLAYED_KEY, "99").unwrap();
        let session = PlaybackSession::mount(&store, 10.0);
        assert_eq!(session.state(), &PlaybackState::default());
    }

    #[test]
    fn unparsable_duration_degrades_to_zero_percent() {
        let store = store_with_position("60", &episode("a", "soon"));
        let session = PlaybackSession::mount(&store, 10.0);
        assert_eq!(session.state().percent_complete, 0.0);
        assert!(session.state().resume_requested);
    }

    #[test]
    fn overflowing_duration_degrades_to_zero_percent() {
        let store = store_with_position("60", &episode("a", "18446744073709551615:00"));
        let session = PlaybackSession::mount(&store, 10.0);
        assert_eq!(session.state().percent_complete, 0.0);
        assert_eq!(session.state().elapsed_label, "00:01:00");
        assert!(session.state().resume_requested);
    }

    #[test]
    fn resume_applies_exactly_once() {
        let store = store_with_position("120", &episode("a", "00:10:00"));
        let mut session = PlaybackSession::mount(&store, 10.0);
        let mut media = FakeMedia::with_duration(600.0);

        session.on_time_update(&mut media, &store);
        assert_eq!(media.current_time, 120.0);
        assert!(!session.state().resume_requested);

        for _ in 0..5 {
            media.current_time += 1.0;
            session.on_time_update(&mut media, &store);
        }
        assert_eq!(media.seeks, vec![120.0]);
        assert!(!session.state().resume_requested);
        assert_eq!(session.state().elapsed_label, "00:02:05");
    }

    #[test]
    fn sync_preloads_resume_position() {
        let store = store_with_position("45", &episode("a", "00:10:00"));
        let mut session = PlaybackSession::mount(&store, 10.0);
        let mut media = FakeMedia::with_duration(f64::NAN);

        session.sync(&inputs("a", false), &mut media, &store);
        assert_eq!(media.current_time, 45.0);
        assert!(session.state().resume_requested);
    }

    #[test]
    fn tick_updates_progress_and_persists() {
        let store = MemoryStore::new();
        let mut session = PlaybackSession::new(10.0);
        let mut media = FakeMedia::with_duration(400.0);
        media.current_time = 100.0;

        session.on_time_update(&mut media, &store);
        assert_eq!(session.state().percent_complete, 25.0);
        assert_eq!(session.state().elapsed_label, "00:01:40");
        assert_eq!(store.get(TIME_PLAYED_KEY).unwrap().as_deref(), Some("100"));
    }

    #[test]
    fn tick_without_duration_reports_zero_percent() {
        let store = MemoryStore::new();
        let mut session = PlaybackSession::new(10.0);
        let mut media = FakeMedia::with_duration(f64::NAN);
        media.current_time = 12.0;

        session.on_time_update(&mut media, &store);
        assert_eq!(session.state().percent_complete, 0.0);
        assert_eq!(session.state().elapsed_label, "00:00:12");
    }

    #[test]
    fn sync_drives_play_and_pause() {
        let store = MemoryStore::new();
        let mut session = PlaybackSession::new(10.0);
        let mut media = FakeMedia::with_duration(100.0);

        session.sync(&inputs("a", true), &mut media, &store);
        assert!(!media.paused);
        session.sync(&inputs("a", true), &mut media, &store);
        assert_eq!(media.play_calls, 1);

        session.sync(&inputs("a", false), &mut media, &store);
        assert!(media.paused);
        assert_eq!(media.pause_calls, 1);
    }

    #[test]
    fn hidden_or_empty_player_leaves_media_alone() {
        let store = MemoryStore::new();
        let mut session = PlaybackSession::new(10.0);
        let mut media = FakeMedia::with_duration(100.0);

        let mut hidden = inputs("a", true);
        hidden.hidden = true;
        session.sync(&hidden, &mut media, &store);

        let empty = RenderInputs {
            episode_id: None,
            playing: true,
            speed: 2.0,
            hidden: false,
        };
        session.sync(&empty, &mut media, &store);
        assert_eq!(media.play_calls, 0);
        assert_eq!(media.playback_rate, 1.0);
    }

    #[test]
    fn speed_is_applied_when_it_changes() {
        let store = MemoryStore::new();
        let mut session = PlaybackSession::new(10.0);
        let mut media = FakeMedia::with_duration(100.0);

        let mut props = inputs("a", false);
        props.speed = 1.5;
        session.sync(&props, &mut media, &store);
        assert_eq!(media.playback_rate, 1.5);

        props.speed = 2.0;
        session.sync(&props, &mut media, &store);
        assert_eq!(media.playback_rate, 2.0);
    }

    #[test]
    fn changing_episode_resets_progress() {
        let store = MemoryStore::new();
        let mut session = PlaybackSession::new(10.0);
        let mut media = FakeMedia::with_duration(300.0);

        session.sync(&inputs("a", true), &mut media, &store);
        media.current_time = 150.0;
        session.on_time_update(&mut media, &store);
        assert_eq!(session.state().percent_complete, 50.0);

        session.sync(&inputs("b", true), &mut media, &store);
        assert_eq!(session.state().elapsed_label, ELAPSED_PLACEHOLDER);
        assert_eq!(session.state().percent_complete, 0.0);
    }

    #[test]
    fn changing_episode_disarms_pending_resume() {
        let store = store_with_position("200", &episode("a", "00:10:00"));
        let mut session = PlaybackSession::mount(&store, 10.0);
        let mut media = FakeMedia::with_duration(600.0);

        session.sync(&inputs("a", false), &mut media, &store);
        session.sync(&inputs("b", true), &mut media, &store);
        assert!(!session.state().resume_requested);

        media.current_time = 0.0;
        session.on_time_update(&mut media, &store);
        assert_eq!(media.current_time, 0.0);
        assert_eq!(session.state().elapsed_label, "00:00:00");
    }

    #[test]
    fn showing_hidden_player_rearms_resume() {
        let store = MemoryStore::new();
        let mut session = PlaybackSession::new(10.0);
        let mut media = FakeMedia::with_duration(300.0);

        session.sync(&inputs("a", true), &mut media, &store);
        media.current_time = 90.0;
        session.on_time_update(&mut media, &store);

        let mut hidden = inputs("a", false);
        hidden.hidden = true;
        session.sync(&hidden, &mut media, &store);

        let mut fresh = FakeMedia::with_duration(300.0);
        session.sync(&inputs("a", false), &mut fresh, &store);
        assert!(session.state().resume_requested);
        assert_eq!(fresh.current_time, 90.0);
        assert_eq!(session.state().elapsed_label, "00:01:30");

        session.on_time_update(&mut fresh, &store);
        assert!(!session.state().resume_requested);
    }

    #[test]
    fn skip_back_clamps_at_start() {
        let store = MemoryStore::new();
        let mut session = PlaybackSession::new(10.0);
        let mut media = FakeMedia::with_duration(500.0);

        media.current_time = 5.0;
        assert_eq!(session.on_control(ControlRole::SkipBack, &mut media, &store), None);
        assert_eq!(media.current_time, 0.0);

        media.current_time = 30.0;
        session.on_control(ControlRole::SkipBack, &mut media, &store);
        assert_eq!(media.current_time, 20.0);
    }

    #[test]
    fn skip_forward_clamps_at_end() {
        let store = MemoryStore::new();
        let mut session = PlaybackSession::new(10.0);
        let mut media = FakeMedia::with_duration(500.0);

        media.current_time = 495.0;
        session.on_control(ControlRole::SkipForward, &mut media, &store);
        assert_eq!(media.current_time, 500.0);

        media.current_time = 100.0;
        session.on_control(ControlRole::SkipForward, &mut media, &store);
        assert_eq!(media.current_time, 110.0);
    }

    #[test]
    fn play_and_speed_are_delegated() {
        let store = MemoryStore::new();
        let mut session = PlaybackSession::new(10.0);
        let mut media = FakeMedia::with_duration(500.0);

        assert_eq!(
            session.on_control(ControlRole::PlayPause, &mut media, &store),
            Some(ParentRequest::TogglePlay)
        );
        assert_eq!(
            session.on_control(ControlRole::Speed, &mut media, &store),
            Some(ParentRequest::CycleSpeed)
        );
        assert_eq!(media.play_calls, 0);
        assert!(media.seeks.is_empty());
    }

    #[test]
    fn scrub_to_middle_of_bar() {
        let mut session = PlaybackSession::new(10.0);
        let mut media = FakeMedia::with_duration(200.0);

        session.scrub(250.0, 500.0, &mut media);
        assert_eq!(media.current_time, 100.0);
    }

    #[test]
    fn remove_clears_position_and_state() {
        let ep = episode("a", "00:10:00");
        let store = store_with_position("300", &ep);
        let mut session = PlaybackSession::mount(&store, 10.0);
        let mut media = FakeMedia::with_duration(600.0);
        media.paused = false;

        assert_eq!(
            session.on_control(ControlRole::Remove, &mut media, &store),
            Some(ParentRequest::RemovePlayer)
        );
        assert!(media.paused);
        assert_eq!(session.state(), &PlaybackState::default());
        assert_eq!(store.get(TIME_PLAYED_KEY).unwrap(), None);

        let remounted = PlaybackSession::mount(&store, 10.0);
        assert!(!remounted.state().resume_requested);
        assert_eq!(remounted.state().elapsed_label, ELAPSED_PLACEHOLDER);
    }
}
