//! Audio Manager - binds the player's `<audio>` element to the playback session.
//! On wasm the element is driven directly through `web-sys`; desktop builds go
//! through the webview with `document::eval` and read back a snapshot.

use crate::playback::MediaElement;

#[cfg(not(target_arch = "wasm32"))]
use dioxus::prelude::*;
#[cfg(not(target_arch = "wasm32"))]
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlAudioElement};

/// DOM id of the player's audio element.
pub const AUDIO_ELEMENT_ID: &str = "podplayer-audio";

/// Stand-in used while no audio element is mounted. Reads as paused at 0
/// with unknown duration; commands are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedAudio;

impl MediaElement for DetachedAudio {
    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn is_paused(&self) -> bool {
        true
    }

    fn current_time(&self) -> f64 {
        0.0
    }

    fn set_current_time(&mut self, _seconds: f64) {}

    fn duration(&self) -> f64 {
        f64::NAN
    }

    fn set_playback_rate(&mut self, _rate: f64) {}
}

/// Look up the player's audio element.
#[cfg(target_arch = "wasm32")]
pub fn audio_element() -> Option<HtmlAudioElement> {
    let document = window()?.document()?;
    document
        .get_element_by_id(AUDIO_ELEMENT_ID)?
        .dyn_into::<HtmlAudioElement>()
        .ok()
}

#[cfg(target_arch = "wasm32")]
fn web_try_play(audio: &HtmlAudioElement) {
    if let Ok(promise) = audio.play() {
        let promise: js_sys::Promise = promise;
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
                tracing::debug!("play() rejected: {err:?}");
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
pub struct WebAudio(HtmlAudioElement);

#[cfg(target_arch = "wasm32")]
impl MediaElement for WebAudio {
    fn play(&mut self) {
        web_try_play(&self.0);
    }

    fn pause(&mut self) {
        let _ = self.0.pause();
    }

    fn is_paused(&self) -> bool {
        self.0.paused()
    }

    fn current_time(&self) -> f64 {
        self.0.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        if seconds.is_finite() {
            self.0.set_current_time(seconds);
        }
    }

    fn duration(&self) -> f64 {
        self.0.duration()
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.0.set_playback_rate(rate);
    }
}

/// What the webview reports about the audio element.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AudioSnapshot {
    #[serde(default)]
    pub current_time: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default = "default_paused")]
    pub paused: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn default_paused() -> bool {
    true
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for AudioSnapshot {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            paused: true,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn bridge_command(body: &str) {
    let script = format!(
        r#"(function () {{
            const audio = document.getElementById("{AUDIO_ELEMENT_ID}");
            if (!audio) return false;
            {body}
            return true;
        }})();"#
    );
    let _ = document::eval(&script);
}

#[cfg(not(target_arch = "wasm32"))]
async fn bridge_snapshot() -> Option<AudioSnapshot> {
    let script = format!(
        r#"return (function () {{
            const audio = document.getElementById("{AUDIO_ELEMENT_ID}");
            if (!audio) return null;
            return {{
              current_time: Number.isFinite(audio.currentTime) ? audio.currentTime : 0,
              duration: Number.isFinite(audio.duration) ? audio.duration : 0,
              paused: !!audio.paused,
            }};
        }})();"#
    );
    document::eval(&script)
        .join::<Option<AudioSnapshot>>()
        .await
        .ok()
        .flatten()
}

/// Webview-backed media element. Reads come from the last snapshot; writes
/// update the snapshot immediately so consecutive commands see them.
#[cfg(not(target_arch = "wasm32"))]
pub struct BridgedAudio {
    snapshot: Rc<Cell<AudioSnapshot>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl BridgedAudio {
    fn update(&self, f: impl FnOnce(&mut AudioSnapshot)) {
        let mut snapshot = self.snapshot.get();
        f(&mut snapshot);
        self.snapshot.set(snapshot);
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl MediaElement for BridgedAudio {
    fn play(&mut self) {
        self.update(|s| s.paused = false);
        bridge_command("audio.play().catch(() => {});");
    }

    fn pause(&mut self) {
        self.update(|s| s.paused = true);
        bridge_command("audio.pause();");
    }

    fn is_paused(&self) -> bool {
        self.snapshot.get().paused
    }

    fn current_time(&self) -> f64 {
        self.snapshot.get().current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        self.update(|s| s.current_time = seconds);
        bridge_command(&format!("audio.currentTime = {seconds};"));
    }

    fn duration(&self) -> f64 {
        self.snapshot.get().duration
    }

    fn set_playback_rate(&mut self, rate: f64) {
        if rate.is_finite() && rate > 0.0 {
            bridge_command(&format!("audio.playbackRate = {rate};"));
        }
    }
}

/// Marks a snapshot read as in flight until dropped.
#[cfg(not(target_arch = "wasm32"))]
struct RefreshGuard(Rc<Cell<bool>>);

#[cfg(not(target_arch = "wasm32"))]
impl RefreshGuard {
    fn try_begin(flag: &Rc<Cell<bool>>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag.clone()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Handle kept by the player component for the lifetime of its mount.
#[derive(Clone, Default)]
pub struct AudioHandle {
    #[cfg(not(target_arch = "wasm32"))]
    snapshot: Rc<Cell<AudioSnapshot>>,
    #[cfg(not(target_arch = "wasm32"))]
    refreshing: Rc<Cell<bool>>,
}

impl AudioHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull fresh clock values from the element before a time-update is
    /// processed. Returns `false` when another read is still in flight; the
    /// caller drops that tick so snapshots are applied in order. Always
    /// `true` on wasm, where reads are live.
    pub async fn refresh(&self) -> bool {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let Some(_guard) = RefreshGuard::try_begin(&self.refreshing) else {
                return false;
            };
            if let Some(snapshot) = bridge_snapshot().await {
                self.snapshot.set(snapshot);
            }
        }
        true
    }

    /// Run `f` against the mounted element, or against [`DetachedAudio`] when
    /// nothing is mounted.
    #[cfg(target_arch = "wasm32")]
    pub fn with_media<R>(&self, f: impl FnOnce(&mut dyn MediaElement) -> R) -> R {
        match audio_element() {
            Some(element) => f(&mut WebAudio(element)),
            None => f(&mut DetachedAudio),
        }
    }

    /// Run `f` against the webview's element through the snapshot bridge.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_media<R>(&self, f: impl FnOnce(&mut dyn MediaElement) -> R) -> R {
        f(&mut BridgedAudio {
            snapshot: self.snapshot.clone(),
        })
    }
}
