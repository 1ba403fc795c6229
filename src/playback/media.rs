/// The slice of an HTML media element the player drives.
///
/// Commands never report failure; a media element that cannot seek or play
/// simply keeps its old state.
pub trait MediaElement {
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    /// Total length in seconds. May be `NaN` or zero before metadata loads.
    fn duration(&self) -> f64;
    fn set_playback_rate(&mut self, rate: f64);
}

/// Duration as a usable number, or `None` while the element has not loaded
/// metadata.
pub fn known_duration(media: &dyn MediaElement) -> Option<f64> {
    let duration = media.duration();
    (duration.is_finite() && duration > 0.0).then_some(duration)
}

/// Scripted media element for tests.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct FakeMedia {
    pub paused: bool,
    pub current_time: f64,
    pub duration: f64,
    pub playback_rate: f64,
    pub seeks: Vec<f64>,
    pub play_calls: usize,
    pub pause_calls: usize,
}

#[cfg(test)]
impl FakeMedia {
    pub fn with_duration(duration: f64) -> Self {
        Self {
            paused: true,
            current_time: 0.0,
            duration,
            playback_rate: 1.0,
            seeks: Vec::new(),
            play_calls: 0,
            pause_calls: 0,
        }
    }
}

#[cfg(test)]
impl MediaElement for FakeMedia {
    fn play(&mut self) {
        self.paused = false;
        self.play_calls += 1;
    }

    fn pause(&mut self) {
        self.paused = true;
        self.pause_calls += 1;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
        self.seeks.push(seconds);
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.playback_rate = rate;
    }
}
