//! Seek arithmetic for the transport controls and the progress bar.

/// Role of a clickable transport control. The control strip has one click
/// handler; each button carries its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRole {
    PlayPause,
    Speed,
    SkipBack,
    SkipForward,
    Remove,
}

impl ControlRole {
    /// Stable DOM id of the button carrying this role.
    pub fn element_id(self) -> &'static str {
        match self {
            ControlRole::PlayPause => "play-pause-btn",
            ControlRole::Speed => "speed-btn",
            ControlRole::SkipBack => "skip-back-btn",
            ControlRole::SkipForward => "skip-forward-btn",
            ControlRole::Remove => "remove-btn",
        }
    }
}

/// Target time for a skip back. Anything within `skip` of the start goes to 0.
pub fn skip_back_target(current: f64, skip: f64) -> f64 {
    if current <= skip {
        0.0
    } else {
        current - skip
    }
}

/// Target time for a skip forward, clamped to `duration`.
///
/// With no known duration the skip is applied unclamped.
pub fn skip_forward_target(current: f64, duration: Option<f64>, skip: f64) -> f64 {
    match duration {
        Some(duration) if current + skip > duration => duration,
        _ => current + skip,
    }
}

/// Target time for a pointer at `offset_x` on a bar `bar_width` wide.
pub fn scrub_target(offset_x: f64, bar_width: f64, duration: f64) -> Option<f64> {
    if !(bar_width.is_finite() && bar_width > 0.0) || !(duration.is_finite() && duration > 0.0) {
        return None;
    }
    Some(((offset_x / bar_width).clamp(0.0, 1.0)) * duration)
}

/// Press/drag/release tracking for the progress bar. Only lives as long as
/// the bar does.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrubGesture {
    pressed: bool,
}

impl ScrubGesture {
    pub fn press(&mut self) {
        self.pressed = true;
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.pressed
    }
}
