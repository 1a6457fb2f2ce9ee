//! Application context owned by the orchestrator and passed into the pipeline.

use crate::templates;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InteractionMode {
    /// Mirror a reference shape; the matcher score is shown and rewarded.
    Learn,
    /// Free movement; denser medallions.
    #[default]
    Perform,
}

impl InteractionMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "learn" | "Learn" => Some(InteractionMode::Learn),
            "perform" | "Perform" => Some(InteractionMode::Perform),
            _ => None,
        }
    }
}

/// Mutable per-session settings: current mode, whether sound is on, and which
/// template the dancer is learning.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub mode: InteractionMode,
    pub sound_enabled: bool,
    pub template_index: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Perform,
            sound_enabled: true,
            template_index: 0,
        }
    }
}

impl Session {
    pub fn new(mode: InteractionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn current_template(&self) -> Option<&'static templates::Template> {
        templates::library().get(self.template_index)
    }

    /// Advance to the next template, wrapping around the library.
    pub fn next_template(&mut self) {
        let n = templates::library().len();
        if n > 0 {
            self.template_index = (self.template_index + 1) % n;
        }
    }

    pub fn previous_template(&mut self) {
        let n = templates::library().len();
        if n > 0 {
            self.template_index = (self.template_index + n - 1) % n;
        }
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }
}
