use std::sync::{Arc, Mutex};

use crate::common::lock;

/// Border colors offered in the profile settings dialog.
pub const BORDER_COLORS: [(&str, &str); 6] = [
    ("Azul", "#0A2A5E"),
    ("Verde", "#4CAF50"),
    ("Vermelho", "#F44336"),
    ("Roxo", "#9C27B0"),
    ("Laranja", "#FF9800"),
    ("Preto", "#000000"),
];

pub const DEFAULT_BIO: &str = "(Apaixonado por futebol e corrida!)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSettings {
    pub bio: String,
    pub border_color: String,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            bio: DEFAULT_BIO.to_string(),
            border_color: BORDER_COLORS[0].1.to_string(),
        }
    }
}

/// Profile page state: the editable bio and the avatar border color.
#[derive(Clone, Default)]
pub struct ProfileService {
    settings: Arc<Mutex<ProfileSettings>>,
}

impl ProfileService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> ProfileSettings {
        lock(&self.settings).clone()
    }

    pub fn set_bio(&self, bio: &str) {
        lock(&self.settings).bio = bio.to_string();
    }

    /// Change the border color. Only palette values are accepted;
    /// anything else is rejected and the setting keeps its value.
    pub fn set_border_color(&self, color: &str) -> bool {
        if !BORDER_COLORS.iter().any(|(_, value)| *value == color) {
            return false;
        }
        lock(&self.settings).border_color = color.to_string();
        true
    }
}
