use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named camera context. One per group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKey {
    #[default]
    Home,
    Arcade,
    Stairs,
    Hoop,
    Projects,
    Menu,
}

impl SceneKey {
    pub const ALL: [SceneKey; 6] = [
        SceneKey::Home,
        SceneKey::Arcade,
        SceneKey::Stairs,
        SceneKey::Hoop,
        SceneKey::Projects,
        SceneKey::Menu,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneKey::Home => "home",
            SceneKey::Arcade => "arcade",
            SceneKey::Stairs => "stairs",
            SceneKey::Hoop => "hoop",
            SceneKey::Projects => "projects",
            SceneKey::Menu => "menu",
        }
    }
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scene '{0}'")]
pub struct UnknownScene(pub String);

impl FromStr for SceneKey {
    type Err = UnknownScene;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SceneKey::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownScene(s.to_string()))
    }
}
