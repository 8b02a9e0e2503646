//! Registered tic identifiers for one user

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicKind {
    EyeBlinkRapid,
    MouthTwitch,
    HeadNod,
    ShoulderShrug,
}

impl TicKind {
    pub const ALL: [TicKind; 4] = [
        TicKind::EyeBlinkRapid,
        TicKind::MouthTwitch,
        TicKind::HeadNod,
        TicKind::ShoulderShrug,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "eye_blink_rapid" => Some(TicKind::EyeBlinkRapid),
            "mouth_twitch" => Some(TicKind::MouthTwitch),
            "head_nod" => Some(TicKind::HeadNod),
            "shoulder_shrug" => Some(TicKind::ShoulderShrug),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicKind::EyeBlinkRapid => "eye_blink_rapid",
            TicKind::MouthTwitch => "mouth_twitch",
            TicKind::HeadNod => "head_nod",
            TicKind::ShoulderShrug => "shoulder_shrug",
        }
    }
}

/// Ordered, de-duplicated set of tics. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicProfile {
    tics: Vec<TicKind>,
}

impl TicProfile {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Unknown identifiers are skipped so newer profiles keep working
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> Self {
        let mut tics = Vec::new();
        for id in ids {
            match TicKind::from_id(id.as_ref()) {
                Some(kind) if !tics.contains(&kind) => tics.push(kind),
                Some(_) => {}
                None => debug!("Ignoring unknown tic identifier '{}'", id.as_ref()),
            }
        }
        Self { tics }
    }

    /// Parse a JSON array of identifier strings
    pub fn from_json(text: &str) -> Result<Self> {
        let ids: Vec<String> = serde_json::from_str(text)?;
        Ok(Self::from_ids(&ids))
    }

    pub fn is_empty(&self) -> bool {
        self.tics.is_empty()
    }

    pub fn contains(&self, kind: TicKind) -> bool {
        self.tics.contains(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = TicKind> + '_ {
        self.tics.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ids_skips_unknown() {
        let profile = TicProfile::from_ids(&["head_nod", "ear_wiggle", "eye_blink_rapid"]);
        assert_eq!(
            profile.iter().collect::<Vec<_>>(),
            vec![TicKind::HeadNod, TicKind::EyeBlinkRapid]
        );
    }

    #[test]
    fn test_from_ids_dedupes() {
        let profile = TicProfile::from_ids(&["head_nod", "head_nod"]);
        assert_eq!(profile.iter().count(), 1);
    }

    #[test]
    fn test_from_json() {
        let profile = TicProfile::from_json(r#"["mouth_twitch", "shoulder_shrug"]"#).unwrap();
        assert!(profile.contains(TicKind::MouthTwitch));
        assert!(profile.contains(TicKind::ShoulderShrug));
        assert!(!profile.contains(TicKind::HeadNod));
    }

    #[test]
    fn test_id_roundtrip() {
        for kind in TicKind::ALL {
            assert_eq!(TicKind::from_id(kind.as_str()), Some(kind));
        }
    }
}
