//! Player configuration and source list parsing

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A playable source for the media resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSource {
    /// Location of the media file
    #[serde(rename = "src", alias = "uri")]
    pub uri: String,
    /// MIME type hint, e.g. `video/mp4`
    #[serde(rename = "type", alias = "mimeType", default)]
    pub mime_type: Option<String>,
}

impl MediaSource {
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: Some(mime_type.into()),
        }
    }
}

/// Player configuration, immutable once the player is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Start loading and playing on construction
    pub autoplay: bool,
    /// Start muted
    pub muted: bool,
    /// Restart from the beginning when playback ends
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    /// Render the custom control bar
    #[serde(alias = "controls")]
    pub show_controls: bool,
    /// Poster image shown before playback
    pub poster: Option<String>,
    /// Ordered list of sources, first supported one wins
    pub sources: Vec<MediaSource>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            autoplay: false,
            muted: true,
            loop_playback: false,
            show_controls: true,
            poster: None,
            sources: Vec::new(),
        }
    }
}

impl PlayerConfig {
    /// Config for a silent background reel: autoplay, muted, looping, no controls
    pub fn ambient(sources: Vec<MediaSource>) -> Self {
        Self {
            autoplay: true,
            muted: true,
            loop_playback: true,
            show_controls: false,
            poster: None,
            sources,
        }
    }

    /// Config for a click-to-play showcase with controls
    pub fn showcase(sources: Vec<MediaSource>) -> Self {
        Self {
            sources,
            ..Self::default()
        }
    }

    /// Build a config from `data-*` style attributes.
    ///
    /// `get` receives attribute names without the `data-` prefix
    /// (`autoplay`, `muted`, `loop`, `controls`, `poster`, `sources`).
    pub fn from_attributes<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            autoplay: get("autoplay").as_deref() == Some("true"),
            muted: get("muted").as_deref() != Some("false"),
            loop_playback: get("loop").as_deref() == Some("true"),
            show_controls: get("controls").as_deref() != Some("false"),
            poster: get("poster").filter(|p| !p.is_empty()),
            sources: get("sources")
                .map(|encoded| parse_sources(&encoded))
                .unwrap_or_default(),
        }
    }

    /// Parse a JSON config object
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigInvalid(e.to_string()))
    }

    /// Check that the config describes a functional player
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(Error::ConfigInvalid("source list is empty".into()));
        }
        if self.sources.iter().any(|s| s.uri.trim().is_empty()) {
            return Err(Error::ConfigInvalid("source with empty src".into()));
        }
        Ok(())
    }
}

/// Parse an encoded source list, strictly
pub fn try_parse_sources(encoded: &str) -> Result<Vec<MediaSource>> {
    let sources: Vec<MediaSource> = serde_json::from_str(encoded)?;
    Ok(sources
        .into_iter()
        .filter(|s| !s.uri.trim().is_empty())
        .collect())
}

/// Parse an encoded source list.
///
/// Malformed input yields an empty list.
pub fn parse_sources(encoded: &str) -> Vec<MediaSource> {
    if encoded.trim().is_empty() {
        return Vec::new();
    }

    match try_parse_sources(encoded) {
        Ok(sources) => sources,
        Err(e) => {
            warn!(error = %e, error_code = e.error_code(), "Ignoring malformed source list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::default();
        assert!(config.muted);
        assert!(config.show_controls);
        assert!(!config.autoplay);
        assert!(!config.loop_playback);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_sources() {
        let sources = parse_sources(
            r#"[{"src":"reel.webm","type":"video/webm"},{"src":"reel.mp4","type":"video/mp4"}]"#,
        );
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1], MediaSource::new("reel.mp4", "video/mp4"));
    }

    #[test]
    fn test_parse_sources_aliases() {
        let sources = parse_sources(r#"[{"uri":"a.mp4","mimeType":"video/mp4"},{"src":"b.mp4"}]"#);
        assert_eq!(sources[0].mime_type.as_deref(), Some("video/mp4"));
        assert_eq!(sources[1].mime_type, None);
    }

    #[test]
    fn test_malformed_sources_are_empty() {
        assert!(parse_sources("").is_empty());
        assert!(parse_sources("[{\"src\": ").is_empty());
        assert!(parse_sources("{\"src\":\"a.mp4\"}").is_empty());
        assert!(parse_sources(r#"[{"src":""}]"#).is_empty());
    }

    #[test]
    fn test_from_attributes() {
        let attrs: HashMap<&str, &str> = [
            ("autoplay", "true"),
            ("muted", "false"),
            ("controls", "false"),
            ("poster", ""),
            ("sources", r#"[{"src":"hero.mp4","type":"video/mp4"}]"#),
        ]
        .into_iter()
        .collect();

        let config = PlayerConfig::from_attributes(|name| attrs.get(name).map(|v| v.to_string()));
        assert!(config.autoplay);
        assert!(!config.muted);
        assert!(!config.loop_playback);
        assert!(!config.show_controls);
        assert_eq!(config.poster, None);
        assert_eq!(config.sources.len(), 1);
    }

    #[test]
    fn test_from_attributes_missing() {
        let config = PlayerConfig::from_attributes(|_| None);
        assert_eq!(config, PlayerConfig::default());
    }

    #[test]
    fn test_from_json() {
        let config = PlayerConfig::from_json(
            r#"{"autoplay":true,"loop":true,"controls":false,"sources":[{"src":"a.mp4"}]}"#,
        )
        .unwrap();
        assert!(config.autoplay && config.loop_playback && config.muted);
        assert!(!config.show_controls);
        assert!(config.validate().is_ok());
    }
}
