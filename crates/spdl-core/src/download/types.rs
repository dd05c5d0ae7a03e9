//! Source, format and quality types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A place audio can be downloaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Internet Archive (free, legal FLAC).
    #[serde(rename = "internetarchive")]
    InternetArchive,
    /// Jamendo (Creative Commons).
    Jamendo,
    /// YouTube via yt-dlp.
    Youtube,
}

/// Default order in which sources are tried.
pub const DEFAULT_SOURCE_PRIORITY: [SourceKind; 3] = [
    SourceKind::InternetArchive,
    SourceKind::Jamendo,
    SourceKind::Youtube,
];

impl SourceKind {
    /// All known sources.
    pub const ALL: [Self; 3] = DEFAULT_SOURCE_PRIORITY;

    /// Stable lowercase name used in config files and CLI flags.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InternetArchive => "internetarchive",
            Self::Jamendo => "jamendo",
            Self::Youtube => "youtube",
        }
    }

    /// Label shown in the source list.
    pub const fn label(self) -> &'static str {
        match self {
            Self::InternetArchive => "INTERNET ARCHIVE (FREE FLAC)",
            Self::Jamendo => "JAMENDO (FREE CC)",
            Self::Youtube => "YOUTUBE",
        }
    }

    /// Icon shown next to progress and result lines.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::InternetArchive => "📚",
            Self::Jamendo => "🎹",
            Self::Youtube => "📺",
        }
    }

    /// Parse a comma-separated priority list (e.g. `"jamendo,youtube"`).
    ///
    /// Duplicates are rejected so that a source is never tried twice.
    pub fn parse_list(list: &str) -> Result<Vec<Self>, String> {
        let mut sources = Vec::new();
        for raw in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let kind: Self = raw.parse()?;
            if sources.contains(&kind) {
                return Err(format!("Source '{kind}' listed more than once"));
            }
            sources.push(kind);
        }
        if sources.is_empty() {
            return Err("Source list cannot be empty".to_string());
        }
        Ok(sources)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internetarchive" | "internet-archive" | "archive" | "ia" => Ok(Self::InternetArchive),
            "jamendo" => Ok(Self::Jamendo),
            "youtube" | "yt" => Ok(Self::Youtube),
            other => Err(format!(
                "Unknown source '{other}' (expected internetarchive, jamendo or youtube)"
            )),
        }
    }
}

/// Output audio format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MP3 (lossy).
    Mp3,
    /// FLAC (lossless).
    #[default]
    Flac,
    /// WAV (uncompressed).
    Wav,
    /// AAC in an M4A container.
    M4a,
    /// Opus.
    Opus,
    /// Ogg Vorbis.
    Vorbis,
}

impl AudioFormat {
    /// All supported formats.
    pub const ALL: [Self; 6] = [
        Self::Flac,
        Self::Mp3,
        Self::M4a,
        Self::Wav,
        Self::Opus,
        Self::Vorbis,
    ];

    /// Map a user-supplied format to a codec, falling back to MP3.
    pub fn from_codec_name(name: &str) -> Self {
        name.parse().unwrap_or(Self::Mp3)
    }

    /// Codec name passed to the extractor.
    pub const fn codec(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Wav => "wav",
            Self::M4a => "m4a",
            Self::Opus => "opus",
            Self::Vorbis => "vorbis",
        }
    }

    /// File extension of the converted output.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Vorbis => "ogg",
            other => other.codec(),
        }
    }

    /// Whether a bitrate setting applies to this format.
    pub const fn is_lossy(self) -> bool {
        matches!(self, Self::Mp3 | Self::M4a | Self::Opus | Self::Vorbis)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.codec())
    }
}

impl FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mp3" => Ok(Self::Mp3),
            "flac" => Ok(Self::Flac),
            "wav" => Ok(Self::Wav),
            "m4a" | "aac" => Ok(Self::M4a),
            "opus" => Ok(Self::Opus),
            "vorbis" | "ogg" => Ok(Self::Vorbis),
            other => Err(format!("Unsupported audio format '{other}'")),
        }
    }
}

/// Bitrate for lossy output in kbps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AudioQuality(u16);

impl AudioQuality {
    /// Allowed bitrates.
    pub const ALLOWED: [u16; 4] = [128, 192, 256, 320];

    /// Highest quality (320 kbps).
    pub const BEST: Self = Self(320);

    /// Create a quality value, rejecting bitrates outside [`Self::ALLOWED`].
    pub fn new(kbps: u16) -> Result<Self, String> {
        if Self::ALLOWED.contains(&kbps) {
            Ok(Self(kbps))
        } else {
            Err(format!(
                "Unsupported quality {kbps} (expected one of 128, 192, 256, 320)"
            ))
        }
    }

    /// Bitrate in kbps.
    pub const fn kbps(self) -> u16 {
        self.0
    }
}

impl Default for AudioQuality {
    fn default() -> Self {
        Self::BEST
    }
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AudioQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches("kbps").trim_end_matches(['k', 'K']);
        let kbps: u16 = trimmed
            .parse()
            .map_err(|_| format!("Invalid quality '{s}'"))?;
        Self::new(kbps)
    }
}

impl TryFrom<String> for AudioQuality {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AudioQuality> for String {
    fn from(value: AudioQuality) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_round_trip_names() {
        for kind in SourceKind::ALL {
            assert_eq!(kind.as_str().parse::<SourceKind>().unwrap(), kind);
        }
        assert_eq!("IA".parse::<SourceKind>().unwrap(), SourceKind::InternetArchive);
        assert!("deezer".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_source_kind_serde_name() {
        let json = serde_json::to_string(&SourceKind::InternetArchive).unwrap();
        assert_eq!(json, "\"internetarchive\"");
    }

    #[test]
    fn test_parse_list() {
        let list = SourceKind::parse_list("jamendo, youtube").unwrap();
        assert_eq!(list, vec![SourceKind::Jamendo, SourceKind::Youtube]);

        assert!(SourceKind::parse_list("youtube,yt").is_err());
        assert!(SourceKind::parse_list(" , ").is_err());
        assert!(SourceKind::parse_list("youtube,spotify").is_err());
    }

    #[test]
    fn test_audio_format_fallback_is_mp3() {
        assert_eq!(AudioFormat::from_codec_name("aiff"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::from_codec_name("FLAC"), AudioFormat::Flac);
    }

    #[test]
    fn test_audio_format_extension() {
        assert_eq!(AudioFormat::Vorbis.extension(), "ogg");
        assert_eq!(AudioFormat::Vorbis.codec(), "vorbis");
        assert_eq!(AudioFormat::M4a.extension(), "m4a");
        assert!(!AudioFormat::Flac.is_lossy());
        assert!(AudioFormat::Mp3.is_lossy());
    }

    #[test]
    fn test_audio_quality_parse() {
        assert_eq!("320".parse::<AudioQuality>().unwrap().kbps(), 320);
        assert_eq!("192k".parse::<AudioQuality>().unwrap().kbps(), 192);
        assert!("300".parse::<AudioQuality>().is_err());
        assert!("loud".parse::<AudioQuality>().is_err());
    }

    #[test]
    fn test_audio_quality_serde_as_string() {
        let json = serde_json::to_string(&AudioQuality::new(256).unwrap()).unwrap();
        assert_eq!(json, "\"256\"");
        let back: AudioQuality = serde_json::from_str("\"128\"").unwrap();
        assert_eq!(back.kbps(), 128);
        assert!(serde_json::from_str::<AudioQuality>("\"999\"").is_err());
    }
}
