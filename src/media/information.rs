//! Media information data model.

use serde::Serialize;

/// Information about one media input, decoded from the banner the
/// engine prints while opening it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MediaInformation {
    /// Container format name (e.g. "mp3", "mov,mp4,m4a,3gp,3g2,mj2").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Path or URL of the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Start time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// Overall bitrate in kb/s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<i64>,
    /// Container-level metadata, in order of appearance.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<(String, String)>,
    /// Streams, in order of appearance.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub streams: Vec<StreamInformation>,
    /// The raw banner text the information was decoded from.
    pub raw_information: String,
}

impl MediaInformation {
    /// Look up a container-level metadata value by key.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Information about one stream of a media input.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StreamInformation {
    /// Stream index inside the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    /// Stream type: "audio", "video" or "data".
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub stream_type: Option<String>,
    /// Short codec name (e.g. "h264").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    /// Codec name with profile and tag (e.g. "h264 (main) (avc1 / ...)").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_codec: Option<String>,
    /// Pixel format without qualifiers (video only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Pixel format with qualifiers (video only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_format: Option<String>,
    /// Frame width in pixels (video only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    /// Frame height in pixels (video only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    /// Sample aspect ratio (video only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_aspect_ratio: Option<String>,
    /// Display aspect ratio (video only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_aspect_ratio: Option<String>,
    /// Stream bitrate in kb/s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<i64>,
    /// Sample rate in Hz (audio only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<i64>,
    /// Channel layout (audio only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_layout: Option<String>,
    /// Sample format (audio only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_format: Option<String>,
    /// Average frame rate, as printed ("fps").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_frame_rate: Option<String>,
    /// Real base frame rate, as printed ("tbr").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_frame_rate: Option<String>,
    /// Container time base, as printed ("tbn").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_base: Option<String>,
    /// Codec time base, as printed ("tbc").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec_time_base: Option<String>,
    /// Stream-level metadata, in order of appearance.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<(String, String)>,
    /// Stream-level side data, in order of appearance.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub side_data: Vec<(String, String)>,
}

impl StreamInformation {
    /// Look up a stream-level metadata value by key.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
