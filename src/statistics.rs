//! Transcode progress statistics reported by the engine.

use serde::Serialize;

/// A statistics sample from an ongoing execution.
///
/// The engine reports these periodically while it processes media. A
/// sample may carry only some of the fields; the rest arrive as zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    /// Last processed frame number, for video streams.
    pub video_frame_number: i32,
    /// Frames processed per second, for video streams.
    pub video_fps: f32,
    /// Quality of the video stream.
    pub video_quality: f32,
    /// Output size in bytes.
    pub size: i64,
    /// Processed media duration in milliseconds.
    pub time: i32,
    /// Output bit rate in kbits/s.
    pub bitrate: f64,
    /// Processing speed, processed duration over wall-clock duration.
    pub speed: f64,
}

impl Statistics {
    /// Merge a newer sample into this one. Fields the new sample does
    /// not carry (non-positive values) keep their previous value.
    pub fn update(&mut self, new: &Statistics) {
        if new.video_frame_number > 0 {
            self.video_frame_number = new.video_frame_number;
        }
        if new.video_fps > 0.0 {
            self.video_fps = new.video_fps;
        }
        if new.video_quality > 0.0 {
            self.video_quality = new.video_quality;
        }
        if new.size > 0 {
            self.size = new.size;
        }
        if new.time > 0 {
            self.time = new.time;
        }
        if new.bitrate > 0.0 {
            self.bitrate = new.bitrate;
        }
        if new.speed > 0.0 {
            self.speed = new.speed;
        }
    }
}

/// Callback invoked for every statistics sample the engine delivers.
pub type StatisticsCallback = Box<dyn FnMut(&Statistics) + Send>;
