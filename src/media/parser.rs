//! Decoder for the input banner the engine prints.
//!
//! The engine describes each opened input on a handful of known line
//! shapes ("Input #0, ...", "Duration: ...", "Metadata:", "Side data:",
//! "Stream #0:n: ..."). Decoding is total: lines that do not match are
//! kept only in the raw text, and fields that fail to parse stay unset.

use once_cell::sync::Lazy;
use regex::Regex;

use super::information::{MediaInformation, StreamInformation};

static PAREN_GROUPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*\)").unwrap());
static BRACKET_GROUPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*\]").unwrap());

/// Decode engine output into a [`MediaInformation`].
pub fn parse(output: &str) -> MediaInformation {
    let mut information = MediaInformation::default();
    let mut in_metadata = false;
    let mut in_side_data = false;
    // Metadata attaches to the most recent stream until an Input or
    // Duration line closes it again.
    let mut stream_open = false;
    let mut raw = String::new();

    for line in output.lines() {
        if line.starts_with('[') {
            in_metadata = false;
            in_side_data = false;
            continue;
        }

        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();

        if trimmed.starts_with("Input") {
            in_metadata = false;
            in_side_data = false;
            stream_open = false;
            let (format, path) = parse_input_line(trimmed);
            information.format = format;
            information.path = path;
        } else if trimmed.starts_with("Duration") {
            in_metadata = false;
            in_side_data = false;
            stream_open = false;
            let (duration, start_time, bitrate) = parse_duration_line(trimmed);
            information.duration = duration;
            information.start_time = start_time;
            information.bitrate = bitrate;
        } else if lower.starts_with("metadata") {
            in_side_data = false;
            in_metadata = true;
        } else if lower.starts_with("side data") {
            in_metadata = false;
            in_side_data = true;
        } else if trimmed.starts_with("Stream mapping")
            || trimmed.starts_with("Press [q] to stop")
            || trimmed.starts_with("Output")
        {
            break;
        } else if trimmed.starts_with("Stream") {
            in_metadata = false;
            in_side_data = false;
            information.streams.push(parse_stream_line(trimmed));
            stream_open = true;
        } else if in_metadata {
            if let Some(entry) = parse_metadata_line(trimmed) {
                match information.streams.last_mut() {
                    Some(stream) if stream_open => stream.metadata.push(entry),
                    _ => information.metadata.push(entry),
                }
            }
        } else if in_side_data {
            if let Some(entry) = parse_metadata_line(trimmed) {
                if stream_open {
                    if let Some(stream) = information.streams.last_mut() {
                        stream.side_data.push(entry);
                    }
                }
            }
        }

        raw.push_str(line);
        raw.push('\n');
    }

    information.raw_information = raw;
    information
}

/// "Input #0, mp3, from 'file.mp3':" -> format and path.
fn parse_input_line(line: &str) -> (Option<String>, Option<String>) {
    let format = between(line, ",", ", from").map(|s| s.trim().to_string());
    let path = between(line, "'", "'").map(|s| s.trim().to_string());
    (format, path)
}

/// "Duration: 00:03:33.24, start: 0.000000, bitrate: 320 kb/s".
fn parse_duration_line(line: &str) -> (Option<i64>, Option<i64>, Option<i64>) {
    let duration = between(line, "Duration:", ",").and_then(|s| parse_duration_value(s.trim()));
    let start_time = between(line, "start:", ",").and_then(|s| parse_start_time(s.trim()));
    let bitrate = after(line, "bitrate:")
        .map(|s| s.replace("kb/s", ""))
        .and_then(|s| s.trim().parse().ok());
    (duration, start_time, bitrate)
}

/// "key : value" -> trimmed pair, or None when there is no colon.
fn parse_metadata_line(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}

/// Decode one "Stream #0:n..." line.
fn parse_stream_line(line: &str) -> StreamInformation {
    let mut stream = StreamInformation::default();

    stream.index = between(line, "Stream #0:", ":")
        .map(|s| PAREN_GROUPS.replace_all(s, "").replace(':', ""))
        .and_then(|s| s.trim().parse().ok());

    let Some(type_start) = second_colon(line) else {
        return stream;
    };
    let parts: Vec<&str> = line[type_start + 1..].split(',').collect();
    let type_part = parts.first().copied().unwrap_or("");

    let stream_type = parse_stream_type(type_part);
    stream.stream_type = stream_type.map(str::to_string);
    stream.codec = Some(strip_type_prefix(&PAREN_GROUPS.replace_all(type_part, "")));
    stream.full_codec = Some(strip_type_prefix(type_part));

    match stream_type {
        Some("video") => parse_video_parts(&parts, &mut stream),
        Some("audio") => parse_audio_parts(&parts, &mut stream),
        Some("data") => {
            if let Some(part) = parts.get(1) {
                stream.bitrate = parse_bitrate_part(part);
            }
        }
        _ => {}
    }

    stream
}

fn parse_video_parts(parts: &[&str], stream: &mut StreamInformation) {
    let mut last_used = 1;

    if let Some(part) = parts.get(1) {
        // The pixel format qualifier list may itself contain commas;
        // rejoin split pieces until the parentheses balance.
        let mut format = (*part).to_string();
        while count_matches(&format, '(') != count_matches(&format, ')') {
            last_used += 1;
            let Some(next) = parts.get(last_used) else {
                break;
            };
            format.push(',');
            format.push_str(next);
        }

        stream.full_format = Some(format.to_lowercase().trim().to_string());
        stream.format = Some(
            PAREN_GROUPS
                .replace_all(&format, "")
                .to_lowercase()
                .trim()
                .to_string(),
        );
    }

    last_used += 1;
    if let Some(part) = parts.get(last_used) {
        let layout = part.to_lowercase().trim().to_string();
        let (width, height) = parse_video_dimensions(&layout);
        stream.width = width;
        stream.height = height;
        stream.sample_aspect_ratio = parse_aspect_ratio(&layout, "sar");
        stream.display_aspect_ratio = parse_aspect_ratio(&layout, "dar");
    }

    for part in parts.iter().skip(last_used + 1) {
        let part = PAREN_GROUPS.replace_all(part, "").to_lowercase();
        if part.contains("kb/s") {
            stream.bitrate = part.replace("kb/s", "").trim().parse().ok();
        } else if part.contains("fps") {
            stream.average_frame_rate = Some(part.replace("fps", "").trim().to_string());
        } else if part.contains("tbr") {
            stream.real_frame_rate = Some(part.replace("tbr", "").trim().to_string());
        } else if part.contains("tbn") {
            stream.time_base = Some(part.replace("tbn", "").trim().to_string());
        } else if part.contains("tbc") {
            stream.codec_time_base = Some(part.replace("tbc", "").trim().to_string());
        }
    }
}

fn parse_audio_parts(parts: &[&str], stream: &mut StreamInformation) {
    if let Some(part) = parts.get(1) {
        stream.sample_rate = parse_sample_rate(part);
    }
    if let Some(part) = parts.get(2) {
        stream.channel_layout = Some(part.to_lowercase().trim().to_string());
    }
    if let Some(part) = parts.get(3) {
        stream.sample_format = Some(part.to_lowercase().trim().to_string());
    }
    if let Some(part) = parts.get(4) {
        stream.bitrate = parse_bitrate_part(part);
    }
}

fn parse_bitrate_part(part: &str) -> Option<i64> {
    PAREN_GROUPS
        .replace_all(&part.to_lowercase(), "")
        .replace("kb/s", "")
        .trim()
        .parse()
        .ok()
}

/// "2560x1708 [sar 1:1 dar 640:427]" -> width and height.
fn parse_video_dimensions(layout: &str) -> (Option<i64>, Option<i64>) {
    let stripped = BRACKET_GROUPS.replace_all(layout, "");
    let mut dimensions = stripped.trim().split('x');
    let width = dimensions.next().and_then(|s| s.parse().ok());
    let height = dimensions.next().and_then(|s| s.parse().ok());
    (width, height)
}

/// Pull the ratio following a "sar" or "dar" keyword out of the layout.
fn parse_aspect_ratio(layout: &str, keyword: &str) -> Option<String> {
    let flattened = layout.replace(['[', ']'], "");
    let words: Vec<&str> = flattened.split(' ').collect();
    let position = words.iter().position(|w| *w == keyword)?;
    words.get(position + 1).map(|w| w.to_string())
}

/// "48000 Hz" / "44.1 kHz"-style sample rates, expanded to Hz.
fn parse_sample_rate(part: &str) -> Option<i64> {
    let lower = part.to_lowercase();
    let khz = lower.contains("khz");
    let mhz = lower.contains("mhz");
    let value = lower
        .replace("khz", "")
        .replace("mhz", "")
        .replace("hz", "");
    let value: i64 = value.trim().parse().unwrap_or(0);
    if khz {
        Some(value * 1_000)
    } else if mhz {
        Some(value * 1_000_000)
    } else {
        Some(value)
    }
}

fn parse_stream_type(type_part: &str) -> Option<&'static str> {
    let lower = type_part.to_lowercase();
    if lower.contains("audio:") {
        Some("audio")
    } else if lower.contains("video:") {
        Some("video")
    } else if lower.contains("data:") {
        Some("data")
    } else {
        None
    }
}

fn strip_type_prefix(type_part: &str) -> String {
    type_part
        .to_lowercase()
        .replace("video:", "")
        .replace("audio:", "")
        .replace("data:", "")
        .trim()
        .to_string()
}

/// "00:03:33.24" -> milliseconds; "N/A" and malformed clocks -> None.
fn parse_duration_value(text: &str) -> Option<i64> {
    if text == "N/A" {
        return None;
    }
    let (clock, centis) = match text.split_once('.') {
        Some((clock, centis)) => (clock, centis),
        None => (text, ""),
    };
    let mut fields = clock.split(':');
    let hours: i64 = fields.next()?.trim().parse().ok()?;
    let minutes: i64 = fields.next()?.trim().parse().ok()?;
    let seconds: i64 = fields.next()?.trim().parse().ok()?;
    let mut milliseconds = (hours * 3600 + minutes * 60 + seconds) * 1000;
    milliseconds += 10 * centis.parse::<i64>().unwrap_or(0);
    Some(milliseconds)
}

/// "0.000000" (seconds) -> milliseconds, rounded up.
///
/// Decimal arithmetic on the text itself; going through a binary float
/// here can land a hair above an exact millisecond and ceil one too far.
fn parse_start_time(text: &str) -> Option<i64> {
    if text == "N/A" {
        return None;
    }
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text),
    };
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };
    let seconds: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };

    let mut fraction_digits = fraction.chars();
    let mut milliseconds = 0i64;
    for _ in 0..3 {
        let digit = match fraction_digits.next() {
            Some(c) => i64::from(c.to_digit(10)?),
            None => 0,
        };
        milliseconds = milliseconds * 10 + digit;
    }
    let mut remainder_nonzero = false;
    for c in fraction_digits {
        if !c.is_ascii_digit() {
            return None;
        }
        remainder_nonzero |= c != '0';
    }

    let mut value = sign * (seconds * 1000 + milliseconds);
    // Ceiling rounds toward positive infinity.
    if sign > 0 && remainder_nonzero {
        value += 1;
    }
    Some(value)
}

/// Slice between the first `start` and the first `end` after it.
fn between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = text.find(start)? + start.len();
    let to = text[from..].find(end)? + from;
    Some(&text[from..to])
}

/// Slice after the first `start`.
fn after<'a>(text: &'a str, start: &str) -> Option<&'a str> {
    let from = text.find(start)? + start.len();
    Some(&text[from..])
}

/// Position of the second colon, ignoring a colon at the very start.
fn second_colon(text: &str) -> Option<usize> {
    let first = text[1..].find(':')? + 1;
    let second = text[first + 1..].find(':')? + first + 1;
    Some(second)
}

fn count_matches(text: &str, needle: char) -> usize {
    text.chars().filter(|c| *c == needle).count()
}
