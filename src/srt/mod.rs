//! SRT caption utilities.
//!
//! Timestamps are accepted as `(H)H:mm:ss,SSS`, `(H)H:mm:ss.SSS` or
//! `(H)H:mm:ss:SSS`. The millisecond part is read as an integer, so
//! `1:20:32,5` is 4832 seconds and 5 milliseconds.

mod line;

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

pub use line::{SrtDocument, SrtLine, DEFAULT_LINE_WIDTH};

/// Separator between the start and end timestamp of a caption.
pub const ARROW: &str = "-->";

static TIMESTAMP: OnceLock<Option<Regex>> = OnceLock::new();

fn timestamp_regex() -> Option<&'static Regex> {
    TIMESTAMP
        .get_or_init(|| Regex::new(r"^(\d+(?::\d+)*)[,.:](\d+)$").ok())
        .as_ref()
}

/// Total milliseconds in a timestamp, e.g. `"1:20:32,5"` → `4832005`.
///
/// Returns `None` for anything that is not a timestamp, or too large for a `u64`.
pub fn total_ms(ts: &str) -> Option<u64> {
    let caps = timestamp_regex()?.captures(ts.trim())?;
    let seconds = caps[1]
        .split(':')
        .try_fold(0u64, |sum, part| sum.checked_mul(60)?.checked_add(part.parse().ok()?))?;
    let millis: u64 = caps[2].parse().ok()?;
    seconds.checked_mul(1000)?.checked_add(millis)
}

/// Total seconds with a millisecond fraction, e.g. `"1:20:32,5"` → `"4832.005"`.
pub fn total_seconds(ts: &str) -> Option<String> {
    let ms = total_ms(ts)?;
    Some(format!("{}.{:03}", ms / 1000, ms % 1000))
}

/// Formats a duration as `H:MM:SS`, or `H:MM:SS.mmm` when there are fractional seconds.
pub fn timestamp(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);
    let micros = duration.subsec_micros();

    if micros == 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours}:{minutes:02}:{seconds:02}.{:03}", micros / 1000)
    }
}

/// End time in seconds of the last caption that has dialogue.
///
/// Falls back to `default_end_seconds` when no such caption exists.
pub fn get_srt_duration(srt_contents: &str, default_end_seconds: f64) -> f64 {
    let mut following_line = "";

    for line in srt_contents.split('\n').rev() {
        if line.contains(ARROW) {
            // Captions sometimes carry a time range with no dialogue
            if following_line.trim().is_empty() {
                continue;
            }
            let compact = line.replace(' ', "");
            let end = compact.rsplit(ARROW).next().unwrap_or_default();
            return total_ms(end)
                .map(|ms| ms as f64 / 1000.0)
                .unwrap_or(default_end_seconds);
        }
        following_line = line;
    }

    default_end_seconds
}

fn start_ts(time_line: &str) -> &str {
    time_line.split(ARROW).next().unwrap_or_default().trim()
}

/// Removes the dialogue under the first caption starting at `ts`.
///
/// The caption's number and time range are kept. Without a blank line after
/// the caption, everything to the end of the contents is removed. Returns the
/// contents unchanged when no caption starts at `ts`.
pub fn remove_dialogue_for_first_ts(srt_contents: &str, ts: &str) -> String {
    let lines: Vec<&str> = srt_contents.split('\n').collect();

    let Some(i) = lines
        .iter()
        .position(|line| line.contains(ARROW) && start_ts(line) == ts)
    else {
        return srt_contents.to_string();
    };

    let next_blank = lines[i + 1..]
        .iter()
        .position(|line| line.trim().is_empty())
        .map_or(lines.len(), |offset| i + 1 + offset);

    lines[..=i]
        .iter()
        .chain(&lines[next_blank..])
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes dialogue of every caption starting in `start_ms..end_ms`.
///
/// Captions starting exactly at `end_ms` keep their dialogue.
pub fn remove_dialogue_between(srt_contents: &str, start_ms: u64, end_ms: u64) -> String {
    let mut kept = Vec::new();
    let mut excluding = false;

    for line in srt_contents.split('\n') {
        if line.contains(ARROW) {
            if let Some(line_ms) = total_ms(start_ts(line)) {
                if (start_ms..end_ms).contains(&line_ms) {
                    excluding = true;
                }
            }
        } else if excluding {
            if !line.trim().is_empty() {
                continue;
            }
            excluding = false;
        }
        kept.push(line);
    }

    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRT: &str = "1\n00:00:00,000 --> 00:00:02,500\nHello there.\n\n2\n00:00:02,500 --> 00:00:05,000\nThis part is cut.\nSo is this.\n\n3\n00:00:05,000 --> 00:00:07,250\nWelcome back.\n";

    #[test]
    fn test_total_ms_formats() {
        assert_eq!(total_ms("1:20:32,5"), Some(4_832_005));
        assert_eq!(total_ms("01:20:32.500"), Some(4_832_500));
        assert_eq!(total_ms("00:00:10:250"), Some(10_250));
        assert_eq!(total_ms("99:99:99,999"), Some(362_439_999));
        assert_eq!(total_ms("not a timestamp"), None);
        assert_eq!(total_ms(""), None);
    }

    #[test]
    fn test_total_ms_too_large() {
        assert_eq!(total_ms("99999999999999999:00,000"), None);
        assert_eq!(total_ms("18446744073709551615,000"), None);
        assert_eq!(total_ms("00:00:00,18446744073709551616"), None);
    }

    #[test]
    fn test_total_seconds() {
        assert_eq!(total_seconds("1:20:32,5").as_deref(), Some("4832.005"));
        assert_eq!(total_seconds("00:00:32,012").as_deref(), Some("32.012"));
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(timestamp(Duration::from_millis(7_263_150)), "2:01:03.150");
        assert_eq!(timestamp(Duration::from_secs(65)), "0:01:05");
    }

    #[test]
    fn test_srt_duration_skips_empty_captions() {
        assert_eq!(get_srt_duration(SRT, 0.0), 7.25);

        let trailing_empty = format!("{SRT}\n4\n00:00:08,000 --> 00:00:09,000\n\n");
        assert_eq!(get_srt_duration(&trailing_empty, 0.0), 7.25);
        assert_eq!(get_srt_duration("", 12.5), 12.5);
    }

    #[test]
    fn test_remove_dialogue_for_first_ts() {
        let out = remove_dialogue_for_first_ts(SRT, "00:00:02,500");
        assert!(!out.contains("This part is cut."));
        assert!(!out.contains("So is this."));
        assert!(out.contains("2\n00:00:02,500 --> 00:00:05,000\n\n3"));
        assert!(out.contains("Welcome back."));

        assert_eq!(remove_dialogue_for_first_ts(SRT, "00:09:00,000"), SRT);
    }

    #[test]
    fn test_remove_dialogue_for_last_caption_without_blank_line() {
        let srt = "1\n00:00:00,000 --> 00:00:02,000\nHello.\n\n2\n00:00:02,000 --> 00:00:04,000\nLast words.\nTo the end.";
        assert_eq!(
            remove_dialogue_for_first_ts(srt, "00:00:02,000"),
            "1\n00:00:00,000 --> 00:00:02,000\nHello.\n\n2\n00:00:02,000 --> 00:00:04,000"
        );
    }

    #[test]
    fn test_remove_dialogue_between() {
        let out = remove_dialogue_between(SRT, 2_000, 5_000);
        assert!(out.contains("Hello there."));
        assert!(!out.contains("This part is cut."));
        assert!(out.contains("Welcome back."));
        assert!(out.contains("00:00:02,500 --> 00:00:05,000"));
    }
}
