//! Numeric counter: counts a text element from `start` to `end`.
//!
//! The host drives [`Counter::tick`] from its frame callback and writes the
//! returned text into the element until `done`.

use serde::{Deserialize, Serialize};

use crate::config::AnimationConfig;
use crate::numbers::{format_number, nan_min, parse_int};
use crate::timing::TimingSource;

const PLACEHOLDER: &str = "{counter}";

/// Tags whose text the counter may rewrite.
const COUNTABLE_TAGS: [&str; 7] = ["P", "H1", "H2", "H3", "H4", "H5", "H6"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub start: f64,
    pub end: f64,
    pub format: String,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    started_at: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CounterFrame {
    pub text: String,
    pub progress: f64,
    pub done: bool,
}

impl Counter {
    pub fn from_config(config: &AnimationConfig, alt: bool) -> Self {
        let src = TimingSource::new(config, alt);
        let format = config
            .text("format")
            .filter(|f| !f.is_empty())
            .unwrap_or(PLACEHOLDER)
            .to_string();
        Self {
            start: config.number("start"),
            end: config.number("end"),
            format,
            duration: src.duration(),
            delay: src.delay(0),
            started_at: None,
        }
    }

    /// Text starts with a non-zero integer and the tag holds plain text.
    pub fn is_countable(content: &str, tag: &str) -> bool {
        let leading = parse_int(content).is_some_and(|n| n != 0);
        leading && COUNTABLE_TAGS.contains(&tag.to_ascii_uppercase().as_str())
    }

    /// Advance to `timestamp_ms`. The first tick fixes the start time.
    pub fn tick(&mut self, timestamp_ms: f64) -> CounterFrame {
        let started = *self.started_at.get_or_insert(timestamp_ms);
        let progress = nan_min((timestamp_ms - started) / self.duration, 1.0);
        CounterFrame {
            text: self.text_at(progress),
            progress,
            done: progress.is_nan() || progress >= 1.0,
        }
    }

    pub fn text_at(&self, progress: f64) -> String {
        let value = (progress * (self.end - self.start) + self.start).floor();
        self.format.replacen(PLACEHOLDER, &group_thousands(value), 1)
    }
}

/// `1234567` -> `1,234,567`; non-finite values are spelled out.
fn group_thousands(value: f64) -> String {
    let text = format_number(value);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return text;
    }
    let mut out = String::with_capacity(text.len() + digits.len() / 3);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(strx: &str) -> Counter {
        Counter::from_config(&AnimationConfig::from_strx(strx), false)
    }

    #[test]
    fn counts_with_format_and_grouping() {
        let mut c = counter("start:0|end:25000|duration:1000|format:{counter} visitors");
        assert_eq!(c.tick(500.0).text, "0 visitors");
        let half = c.tick(1000.0);
        assert_eq!(half.text, "12,500 visitors");
        assert!(!half.done);
        let end = c.tick(1600.0);
        assert_eq!(end.text, "25,000 visitors");
        assert_eq!(end.progress, 1.0);
        assert!(end.done);
    }

    #[test]
    fn default_format_is_bare_number() {
        let c = counter("start:10|end:20|duration:100");
        assert_eq!(c.format, "{counter}");
        assert_eq!(c.text_at(0.55), "15");
    }

    #[test]
    fn counts_down_and_floors() {
        let c = counter("start:100|end:0|duration:100");
        assert_eq!(c.text_at(0.005), "99");
    }

    #[test]
    fn grouping_handles_signs_and_nan() {
        assert_eq!(group_thousands(-1234.0), "-1,234");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_000_000.0), "1,000,000");
        assert_eq!(group_thousands(f64::NAN), "NaN");
    }

    #[test]
    fn missing_duration_finishes_immediately() {
        let mut c = counter("start:0|end:5");
        let f = c.tick(10.0);
        assert!(f.done);
        assert_eq!(f.text, "NaN");
    }

    #[test]
    fn countable_content() {
        assert!(Counter::is_countable("1200+", "p"));
        assert!(Counter::is_countable("42 points", "H2"));
        assert!(!Counter::is_countable("0 points", "P"));
        assert!(!Counter::is_countable("points", "P"));
        assert!(!Counter::is_countable("42", "SPAN"));
    }
}
