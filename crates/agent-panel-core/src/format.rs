//! Display formatting for values shown on the panel pages.

use std::fmt::Display;

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::state::Timestamp;

/// Layout used when no browser locale formatter is available.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp in the local time zone.
pub fn format_timestamp(ts: &Timestamp) -> String {
    format_timestamp_in(ts, &Local)
}

/// Format a timestamp in an explicit time zone.
pub fn format_timestamp_in<Tz: TimeZone>(ts: &Timestamp, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    ts.as_datetime()
        .with_timezone(tz)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// `1234.5` -> `"$1,234.50"`.
pub fn format_currency(value: f64) -> String {
    let fixed = fixed_2(value);
    if !value.is_finite() {
        return format!("${fixed}");
    }
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac) = digits.split_once('.').unwrap_or((digits, "00"));
    format!("${sign}{}.{frac}", group_thousands(int_part))
}

/// `0.1` -> `"10.00%"`.
pub fn format_percentage(value: f64) -> String {
    format!("{}%", fixed_2(value * 100.0))
}

/// `"strong_buy"` -> `"Strong Buy"`.
pub fn format_signal(signal: &str) -> String {
    let mut out = String::with_capacity(signal.len());
    let mut prev_word = false;
    for ch in signal.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        let is_word = ch.is_ascii_alphanumeric();
        if is_word && !prev_word {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
        prev_word = is_word;
    }
    out
}

/// Two-decimal fixed notation, spelling non-finite values the way the page
/// scripts always have.
fn fixed_2(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // Drop the sign of negative zero.
    let value = if value == 0.0 { 0.0 } else { value };
    match exact_tie_cents(value) {
        Some(cents) => {
            let sign = if cents < 0 { "-" } else { "" };
            let cents = cents.unsigned_abs();
            format!("{sign}{}.{:02}", cents / 100, cents % 100)
        },
        None => format!("{value:.2}"),
    }
}

/// Cents for a value lying exactly halfway between two cents, rounded away
/// from zero. `{:.2}` would round these to even.
///
/// A binary float is exactly `n.nn5` only when it is an odd number of
/// eighths, so the check and the rounding stay in integers.
fn exact_tie_cents(value: f64) -> Option<i128> {
    const EXACT_LIMIT: f64 = (1u64 << 53) as f64;
    let eighths = value * 8.0;
    if eighths.fract() != 0.0 || eighths.abs() >= EXACT_LIMIT {
        return None;
    }
    let eighths = eighths as i128;
    if eighths % 2 == 0 {
        return None;
    }
    Some((eighths * 25 + eighths.signum()) / 2)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Visual severity of a signal or sentiment badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Severity {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Positive => "bg-success",
            Self::Negative => "bg-danger",
            Self::Neutral => "bg-secondary",
        }
    }
}

const SIGNAL_TABLE: &[(&str, Severity)] = &[
    ("strong_buy", Severity::Positive),
    ("buy", Severity::Positive),
    ("strong_sell", Severity::Negative),
    ("sell", Severity::Negative),
];

const SENTIMENT_TABLE: &[(&str, Severity)] = &[
    ("positive", Severity::Positive),
    ("negative", Severity::Negative),
];

fn lookup(table: &[(&str, Severity)], token: &str) -> Option<Severity> {
    table
        .iter()
        .find(|(key, _)| *key == token)
        .map(|&(_, severity)| severity)
}

/// Severity of a technical signal token (`strong_buy`, `sell`, ...).
pub fn classify_signal(signal: &str) -> Severity {
    lookup(SIGNAL_TABLE, signal).unwrap_or_default()
}

/// Severity of a sentiment token (`positive`, `negative`, ...).
pub fn classify_sentiment(sentiment: &str) -> Severity {
    lookup(SENTIMENT_TABLE, sentiment).unwrap_or_default()
}

/// Severity of either kind of token.
pub fn classify(token: &str) -> Severity {
    lookup(SIGNAL_TABLE, token)
        .or_else(|| lookup(SENTIMENT_TABLE, token))
        .unwrap_or_default()
}
