// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    zero_seconds     = { 0,      "0s" },
    max_seconds      = { 59,     "59s" },
    one_minute       = { 60,     "1m" },
    max_minutes      = { 3599,   "59m" },
    one_hour         = { 3600,   "1h" },
    hour_and_minutes = { 3660,   "1h1m" },
    almost_a_day     = { 86399,  "23h59m" },
    two_days         = { 172800, "2d" },
)]
fn elapsed(secs: u64, expected: &str) {
    assert_eq!(format_elapsed(secs), expected);
}

#[yare::parameterized(
    sub_second   = { 250,       "250ms" },
    five_seconds = { 5_000,     "5s" },
    two_minutes  = { 120_000,   "2m" },
    one_hour     = { 3_600_000, "1h" },
)]
fn elapsed_ms(ms: u64, expected: &str) {
    assert_eq!(format_elapsed_ms(ms), expected);
}

#[yare::parameterized(
    millis       = { "500ms", Duration::from_millis(500) },
    bare_number  = { "15",    Duration::from_secs(15) },
    seconds      = { "30s",   Duration::from_secs(30) },
    minutes      = { "5m",    Duration::from_secs(300) },
    hours_spaced = { "2 hours", Duration::from_secs(7200) },
    days         = { "1d",    Duration::from_secs(86400) },
    padded       = { "  10s ", Duration::from_secs(10) },
)]
fn parse_valid(input: &str, expected: Duration) {
    assert_eq!(parse_duration(input).unwrap(), expected);
}

#[test]
fn parse_empty() {
    assert_eq!(parse_duration("  "), Err(DurationError::Empty));
}

#[test]
fn parse_missing_number() {
    assert!(matches!(
        parse_duration("ms"),
        Err(DurationError::InvalidNumber(_))
    ));
}

#[test]
fn parse_unknown_suffix() {
    assert_eq!(
        parse_duration("3 fortnights"),
        Err(DurationError::UnknownSuffix("fortnights".to_string()))
    );
}

#[yare::parameterized(
    days    = { "213503982335000d" },
    hours   = { "18446744073709551615h" },
)]
fn parse_overflow(input: &str) {
    assert_eq!(
        parse_duration(input),
        Err(DurationError::Overflow(input.to_string()))
    );
}
