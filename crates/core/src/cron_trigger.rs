// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron trigger evaluated in UTC

use crate::trigger::{TimeTrigger, TriggerError};
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::fmt;
use std::str::FromStr;

/// Crontab-style fields. `None` means "every".
///
/// An unset minute becomes 0 as soon as any coarser field is fixed, and an
/// unset hour becomes 0 as soon as the day, month or year is fixed, so
/// `hour: Some(5)` alone means "daily at 05:00".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CronFields {
    /// 0-59
    pub minute: Option<u32>,
    /// 0-23
    pub hour: Option<u32>,
    /// Day of month (1-31), or day of week (1-7, 1 = Sunday) when
    /// `day_is_weekday` is set.
    pub day: Option<u32>,
    pub day_is_weekday: bool,
    /// 1-12
    pub month: Option<u32>,
    pub year: Option<u32>,
}

impl CronFields {
    /// Render as a seconds-resolution cron expression.
    pub fn to_expression(&self) -> Result<String, TriggerError> {
        let coarser_than_hour = self.day.is_some() || self.month.is_some() || self.year.is_some();
        let coarser_than_minute = coarser_than_hour || self.hour.is_some();

        let minute = field("minute", self.minute, 0, 59, coarser_than_minute)?;
        let hour = field("hour", self.hour, 0, 23, coarser_than_hour)?;
        let (day_of_month, day_of_week) = if self.day_is_weekday {
            ("*".to_string(), field("day of week", self.day, 1, 7, false)?)
        } else {
            (field("day of month", self.day, 1, 31, false)?, "*".to_string())
        };
        let month = field("month", self.month, 1, 12, false)?;

        let mut expression =
            format!("0 {minute} {hour} {day_of_month} {month} {day_of_week}");
        if let Some(year) = self.year {
            expression.push_str(&format!(" {year}"));
        }
        Ok(expression)
    }
}

fn field(
    name: &'static str,
    value: Option<u32>,
    min: u32,
    max: u32,
    zero_when_unset: bool,
) -> Result<String, TriggerError> {
    match value {
        Some(v) if v < min || v > max => Err(TriggerError::FieldOutOfRange {
            field: name,
            value: v,
            range: range_label(min, max),
        }),
        Some(v) => Ok(v.to_string()),
        None if zero_when_unset => Ok("0".to_string()),
        None => Ok("*".to_string()),
    }
}

fn range_label(min: u32, max: u32) -> &'static str {
    match (min, max) {
        (0, 59) => "0-59",
        (0, 23) => "0-23",
        (1, 7) => "1-7",
        (1, 31) => "1-31",
        (1, 12) => "1-12",
        _ => "a valid value",
    }
}

/// Fires at every occurrence of a cron schedule.
///
/// Expressions use the six or seven field form with a leading seconds field
/// (`sec min hour day-of-month month day-of-week [year]`).
#[derive(Clone)]
pub struct CronTrigger {
    expression: String,
    schedule: Schedule,
}

impl CronTrigger {
    pub fn parse(expression: &str) -> Result<Self, TriggerError> {
        let schedule = Schedule::from_str(expression).map_err(|e| TriggerError::InvalidCron {
            expression: expression.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            expression: expression.to_string(),
            schedule,
        })
    }

    pub fn from_fields(fields: CronFields) -> Result<Self, TriggerError> {
        Self::parse(&fields.to_expression()?)
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl fmt::Debug for CronTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CronTrigger({})", self.expression)
    }
}

impl TimeTrigger for CronTrigger {
    fn next_fire_time(&mut self, now_ms: u64) -> Option<u64> {
        let now = DateTime::<Utc>::from_timestamp_millis(i64::try_from(now_ms).ok()?)?;
        let next = self.schedule.after(&now).next()?;
        u64::try_from(next.timestamp_millis()).ok()
    }
}

#[cfg(test)]
#[path = "cron_trigger_tests.rs"]
mod tests;
