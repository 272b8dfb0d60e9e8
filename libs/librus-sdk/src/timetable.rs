//! Weekly timetable.
//!
//! The API serves timetables per week (`GET {api}/Timetables?weekStart=..`,
//! keyed by the week's Monday) as a map from date to lesson hours, each hour
//! holding zero or more entries. Entries point at lessons, subjects and
//! teachers by reference; nothing is resolved on fetch.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};
use serde::Deserialize;

use crate::client::LibrusClient;
use crate::codec;
use crate::error::ClientError;
use crate::models::{Lesson, Reference, Subject, User};

const TIMETABLES_PATH: &str = "Timetables";
const TIMETABLE_KEY: &str = "Timetable";

/// One scheduled lesson hour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimetableEntry {
    pub lesson: Reference<Lesson>,
    pub subject: Reference<Subject>,
    pub teacher: Reference<User>,
    pub lesson_no: String,
    pub hour_from: String,
    pub hour_to: String,
    #[serde(default)]
    pub is_canceled: bool,
    #[serde(default)]
    pub is_substitution_class: bool,
}

/// Entries of one lesson hour; empty when the hour is free.
pub type TimetableSlot = Vec<TimetableEntry>;

/// The timetable of the week starting on `week_start` (a Monday).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableWeek {
    pub week_start: NaiveDate,
    pub days: BTreeMap<NaiveDate, Vec<TimetableSlot>>,
}

impl TimetableWeek {
    /// Lesson hours of `date`; empty for days the API did not list.
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> &[TimetableSlot] {
        self.days.get(&date).map_or(&[][..], Vec::as_slice)
    }
}

/// Monday of the week containing `date`. Sunday belongs to the week that
/// started six days earlier.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// Timetable access through the client's session.
pub struct Timetables<'c> {
    client: &'c LibrusClient,
}

impl<'c> Timetables<'c> {
    pub(crate) fn new(client: &'c LibrusClient) -> Self {
        Self { client }
    }

    /// Timetable of the week containing `date`.
    ///
    /// # Errors
    /// - [`ClientError::RequestFailed`] if the API answers with a non-success
    ///   status
    /// - [`ClientError::SchemaMismatch`] if the payload does not decode
    pub async fn fetch_week(&self, date: NaiveDate) -> Result<TimetableWeek, ClientError> {
        let week_start = week_start(date);
        let url = format!(
            "{}?weekStart={week_start}",
            self.client.config().api_endpoint(TIMETABLES_PATH)
        );
        let response = self.client.session().get(&url).await?;
        if !response.is_success() {
            return Err(ClientError::RequestFailed {
                url,
                status: Some(response.status()),
                reason: format!("timetable returned HTTP {}", response.status()),
            });
        }

        let days = codec::decode_keyed(response.text(), TIMETABLE_KEY, TIMETABLE_KEY)?;
        Ok(TimetableWeek { week_start, days })
    }

    /// Lesson hours of `date`, taken from its week's timetable.
    ///
    /// # Errors
    /// As for [`fetch_week`](Self::fetch_week).
    pub async fn fetch_day(&self, date: NaiveDate) -> Result<Vec<TimetableSlot>, ClientError> {
        let mut week = self.fetch_week(date).await?;
        Ok(week.days.remove(&date).unwrap_or_default())
    }
}
