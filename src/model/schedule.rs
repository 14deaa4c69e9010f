//! Prayer schedule: daily timings turned into a sorted list of timed events
//!
//! Events are never armed as independent timers. The scheduler owns one
//! chronologically sorted list that the UI tick drains with [`PrayerScheduler::pop_due`],
//! which keeps cancellation all-or-nothing and lets tests drive time by hand.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use anyhow::Result;
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

use super::types::PrayerDisplay;

/// How long before each adhan the reminder alarm sounds
pub const DEFAULT_PRE_ALARM: TimeDelta = TimeDelta::minutes(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Time of day of each canonical prayer, for one day
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrayerTimings {
    times: BTreeMap<Prayer, NaiveTime>,
}

impl PrayerTimings {
    /// Pick the five canonical prayers out of a name → `"HH:MM"` mapping.
    /// Missing or malformed entries are left out.
    pub fn from_raw(raw: &HashMap<String, String>) -> Self {
        let mut times = BTreeMap::new();
        for prayer in Prayer::ALL {
            let Some(value) = raw.get(prayer.name()) else {
                continue;
            };
            match parse_time_of_day(value) {
                Some(time) => {
                    times.insert(prayer, time);
                }
                None => tracing::debug!(prayer = %prayer, value = %value, "Skipping malformed prayer time"),
            }
        }
        Self { times }
    }

    #[cfg(test)]
    pub fn get(&self, prayer: Prayer) -> Option<NaiveTime> {
        self.times.get(&prayer).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Prayer, NaiveTime)> + '_ {
        self.times.iter().map(|(p, t)| (*p, *t))
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

impl FromIterator<(Prayer, NaiveTime)> for PrayerTimings {
    fn from_iter<I: IntoIterator<Item = (Prayer, NaiveTime)>>(iter: I) -> Self {
        Self {
            times: iter.into_iter().collect(),
        }
    }
}

/// Parse `HH:MM`, ignoring anything after the minutes (e.g. `"04:30 (WIB)"`).
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let (hours, rest) = value.trim().split_once(':')?;
    let minutes: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    PreAlarm,
    Adhan,
    DailyReschedule,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub fires_at: NaiveDateTime,
    pub kind: EventKind,
    pub prayer: Option<Prayer>,
}

/// The soonest upcoming prayer relative to some instant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NextPrayer {
    pub prayer: Prayer,
    pub at: NaiveDateTime,
    pub remaining: TimeDelta,
}

/// Next time the clock reads `time`: today if not yet passed, else tomorrow.
pub fn next_occurrence(time: NaiveTime, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let today = now.date().and_time(time);
    if today < now {
        today.checked_add_signed(TimeDelta::days(1))
    } else {
        Some(today)
    }
}

pub fn next_midnight(now: NaiveDateTime) -> Option<NaiveDateTime> {
    now.date().succ_opt().map(|d| d.and_time(NaiveTime::MIN))
}

/// Build the event batch for `timings` as seen from `now`.
///
/// Each prayer yields a pre-alarm `lead` before its next occurrence and the
/// adhan itself; either is dropped when it is not strictly in the future.
/// The batch always ends the day with a reschedule at local midnight.
pub fn derive_events(timings: &PrayerTimings, now: NaiveDateTime, lead: TimeDelta) -> Vec<ScheduledEvent> {
    let mut events = Vec::with_capacity(Prayer::ALL.len() * 2 + 1);

    for (prayer, time) in timings.iter() {
        let Some(adhan_at) = next_occurrence(time, now) else {
            continue;
        };
        if let Some(alarm_at) = adhan_at.checked_sub_signed(lead).filter(|t| *t > now) {
            events.push(ScheduledEvent {
                fires_at: alarm_at,
                kind: EventKind::PreAlarm,
                prayer: Some(prayer),
            });
        }
        if adhan_at > now {
            events.push(ScheduledEvent {
                fires_at: adhan_at,
                kind: EventKind::Adhan,
                prayer: Some(prayer),
            });
        }
    }

    if let Some(midnight) = next_midnight(now) {
        events.push(ScheduledEvent {
            fires_at: midnight,
            kind: EventKind::DailyReschedule,
            prayer: None,
        });
    }

    events.sort_by_key(|e| e.fires_at);
    events
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScheduleStatus {
    Loading,
    Ready,
    Unavailable,
}

/// Identifies one refresh request; only the newest may install its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

pub struct PrayerScheduler {
    lead: TimeDelta,
    timings: Option<PrayerTimings>,
    pending: Vec<ScheduledEvent>,
    status: ScheduleStatus,
    latest_ticket: u64,
}

impl PrayerScheduler {
    pub fn new(lead: TimeDelta) -> Self {
        Self {
            lead,
            timings: None,
            pending: Vec::new(),
            status: ScheduleStatus::Loading,
            latest_ticket: 0,
        }
    }

    #[cfg(test)]
    pub fn pending(&self) -> &[ScheduledEvent] {
        &self.pending
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.latest_ticket += 1;
        RefreshTicket(self.latest_ticket)
    }

    /// Install the outcome of a refresh. Results for superseded tickets are
    /// dropped; returns whether this one was applied.
    pub fn apply_refresh(&mut self, ticket: RefreshTicket, result: Result<PrayerTimings>, now: NaiveDateTime) -> bool {
        if ticket.0 != self.latest_ticket {
            tracing::debug!(ticket = ticket.0, latest = self.latest_ticket, "Ignoring stale prayer timings");
            return false;
        }
        match result {
            Ok(timings) => self.arm(timings, now),
            Err(e) => {
                tracing::warn!(error = %e, "Prayer timings unavailable");
                self.mark_unavailable(now);
            }
        }
        true
    }

    /// Replace the whole pending batch with one derived from `timings`.
    pub fn arm(&mut self, timings: PrayerTimings, now: NaiveDateTime) {
        self.cancel_all();
        self.pending = derive_events(&timings, now, self.lead);
        tracing::info!(
            events = self.pending.len(),
            next = ?self.pending.first().map(|e| e.fires_at),
            "Prayer events scheduled"
        );
        self.timings = Some(timings);
        self.status = ScheduleStatus::Ready;
    }

    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!(cancelled = self.pending.len(), "Cancelling pending prayer events");
        }
        self.pending.clear();
    }

    /// Show the schedule as unavailable. Already armed events stay, and a
    /// midnight reschedule is guaranteed so the daily retry still happens.
    pub fn mark_unavailable(&mut self, now: NaiveDateTime) {
        self.status = ScheduleStatus::Unavailable;
        let has_reschedule = self.pending.iter().any(|e| e.kind == EventKind::DailyReschedule);
        if !has_reschedule {
            if let Some(midnight) = next_midnight(now) {
                self.insert(ScheduledEvent {
                    fires_at: midnight,
                    kind: EventKind::DailyReschedule,
                    prayer: None,
                });
            }
        }
    }

    fn insert(&mut self, event: ScheduledEvent) {
        let at = self.pending.partition_point(|e| e.fires_at <= event.fires_at);
        self.pending.insert(at, event);
    }

    /// Remove and return every event due at `now`, oldest first.
    pub fn pop_due(&mut self, now: NaiveDateTime) -> Vec<ScheduledEvent> {
        let due = self.pending.partition_point(|e| e.fires_at <= now);
        self.pending.drain(..due).collect()
    }

    pub fn next_prayer(&self, now: NaiveDateTime) -> Option<NextPrayer> {
        let timings = self.timings.as_ref()?;
        timings
            .iter()
            .filter_map(|(prayer, time)| next_occurrence(time, now).map(|at| (prayer, at)))
            .min_by_key(|(_, at)| *at)
            .map(|(prayer, at)| NextPrayer {
                prayer,
                at,
                remaining: at - now,
            })
    }

    pub fn display(&self, now: NaiveDateTime) -> PrayerDisplay {
        match self.status {
            ScheduleStatus::Unavailable => PrayerDisplay::Unavailable,
            ScheduleStatus::Loading => PrayerDisplay::Loading,
            ScheduleStatus::Ready => match self.next_prayer(now) {
                Some(next) => PrayerDisplay::Next {
                    name: next.prayer.name().to_string(),
                    at: next.at,
                    hours: next.remaining.num_hours(),
                    minutes: next.remaining.num_minutes() % 60,
                },
                None => PrayerDisplay::Unavailable,
            },
        }
    }
}
