//! Pick window and current-week detection.
//!
//! A pool week opens on a fixed weekday and hour in the pool's local time zone,
//! picks close a couple of days later, and the current week is the one whose
//! earliest game kicks off inside the opening week.

use serde::{Deserialize, Serialize};
use time::{
    Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset, Weekday,
    error::ComponentRange,
};

use crate::dao::models::GameEntity;

const EASTERN_STANDARD: i8 = -5;
const EASTERN_DAYLIGHT: i8 = -4;
/// Local hour at which US daylight saving time starts and ends.
const DST_SWITCH_HOUR: u8 = 2;

/// Time zone the pool schedule is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolTimeZone {
    /// US Eastern with daylight saving time.
    #[default]
    UsEastern,
    /// Constant offset from UTC, in whole hours.
    FixedOffset(i8),
}

impl PoolTimeZone {
    /// UTC offset in effect at `instant`.
    pub fn offset_at(&self, instant: OffsetDateTime) -> Result<UtcOffset, ComponentRange> {
        match *self {
            PoolTimeZone::FixedOffset(hours) => UtcOffset::from_hms(hours, 0, 0),
            PoolTimeZone::UsEastern => {
                let (start, end) = dst_bounds(instant.to_offset(UtcOffset::UTC).year())?;
                let daylight = start.assume_offset(UtcOffset::from_hms(EASTERN_STANDARD, 0, 0)?)
                    <= instant
                    && instant < end.assume_offset(UtcOffset::from_hms(EASTERN_DAYLIGHT, 0, 0)?);
                eastern_offset(daylight)
            }
        }
    }

    /// Attach the offset that applies to a local wall-clock time.
    pub fn localize(&self, local: PrimitiveDateTime) -> Result<OffsetDateTime, ComponentRange> {
        let offset = match *self {
            PoolTimeZone::FixedOffset(hours) => UtcOffset::from_hms(hours, 0, 0)?,
            PoolTimeZone::UsEastern => {
                let (start, end) = dst_bounds(local.year())?;
                eastern_offset(start <= local && local < end)?
            }
        };
        Ok(local.assume_offset(offset))
    }
}

fn eastern_offset(daylight: bool) -> Result<UtcOffset, ComponentRange> {
    let hours = if daylight {
        EASTERN_DAYLIGHT
    } else {
        EASTERN_STANDARD
    };
    UtcOffset::from_hms(hours, 0, 0)
}

/// Local wall-clock start and end of daylight saving time for `year`.
fn dst_bounds(year: i32) -> Result<(PrimitiveDateTime, PrimitiveDateTime), ComponentRange> {
    let switch = Time::from_hms(DST_SWITCH_HOUR, 0, 0)?;
    let start = nth_sunday(year, Month::March, 2)?.with_time(switch);
    let end = nth_sunday(year, Month::November, 1)?.with_time(switch);
    Ok((start, end))
}

fn nth_sunday(year: i32, month: Month, n: u8) -> Result<Date, ComponentRange> {
    let first = Date::from_calendar_date(year, month, 1)?;
    let to_sunday = (7 - first.weekday().number_days_from_sunday()) % 7;
    Ok(first + Duration::days(i64::from(to_sunday) + 7 * i64::from(n.saturating_sub(1))))
}

/// Weekday names accepted in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum OpeningDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<OpeningDay> for Weekday {
    fn from(value: OpeningDay) -> Self {
        match value {
            OpeningDay::Monday => Weekday::Monday,
            OpeningDay::Tuesday => Weekday::Tuesday,
            OpeningDay::Wednesday => Weekday::Wednesday,
            OpeningDay::Thursday => Weekday::Thursday,
            OpeningDay::Friday => Weekday::Friday,
            OpeningDay::Saturday => Weekday::Saturday,
            OpeningDay::Sunday => Weekday::Sunday,
        }
    }
}

/// When picks open and close each week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickWindowConfig {
    /// When false the window is always reported open.
    #[serde(default = "default_enforce")]
    pub enforce: bool,
    #[serde(default = "default_opens_on")]
    pub opens_on: OpeningDay,
    #[serde(default = "default_opens_at_hour")]
    pub opens_at_hour: u8,
    /// Days between the opening day and the closing day.
    #[serde(default = "default_closes_after_days")]
    pub closes_after_days: u8,
    #[serde(default = "default_closes_at_hour")]
    pub closes_at_hour: u8,
    #[serde(default)]
    pub time_zone: PoolTimeZone,
}

fn default_enforce() -> bool {
    true
}

fn default_opens_on() -> OpeningDay {
    OpeningDay::Tuesday
}

fn default_opens_at_hour() -> u8 {
    2
}

fn default_closes_after_days() -> u8 {
    2
}

fn default_closes_at_hour() -> u8 {
    19
}

impl Default for PickWindowConfig {
    fn default() -> Self {
        Self {
            enforce: default_enforce(),
            opens_on: default_opens_on(),
            opens_at_hour: default_opens_at_hour(),
            closes_after_days: default_closes_after_days(),
            closes_at_hour: default_closes_at_hour(),
            time_zone: PoolTimeZone::default(),
        }
    }
}

/// Current pool week and the state of its pick window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekInfo {
    pub current_week: u16,
    #[serde(with = "time::serde::rfc3339")]
    pub week_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub week_end: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub pick_open: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub pick_close: OffsetDateTime,
    pub is_pick_open: bool,
    pub is_pick_closed: bool,
}

/// Locate the pool week containing `now` and the state of its pick window.
///
/// The week starts at the most recent opening instant that is not in the future.
pub fn week_info(
    now: OffsetDateTime,
    games: &[GameEntity],
    config: &PickWindowConfig,
) -> Result<WeekInfo, ComponentRange> {
    let zone = config.time_zone;
    let local_now = now.to_offset(zone.offset_at(now)?);
    let opens_on = Weekday::from(config.opens_on);
    let opening = Time::from_hms(config.opens_at_hour, 0, 0)?;
    let closing = Time::from_hms(config.closes_at_hour, 0, 0)?;

    let days_back = (local_now.weekday().number_days_from_monday() + 7
        - opens_on.number_days_from_monday())
        % 7;
    let mut open_date = local_now.date() - Duration::days(i64::from(days_back));
    let mut week_start = zone.localize(open_date.with_time(opening))?;
    if week_start > now {
        open_date -= Duration::weeks(1);
        week_start = zone.localize(open_date.with_time(opening))?;
    }
    let week_end = week_start + Duration::weeks(1);

    let close_date = open_date + Duration::days(i64::from(config.closes_after_days));
    let pick_close = zone.localize(close_date.with_time(closing))?;
    let pick_open = week_start;

    let current_week = games
        .iter()
        .filter(|game| week_start <= game.game_time && game.game_time < week_end)
        .min_by_key(|game| game.game_time)
        .map(|game| game.week)
        .unwrap_or(1);

    let (is_pick_open, is_pick_closed) = if config.enforce {
        (pick_open <= now && now < pick_close, now >= pick_close)
    } else {
        (true, false)
    };

    Ok(WeekInfo {
        current_week,
        week_start,
        week_end,
        pick_open,
        pick_close,
        is_pick_open,
        is_pick_closed,
    })
}

#[cfg(test)]
mod tests {
    use time::macros::{datetime, offset};
    use uuid::Uuid;

    use super::*;

    fn game(week: u16, kickoff: OffsetDateTime) -> GameEntity {
        GameEntity::new(week, Uuid::new_v4(), Uuid::new_v4(), kickoff)
    }

    #[test]
    fn eastern_offset_follows_daylight_saving() {
        let zone = PoolTimeZone::UsEastern;
        assert_eq!(zone.offset_at(datetime!(2025-03-09 06:59 UTC)).unwrap(), offset!(-5));
        assert_eq!(zone.offset_at(datetime!(2025-03-09 07:00 UTC)).unwrap(), offset!(-4));
        assert_eq!(zone.offset_at(datetime!(2025-11-02 05:59 UTC)).unwrap(), offset!(-4));
        assert_eq!(zone.offset_at(datetime!(2025-11-02 06:00 UTC)).unwrap(), offset!(-5));
    }

    #[test]
    fn window_is_open_midweek_before_thursday_evening() {
        let info = week_info(
            datetime!(2025-09-10 12:00 UTC),
            &[],
            &PickWindowConfig::default(),
        )
        .unwrap();
        assert_eq!(info.week_start, datetime!(2025-09-09 06:00 UTC));
        assert_eq!(info.week_end, datetime!(2025-09-16 06:00 UTC));
        assert_eq!(info.pick_close, datetime!(2025-09-11 23:00 UTC));
        assert!(info.is_pick_open);
        assert!(!info.is_pick_closed);
        assert_eq!(info.current_week, 1);
    }

    #[test]
    fn window_is_closed_after_thursday_evening() {
        let info = week_info(
            datetime!(2025-09-12 12:00 UTC),
            &[],
            &PickWindowConfig::default(),
        )
        .unwrap();
        assert!(!info.is_pick_open);
        assert!(info.is_pick_closed);
    }

    #[test]
    fn early_tuesday_still_belongs_to_the_previous_week() {
        // 01:00 EDT on a Tuesday, one hour before the opening.
        let info = week_info(
            datetime!(2025-09-09 05:00 UTC),
            &[],
            &PickWindowConfig::default(),
        )
        .unwrap();
        assert_eq!(info.week_start, datetime!(2025-09-02 06:00 UTC));
        assert!(info.week_start <= datetime!(2025-09-09 05:00 UTC));
        assert!(info.is_pick_closed);
    }

    #[test]
    fn winter_weeks_use_standard_time() {
        let info = week_info(
            datetime!(2025-12-03 12:00 UTC),
            &[],
            &PickWindowConfig::default(),
        )
        .unwrap();
        assert_eq!(info.week_start, datetime!(2025-12-02 07:00 UTC));
        assert_eq!(info.pick_close, datetime!(2025-12-05 00:00 UTC));
    }

    #[test]
    fn current_week_comes_from_the_earliest_game_in_range() {
        let games = vec![
            game(1, datetime!(2025-09-07 17:00 UTC)),
            game(2, datetime!(2025-09-14 17:00 UTC)),
            game(2, datetime!(2025-09-12 00:15 UTC)),
            game(3, datetime!(2025-09-21 17:00 UTC)),
        ];
        let info = week_info(
            datetime!(2025-09-10 12:00 UTC),
            &games,
            &PickWindowConfig::default(),
        )
        .unwrap();
        assert_eq!(info.current_week, 2);
    }

    #[test]
    fn unenforced_window_is_always_open() {
        let config = PickWindowConfig {
            enforce: false,
            ..PickWindowConfig::default()
        };
        let info = week_info(datetime!(2025-09-13 12:00 UTC), &[], &config).unwrap();
        assert!(info.is_pick_open);
        assert!(!info.is_pick_closed);
    }

    #[test]
    fn fixed_offset_zone_and_custom_schedule() {
        let config = PickWindowConfig {
            opens_on: OpeningDay::Monday,
            opens_at_hour: 0,
            closes_after_days: 6,
            closes_at_hour: 12,
            time_zone: PoolTimeZone::FixedOffset(0),
            ..PickWindowConfig::default()
        };
        let info = week_info(datetime!(2025-09-10 12:00 UTC), &[], &config).unwrap();
        assert_eq!(info.week_start, datetime!(2025-09-08 00:00 UTC));
        assert_eq!(info.pick_close, datetime!(2025-09-14 12:00 UTC));
        assert!(info.is_pick_open);
    }

    #[test]
    fn invalid_hour_is_reported() {
        let config = PickWindowConfig {
            closes_at_hour: 24,
            ..PickWindowConfig::default()
        };
        assert!(week_info(datetime!(2025-09-10 12:00 UTC), &[], &config).is_err());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: PickWindowConfig =
            serde_json::from_str(r#"{"opens_on":"wednesday","time_zone":{"fixed_offset":-8}}"#)
                .unwrap();
        assert_eq!(config.opens_on, OpeningDay::Wednesday);
        assert_eq!(config.time_zone, PoolTimeZone::FixedOffset(-8));
        assert_eq!(config.closes_at_hour, 19);
        assert!(config.enforce);
    }
}
