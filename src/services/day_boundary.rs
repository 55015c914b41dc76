//! # 하루 경계(Day Boundary) 계산
//!
//! 이 서비스의 "하루"는 자정이 아니라 `day_start_hour`(기본 16시)에 시작합니다.
//! 예: 기준 시간대(KST)로 2월 16일 15:59는 **2월 15일** 추적일에 속하고,
//! 16:00부터 2월 16일 추적일이 시작됩니다.
//!
//! ```text
//! 02-15 16:00 ─────────── 02-16 15:59 │ 02-16 16:00 ─────────── 02-17 15:59
//!        target_day = "2026-02-15"    │        target_day = "2026-02-16"
//! ```
//!
//! 기준 시간대는 고정 오프셋(`FixedOffset`)이므로 서머타임 문제가 없습니다.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};

/// 추적일 문자열 형식
pub const TARGET_DAY_FORMAT: &str = "%Y-%m-%d";

/// 하루 경계 규칙 (경계 시각 + 기준 시간대)
#[derive(Debug, Clone, Copy)]
pub struct DayClock {
    day_start_hour: u32,
    offset: FixedOffset,
}

impl DayClock {
    pub fn new(day_start_hour: u32, offset: FixedOffset) -> Self {
        Self {
            day_start_hour,
            offset,
        }
    }

    pub fn day_start_hour(&self) -> u32 {
        self.day_start_hour
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// 주어진 시각이 속하는 추적일(`YYYY-MM-DD`)을 반환합니다.
    ///
    /// 기준 시간대로 변환한 뒤, 시(hour)가 경계 시각보다 이르면 전날로 봅니다.
    pub fn target_day(&self, instant: DateTime<Utc>) -> String {
        let local = instant.with_timezone(&self.offset);
        let mut date = local.date_naive();
        if local.hour() < self.day_start_hour {
            date = date.checked_sub_days(Days::new(1)).unwrap_or(date);
        }
        date.format(TARGET_DAY_FORMAT).to_string()
    }

    /// 추적일 문자열을 날짜로 파싱합니다. 형식이 틀리면 None.
    pub fn parse_target_day(target_day: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(target_day, TARGET_DAY_FORMAT).ok()
    }

    /// 추적일이 시작되는 순간 (`target_day`의 `day_start_hour:00`, 기준 시간대)
    pub fn day_start(&self, target_day: &str) -> Option<DateTime<Utc>> {
        let naive = Self::parse_target_day(target_day)?.and_hms_opt(self.day_start_hour, 0, 0)?;
        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|t| t.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn kst_clock() -> DayClock {
        DayClock::new(16, FixedOffset::east_opt(9 * 3600).unwrap())
    }

    fn kst(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn before_day_start_belongs_to_previous_day() {
        let clock = kst_clock();
        assert_eq!(clock.target_day(kst(2026, 2, 16, 15, 50)), "2026-02-15");
        assert_eq!(clock.target_day(kst(2026, 2, 16, 0, 0)), "2026-02-15");
    }

    #[test]
    fn from_day_start_belongs_to_same_day() {
        let clock = kst_clock();
        assert_eq!(clock.target_day(kst(2026, 2, 16, 16, 0)), "2026-02-16");
        assert_eq!(clock.target_day(kst(2026, 2, 16, 23, 59)), "2026-02-16");
    }

    #[test]
    fn target_day_crosses_month_and_year() {
        let clock = kst_clock();
        assert_eq!(clock.target_day(kst(2026, 3, 1, 9, 0)), "2026-02-28");
        assert_eq!(clock.target_day(kst(2027, 1, 1, 3, 0)), "2026-12-31");
    }

    #[test]
    fn utc_instant_is_converted_before_the_rule() {
        let clock = kst_clock();
        // 07:00 UTC = 16:00 KST
        let t = Utc.with_ymd_and_hms(2026, 2, 16, 7, 0, 0).unwrap();
        assert_eq!(clock.target_day(t), "2026-02-16");
        assert_eq!(clock.target_day(t - TimeDelta::seconds(1)), "2026-02-15");
    }

    #[test]
    fn day_start_is_boundary_hour_in_reference_zone() {
        let clock = kst_clock();
        assert_eq!(clock.day_start("2026-02-16"), Some(kst(2026, 2, 16, 16, 0)));
        assert_eq!(clock.day_start("2026-2-16x"), None);
        assert_eq!(clock.day_start(""), None);
    }

    proptest! {
        #[test]
        fn prop_target_day_follows_boundary_rule(secs in 0i64..4_102_444_800) {
            let clock = kst_clock();
            let t = DateTime::from_timestamp(secs, 0).unwrap();
            let local = t.with_timezone(&clock.offset());
            let expected = if local.hour() >= 16 {
                local.date_naive()
            } else {
                local.date_naive().pred_opt().unwrap()
            };
            prop_assert_eq!(clock.target_day(t), expected.format(TARGET_DAY_FORMAT).to_string());
        }

        #[test]
        fn prop_instant_falls_inside_its_target_day(secs in 0i64..4_102_444_800) {
            let clock = kst_clock();
            let t = DateTime::from_timestamp(secs, 0).unwrap();
            let start = clock.day_start(&clock.target_day(t)).unwrap();
            prop_assert!(start <= t);
            prop_assert!(t < start + TimeDelta::hours(24));
        }
    }
}
