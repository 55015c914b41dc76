//! # 10분 버킷 계산
//!
//! 추적일을 10분 단위 버킷으로 나누고, 버킷마다 공백 중이었던 사용자 수를 셉니다.
//!
//! ## 버킷 키
//! 기준 시간대에서 10분 단위로 내림한 시각을 `YYYY-MM-DDTHH:MM` 형식으로 씁니다.
//! 문자열 정렬 순서가 곧 시간 순서입니다. 버킷 하나는 `[key, key + 10분)` 구간입니다.
//!
//! ## 겹침 판정 (반열린 구간)
//! ```text
//! session.started_at < bucket_end  AND  session.ended_at > bucket_start
//! ```
//! 버킷 시작 시각에 정확히 끝난 세션, 버킷 끝 시각에 정확히 시작한 세션은 포함되지 않습니다.
//!
//! 이 모듈의 함수는 모두 저장소 없이 동작하는 순수 함수입니다.

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc};
use std::collections::{BTreeMap, HashSet};

use super::day_boundary::DayClock;
use crate::models::VoidSession;

/// 버킷 키 문자열 형식
pub const BUCKET_KEY_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// 버킷 길이 (분)
pub const BUCKET_MINUTES: u32 = 10;

/// 하루에 만들 수 있는 최대 버킷 수 (24h / 10min)
pub const BUCKETS_PER_DAY: usize = 144;

pub fn bucket_width() -> TimeDelta {
    TimeDelta::minutes(BUCKET_MINUTES as i64)
}

/// 시각을 자신이 속한 10분 버킷의 시작 시각으로 내림합니다.
pub fn truncate_to_bucket(clock: &DayClock, instant: DateTime<Utc>) -> DateTime<Utc> {
    let local = instant.with_timezone(&clock.offset());
    let into_bucket = (local.minute() % BUCKET_MINUTES) * 60 + local.second();
    instant
        - TimeDelta::seconds(into_bucket as i64)
        - TimeDelta::nanoseconds(local.nanosecond() as i64)
}

/// 시각 → 버킷 키
pub fn bucket_key(clock: &DayClock, instant: DateTime<Utc>) -> String {
    truncate_to_bucket(clock, instant)
        .with_timezone(&clock.offset())
        .format(BUCKET_KEY_FORMAT)
        .to_string()
}

/// 버킷 키 → 버킷 시작 시각
///
/// 형식이 틀리거나 10분 단위에 맞지 않는 키는 None을 반환합니다.
/// 호출하는 쪽은 None인 버킷을 건너뜁니다.
pub fn parse_bucket_key(clock: &DayClock, key: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(key, BUCKET_KEY_FORMAT).ok()?;
    if naive.minute() % BUCKET_MINUTES != 0 {
        return None;
    }
    clock
        .offset()
        .from_local_datetime(&naive)
        .single()
        .map(|t| t.with_timezone(&Utc))
}

/// 버킷 키에서 `HH:MM` 부분만 꺼냅니다.
pub fn display_time(key: &str) -> String {
    key.get(11..16).unwrap_or(key).to_string()
}

/// 세션 `[started_at, ended_at)`이 버킷 `[bucket_start, bucket_start + 10분)`과 겹치는지
pub fn overlaps(started_at: DateTime<Utc>, ended_at: DateTime<Utc>, bucket_start: DateTime<Utc>) -> bool {
    started_at < bucket_start + bucket_width() && ended_at > bucket_start
}

/// `target_day`에서 `now` 기준으로 **완전히 지난** 버킷 키 목록을 시간순으로 만듭니다.
///
/// - 시작: 추적일의 `day_start_hour:00`
/// - 끝: `truncate(now) - 10분`, 단 `day_start + 24h - 10분`을 넘지 않음
/// - 끝이 시작보다 앞이면 빈 목록 (아직 시작하지 않은 날, 미래 날짜)
///
/// 진행 중인 버킷은 절대 포함되지 않습니다.
pub fn expected_buckets(clock: &DayClock, target_day: &str, now: DateTime<Utc>) -> Vec<String> {
    let Some(day_start) = clock.day_start(target_day) else {
        return Vec::new();
    };

    let day_last = day_start + TimeDelta::hours(24) - bucket_width();
    let last_complete = (truncate_to_bucket(clock, now) - bucket_width()).min(day_last);
    if last_complete < day_start {
        return Vec::new();
    }

    let mut buckets = Vec::with_capacity(BUCKETS_PER_DAY);
    let mut t = day_start;
    while t <= last_complete {
        buckets.push(bucket_key(clock, t));
        t += bucket_width();
    }
    buckets
}

/// 요청한 버킷마다 겹치는 세션을 가진 **서로 다른** 사용자 수를 셉니다.
///
/// 한 사용자가 같은 버킷에 여러 세션을 걸쳐도 한 번만 셉니다.
/// 파싱되지 않는 키는 결과에서 빠집니다.
/// 비용은 O(세션 수 × 버킷 수)이며, 버킷은 하루 최대 144개입니다.
pub fn compute_bucket_counts(
    clock: &DayClock,
    bucket_keys: &[String],
    sessions: &[VoidSession],
) -> BTreeMap<String, i64> {
    let mut counts = BTreeMap::new();

    for key in bucket_keys {
        let Some(bucket_start) = parse_bucket_key(clock, key) else {
            tracing::warn!("skipping malformed bucket key {:?}", key);
            continue;
        };

        let users: HashSet<&str> = sessions
            .iter()
            .filter(|s| overlaps(s.started_at, s.ended_at, bucket_start))
            .map(|s| s.user_id.as_str())
            .collect();

        counts.insert(key.clone(), users.len() as i64);
    }

    counts
}

/// 주어진 세션들(한 사용자의 것) 중 하나라도 버킷과 겹치는지
pub fn is_user_in_bucket(clock: &DayClock, key: &str, sessions: &[VoidSession]) -> bool {
    let Some(bucket_start) = parse_bucket_key(clock, key) else {
        return false;
    };
    sessions
        .iter()
        .any(|s| overlaps(s.started_at, s.ended_at, bucket_start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use proptest::prelude::*;

    fn clock() -> DayClock {
        DayClock::new(16, FixedOffset::east_opt(9 * 3600).unwrap())
    }

    fn kst(d: u32, h: u32, min: u32) -> DateTime<Utc> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 2, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn session(user: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> VoidSession {
        VoidSession {
            id: uuid::Uuid::now_v7().to_string(),
            user_id: user.to_string(),
            started_at: start,
            ended_at: end,
            duration_sec: (end - start).num_seconds(),
            target_day: clock().target_day(start),
            activities: Vec::new(),
            created_at: end,
        }
    }

    #[test]
    fn bucket_key_truncates_in_reference_zone() {
        let t = kst(16, 10, 27) + TimeDelta::seconds(42) + TimeDelta::milliseconds(5);
        assert_eq!(bucket_key(&clock(), t), "2026-02-16T10:20");
        assert_eq!(truncate_to_bucket(&clock(), t), kst(16, 10, 20));
    }

    #[test]
    fn parse_rejects_malformed_keys() {
        let c = clock();
        assert_eq!(parse_bucket_key(&c, "2026-02-16T10:20"), Some(kst(16, 10, 20)));
        assert_eq!(parse_bucket_key(&c, "2026-02-16T10:25"), None);
        assert_eq!(parse_bucket_key(&c, "2026-02-16 10:20"), None);
        assert_eq!(parse_bucket_key(&c, "garbage"), None);
        assert_eq!(parse_bucket_key(&c, ""), None);
    }

    #[test]
    fn display_time_takes_hour_and_minute() {
        assert_eq!(display_time("2026-02-16T09:10"), "09:10");
        assert_eq!(display_time("short"), "short");
    }

    #[test]
    fn session_overlaps_first_three_buckets_only() {
        let (start, end) = (kst(16, 10, 0), kst(16, 10, 25));
        assert!(overlaps(start, end, kst(16, 10, 0)));
        assert!(overlaps(start, end, kst(16, 10, 10)));
        assert!(overlaps(start, end, kst(16, 10, 20)));
        assert!(!overlaps(start, end, kst(16, 10, 30)));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        // 버킷 시작 시각에 끝난 세션
        assert!(!overlaps(kst(16, 9, 50), kst(16, 10, 0), kst(16, 10, 0)));
        // 버킷 끝 시각에 시작한 세션
        assert!(!overlaps(kst(16, 10, 10), kst(16, 10, 30), kst(16, 10, 0)));
    }

    #[test]
    fn same_user_counts_once_per_bucket() {
        let sessions = vec![
            session("alice", kst(17, 9, 5), kst(17, 9, 12)),
            session("alice", kst(17, 9, 15), kst(17, 9, 18)),
            session("bob", kst(17, 9, 0), kst(17, 9, 30)),
        ];
        let keys = vec![
            "2026-02-17T09:00".to_string(),
            "2026-02-17T09:10".to_string(),
            "2026-02-17T09:30".to_string(),
        ];

        let counts = compute_bucket_counts(&clock(), &keys, &sessions);
        assert_eq!(counts["2026-02-17T09:00"], 2);
        assert_eq!(counts["2026-02-17T09:10"], 2);
        assert_eq!(counts["2026-02-17T09:30"], 0);
    }

    #[test]
    fn malformed_keys_are_skipped_by_aggregator() {
        let keys = vec!["nope".to_string(), "2026-02-17T09:00".to_string()];
        let counts = compute_bucket_counts(&clock(), &keys, &[]);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts["2026-02-17T09:00"], 0);
    }

    #[test]
    fn is_user_in_bucket_uses_own_sessions() {
        let mine = vec![session("alice", kst(16, 17, 3), kst(16, 17, 8))];
        assert!(is_user_in_bucket(&clock(), "2026-02-16T17:00", &mine));
        assert!(!is_user_in_bucket(&clock(), "2026-02-16T17:10", &mine));
        assert!(!is_user_in_bucket(&clock(), "bad", &mine));
    }

    #[test]
    fn no_buckets_before_first_bucket_elapses() {
        let c = clock();
        assert!(expected_buckets(&c, "2026-02-16", kst(16, 15, 0)).is_empty());
        assert!(expected_buckets(&c, "2026-02-16", kst(16, 16, 9)).is_empty());
        assert_eq!(
            expected_buckets(&c, "2026-02-16", kst(16, 16, 10)),
            vec!["2026-02-16T16:00".to_string()]
        );
    }

    #[test]
    fn in_progress_bucket_is_never_listed() {
        let buckets = expected_buckets(&clock(), "2026-02-16", kst(16, 17, 35));
        assert_eq!(buckets.first().map(String::as_str), Some("2026-02-16T16:00"));
        assert_eq!(buckets.last().map(String::as_str), Some("2026-02-16T17:20"));
        assert_eq!(buckets.len(), 9);
    }

    #[test]
    fn past_day_has_all_buckets() {
        let buckets = expected_buckets(&clock(), "2026-02-16", kst(20, 12, 0));
        assert_eq!(buckets.len(), BUCKETS_PER_DAY);
        assert_eq!(buckets[0], "2026-02-16T16:00");
        assert_eq!(buckets[BUCKETS_PER_DAY - 1], "2026-02-17T15:50");
    }

    #[test]
    fn malformed_day_has_no_buckets() {
        assert!(expected_buckets(&clock(), "16-02-2026", kst(20, 12, 0)).is_empty());
    }

    proptest! {
        #[test]
        fn prop_bucket_key_round_trips_to_truncation(secs in 0i64..4_102_444_800, nanos in 0u32..1_000_000_000) {
            let c = clock();
            let t = DateTime::from_timestamp(secs, nanos).unwrap();
            let parsed = parse_bucket_key(&c, &bucket_key(&c, t));
            prop_assert_eq!(parsed, Some(truncate_to_bucket(&c, t)));
        }

        #[test]
        fn prop_truncation_stays_within_one_bucket(secs in 0i64..4_102_444_800) {
            let c = clock();
            let t = DateTime::from_timestamp(secs, 0).unwrap();
            let start = truncate_to_bucket(&c, t);
            prop_assert!(start <= t);
            prop_assert!(t < start + bucket_width());
        }
    }
}
