//! # 하루 공백 시간 랭킹
//!
//! 추적일의 세션을 사용자별로 합산한 총 공백 시간이 긴 순서로 순위를 매깁니다.
//! 총 시간이 같으면 사용자 ID 오름차순으로 정렬해 순위를 결정적으로 만듭니다.

use std::cmp::Ordering;

use crate::models::UserDuration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ranking {
    /// 1부터 시작하는 순위. 그날 세션이 없으면 None
    pub my_rank: Option<usize>,
    /// 순위에 오른 사용자 수. 0명이면 None
    pub total_users: Option<usize>,
}

/// 총 시간 내림차순, 같으면 사용자 ID 오름차순
fn ranking_order(a: &UserDuration, b: &UserDuration) -> Ordering {
    b.total_duration_sec
        .cmp(&a.total_duration_sec)
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// 사용자별 합계 목록에서 호출자의 순위와 전체 인원을 구합니다.
pub fn rank_of(durations: &[UserDuration], user_id: &str) -> Ranking {
    if durations.is_empty() {
        return Ranking::default();
    }

    let mut sorted: Vec<&UserDuration> = durations.iter().collect();
    sorted.sort_by(|a, b| ranking_order(a, b));

    Ranking {
        my_rank: sorted
            .iter()
            .position(|d| d.user_id == user_id)
            .map(|i| i + 1),
        total_users: Some(sorted.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(user: &str, secs: i64) -> UserDuration {
        UserDuration {
            user_id: user.to_string(),
            total_duration_sec: secs,
        }
    }

    #[test]
    fn longest_total_ranks_first() {
        let durations = vec![d("a", 600), d("b", 3600), d("c", 1200)];
        assert_eq!(
            rank_of(&durations, "c"),
            Ranking {
                my_rank: Some(2),
                total_users: Some(3)
            }
        );
        assert_eq!(rank_of(&durations, "b").my_rank, Some(1));
    }

    #[test]
    fn ties_break_on_user_id() {
        let durations = vec![d("zed", 900), d("amy", 900), d("kim", 900)];
        assert_eq!(rank_of(&durations, "amy").my_rank, Some(1));
        assert_eq!(rank_of(&durations, "kim").my_rank, Some(2));
        assert_eq!(rank_of(&durations, "zed").my_rank, Some(3));
    }

    #[test]
    fn caller_without_sessions_has_no_rank() {
        let durations = vec![d("a", 60)];
        assert_eq!(
            rank_of(&durations, "ghost"),
            Ranking {
                my_rank: None,
                total_users: Some(1)
            }
        );
    }

    #[test]
    fn empty_day_has_no_population() {
        assert_eq!(rank_of(&[], "a"), Ranking::default());
    }
}
