use chrono::{NaiveDate, NaiveTime};

/// Sorted-set score for a reservation date: milliseconds since the epoch at
/// midnight UTC. Range queries over dates become plain score ranges.
pub fn date_score(date: NaiveDate) -> f64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_date_scores_zero() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_score(epoch), 0.0);
    }

    #[test]
    fn score_is_monotone_in_the_date() {
        let earlier = NaiveDate::from_ymd_opt(2026, 8, 22).unwrap();
        let later = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        assert!(date_score(earlier) < date_score(later));
    }

    #[test]
    fn consecutive_days_differ_by_one_day_of_millis() {
        let earlier = NaiveDate::from_ymd_opt(2026, 8, 22).unwrap();
        let later = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        assert_eq!(date_score(later) - date_score(earlier), 86_400_000.0);
    }
}
