/// Market session and timing utilities
use chrono::{DateTime, Datelike, Duration, Offset, Timelike, Utc};
use chrono_tz::Tz;

/// Exchange timezone; all bars are bucketed and displayed in IST
pub const MARKET_TZ: Tz = chrono_tz::Asia::Kolkata;

// Minutes after IST midnight
const MARKET_OPEN_MINUTE: i64 = 9 * 60 + 15;
const MARKET_CLOSE_MINUTE: i64 = 15 * 60 + 30;

/// IST midnight of the day containing `date`, as UTC
fn ist_midnight(date: DateTime<Utc>) -> DateTime<Utc> {
    let offset_secs = date.with_timezone(&MARKET_TZ).offset().fix().local_minus_utc() as i64;
    let local_secs = date.timestamp() + offset_secs;
    date - Duration::seconds(local_secs.rem_euclid(86_400))
        - Duration::nanoseconds(date.timestamp_subsec_nanos() as i64)
}

/// Check if the IST calendar day is a weekday (holidays are not checked)
pub fn is_trading_day(date: DateTime<Utc>) -> bool {
    let date_ist = date.with_timezone(&MARKET_TZ);

    // Monday = 0, Saturday = 5, Sunday = 6
    date_ist.weekday().num_days_from_monday() < 5
}

/// Market open (09:15 IST) and close (15:30 IST) for the IST day of `date`
pub fn get_market_timings(date: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = ist_midnight(date);
    (
        midnight + Duration::minutes(MARKET_OPEN_MINUTE),
        midnight + Duration::minutes(MARKET_CLOSE_MINUTE),
    )
}

/// Check if market is open
pub fn is_market_open(now: DateTime<Utc>) -> bool {
    if !is_trading_day(now) {
        return false;
    }

    let now_ist = now.with_timezone(&MARKET_TZ);
    let minute = (now_ist.hour() * 60 + now_ist.minute()) as i64;

    (MARKET_OPEN_MINUTE..MARKET_CLOSE_MINUTE).contains(&minute)
}

/// Get next market open time, skipping weekends
pub fn next_market_open(now: DateTime<Utc>) -> DateTime<Utc> {
    let (today_open, _) = get_market_timings(now);

    let mut candidate = if now < today_open {
        today_open
    } else {
        today_open + Duration::days(1)
    };

    while !is_trading_day(candidate) {
        candidate = candidate + Duration::days(1);
    }

    candidate
}
