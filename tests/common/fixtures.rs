use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).single().expect("valid instant")
}

pub fn activity(kind: &str, start: DateTime<Utc>, minutes: i64, calories: f64) -> Value {
    serde_json::json!({
        "activityType": kind,
        "startTime": start,
        "endTime": start + chrono::Duration::minutes(minutes),
        "caloriesBurned": calories,
    })
}

pub fn food(meal: &str, when: DateTime<Utc>, calories: f64) -> Value {
    serde_json::json!({
        "meal": meal,
        "mealDate": when,
        "calorieIntake": calories,
    })
}

pub fn sleep(when: DateTime<Utc>, hours: f64, quality: &str) -> Value {
    serde_json::json!({
        "sleepDate": when,
        "hoursSlept": hours,
        "quality": quality,
    })
}

pub fn measurement(when: DateTime<Utc>, weight: f64, heart_rate: f64) -> Value {
    serde_json::json!({
        "measurementDate": when,
        "weight": weight,
        "height": 180.0,
        "bmi": 24.7,
        "heartRate": heart_rate,
        "bloodPressureSystolic": 120.0,
        "bloodPressureDiastolic": 80.0,
    })
}
