use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::stats::grouping::Buckets;
use crate::stats::{DateRange, RecordStore, StatsError};
use crate::store::operations::health_measurements::HealthMeasurement;

/// Which measurement a health chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatType {
    Weight,
    Bmi,
    HeartRate,
    BloodPressure,
}

impl HealthStatType {
    pub const ALL: [HealthStatType; 4] = [
        HealthStatType::Bmi,
        HealthStatType::Weight,
        HealthStatType::BloodPressure,
        HealthStatType::HeartRate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatType::Weight => "weight",
            HealthStatType::Bmi => "bmi",
            HealthStatType::HeartRate => "heartRate",
            HealthStatType::BloodPressure => "bloodPressure",
        }
    }

    /// Human-readable chart label.
    pub fn label(self) -> &'static str {
        match self {
            HealthStatType::Weight => "Weight",
            HealthStatType::Bmi => "BMI",
            HealthStatType::HeartRate => "Heart Rate",
            HealthStatType::BloodPressure => "Blood Pressure",
        }
    }
}

impl fmt::Display for HealthStatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthStatType {
    type Err = StatsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        HealthStatType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .ok_or_else(|| StatsError::InvalidFilter(format!("unknown health stat type '{raw}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDayBucket {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure_systolic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure_diastolic: Option<f64>,
}

impl HealthDayBucket {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            weight: None,
            bmi: None,
            heart_rate: None,
            blood_pressure_systolic: None,
            blood_pressure_diastolic: None,
        }
    }

    fn project(&mut self, measurement: &HealthMeasurement, kind: HealthStatType) {
        match kind {
            HealthStatType::Weight => self.weight = Some(measurement.weight),
            HealthStatType::Bmi => self.bmi = Some(measurement.bmi),
            HealthStatType::HeartRate => self.heart_rate = Some(measurement.heart_rate),
            HealthStatType::BloodPressure => {
                self.blood_pressure_systolic = Some(measurement.blood_pressure_systolic);
                self.blood_pressure_diastolic = Some(measurement.blood_pressure_diastolic);
            }
        }
    }
}

/// One value per measurement day for the requested `kind`, ascending by date.
/// The last measurement of a day wins; nothing is averaged.
pub fn health_stats<S>(
    store: &S,
    owner_id: &str,
    range: &DateRange,
    kind: HealthStatType,
) -> Result<Vec<HealthDayBucket>, StatsError>
where
    S: RecordStore<HealthMeasurement> + ?Sized,
{
    let mut buckets = Buckets::new();
    for measurement in store.fetch_in_range(owner_id, range)? {
        let date = measurement.measurement_date.date_naive();
        if measurement.user_id != owner_id || !range.contains(date) {
            continue;
        }
        buckets
            .slot(date, |date| HealthDayBucket::empty(*date))
            .project(&measurement, kind);
    }
    Ok(buckets.into_sorted_by_key(|bucket| bucket.date))
}
