//! Weather data models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of forecast weather as supplied by the weather provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    /// Calendar date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    pub temp_max_c: f64,
    pub temp_min_c: f64,
}

impl DailyWeather {
    pub fn new(date: NaiveDate, temp_max_c: f64, temp_min_c: f64) -> Self {
        Self {
            date,
            temp_max_c,
            temp_min_c,
        }
    }

    pub fn mean_temp_c(&self) -> f64 {
        (self.temp_max_c + self.temp_min_c) / 2.0
    }

    /// Growing degree days contributed by this day (never negative)
    pub fn gdd(&self, base_c: f64) -> f64 {
        (self.mean_temp_c() - base_c).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(max: f64, min: f64) -> DailyWeather {
        DailyWeather::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), max, min)
    }

    #[test]
    fn test_gdd_from_mean_temperature() {
        assert_eq!(day(30.0, 20.0).gdd(10.0), 15.0);
        assert_eq!(day(32.0, 22.0).gdd(10.0), 17.0);
    }

    #[test]
    fn test_gdd_clamped_on_cold_days() {
        assert_eq!(day(8.0, 2.0).gdd(10.0), 0.0);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(day(30.0, 20.0)).unwrap();
        assert_eq!(json["date"], "2024-06-01");
        assert_eq!(json["temp_max_c"], 30.0);
        assert_eq!(json["temp_min_c"], 20.0);
    }
}
