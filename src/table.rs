use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of measurement columns following the date token
pub const MEASUREMENT_COUNT: usize = 15;

/// Column headers in source order, date column excluded
pub const COLUMN_NAMES: [&str; MEASUREMENT_COUNT] = [
    "High Temp (ºF)",
    "Avg Temp (ºF)",
    "Low Temp (ºF)",
    "High Dew Pt (ºF)",
    "Avg Dew Pt (ºF)",
    "Low Dew Pt (ºF)",
    "High Hum (%)",
    "Avg Hum (%)",
    "Low Hum (%)",
    "High Speed (mph)",
    "Avg Speed (mph)",
    "Low Speed (mph)",
    "High Press (in)",
    "Low Press (in)",
    "Sum Precip (in)",
];

/// One day of observations from a station's monthly table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    /// Date token exactly as the site printed it (row key)
    pub date: String,
    pub temperature_high_f: f64,
    pub temperature_avg_f: f64,
    pub temperature_low_f: f64,
    pub dew_point_high_f: f64,
    pub dew_point_avg_f: f64,
    pub dew_point_low_f: f64,
    pub humidity_high_pct: f64,
    pub humidity_avg_pct: f64,
    pub humidity_low_pct: f64,
    pub speed_high_mph: f64,
    pub speed_avg_mph: f64,
    pub speed_low_mph: f64,
    pub pressure_high_in: f64,
    pub pressure_low_in: f64,
    pub precipitation_sum_in: f64,
}

impl DailyObservation {
    pub fn from_values(date: String, v: [f64; MEASUREMENT_COUNT]) -> Self {
        Self {
            date,
            temperature_high_f: v[0],
            temperature_avg_f: v[1],
            temperature_low_f: v[2],
            dew_point_high_f: v[3],
            dew_point_avg_f: v[4],
            dew_point_low_f: v[5],
            humidity_high_pct: v[6],
            humidity_avg_pct: v[7],
            humidity_low_pct: v[8],
            speed_high_mph: v[9],
            speed_avg_mph: v[10],
            speed_low_mph: v[11],
            pressure_high_in: v[12],
            pressure_low_in: v[13],
            precipitation_sum_in: v[14],
        }
    }

    /// Measurements in `COLUMN_NAMES` order
    pub fn values(&self) -> [f64; MEASUREMENT_COUNT] {
        [
            self.temperature_high_f,
            self.temperature_avg_f,
            self.temperature_low_f,
            self.dew_point_high_f,
            self.dew_point_avg_f,
            self.dew_point_low_f,
            self.humidity_high_pct,
            self.humidity_avg_pct,
            self.humidity_low_pct,
            self.speed_high_mph,
            self.speed_avg_mph,
            self.speed_low_mph,
            self.pressure_high_in,
            self.pressure_low_in,
            self.precipitation_sum_in,
        ]
    }

    /// Calendar date, when the token is in the site's `M/D/YYYY` form
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%m/%d/%Y").ok()
    }
}

/// Rows of daily observations keyed by date token, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherTable {
    rows: Vec<DailyObservation>,
}

impl WeatherTable {
    pub fn new(rows: Vec<DailyObservation>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[DailyObservation] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<DailyObservation> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row keys in order
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.date.as_str())
    }

    /// First row with the given date key
    pub fn get(&self, date: &str) -> Option<&DailyObservation> {
        self.rows.iter().find(|r| r.date == date)
    }

    /// All values of one column, looked up by its header name
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = COLUMN_NAMES.iter().position(|c| *c == name)?;
        Some(self.rows.iter().map(|r| r.values()[idx]).collect())
    }

    /// Append tables one after another. No dedup, no sort.
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = WeatherTable>,
    {
        let rows = tables.into_iter().flat_map(|t| t.rows).collect();
        Self { rows }
    }
}

/// Parsed table for one month of one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTable {
    pub year: i32,
    pub month: u32,
    pub table: WeatherTable,
}

/// Consolidated observations for one municipality's station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationHistory {
    pub municipality: String,
    pub station_code: String,
    pub year: i32,
    pub table: WeatherTable,
}
