//! Data models mirroring the report card API schemas.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A school row as returned by the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct School {
    pub id: i64,
    pub rcdts: String,
    pub school_name: String,
    pub city: String,
    pub district: Option<String>,
    pub school_type: Option<String>,
}

/// Search endpoint response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<School>,
    pub total: usize,
}

/// Average ACT scores by subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActScores {
    pub ela_avg: Option<f64>,
    pub math_avg: Option<f64>,
    pub science_avg: Option<f64>,
    #[serde(default)]
    pub overall_avg: Option<f64>,
}

/// Student population demographics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Demographics {
    pub el_percentage: Option<f64>,
    pub low_income_percentage: Option<f64>,
}

/// Racial/ethnic composition percentages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diversity {
    pub white: Option<f64>,
    pub black: Option<f64>,
    pub hispanic: Option<f64>,
    pub asian: Option<f64>,
    pub pacific_islander: Option<f64>,
    pub native_american: Option<f64>,
    pub two_or_more: Option<f64>,
    pub mena: Option<f64>,
}

/// Deltas for a metric over the standard look-back periods, each
/// independently absent when the source year has no data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendWindow {
    #[serde(default)]
    pub one_year: Option<f64>,
    #[serde(default)]
    pub three_year: Option<f64>,
    #[serde(default)]
    pub five_year: Option<f64>,
    #[serde(default)]
    pub ten_year: Option<f64>,
    #[serde(default)]
    pub fifteen_year: Option<f64>,
}

impl TrendWindow {
    /// Rows for display: (period label, delta).
    pub fn periods(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("1 Year", self.one_year),
            ("3 Year", self.three_year),
            ("5 Year", self.five_year),
            ("10 Year", self.ten_year),
            ("15 Year", self.fifteen_year),
        ]
    }
}

/// Per-metric trend windows; the backend omits metrics with no trend data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendMetrics {
    #[serde(default)]
    pub enrollment: Option<TrendWindow>,
    #[serde(default)]
    pub act: Option<TrendWindow>,
    #[serde(default)]
    pub el: Option<TrendWindow>,
    #[serde(default)]
    pub low_income: Option<TrendWindow>,
    #[serde(default)]
    pub white: Option<TrendWindow>,
    #[serde(default)]
    pub black: Option<TrendWindow>,
    #[serde(default)]
    pub hispanic: Option<TrendWindow>,
    #[serde(default)]
    pub asian: Option<TrendWindow>,
    #[serde(default)]
    pub pacific_islander: Option<TrendWindow>,
    #[serde(default)]
    pub native_american: Option<TrendWindow>,
    #[serde(default)]
    pub two_or_more: Option<TrendWindow>,
    #[serde(default)]
    pub mena: Option<TrendWindow>,
}

/// Year-keyed historical values for one metric. The wire format is a flat
/// object of `yr_<year>` keys holding only the years with data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YearSeries {
    #[serde(flatten)]
    values: BTreeMap<String, f64>,
}

impl YearSeries {
    pub fn value(&self, year: u16) -> Option<f64> {
        self.values.get(&format!("yr_{year}")).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(u16, f64)]) -> Self {
        YearSeries {
            values: pairs
                .iter()
                .map(|(year, value)| (format!("yr_{year}"), *value))
                .collect(),
        }
    }
}

/// Per-metric historical year series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoricalMetrics {
    #[serde(default)]
    pub enrollment: Option<YearSeries>,
    #[serde(default)]
    pub act: Option<YearSeries>,
    #[serde(default)]
    pub act_ela: Option<YearSeries>,
    #[serde(default)]
    pub act_math: Option<YearSeries>,
    #[serde(default)]
    pub act_science: Option<YearSeries>,
    #[serde(default)]
    pub el: Option<YearSeries>,
    #[serde(default)]
    pub low_income: Option<YearSeries>,
    #[serde(default)]
    pub white: Option<YearSeries>,
    #[serde(default)]
    pub black: Option<YearSeries>,
    #[serde(default)]
    pub hispanic: Option<YearSeries>,
    #[serde(default)]
    pub asian: Option<YearSeries>,
    #[serde(default)]
    pub pacific_islander: Option<YearSeries>,
    #[serde(default)]
    pub native_american: Option<YearSeries>,
    #[serde(default)]
    pub two_or_more: Option<YearSeries>,
    #[serde(default)]
    pub mena: Option<YearSeries>,
}

/// The metrics block nested in a school detail response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolMetrics {
    pub enrollment: Option<i64>,
    #[serde(default)]
    pub act: Option<ActScores>,
    #[serde(default)]
    pub demographics: Demographics,
    #[serde(default)]
    pub diversity: Diversity,
    #[serde(default)]
    pub iar_ela_proficiency_pct: Option<f64>,
    #[serde(default)]
    pub iar_math_proficiency_pct: Option<f64>,
    #[serde(default)]
    pub iar_overall_proficiency_pct: Option<f64>,
    #[serde(default)]
    pub trends: Option<TrendMetrics>,
    #[serde(default)]
    pub historical: Option<HistoricalMetrics>,
}

/// Full detail for a single school.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolDetail {
    pub id: i64,
    pub rcdts: String,
    pub school_name: String,
    pub city: String,
    pub district: Option<String>,
    pub county: Option<String>,
    pub school_type: Option<String>,
    pub grades_served: Option<String>,
    pub metrics: SchoolMetrics,
}

impl SchoolDetail {
    /// "City · County County · District" line under the school name.
    pub fn location_line(&self) -> String {
        let mut line = self.city.clone();
        if let Some(county) = &self.county {
            line.push_str(&format!(" · {county} County"));
        }
        if let Some(district) = &self.district {
            line.push_str(&format!(" · {district}"));
        }
        line
    }
}

/// Compare endpoint response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub schools: Vec<SchoolDetail>,
}

/// Assessment selector for the top-scores endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assessment {
    Act,
    Iar,
}

impl Assessment {
    pub fn as_query(self) -> &'static str {
        match self {
            Assessment::Act => "act",
            Assessment::Iar => "iar",
        }
    }
}

/// Grade-level selector for the top-scores endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradeLevel {
    High,
    Middle,
    Elementary,
}

impl GradeLevel {
    pub fn as_query(self) -> &'static str {
        match self {
            GradeLevel::High => "high",
            GradeLevel::Middle => "middle",
            GradeLevel::Elementary => "elementary",
        }
    }
}

/// One ranked row from the top-scores endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopScoreEntry {
    pub rank: u32,
    pub rcdts: String,
    pub school_name: String,
    pub city: String,
    pub district: Option<String>,
    pub school_type: Option<String>,
    pub level: String,
    pub enrollment: Option<i64>,
    pub score: f64,
    #[serde(default)]
    pub act_ela_avg: Option<f64>,
    #[serde(default)]
    pub act_math_avg: Option<f64>,
}

/// Top-scores endpoint response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopScoresResponse {
    pub results: Vec<TopScoreEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_deserializes() {
        let body = r#"{
            "results": [
                {
                    "id": 1,
                    "rcdts": "15-016-2990-25-0001",
                    "school_name": "Lincoln Elementary",
                    "city": "Springfield",
                    "district": "Springfield SD 186",
                    "school_type": "ELEMENTARY"
                },
                {
                    "id": 2,
                    "rcdts": "15-016-2990-25-0002",
                    "school_name": "Washington Middle",
                    "city": "Springfield",
                    "district": null,
                    "school_type": null
                }
            ],
            "total": 2
        }"#;

        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.total, 2);
        assert_eq!(parsed.results[0].school_name, "Lincoln Elementary");
        assert!(parsed.results[1].district.is_none());
    }

    #[test]
    fn test_school_detail_deserializes_with_sparse_metrics() {
        let body = r#"{
            "id": 7,
            "rcdts": "15-016-2990-25-0007",
            "school_name": "Central High School",
            "city": "Peoria",
            "district": "Peoria SD 150",
            "county": "Peoria",
            "school_type": "HIGH SCHOOL",
            "grades_served": "9-12",
            "metrics": {
                "enrollment": 1250,
                "act": { "ela_avg": 20.1, "math_avg": 19.8, "science_avg": null },
                "demographics": { "el_percentage": 8.2, "low_income_percentage": 61.0 },
                "diversity": { "white": 40.0, "black": 35.5, "hispanic": 15.0,
                               "asian": 4.0, "pacific_islander": null,
                               "native_american": null, "two_or_more": 5.5, "mena": null },
                "trends": {
                    "enrollment": { "one_year": -32.0, "three_year": 15.0, "five_year": null }
                },
                "historical": {
                    "enrollment": { "yr_2025": 1250.0, "yr_2024": 1282.0, "yr_2019": 1301.0 }
                }
            }
        }"#;

        let parsed: SchoolDetail = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.metrics.enrollment, Some(1250));

        let trends = parsed.metrics.trends.as_ref().unwrap();
        let window = trends.enrollment.as_ref().unwrap();
        assert_eq!(window.one_year, Some(-32.0));
        assert_eq!(window.five_year, None);
        assert_eq!(window.fifteen_year, None);
        assert!(trends.act.is_none());

        let history = parsed.metrics.historical.as_ref().unwrap();
        let series = history.enrollment.as_ref().unwrap();
        assert_eq!(series.value(2024), Some(1282.0));
        assert_eq!(series.value(2020), None);
    }

    #[test]
    fn test_school_detail_without_optional_blocks() {
        let body = r#"{
            "id": 3,
            "rcdts": "x",
            "school_name": "s",
            "city": "c",
            "district": null,
            "county": null,
            "school_type": null,
            "grades_served": null,
            "metrics": { "enrollment": null }
        }"#;

        let parsed: SchoolDetail = serde_json::from_str(body).unwrap();
        assert!(parsed.metrics.act.is_none());
        assert!(parsed.metrics.trends.is_none());
        assert!(parsed.metrics.historical.is_none());
        assert!(parsed.metrics.demographics.el_percentage.is_none());
    }

    #[test]
    fn test_top_scores_deserializes() {
        let body = r#"{
            "results": [
                {
                    "rank": 1,
                    "rcdts": "a",
                    "school_name": "Alpha High",
                    "city": "Chicago",
                    "district": "CPS",
                    "school_type": "HIGH SCHOOL",
                    "level": "high",
                    "enrollment": 900,
                    "score": 27.45,
                    "act_ela_avg": 27.1,
                    "act_math_avg": 27.8
                }
            ]
        }"#;

        let parsed: TopScoresResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results[0].rank, 1);
        assert!((parsed.results[0].score - 27.45).abs() < 1e-9);
    }

    #[test]
    fn test_year_series_lookup() {
        let series = YearSeries::from_pairs(&[(2025, 1250.0), (2023, 1300.0)]);
        assert_eq!(series.value(2025), Some(1250.0));
        assert_eq!(series.value(2024), None);
        assert!(!series.is_empty());
        assert!(YearSeries::default().is_empty());
    }

    #[test]
    fn test_location_line() {
        let detail = SchoolDetail {
            id: 1,
            rcdts: "x".into(),
            school_name: "s".into(),
            city: "Peoria".into(),
            district: Some("Peoria SD 150".into()),
            county: Some("Peoria".into()),
            school_type: None,
            grades_served: None,
            metrics: SchoolMetrics::default(),
        };
        assert_eq!(detail.location_line(), "Peoria · Peoria County · Peoria SD 150");

        let bare = SchoolDetail {
            district: None,
            county: None,
            ..detail
        };
        assert_eq!(bare.location_line(), "Peoria");
    }

    #[test]
    fn test_trend_window_periods_order() {
        let window = TrendWindow {
            one_year: Some(1.0),
            three_year: None,
            five_year: Some(5.0),
            ten_year: None,
            fifteen_year: None,
        };
        let periods = window.periods();
        assert_eq!(periods[0], ("1 Year", Some(1.0)));
        assert_eq!(periods[1], ("3 Year", None));
        assert_eq!(periods[4].0, "15 Year");
    }
}
