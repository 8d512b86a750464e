use serde_json::json;

use crate::api::{DatedValue, StationId, TemperatureSummary};
use crate::models::TemperatureStats;

#[test]
fn test_station_id_serializes_as_plain_string() {
    let id = StationId::new("USC00519281");
    assert_eq!(id.as_str(), "USC00519281");
    assert_eq!(serde_json::to_value(&id).unwrap(), json!("USC00519281"));
}

#[test]
fn test_station_id_equality() {
    let a = StationId::from("USC00513117".to_string());
    let b = StationId::new("USC00513117");
    let c = StationId::new("USC00514830");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_dated_value_is_single_entry_object() {
    let value = DatedValue::new("2015-01-01", Some(0.5));
    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        json!({"2015-01-01": 0.5})
    );
}

#[test]
fn test_dated_value_absent_reading_is_null() {
    let value = DatedValue::from(("2016-08-24".to_string(), None));
    assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"2016-08-24":null}"#);
}

#[test]
fn test_summary_from_start_omits_end_date() {
    let summary = TemperatureSummary::from_start(
        "2015-01-01",
        TemperatureStats::from_observations([70.0]),
    );
    assert_eq!(
        serde_json::to_value(&summary).unwrap(),
        json!({
            "startDate": "2015-01-01",
            "tempMin": 70.0,
            "tempMax": 70.0,
            "tempAvg": 70.0
        })
    );
}

#[test]
fn test_summary_for_range_empty_stats_are_null() {
    let summary =
        TemperatureSummary::for_range("2017-01-01", "2016-01-01", TemperatureStats::empty());
    assert_eq!(
        serde_json::to_value(&summary).unwrap(),
        json!({
            "startDate": "2017-01-01",
            "endDate": "2016-01-01",
            "tempMin": null,
            "tempMax": null,
            "tempAvg": null
        })
    );
    assert!(summary.stats().is_empty());
}

#[test]
fn test_summary_deserializes_camel_case() {
    let summary: TemperatureSummary = serde_json::from_value(json!({
        "startDate": "2016-08-23",
        "tempMin": 58.0,
        "tempMax": 87.0,
        "tempAvg": 74.5
    }))
    .unwrap();
    assert_eq!(summary.start_date, "2016-08-23");
    assert!(summary.end_date.is_none());
    assert_eq!(summary.temp_avg, Some(74.5));
}
