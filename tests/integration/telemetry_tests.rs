//! Telemetry service: message assembly and JSON shape.

use crate::mock_hw::{FakeClock, RecordingSink};
use pmstation::app::events::AppEvent;
use pmstation::app::service::TelemetryService;
use pmstation::config::SystemConfig;
use pmstation::sensors::CalibratedSample;
use pmstation::sensors::weather::{WeatherState, WeatherStore};
use pmstation::store::SampleStore;
use serde_json::Value;
use std::sync::Arc;

fn stores() -> (Arc<WeatherStore>, Arc<SampleStore>) {
    let weather = Arc::new(WeatherStore::new());
    weather.write(WeatherState {
        temperature_c: 22.5,
        humidity_pct: 70.0,
        wind_dir_deg: 90.0,
        wind_speed_kmh: 5.5,
        pressure_hpa: 1_008.0,
    });
    (weather, Arc::new(SampleStore::new("PMSX003-N").unwrap()))
}

fn to_json(msg: &pmstation::app::events::TelemetryMessage) -> Value {
    serde_json::to_value(msg).unwrap()
}

#[test]
fn json_without_sample_has_weather_only() {
    let (weather, samples) = stores();
    let config = SystemConfig::default();
    let svc = TelemetryService::new(&config, weather, samples);

    let json = to_json(&svc.build_message(12_000));
    assert_eq!(json["uid"], config.device_uid.as_str());
    assert_eq!(json["uptime_ms"], 12_000);
    assert_eq!(json["temp"], 22.5);
    assert_eq!(json["umi"], 70.0);
    assert_eq!(json["dirvento"], 90.0);
    assert_eq!(json["velvento"], 5.5);
    assert_eq!(json["pressao"], 1_008.0);
    assert!(json.get("pm_sensor").is_none());
}

#[test]
fn json_with_sample_nests_pm_sensor() {
    let (weather, samples) = stores();
    samples.write(CalibratedSample {
        timestamp_ms: 10_000,
        mass_concentration: [4.0, 8.0, 16.0],
        particle_count: [600.0, 500.0, 400.0, 300.0, 200.0, 100.0],
        valid: true,
    });
    let svc = TelemetryService::new(&SystemConfig::default(), weather, samples);

    let json = to_json(&svc.build_message(12_000));
    let pm = &json["pm_sensor"];
    assert_eq!(pm["id"], "PMSX003-N");
    assert_eq!(pm["timestamp_ms"], 10_000);
    assert_eq!(pm["pm1_0"], 4.0);
    assert_eq!(pm["pm2_5"], 8.0);
    assert_eq!(pm["pm10"], 16.0);
    assert_eq!(pm["count_0_3"], 600.0);
    assert_eq!(pm["count_0_5"], 500.0);
    assert_eq!(pm["count_1_0"], 400.0);
    assert_eq!(pm["count_2_5"], 300.0);
    assert_eq!(pm["count_5_0"], 200.0);
    assert_eq!(pm["count_10"], 100.0);
}

#[test]
fn publish_once_stamps_with_clock_and_emits() {
    let (weather, samples) = stores();
    let mut svc = TelemetryService::new(&SystemConfig::default(), weather, samples);
    let mut sink = RecordingSink::new();

    let msg = svc.publish_once(&FakeClock::at(25_000), &mut sink);

    assert_eq!(msg.uptime_ms, 25_000);
    assert_eq!(svc.published(), 1);
    assert_eq!(svc.pm_omitted(), 1);
    match sink.events().as_slice() {
        [AppEvent::Telemetry(m)] => assert_eq!(*m, msg),
        other => panic!("expected one telemetry event, got {:?}", other),
    }
}
