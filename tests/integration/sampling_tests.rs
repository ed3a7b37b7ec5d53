//! Sampling scheduler end to end: transport → decode → calibrate → store.

use crate::mock_hw::{FakeClock, MockTransport, RecordingSink, Reply};
use pmstation::app::events::AppEvent;
use pmstation::config::PmSensorConfig;
use pmstation::error::{FrameFault, SensorError};
use pmstation::scheduler::{CycleOutcome, SamplerState, SamplerStats, SamplingScheduler};
use pmstation::sensors::SensorDescriptor;
use pmstation::sensors::calibration::{CalibrationEntry, CalibrationTable};
use pmstation::sensors::pmsx003::{self, Pmsx003Decoder};
use pmstation::store::SampleStore;
use std::sync::Arc;
use std::time::Duration;

type Sampler = SamplingScheduler<MockTransport, Pmsx003Decoder, FakeClock, RecordingSink>;

struct Rig {
    sampler: Sampler,
    transport: MockTransport,
    clock: FakeClock,
    sink: RecordingSink,
    store: Arc<SampleStore>,
}

fn rig(config: &PmSensorConfig) -> Rig {
    let descriptor = SensorDescriptor::from_config(Pmsx003Decoder, config).unwrap();
    let transport = MockTransport::new();
    let clock = FakeClock::new();
    let sink = RecordingSink::new();
    let store = Arc::new(SampleStore::for_sensor(&descriptor));
    let sampler = SamplingScheduler::new(
        descriptor,
        transport.clone(),
        clock.clone(),
        sink.clone(),
        Arc::clone(&store),
        config.read_timeout_ms,
    );
    Rig {
        sampler,
        transport,
        clock,
        sink,
        store,
    }
}

fn latest(store: &SampleStore) -> Option<pmstation::store::SampleSnapshot> {
    store.read_snapshot(Duration::from_millis(10)).unwrap()
}

// ── Warm-up then first sample ─────────────────────────────────

#[test]
fn first_sample_lands_after_warm_up_with_calibration_applied() {
    let mut r = rig(&PmSensorConfig::default());
    r.transport
        .push_frame(&pmsx003::encode_frame([10, 100, 50], [300, 200, 100, 50, 20, 10], 250));

    // Warm-up: 5000 ms of sleep, no reads, empty store.
    assert_eq!(r.sampler.step(), None);
    assert_eq!(r.sampler.state(), SamplerState::Sampling);
    assert!(r.transport.reads().is_empty());
    assert!(latest(&r.store).is_none());

    // First cycle at t=5000.
    assert_eq!(r.sampler.step(), Some(CycleOutcome::Accepted));
    assert_eq!(r.transport.reads(), vec![(32, 1_000)]);
    assert_eq!(r.clock.sleeps(), vec![5_000, 1_000]);

    let snap = latest(&r.store).unwrap();
    assert_eq!(snap.sensor_id.as_str(), "PMSX003-N");
    assert_eq!(snap.timestamp_ms, 5_000);
    assert_eq!(snap.mass_concentration[0], 10.0);
    assert!((snap.mass_concentration[1] - 100.5).abs() < 1e-4);
    assert!((snap.mass_concentration[2] - 49.5).abs() < 1e-4);
    assert_eq!(snap.particle_count, [300.0, 200.0, 100.0, 50.0, 20.0, 10.0]);
}

// ── Failure modes leave the store alone ───────────────────────

#[test]
fn bad_cycles_are_skipped_and_last_good_sample_survives() {
    let mut r = rig(&PmSensorConfig::default());
    let good = pmsx003::encode_frame([1, 2, 3], [0; 6], 0);
    let mut corrupt = pmsx003::encode_frame([9, 9, 9], [0; 6], 0);
    corrupt[12] ^= 0x01;
    let mut bad_header = good;
    bad_header[0] = 0x00;

    r.transport.push_frame(&good);
    r.transport.push(Reply::Bytes(good[..20].to_vec()));
    r.transport.push(Reply::Fault);
    r.transport.push_frame(&corrupt);
    r.transport.push_frame(&bad_header);

    r.sampler.step();
    let outcomes: Vec<_> = (0..5).filter_map(|_| r.sampler.step()).collect();

    assert_eq!(outcomes[0], CycleOutcome::Accepted);
    assert_eq!(
        outcomes[1],
        CycleOutcome::ReadFailed(SensorError::ShortRead {
            expected: 32,
            received: 20
        })
    );
    assert_eq!(outcomes[2], CycleOutcome::ReadFailed(SensorError::Transport));
    assert!(matches!(
        outcomes[3],
        CycleOutcome::Rejected(Some(FrameFault::Checksum { .. }))
    ));
    assert_eq!(
        outcomes[4],
        CycleOutcome::Rejected(Some(FrameFault::Header(0x004D)))
    );

    assert_eq!(
        r.sampler.stats(),
        SamplerStats {
            cycles: 5,
            accepted: 1,
            read_failures: 2,
            rejected: 2,
        }
    );

    // Every cycle still slept a full period.
    assert_eq!(r.clock.sleeps(), vec![5_000, 1_000, 1_000, 1_000, 1_000, 1_000]);

    let snap = latest(&r.store).unwrap();
    assert_eq!(snap.timestamp_ms, 5_000);
    assert_eq!(snap.mass_concentration[0], 1.0);
}

#[test]
fn newer_valid_sample_replaces_older() {
    let mut r = rig(&PmSensorConfig::default());
    r.transport.push_frame(&pmsx003::encode_frame([1, 1, 1], [0; 6], 0));
    r.transport.push_frame(&pmsx003::encode_frame([7, 7, 7], [0; 6], 0));

    r.sampler.step();
    r.sampler.step();
    r.sampler.step();

    let snap = latest(&r.store).unwrap();
    assert_eq!(snap.timestamp_ms, 6_000);
    assert_eq!(snap.mass_concentration[0], 7.0);
}

// ── Configuration flows through ───────────────────────────────

#[test]
fn configured_timing_and_calibration_are_honoured() {
    let mut config = PmSensorConfig::default();
    config.warmup_ms = 250;
    config.sample_period_ms = 2_000;
    config.read_timeout_ms = 400;
    config.calibration = CalibrationTable::identity();
    config.calibration.count[5] = CalibrationEntry::new(2.0, 1.0);

    let mut r = rig(&config);
    r.transport
        .push_frame(&pmsx003::encode_frame([5, 5, 5], [1, 1, 1, 1, 1, 4], 0));

    r.sampler.step();
    r.sampler.step();

    assert_eq!(r.clock.sleeps(), vec![250, 2_000]);
    assert_eq!(r.transport.reads(), vec![(32, 400)]);
    let snap = latest(&r.store).unwrap();
    assert_eq!(snap.timestamp_ms, 250);
    assert_eq!(snap.mass_concentration, [5.0, 5.0, 5.0]);
    assert_eq!(snap.particle_count[5], 9.0);
}

// ── Events ────────────────────────────────────────────────────

#[test]
fn lifecycle_events_are_emitted_in_order() {
    let mut r = rig(&PmSensorConfig::default());
    r.transport.push_frame(&pmsx003::encode_frame([1, 2, 3], [0; 6], 0));

    r.sampler.step();
    r.sampler.step();
    r.sampler.step(); // script exhausted → short read

    let events = r.sink.events();
    assert!(matches!(
        &events[0],
        AppEvent::SamplerStarted { sensor_id, warmup_ms: 5_000 }
            if sensor_id.as_str() == "PMSX003-N"
    ));
    assert!(matches!(events[1], AppEvent::WarmupComplete { uptime_ms: 5_000 }));
    assert!(matches!(&events[2], AppEvent::SampleAccepted(s) if s.timestamp_ms == 5_000));
    assert!(matches!(
        events[3],
        AppEvent::ReadFailed(SensorError::ShortRead { received: 0, .. })
    ));
    assert_eq!(events.len(), 4);
}

#[test]
fn descriptor_rejects_nonsense() {
    assert!(
        SensorDescriptor::new("x", Pmsx003Decoder, 31, 1_000, CalibrationTable::identity()).is_err()
    );
    assert!(
        SensorDescriptor::new("x", Pmsx003Decoder, 32, 0, CalibrationTable::identity()).is_err()
    );
    assert!(
        SensorDescriptor::new("x", Pmsx003Decoder, 65, 1_000, CalibrationTable::identity()).is_err()
    );
}
