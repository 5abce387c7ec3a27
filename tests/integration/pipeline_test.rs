//! Integration tests for the bar -> speed -> alert pipeline

use chrono::{DateTime, Duration, TimeZone, Utc};
use speedometer::alert::{AlertEvent, AlertSink, ChannelSink, DeliveryError};
use speedometer::config::SpeedometerConfig;
use speedometer::feed::Bar;
use speedometer::indicator::{Speedometer, SpeedometerRegistry};
use speedometer::speed::{InputError, RateCalculator};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap()
}

/// Bars whose consecutive gaps (seconds) are given
fn bars_with_gaps(gaps: &[i64]) -> Vec<Bar> {
    let mut bars = vec![Bar::new(0, t0())];
    let mut at = t0();
    for (i, gap) in gaps.iter().enumerate() {
        at += Duration::seconds(*gap);
        bars.push(Bar::new(i as u64 + 1, at));
    }
    bars
}

fn config(period: usize, threshold: f64, cooldown: u64, enabled: bool) -> SpeedometerConfig {
    SpeedometerConfig {
        period,
        min_threshold: threshold,
        alert_cooldown_bars: cooldown,
        alerts_enabled: enabled,
        alert_destination: String::new(),
        history_limit: 1000,
    }
}

/// Gap in seconds that gives a period-1 speed of `speed` (speed = 120 / gap)
fn gap_for(speed: i64) -> i64 {
    120 / speed
}

#[test]
fn test_no_sample_before_period_plus_one_bars() {
    for period in [1usize, 2, 5, 20] {
        let mut calc = RateCalculator::new(period);
        let bars = bars_with_gaps(&vec![3; period + 1]);
        for bar in &bars[..period] {
            assert!(calc.on_bar(bar).unwrap().is_none());
        }
        assert!(calc.on_bar(&bars[period]).unwrap().is_some());
    }
}

#[test]
fn test_ten_bars_in_thirty_seconds() {
    let mut speedometer = Speedometer::configure(config(10, 30.0, 1, true))
        .unwrap()
        .start();
    let mut last = None;
    for bar in bars_with_gaps(&[3; 10]) {
        last = speedometer.on_bar(&bar).unwrap().sample;
    }
    assert_eq!(last.unwrap().value, 40.0);
}

#[test]
fn test_history_matches_samples_produced() {
    let mut speedometer = Speedometer::configure(config(3, 30.0, 1, true))
        .unwrap()
        .start();
    let bars = bars_with_gaps(&[2, 3, 4, 5, 6, 7, 8, 9]);
    for bar in &bars {
        speedometer.on_bar(bar).unwrap();
    }
    // 9 bars, first sample at the 4th
    assert_eq!(speedometer.history().len(), 6);
    let indices: Vec<u64> = speedometer.history().iter().map(|s| s.sequence_index).collect();
    assert_eq!(indices, vec![3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_exactly_one_alert_for_one_crossing() {
    let mut speedometer = Speedometer::configure(config(1, 30.0, 1, true))
        .unwrap()
        .start();
    // speeds: 24, 40
    let bars = bars_with_gaps(&[gap_for(24), gap_for(40)]);
    let alerts: Vec<_> = bars
        .iter()
        .filter_map(|b| speedometer.on_bar(b).unwrap().alert)
        .collect();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].sequence_index, 2);
}

#[test]
fn test_cooldown_between_crossings() {
    // six slow bars, then crossings at bars 7, 10 (3 later) and 15 (8 later)
    let mut gaps = vec![gap_for(20); 6];
    gaps.extend([
        gap_for(40),
        gap_for(20),
        gap_for(20),
        gap_for(40),
        gap_for(20),
        gap_for(20),
        gap_for(20),
        gap_for(20),
        gap_for(40),
    ]);
    let mut speedometer = Speedometer::configure(config(1, 30.0, 5, true))
        .unwrap()
        .start();
    let alerted: Vec<u64> = bars_with_gaps(&gaps)
        .iter()
        .filter_map(|b| speedometer.on_bar(b).unwrap().alert)
        .map(|a| a.sequence_index)
        .collect();
    assert_eq!(alerted, vec![7, 15]);
}

#[test]
fn test_no_alert_inside_initial_cooldown() {
    let mut speedometer = Speedometer::configure(config(1, 30.0, 20, true))
        .unwrap()
        .start();
    // speeds 24 then 40: a real crossing on the second sample
    let bars = bars_with_gaps(&[gap_for(24), gap_for(40)]);
    let alerts = bars
        .iter()
        .filter_map(|b| speedometer.on_bar(b).unwrap().alert)
        .count();
    assert_eq!(alerts, 0);
    assert_eq!(speedometer.alert_state().bars_since_last_alert, 2);
}

#[test]
fn test_disabled_alerts_same_samples() {
    let gaps = [gap_for(20), gap_for(40), gap_for(20), gap_for(40)];
    let bars = bars_with_gaps(&gaps);

    let mut on = Speedometer::configure(config(1, 30.0, 1, true)).unwrap().start();
    let mut off = Speedometer::configure(config(1, 30.0, 1, false)).unwrap().start();

    let mut alerts_on = 0;
    for bar in &bars {
        let a = on.on_bar(bar).unwrap();
        let b = off.on_bar(bar).unwrap();
        assert_eq!(a.sample, b.sample);
        assert!(b.alert.is_none());
        alerts_on += a.alert.is_some() as usize;
    }
    assert_eq!(alerts_on, 2);
}

#[test]
fn test_duplicate_timestamps_yield_input_error() {
    let mut speedometer = Speedometer::configure(config(2, 30.0, 1, true))
        .unwrap()
        .start();
    let bars = [
        Bar::new(0, t0()),
        Bar::new(1, t0()),
        Bar::new(2, t0()),
    ];
    speedometer.on_bar(&bars[0]).unwrap();
    speedometer.on_bar(&bars[1]).unwrap();
    let err = speedometer.on_bar(&bars[2]).unwrap_err();
    assert!(matches!(err, InputError::NonPositiveElapsed { .. }));
    assert!(speedometer.latest().is_none());
}

#[test]
fn test_channel_sink_overflow_is_handled() {
    let mut speedometer = Speedometer::configure(config(1, 30.0, 1, true))
        .unwrap()
        .start();
    let (sink, _rx) = ChannelSink::new(1);

    let gaps = [gap_for(20), gap_for(40), gap_for(20), gap_for(20), gap_for(40)];
    let mut errors = Vec::new();
    let mut alerts = 0;
    for bar in bars_with_gaps(&gaps) {
        let update = speedometer.on_bar_with_sink(&bar, &sink).unwrap();
        alerts += update.alert.is_some() as usize;
        errors.extend(update.delivery_error);
    }

    // second alert finds the queue full; both still count as emitted
    assert_eq!(alerts, 2);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], DeliveryError::ChannelFull));
}

#[test]
fn test_registry_instances_are_independent() {
    struct CountingSink(std::sync::atomic::AtomicUsize);

    impl AlertSink for CountingSink {
        fn deliver(&self, _event: &AlertEvent) -> Result<(), DeliveryError> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        }
    }

    let mut registry = SpeedometerRegistry::new();
    let sink = CountingSink(Default::default());
    let cfg = config(1, 30.0, 1, true);

    for bar in bars_with_gaps(&[gap_for(20), gap_for(40)]) {
        registry
            .get_or_start("ES", &cfg)
            .unwrap()
            .on_bar_with_sink(&bar, &sink)
            .unwrap();
    }
    // NQ only sees slow bars
    for bar in bars_with_gaps(&[gap_for(20), gap_for(20)]) {
        registry
            .get_or_start("NQ", &cfg)
            .unwrap()
            .on_bar_with_sink(&bar, &sink)
            .unwrap();
    }

    assert_eq!(registry.len(), 2);
    assert_eq!(sink.0.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(registry.get("ES", &cfg).unwrap().alert_state().bars_since_last_alert, 0);
    assert_eq!(registry.get("NQ", &cfg).unwrap().alert_state().bars_since_last_alert, 2);
}
