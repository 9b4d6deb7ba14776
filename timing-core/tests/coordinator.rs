mod common;

use common::{Clock, MemoryLog, Press, hardware};
use embassy_futures::block_on;
use embedded_hal::i2c::ErrorKind;
use timing_core::{
    CancelToken, Classification, LogWriter, RtcError, Termination, TimingCoordinator, TrialError,
};

#[test]
fn logs_each_trial_until_cancelled() {
    let clock = Clock::default();
    let cancel = CancelToken::new();
    let presses = [
        Press::bouncy(1_000, 1_200),
        Press::bouncy(16_000, 16_200),
        Press::clean(20_000, 20_100),
        Press::clean(34_500, 34_600),
    ];
    let mut hw = hardware(&clock, &presses, (10, 0, 0), &cancel, 40_000);
    let store = MemoryLog::default();
    let lines = store.lines.clone();
    let mut log = LogWriter::new(store);
    let mut coordinator = TimingCoordinator::default();

    let termination = block_on(coordinator.run(&mut hw, &mut log, &cancel));

    assert_eq!(termination, Termination::Cancelled);
    let lines = lines.borrow();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "Essai 1: 15.00 secondes (debut=2024-01-01 10:00:01, fin=2024-01-01 10:00:16)\n"
    );
    assert!(lines[1].starts_with("Essai 2: 14.00 secondes"));
    assert_eq!(coordinator.next_index(), 3);
}

#[test]
fn missing_rtc_stops_before_any_trial() {
    let clock = Clock::default();
    let cancel = CancelToken::new();
    let mut hw = hardware(&clock, &[Press::clean(100, 200)], (10, 0, 0), &cancel, u64::MAX);
    hw.i2c.present = false;
    let pin_reads = hw.button.reads.clone();
    let store = MemoryLog::default();
    let attempts = store.attempts.clone();
    let mut log = LogWriter::new(store);

    let termination = block_on(TimingCoordinator::default().run(&mut hw, &mut log, &cancel));

    assert_eq!(termination, Termination::RtcNotFound);
    assert_eq!(pin_reads.get(), 0);
    assert_eq!(attempts.get(), 0);
    assert_eq!(clock.now_ms(), 0);
}

#[test]
fn log_failure_does_not_stop_the_loop() {
    let clock = Clock::default();
    let cancel = CancelToken::new();
    let presses = [
        Press::clean(1_000, 1_100),
        Press::clean(16_000, 16_100),
        Press::clean(20_000, 20_100),
        Press::clean(35_000, 35_100),
    ];
    let mut hw = hardware(&clock, &presses, (8, 30, 0), &cancel, 40_000);
    let store = MemoryLog {
        fail: true,
        ..Default::default()
    };
    let attempts = store.attempts.clone();
    let lines = store.lines.clone();
    let mut log = LogWriter::new(store);
    let mut coordinator = TimingCoordinator::default();

    let termination = block_on(coordinator.run(&mut hw, &mut log, &cancel));

    assert_eq!(termination, Termination::Cancelled);
    assert_eq!(attempts.get(), 2);
    assert!(lines.borrow().is_empty());
    assert_eq!(coordinator.next_index(), 3);
}

#[test]
fn bus_failure_ends_the_run() {
    let clock = Clock::default();
    let cancel = CancelToken::new();
    let mut hw = hardware(&clock, &[Press::clean(1_000, 1_100)], (10, 0, 0), &cancel, u64::MAX);
    hw.i2c.fail_register_reads = true;
    let store = MemoryLog::default();
    let attempts = store.attempts.clone();
    let mut log = LogWriter::new(store);

    let termination = block_on(TimingCoordinator::default().run(&mut hw, &mut log, &cancel));

    assert_eq!(termination, Termination::Rtc(RtcError::Bus(ErrorKind::ArbitrationLoss)));
    assert_eq!(attempts.get(), 0);
}

#[test]
fn cancel_between_presses_logs_nothing() {
    let clock = Clock::default();
    let cancel = CancelToken::new();
    let mut hw = hardware(&clock, &[Press::clean(1_000, 1_100)], (10, 0, 0), &cancel, 5_000);
    let register_reads = hw.i2c.register_reads.clone();
    let store = MemoryLog::default();
    let attempts = store.attempts.clone();
    let mut log = LogWriter::new(store);

    let termination = block_on(TimingCoordinator::default().run(&mut hw, &mut log, &cancel));

    assert_eq!(termination, Termination::Cancelled);
    // Start time was read, the trial never finished.
    assert_eq!(register_reads.get(), 1);
    assert_eq!(attempts.get(), 0);
}

#[test]
fn trial_across_midnight() {
    let clock = Clock::default();
    let cancel = CancelToken::new();
    let presses = [Press::clean(1_000, 1_100), Press::clean(16_000, 16_100)];
    let mut hw = hardware(&clock, &presses, (23, 59, 50), &cancel, u64::MAX);

    let record = block_on(TimingCoordinator::default().run_trial(&mut hw, &cancel, 7)).unwrap();

    assert_eq!(record.index, 7);
    assert_eq!(record.start.to_string(), "2024-01-01 23:59:51");
    assert_eq!(record.end.to_string(), "2024-01-02 00:00:06");
    assert_eq!(record.duration_secs, 15.0);
    assert_eq!(record.classification, Classification::Excellent);
}

#[test]
fn start_is_read_before_end() {
    let clock = Clock::default();
    let cancel = CancelToken::new();
    let presses = [Press::clean(500, 600), Press::clean(3_000, 3_100)];
    let mut hw = hardware(&clock, &presses, (12, 0, 0), &cancel, u64::MAX);

    let record = block_on(TimingCoordinator::default().run_trial(&mut hw, &cancel, 1)).unwrap();

    assert!(record.start.seconds_since_midnight() < record.end.seconds_since_midnight());
    assert_eq!(record.duration_secs, 3.0);
    assert_eq!(record.classification, Classification::Retry);
}

#[test]
fn run_trial_reports_cancellation() {
    let clock = Clock::default();
    let cancel = CancelToken::new();
    let mut hw = hardware(&clock, &[], (12, 0, 0), &cancel, 1_000);

    let result = block_on(TimingCoordinator::default().run_trial(&mut hw, &cancel, 1));

    assert_eq!(result, Err(TrialError::Cancelled));
}
