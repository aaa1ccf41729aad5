//! End-to-end tests driving the public pipeline one poll at a time.

use std::collections::VecDeque;

use gesturewatch::config::{FEATURE_LEN, GESTURES, WINDOW_LEN};
use gesturewatch::trigger::{TriggerDetector, TriggerState};
use gesturewatch::window::CollectorState;
use gesturewatch::{
    Acceleration, AngularRate, ClassificationEmitter, InferenceEngine, InferenceError,
    MotionSource, Pipeline, PipelineError, RawEmitter, RawSample, ReplaySource, Step,
};

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// One sensor poll: which halves report ready, and whether reads fail.
#[derive(Clone, Copy, Default)]
struct Tick {
    accel: Option<Acceleration>,
    gyro: Option<AngularRate>,
    fault: bool,
}

impl Tick {
    fn paired(s: RawSample) -> Self {
        Self {
            accel: Some(s.accel),
            gyro: Some(s.gyro),
            fault: false,
        }
    }

    fn accel_only(a: Acceleration) -> Self {
        Self {
            accel: Some(a),
            ..Self::default()
        }
    }
}

/// Each `acceleration_ready` call starts the next scripted tick.
struct ScriptedSource {
    ticks: VecDeque<Tick>,
    current: Tick,
}

impl ScriptedSource {
    fn new(ticks: impl IntoIterator<Item = Tick>) -> Self {
        Self {
            ticks: ticks.into_iter().collect(),
            current: Tick::default(),
        }
    }
}

impl MotionSource for ScriptedSource {
    type Error = String;

    fn acceleration_ready(&mut self) -> bool {
        self.current = self.ticks.pop_front().unwrap_or_default();
        self.current.accel.is_some()
    }

    fn read_acceleration(&mut self) -> Result<Acceleration, String> {
        match self.current {
            Tick { fault: true, .. } => Err("bus error".into()),
            Tick { accel: Some(a), .. } => Ok(a),
            _ => Err("accelerometer not ready".into()),
        }
    }

    fn gyroscope_ready(&mut self) -> bool {
        self.current.gyro.is_some()
    }

    fn read_gyroscope(&mut self) -> Result<AngularRate, String> {
        match self.current {
            Tick { fault: true, .. } => Err("bus error".into()),
            Tick { gyro: Some(g), .. } => Ok(g),
            _ => Err("gyroscope not ready".into()),
        }
    }
}

/// Records every input vector and answers with fixed scores.
struct RecordingEngine {
    input_len: usize,
    calls: Vec<Vec<f32>>,
    fail: bool,
}

impl RecordingEngine {
    fn new(input_len: usize) -> Self {
        Self {
            input_len,
            calls: Vec::new(),
            fail: false,
        }
    }
}

impl InferenceEngine for RecordingEngine {
    fn labels(&self) -> &[&'static str] {
        &GESTURES
    }

    fn input_len(&self) -> usize {
        self.input_len
    }

    fn invoke(&mut self, input: &[f32]) -> Result<Vec<f32>, InferenceError> {
        self.calls.push(input.to_vec());
        if self.fail {
            return Err(InferenceError::Invoke(-4));
        }
        Ok(vec![0.25, 0.75])
    }
}

fn spike() -> Acceleration {
    Acceleration::new(3.0, 0.0, 0.0)
}

fn rest() -> RawSample {
    RawSample::default()
}

fn drain<S: MotionSource, R: gesturewatch::Emitter, const N: usize>(
    pipeline: &mut Pipeline<S, R, N>,
    polls: usize,
) -> Vec<Step> {
    (0..polls).map(|_| pipeline.step().unwrap()).collect()
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

#[test]
fn quiet_readings_leave_everything_idle() {
    let ticks = [
        Acceleration::new(0.0, 0.0, 1.0),
        Acceleration::new(-1.2, 0.6, 0.69),
        Acceleration::new(0.0, -2.4999, 0.0),
    ]
    .map(Tick::accel_only);
    let mut p: Pipeline<_, _, 4> = Pipeline::new(
        ScriptedSource::new(ticks),
        RawEmitter::new(Vec::new()),
        TriggerDetector::new(2.5),
    );

    for step in drain(&mut p, 3) {
        assert_eq!(step, Step::Quiet);
        assert_eq!(p.trigger_state(), TriggerState::Armed);
        assert_eq!(p.collector_state(), CollectorState::Idle);
    }
}

#[test]
fn spike_while_idle_starts_empty_window() {
    let mut p: Pipeline<_, _, 4> = Pipeline::new(
        ScriptedSource::new([Tick::accel_only(Acceleration::new(1.0, 1.0, 1.0))]),
        RawEmitter::new(Vec::new()),
        TriggerDetector::new(2.5),
    );

    assert_eq!(p.step().unwrap(), Step::Triggered);
    assert_eq!(p.collector_state(), CollectorState::Filling { count: 0 });
    assert_eq!(p.trigger_state(), TriggerState::Fired);
}

#[test]
fn threshold_is_inclusive() {
    let mut p: Pipeline<_, _, 4> = Pipeline::new(
        ScriptedSource::new([Tick::accel_only(Acceleration::new(1.0, -1.0, 0.5))]),
        RawEmitter::new(Vec::new()),
        TriggerDetector::new(2.5),
    );

    assert_eq!(p.step().unwrap(), Step::Triggered);
}

#[test]
fn no_accel_data_is_just_waiting() {
    let mut p: Pipeline<_, _, 4> = Pipeline::new(
        ScriptedSource::new([]),
        RawEmitter::new(Vec::new()),
        TriggerDetector::default(),
    );

    assert!(drain(&mut p, 5).iter().all(|s| *s == Step::Waiting));
    assert_eq!(p.collector_state(), CollectorState::Idle);
}

// ---------------------------------------------------------------------------
// Window filling
// ---------------------------------------------------------------------------

#[test]
fn spikes_during_capture_do_not_retrigger() {
    let spike_sample = RawSample::new(spike(), AngularRate::default());
    let ticks = [
        Tick::accel_only(spike()),
        Tick::paired(spike_sample),
        Tick::paired(spike_sample),
    ];
    let mut p: Pipeline<_, _, 3> = Pipeline::new(
        ScriptedSource::new(ticks),
        RawEmitter::new(Vec::new()),
        TriggerDetector::default(),
    );

    assert_eq!(
        drain(&mut p, 3),
        vec![
            Step::Triggered,
            Step::Sampled { count: 1 },
            Step::Sampled { count: 2 }
        ]
    );
    assert_eq!(p.collector_state(), CollectorState::Filling { count: 2 });
}

#[test]
fn unpaired_ticks_are_skipped() {
    let half_gyro = Tick {
        gyro: Some(AngularRate::new(5.0, 0.0, 0.0)),
        ..Tick::default()
    };
    let ticks = [
        Tick::accel_only(spike()),
        Tick::accel_only(Acceleration::new(0.1, 0.0, 0.0)),
        half_gyro,
        Tick::paired(rest()),
    ];
    let mut p: Pipeline<_, _, 3> = Pipeline::new(
        ScriptedSource::new(ticks),
        RawEmitter::new(Vec::new()),
        TriggerDetector::default(),
    );

    assert_eq!(
        drain(&mut p, 4),
        vec![
            Step::Triggered,
            Step::Waiting,
            Step::Waiting,
            Step::Sampled { count: 1 }
        ]
    );
}

#[test]
fn read_fault_drops_the_poll() {
    let faulty = Tick {
        fault: true,
        ..Tick::paired(rest())
    };
    let ticks = [Tick::accel_only(spike()), faulty, Tick::paired(rest())];
    let mut p: Pipeline<_, _, 3> = Pipeline::new(
        ScriptedSource::new(ticks),
        RawEmitter::new(Vec::new()),
        TriggerDetector::default(),
    );

    assert_eq!(
        drain(&mut p, 3),
        vec![Step::Triggered, Step::Waiting, Step::Sampled { count: 1 }]
    );
}

#[test]
fn silent_sensor_stalls_in_filling() {
    let mut p: Pipeline<_, _, 3> = Pipeline::new(
        ScriptedSource::new([Tick::accel_only(spike()), Tick::paired(rest())]),
        RawEmitter::new(Vec::new()),
        TriggerDetector::default(),
    );
    drain(&mut p, 2);

    for _ in 0..100 {
        assert_eq!(p.step().unwrap(), Step::Waiting);
    }
    assert_eq!(p.collector_state(), CollectorState::Filling { count: 1 });
    assert_eq!(p.gestures(), 0);
}

#[test]
fn completed_window_rearms_for_next_gesture() {
    let mut ticks = vec![Tick::accel_only(spike())];
    ticks.extend(std::iter::repeat(Tick::paired(rest())).take(2));
    ticks.push(Tick::accel_only(Acceleration::new(0.0, 0.0, 1.0)));
    ticks.push(Tick::accel_only(spike()));
    let mut p: Pipeline<_, _, 2> = Pipeline::new(
        ScriptedSource::new(ticks),
        RawEmitter::new(Vec::new()),
        TriggerDetector::default(),
    );

    let steps = drain(&mut p, 5);
    assert!(matches!(steps[2], Step::Completed(_)));
    assert_eq!(p.gestures(), 1);
    assert_eq!(steps[3], Step::Quiet);
    assert_eq!(steps[4], Step::Triggered);
    assert_eq!(p.collector_state(), CollectorState::Filling { count: 0 });
}

// ---------------------------------------------------------------------------
// Classification mode
// ---------------------------------------------------------------------------

#[test]
fn full_window_of_rest_is_classified_once() {
    let mut rows = vec![RawSample::new(spike(), AngularRate::default())];
    rows.extend(std::iter::repeat(rest()).take(WINDOW_LEN));

    let emitter = ClassificationEmitter::new(RecordingEngine::new(FEATURE_LEN), Vec::new());
    let mut p: Pipeline<_, _> =
        Pipeline::new(ReplaySource::new(rows), emitter, TriggerDetector::default());
    p.start().unwrap();

    let mut completed = Vec::new();
    while !p.source().is_exhausted() {
        if let Step::Completed(v) = p.step().unwrap() {
            completed.push(v);
        }
    }

    assert_eq!(completed.len(), 1);
    let features = &completed[0];
    assert_eq!(features.len(), 714);
    assert!(features.as_slice().iter().all(|&v| v == 0.5));

    let engine = p.emitter().engine();
    assert_eq!(engine.calls.len(), 1);
    assert_eq!(engine.calls[0], features.as_slice());
    assert_eq!(p.collector_state(), CollectorState::Idle);

    let (_, emitter) = p.into_parts();
    let text = String::from_utf8(emitter.into_inner()).unwrap();
    assert_eq!(text, "punch: 0.250000\nflex: 0.750000\n\n");
}

#[test]
fn partial_window_is_never_classified() {
    let mut rows = vec![RawSample::new(spike(), AngularRate::default())];
    rows.extend(std::iter::repeat(rest()).take(2));

    let emitter = ClassificationEmitter::new(RecordingEngine::new(18), Vec::new());
    let mut p: Pipeline<_, _, 3> =
        Pipeline::new(ReplaySource::new(rows), emitter, TriggerDetector::default());
    while !p.source().is_exhausted() {
        p.step().unwrap();
    }

    assert!(p.emitter().engine().calls.is_empty());
    assert_eq!(p.collector_state(), CollectorState::Filling { count: 2 });
    let (_, emitter) = p.into_parts();
    assert!(emitter.into_inner().is_empty());
}

#[test]
fn inference_failure_is_fatal_and_silent() {
    let mut engine = RecordingEngine::new(12);
    engine.fail = true;
    let emitter = ClassificationEmitter::new(engine, Vec::new());
    let rows = vec![RawSample::new(spike(), AngularRate::default()), rest(), rest()];
    let mut p: Pipeline<_, _, 2> =
        Pipeline::new(ReplaySource::new(rows), emitter, TriggerDetector::default());

    assert_eq!(p.step().unwrap(), Step::Triggered);
    assert_eq!(p.step().unwrap(), Step::Sampled { count: 1 });
    match p.step() {
        Err(PipelineError::Inference(InferenceError::Invoke(code))) => assert_eq!(code, -4),
        other => panic!("expected inference failure, got {:?}", other),
    }

    let (_, emitter) = p.into_parts();
    assert!(emitter.into_inner().is_empty());
}

// ---------------------------------------------------------------------------
// Raw capture mode
// ---------------------------------------------------------------------------

#[test]
fn raw_mode_streams_samples_then_separator() {
    let rows = vec![
        RawSample::new(spike(), AngularRate::default()),
        RawSample::from_channels([1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
        RawSample::from_channels([0.0, 1.0, 0.0, 0.0, 0.0, 0.0]),
        RawSample::from_channels([0.0, 0.0, 1.0, 0.0, 0.0, 0.0]),
    ];
    let mut p: Pipeline<_, _, 3> = Pipeline::new(
        ReplaySource::new(rows),
        RawEmitter::new(Vec::new()),
        TriggerDetector::default(),
    );
    p.start().unwrap();

    let steps = drain(&mut p, 4);
    match &steps[3] {
        Step::Completed(v) => {
            assert_eq!(v.sample(0), Some(&[0.625, 0.5, 0.5, 0.5, 0.5, 0.5][..]));
            assert_eq!(v.sample(2), Some(&[0.5, 0.5, 0.625, 0.5, 0.5, 0.5][..]));
        }
        other => panic!("expected completed window, got {:?}", other),
    }

    let (_, emitter) = p.into_parts();
    let text = String::from_utf8(emitter.into_inner()).unwrap();
    assert_eq!(
        text,
        "aX,aY,aZ,gX,gY,gZ\n\
         1.000,0.000,0.000,0.000,0.000,0.000\n\
         0.000,1.000,0.000,0.000,0.000,0.000\n\
         0.000,0.000,1.000,0.000,0.000,0.000\n\
         \n"
    );
}

#[test]
fn raw_mode_separates_consecutive_gestures() {
    let rows = vec![
        RawSample::new(spike(), AngularRate::default()),
        RawSample::from_channels([1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
        RawSample::from_channels([0.0, 1.0, 0.0, 0.0, 0.0, 0.0]),
        RawSample::from_channels([0.0, 0.0, 1.0, 0.0, 0.0, 0.0]),
        RawSample::new(spike(), AngularRate::default()),
        RawSample::from_channels([0.0, 0.0, 0.0, 10.0, 0.0, 0.0]),
        RawSample::from_channels([0.0, 0.0, 0.0, 0.0, -20.5, 0.0]),
    ];
    let mut p: Pipeline<_, _, 2> = Pipeline::new(
        ReplaySource::new(rows),
        RawEmitter::new(Vec::new()),
        TriggerDetector::default(),
    );
    p.start().unwrap();

    let steps = drain(&mut p, 7);
    assert!(matches!(steps[2], Step::Completed(_)));
    assert_eq!(steps[3], Step::Quiet);
    assert_eq!(steps[4], Step::Triggered);
    assert!(matches!(steps[6], Step::Completed(_)));
    assert_eq!(p.gestures(), 2);
    assert_eq!(p.source().remaining(), 0);

    let (_, emitter) = p.into_parts();
    let text = String::from_utf8(emitter.into_inner()).unwrap();
    assert_eq!(
        text,
        "aX,aY,aZ,gX,gY,gZ\n\
         1.000,0.000,0.000,0.000,0.000,0.000\n\
         0.000,1.000,0.000,0.000,0.000,0.000\n\
         \n\
         0.000,0.000,0.000,10.000,0.000,0.000\n\
         0.000,0.000,0.000,0.000,-20.500,0.000\n\
         \n"
    );
}
