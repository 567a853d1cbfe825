use std::num::NonZeroUsize;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use matrix_mul::{Generator, Matrix, Mode};
use prodcons::{Error, Pipeline, Reporter, RunSummary, SilentReporter, Workers};

const DEADLOCK_TIMEOUT: Duration = Duration::from_secs(30);

fn nz(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

#[derive(Default)]
struct Recorder {
    consumed: Mutex<Vec<u64>>,
    multiplied: Mutex<Vec<(u64, u64, Matrix)>>,
}

impl Reporter for Recorder {
    fn multiplied(&self, lhs: &Matrix, rhs: &Matrix, product: &Matrix) {
        assert!(lhs.can_multiply(rhs));
        self.multiplied
            .lock()
            .unwrap()
            .push((lhs.id(), rhs.id(), product.clone()));
    }

    fn consumed(&self, matrix: &Matrix) {
        self.consumed.lock().unwrap().push(matrix.id());
    }
}

/// Runs a pipeline on a helper thread and fails the test if it does not
/// finish in time.
fn try_run_with_timeout<F, S>(
    capacity: usize,
    quota: usize,
    workers: Workers,
    source: F,
    reporter: Arc<dyn Reporter>,
) -> Result<RunSummary, Error>
where
    F: FnMut(usize) -> S + Send + 'static,
    S: FnMut() -> Matrix + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = Pipeline::new(nz(capacity), quota).run(workers, source, reporter);
        tx.send(result).unwrap();
    });

    rx.recv_timeout(DEADLOCK_TIMEOUT)
        .unwrap_or_else(|_| panic!("pipeline did not finish: capacity={capacity} quota={quota} {workers:?}"))
}

fn run_with_timeout<F, S>(
    capacity: usize,
    quota: usize,
    workers: Workers,
    source: F,
    reporter: Arc<dyn Reporter>,
) -> RunSummary
where
    F: FnMut(usize) -> S + Send + 'static,
    S: FnMut() -> Matrix + Send + 'static,
{
    try_run_with_timeout(capacity, quota, workers, source, reporter).unwrap()
}

type Source = Box<dyn FnMut() -> Matrix + Send>;

fn generated(mode: Mode) -> impl FnMut(usize) -> Source + Send {
    move |i: usize| -> Source {
        let mut generator = Generator::seeded(mode, 1000 + i as u64);
        Box::new(move || generator.generate())
    }
}

fn cycling(shapes: Vec<Matrix>) -> impl FnMut(usize) -> Source + Send {
    move |_: usize| -> Source {
        let shapes = shapes.clone();
        let mut next = 0;
        Box::new(move || {
            let m = shapes[next % shapes.len()].clone();
            next += 1;
            m
        })
    }
}

fn filled(rows: usize, cols: usize, value: i32) -> Matrix {
    Matrix::new(rows, cols, vec![value; rows * cols]).unwrap()
}

/// Reporter that fails on the first product it is shown.
struct FailingReporter;

impl Reporter for FailingReporter {
    fn multiplied(&self, _lhs: &Matrix, _rhs: &Matrix, _product: &Matrix) {
        panic!("reporter failed");
    }
}

#[test]
fn test_single_slot_alternation() {
    let recorder = Arc::new(Recorder::default());
    let summary = run_with_timeout(
        1,
        4,
        Workers::pairs(nz(1)),
        generated(Mode::Random),
        recorder.clone(),
    );

    assert_eq!(summary.producer.matrixtotal, 4);
    assert_eq!(summary.consumer.matrixtotal, 4);
    assert_eq!(summary.high_water, 1);
    assert_eq!(summary.leftover, 0);
    assert!(summary.is_conserved());
    assert_eq!(*recorder.consumed.lock().unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn test_stress_conservation() {
    let summary = run_with_timeout(
        10,
        100,
        Workers::pairs(nz(4)),
        generated(Mode::Random),
        Arc::new(SilentReporter),
    );

    assert_eq!(summary.producer.matrixtotal, 100);
    assert_eq!(summary.consumer.matrixtotal, 100);
    assert_eq!(summary.producer.sumtotal, summary.consumer.sumtotal);
    assert!(summary.high_water <= 10);
    assert_eq!(summary.leftover, 0);
}

#[test]
fn test_square_mode_pairs_on_first_attempt() {
    let workers = Workers {
        producers: nz(3),
        consumers: nz(1),
    };
    let summary = run_with_timeout(
        8,
        200,
        workers,
        generated(Mode::from_number(3)),
        Arc::new(SilentReporter),
    );

    assert_eq!(summary.consumer.matrixtotal, 200);
    assert_eq!(summary.consumer.multtotal, summary.consumer.matrixtotal / 2);
}

#[test]
fn test_square_mode_many_consumers_leave_at_most_one_unpaired_each() {
    let consumers = 4;
    let summary = run_with_timeout(
        8,
        200,
        Workers::pairs(nz(consumers)),
        generated(Mode::from_number(2)),
        Arc::new(SilentReporter),
    );

    let paired = summary.consumer.multtotal * 2;
    assert_eq!(summary.consumer.matrixtotal, 200);
    assert!(paired <= 200);
    assert!(200 - paired <= consumers);
    assert!(summary.is_conserved());
}

#[test]
fn test_no_double_dispatch() {
    let recorder = Arc::new(Recorder::default());
    let quota = 300;
    let summary = run_with_timeout(
        5,
        quota,
        Workers::pairs(nz(4)),
        generated(Mode::Random),
        recorder.clone(),
    );

    let mut ids = recorder.consumed.lock().unwrap().clone();
    ids.sort_unstable();
    assert_eq!(ids, (0..quota as u64).collect::<Vec<_>>());
    assert!(summary.is_conserved());

    let multiplied = recorder.multiplied.lock().unwrap();
    assert_eq!(multiplied.len(), summary.consumer.multtotal);
    let mut operands: Vec<u64> = multiplied.iter().flat_map(|(l, r, _)| [*l, *r]).collect();
    operands.sort_unstable();
    operands.dedup();
    assert_eq!(operands.len(), multiplied.len() * 2);
}

#[test]
fn test_incompatible_matrices_are_discarded() {
    let first = filled(2, 3, 1);
    let misfit = filled(2, 2, 2);
    let partner = filled(3, 1, 3);
    let recorder = Arc::new(Recorder::default());

    let summary = run_with_timeout(
        2,
        3,
        Workers::pairs(nz(1)),
        cycling(vec![first, misfit, partner]),
        recorder.clone(),
    );

    assert_eq!(summary.consumer.matrixtotal, 3);
    assert_eq!(summary.consumer.multtotal, 1);
    assert!(summary.is_conserved());

    let multiplied = recorder.multiplied.lock().unwrap();
    let (lhs, rhs, product) = &multiplied[0];
    assert_eq!((*lhs, *rhs), (0, 2));
    assert_eq!((product.rows(), product.cols()), (2, 1));
    assert_eq!(product.get(0, 0), Some(9));
    assert_eq!(product.get(1, 0), Some(9));
}

#[test]
fn test_never_compatible_still_terminates() {
    let summary = run_with_timeout(
        3,
        50,
        Workers::pairs(nz(2)),
        cycling(vec![filled(2, 3, 1)]),
        Arc::new(SilentReporter),
    );

    assert_eq!(summary.consumer.multtotal, 0);
    assert_eq!(summary.consumer.matrixtotal, 50);
    assert!(summary.is_conserved());
}

#[test]
fn test_unpaired_trailing_matrix_is_counted_as_consumed() {
    let summary = run_with_timeout(
        4,
        5,
        Workers::pairs(nz(1)),
        generated(Mode::from_number(2)),
        Arc::new(SilentReporter),
    );

    assert_eq!(summary.producer.matrixtotal, 5);
    assert_eq!(summary.consumer.matrixtotal, 5);
    assert_eq!(summary.consumer.multtotal, 2);
    assert!(summary.is_conserved());
}

#[test]
fn test_zero_quota() {
    let summary = run_with_timeout(
        1,
        0,
        Workers::pairs(nz(2)),
        generated(Mode::Random),
        Arc::new(SilentReporter),
    );

    assert_eq!(summary.producer.matrixtotal, 0);
    assert_eq!(summary.consumer.matrixtotal, 0);
    assert_eq!(summary.high_water, 0);
}

#[test]
fn test_uneven_worker_counts() {
    for (producers, consumers) in [(1, 6), (6, 1), (2, 5)] {
        let workers = Workers {
            producers: nz(producers),
            consumers: nz(consumers),
        };
        let summary = run_with_timeout(2, 97, workers, generated(Mode::Random), Arc::new(SilentReporter));

        assert_eq!(summary.producer.matrixtotal, 97);
        assert!(summary.is_conserved());
        assert!(summary.high_water <= 2);
    }
}

#[test]
fn test_consumer_panic_stops_the_run() {
    let result = try_run_with_timeout(
        1,
        100,
        Workers::pairs(nz(1)),
        generated(Mode::from_number(2)),
        Arc::new(FailingReporter),
    );

    match result {
        Err(Error::WorkerPanicked(name)) => assert_eq!(name, "consumer-0"),
        other => panic!("expected a panicked consumer, got {other:?}"),
    }
}

#[test]
fn test_consumer_panic_releases_other_workers() {
    let workers = Workers {
        producers: nz(3),
        consumers: nz(2),
    };
    let result = try_run_with_timeout(
        1,
        500,
        workers,
        generated(Mode::from_number(2)),
        Arc::new(FailingReporter),
    );

    match result {
        Err(Error::WorkerPanicked(name)) => assert!(name.starts_with("consumer-")),
        other => panic!("expected a panicked consumer, got {other:?}"),
    }
}

#[test]
fn test_producer_panic_stops_the_run() {
    let source = |i: usize| -> Source {
        let mut generator = Generator::seeded(Mode::Random, i as u64);
        let mut made = 0;
        Box::new(move || {
            made += 1;
            if made > 3 {
                panic!("source exhausted");
            }
            generator.generate()
        })
    };

    let result = try_run_with_timeout(
        2,
        100,
        Workers::pairs(nz(1)),
        source,
        Arc::new(SilentReporter),
    );

    match result {
        Err(Error::WorkerPanicked(name)) => assert_eq!(name, "producer-0"),
        other => panic!("expected a panicked producer, got {other:?}"),
    }
}

#[test]
fn test_overflowing_products_are_discarded() {
    let summary = run_with_timeout(
        2,
        6,
        Workers::pairs(nz(1)),
        cycling(vec![filled(1, 1, i32::MAX), filled(1, 1, 2)]),
        Arc::new(SilentReporter),
    );

    assert_eq!(summary.consumer.matrixtotal, 6);
    assert_eq!(summary.consumer.multtotal, 0);
    assert!(summary.is_conserved());
}
