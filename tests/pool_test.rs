use drover::prelude::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

fn pool_with(n: usize) -> WorkerPool {
    let config = Config::builder().num_threads(n).build().unwrap();
    WorkerPool::new(&config).unwrap()
}

#[test]
fn fifo_order_with_single_worker() {
    let mut pool = pool_with(1);
    let order = Arc::new(Mutex::new(Vec::new()));

    for i in 0..100 {
        let order = order.clone();
        pool.submit(move || order.lock().push(i)).unwrap();
    }

    pool.shutdown(ShutdownMode::Graceful).unwrap();

    let order = order.lock();
    assert_eq!(*order, (0..100).collect::<Vec<_>>());
}

#[test]
fn each_task_executes_exactly_once() {
    let mut pool = pool_with(4);
    let slots: Arc<Vec<AtomicUsize>> =
        Arc::new((0..50).map(|_| AtomicUsize::new(0)).collect());

    for i in 0..50 {
        let slots = slots.clone();
        pool.submit(move || {
            slots[i].fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }

    pool.shutdown(ShutdownMode::Graceful).unwrap();

    for (i, slot) in slots.iter().enumerate() {
        assert_eq!(slot.load(Ordering::SeqCst), 1, "task {} ran a wrong number of times", i);
    }
}

#[test]
fn no_lost_wakeup_on_idle_pool() {
    let mut pool = pool_with(4);

    // let every worker reach the condvar
    std::thread::sleep(Duration::from_millis(100));

    let (tx, rx) = mpsc::channel();
    pool.submit(move || {
        tx.send(()).unwrap();
    })
    .unwrap();

    // a lost wakeup would leave the task queued until shutdown
    rx.recv_timeout(Duration::from_secs(2))
        .expect("task was not picked up by any worker");

    pool.shutdown(ShutdownMode::Graceful).unwrap();
}

#[test]
fn graceful_shutdown_drains_everything() {
    let mut pool = pool_with(2);
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..200 {
        let counter = counter.clone();
        pool.submit(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }

    pool.shutdown(ShutdownMode::Graceful).unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 200);
    assert_eq!(pool.queue_len(), 0);
    assert!(matches!(pool.submit(|| {}), Err(Error::PoolClosed)));
}

#[test]
fn immediate_shutdown_discards_remainder() {
    let mut pool = pool_with(1);
    let executed = Arc::new(AtomicUsize::new(0));

    // first task holds the only worker until we let it go
    let (started_tx, started_rx) = mpsc::channel();
    let (gate_tx, gate_rx) = mpsc::channel::<()>();
    {
        let executed = executed.clone();
        pool.submit(move || {
            started_tx.send(()).unwrap();
            let _ = gate_rx.recv();
            executed.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }

    for _ in 0..9 {
        let executed = executed.clone();
        pool.submit(move || {
            executed.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }

    // worker is now inside the first task; the other 9 are still queued
    started_rx.recv_timeout(Duration::from_secs(2)).unwrap();

    // release the gate only after shutdown has closed the queue
    let releaser = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        let _ = gate_tx.send(());
    });

    pool.shutdown(ShutdownMode::Immediate).unwrap();
    releaser.join().unwrap();

    // the running task finished; the queued ones never ran
    assert_eq!(executed.load(Ordering::SeqCst), 1);
    assert_eq!(pool.discarded_tasks(), 9);
}

#[test]
fn four_workers_ten_tasks_scenario() {
    let mut pool = pool_with(4);
    let results = Arc::new(Mutex::new(Vec::new()));

    for id in 0..10 {
        let results = results.clone();
        pool.submit(move || results.lock().push(id)).unwrap();
    }

    pool.shutdown(ShutdownMode::Graceful).unwrap();

    let mut results = results.lock().clone();
    results.sort_unstable();
    // every id exactly once; completion order is deliberately not asserted
    assert_eq!(results, (0..10).collect::<Vec<_>>());
}

#[test]
fn shutdown_is_one_shot() {
    let mut pool = pool_with(2);

    pool.shutdown(ShutdownMode::Graceful).unwrap();

    assert!(matches!(
        pool.shutdown(ShutdownMode::Graceful),
        Err(Error::AlreadyShutdown)
    ));
    assert!(matches!(
        pool.shutdown(ShutdownMode::Immediate),
        Err(Error::AlreadyShutdown)
    ));
}

#[test]
fn panicking_task_does_not_shrink_capacity() {
    let config = Config::builder()
        .num_threads(1)
        .panic_strategy(PanicStrategy::Isolate)
        .build()
        .unwrap();
    let mut pool = WorkerPool::new(&config).unwrap();

    let survived = Arc::new(AtomicUsize::new(0));

    for i in 0..10 {
        let survived = survived.clone();
        pool.submit(move || {
            if i % 2 == 0 {
                panic!("task {} failing on purpose", i);
            }
            survived.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }

    pool.shutdown(ShutdownMode::Graceful).unwrap();

    assert_eq!(survived.load(Ordering::SeqCst), 5);
    assert_eq!(pool.panic_count(), 5);

    let stats = pool.worker_stats();
    assert_eq!(stats[0].tasks_executed.load(Ordering::Relaxed), 10);
    assert_eq!(stats[0].tasks_panicked.load(Ordering::Relaxed), 5);
}

#[test]
fn workers_report_exiting_after_shutdown() {
    let mut pool = pool_with(3);
    pool.shutdown(ShutdownMode::Graceful).unwrap();

    for state in pool.worker_stats() {
        assert_eq!(state.phase(), drover::executor::WorkerPhase::Exiting);
    }
}

#[test]
fn worker_count_matches_config() {
    let pool = pool_with(3);
    assert_eq!(pool.num_threads(), 3);
    assert_eq!(pool.worker_stats().len(), 3);
}

#[cfg(feature = "telemetry")]
#[test]
fn metrics_track_pool_activity() {
    let mut pool = pool_with(2);

    for _ in 0..20 {
        pool.submit(|| {}).unwrap();
    }
    pool.shutdown(ShutdownMode::Graceful).unwrap();
    let _ = pool.submit(|| {});

    let snapshot = pool.metrics().unwrap().snapshot();
    assert_eq!(snapshot.tasks_submitted, 20);
    assert_eq!(snapshot.tasks_executed, 20);
    assert_eq!(snapshot.tasks_rejected, 1);
    assert_eq!(snapshot.tasks_panicked, 0);
}
