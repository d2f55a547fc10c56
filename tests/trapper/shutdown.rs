use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use collector_bridge::trapper::{Envelope, Reply, SendError, Transport};
use collector_bridge::{CollectorTrapper, SenderStats, Trapper, WorkerState};

use crate::support::FakeCollector;

#[test]
fn stop_drains_everything_already_queued() {
    let collector = FakeCollector::start(b"OK");
    let trapper = CollectorTrapper::start(collector.config("h1")).unwrap();

    for i in 0..25 {
        trapper.send("burst", &i.to_string());
    }
    // No waiting: stop must still deliver the whole burst.
    let stats = trapper.shutdown();

    assert_eq!(stats.sent, 25);
    assert_eq!(collector.received().len(), 25);
    assert_eq!(trapper.pending(), 0);
    assert_eq!(trapper.state(), WorkerState::Terminated);
}

#[test]
fn stop_is_idempotent() {
    let collector = FakeCollector::start(b"OK");
    let trapper = CollectorTrapper::start(collector.config("h1")).unwrap();
    trapper.send("k", "v");

    let first = trapper.shutdown();
    let second = trapper.shutdown();
    trapper.stop();

    assert_eq!(first.sent, 1);
    assert_eq!(second, SenderStats::default());
    assert_eq!(collector.received().len(), 1);
}

#[test]
fn items_sent_after_stop_stay_queued() {
    let collector = FakeCollector::start(b"OK");
    let trapper = CollectorTrapper::start(collector.config("h1")).unwrap();
    trapper.stop();

    trapper.send("late", "1");

    assert_eq!(trapper.pending(), 1);
    assert!(collector
        .wait_for(1, Duration::from_millis(100))
        .is_empty());
}

#[test]
fn idle_worker_stops_promptly() {
    let collector = FakeCollector::start(b"OK");
    let trapper = CollectorTrapper::start(collector.config("h1")).unwrap();
    assert_eq!(trapper.state(), WorkerState::Running);

    let stats = trapper.shutdown();

    assert_eq!(stats, SenderStats::default());
    assert_eq!(collector.connections(), 0);
}

/// Holds every transmit until the test releases it.
struct GatedTransport {
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl Transport for GatedTransport {
    fn transmit(&self, _envelope: &Envelope) -> Result<Reply, SendError> {
        let _ = self.entered.lock().unwrap().send(());
        let _ = self
            .release
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(5));
        Ok(Reply::new(&b"OK"[..]))
    }

    fn destination(&self) -> String {
        "gated".to_string()
    }
}

#[test]
fn state_is_observable_while_shutdown_drains() {
    let (entered_tx, entered_rx) = channel();
    let (release_tx, release_rx) = channel();
    let transport = GatedTransport {
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    };
    let trapper = Arc::new(CollectorTrapper::with_transport("h1", transport).unwrap());

    trapper.send("first", "1");
    trapper.send("second", "2");
    entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();

    let stopper = {
        let trapper = Arc::clone(&trapper);
        thread::spawn(move || trapper.shutdown())
    };

    let deadline = Instant::now() + Duration::from_secs(2);
    let observed = loop {
        let asked = Instant::now();
        let state = trapper.state();
        assert!(
            asked.elapsed() < Duration::from_millis(500),
            "state() waited for the shutdown"
        );
        if state != WorkerState::Running {
            break state;
        }
        assert!(Instant::now() < deadline, "stop was never signalled");
        thread::sleep(Duration::from_millis(5));
    };
    assert!(
        matches!(observed, WorkerState::Stopping | WorkerState::Draining),
        "observed {}",
        observed
    );

    release_tx.send(()).unwrap();
    release_tx.send(()).unwrap();
    let stats = stopper.join().unwrap();

    assert_eq!(stats.acknowledged, 2);
    assert_eq!(trapper.state(), WorkerState::Terminated);
}
