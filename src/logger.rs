//! Utilities for logging sweep statistics.
use std::sync::{Arc, Mutex};
use std::thread;
use std::thread::{sleep, JoinHandle};
use std::time::Duration;

use log::info;

use crate::sweep::SweepStatistics;

/// Periodically log the statistics of a running sweep from a background thread.
pub struct StatisticsLogger {
    handle: JoinHandle<()>,
    stopped: Arc<Mutex<bool>>,
}

impl StatisticsLogger {
    pub fn new(label: String, statistics: Arc<Mutex<SweepStatistics>>, interval: Duration) -> Self {
        let stopped = Arc::new(Mutex::new(false));
        let stopped_thr = stopped.clone();
        let handle = thread::spawn(move || {
            let log = || info!("{} {}", label, statistics.lock().unwrap());
            let refresh = Duration::from_millis(100);
            let mut elapsed = Duration::from_millis(0);
            while !*stopped_thr.lock().unwrap() {
                sleep(refresh);
                elapsed += refresh;
                if elapsed >= interval {
                    log();
                    elapsed = Duration::from_millis(0);
                }
            }
        });
        Self { stopped, handle }
    }

    pub fn stop(self) {
        *self.stopped.lock().unwrap() = true;
        self.handle.join().unwrap();
    }
}
