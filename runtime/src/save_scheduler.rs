// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

//! The deferred save to NVRAM.
//!
//! Any mutation expected to survive power cycles arms a single-slot two second timer; its expiry
//! posts one save request into the event loop. A new mutation cancels the pending slot before
//! re-arming, so a burst of mutations coalesces into one CONFIG_SAVE. Every arm and cancel bumps
//! a generation number, letting the event loop drop expiries which were overtaken.

use {
    super::*,
    std::{
        sync::{mpsc, Arc, Condvar, Mutex},
        thread,
        time::{Duration, Instant},
    },
};

const SAVE_DELAY: Duration = Duration::from_millis(2000);

#[derive(Default)]
struct SchedulerState {
    deadline: Option<Instant>,
    generation: u64,
    shutdown: bool,
}

#[derive(Default)]
struct SchedulerInner {
    state: Mutex<SchedulerState>,
    cvar: Condvar,
}

/// Cheap handle to arm and cancel the slot.
#[derive(Clone)]
pub struct SaveHandle {
    inner: Arc<SchedulerInner>,
}

impl SaveHandle {
    /// Cancel any pending slot and schedule a save after the quiescence delay.
    pub fn arm(&self) {
        let mut state = self.inner.state.lock().unwrap();
        state.generation += 1;
        state.deadline = Some(Instant::now() + SAVE_DELAY);
        self.inner.cvar.notify_all();
    }

    /// Cancel the pending slot. Whether one was pending is returned.
    pub fn cancel(&self) -> bool {
        let mut state = self.inner.state.lock().unwrap();
        let pending = state.deadline.take().is_some();
        state.generation += 1;
        self.inner.cvar.notify_all();
        pending
    }

    pub fn generation(&self) -> u64 {
        self.inner.state.lock().unwrap().generation
    }
}

/// Owner of the timer thread.
pub struct SaveScheduler {
    inner: Arc<SchedulerInner>,
    th: Option<thread::JoinHandle<()>>,
}

impl SaveScheduler {
    pub fn run(tx: mpsc::SyncSender<Event>) -> Self {
        let inner = Arc::new(SchedulerInner::default());

        let shared = Arc::clone(&inner);
        let th = thread::spawn(move || loop {
            let mut state = shared.state.lock().unwrap();
            if state.shutdown {
                break;
            }
            match state.deadline {
                None => {
                    let _unused = shared.cvar.wait(state);
                }
                Some(deadline) => {
                    let now = Instant::now();
                    if now < deadline {
                        let _unused = shared.cvar.wait_timeout(state, deadline - now);
                    } else {
                        state.deadline = None;
                        let generation = state.generation;
                        drop(state);
                        let _ = tx.send(Event::DeferredSave(generation));
                    }
                }
            }
        });

        Self {
            inner,
            th: Some(th),
        }
    }

    pub fn handle(&self) -> SaveHandle {
        SaveHandle {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Drop for SaveScheduler {
    fn drop(&mut self) {
        self.inner.state.lock().unwrap().shutdown = true;
        self.inner.cvar.notify_all();
        if let Some(th) = self.th.take() {
            let _ = th.join();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn burst_of_mutations_coalesces_into_one_expiry() {
        let (tx, rx) = mpsc::sync_channel(32);
        let scheduler = SaveScheduler::run(tx);
        let handle = scheduler.handle();

        (0..3).for_each(|_| {
            handle.cancel();
            handle.arm();
        });

        let event = rx.recv_timeout(SAVE_DELAY * 2).unwrap();
        match event {
            Event::DeferredSave(generation) => assert_eq!(generation, handle.generation()),
            _ => unreachable!(),
        }

        // Nothing else is pending.
        assert!(rx.recv_timeout(SAVE_DELAY * 2).is_err());
    }

    #[test]
    fn cancel_prevents_expiry() {
        let (tx, rx) = mpsc::sync_channel(32);
        let scheduler = SaveScheduler::run(tx);
        let handle = scheduler.handle();

        handle.arm();
        assert!(handle.cancel());
        assert!(!handle.cancel());

        assert!(rx.recv_timeout(SAVE_DELAY * 2).is_err());
    }

    #[test]
    fn stale_expiry_is_detectable_by_generation() {
        let (tx, rx) = mpsc::sync_channel(32);
        let scheduler = SaveScheduler::run(tx);
        let handle = scheduler.handle();

        handle.arm();
        let event = rx.recv_timeout(SAVE_DELAY * 2).unwrap();
        let generation = match event {
            Event::DeferredSave(generation) => generation,
            _ => unreachable!(),
        };

        // A later mutation overtakes the expiry before the event loop acts on it.
        handle.arm();
        assert_ne!(generation, handle.generation());
    }
}
