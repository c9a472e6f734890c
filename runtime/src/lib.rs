// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2023 The snd-usb-scarlett2-ctl-service developers

pub mod card_cntr;
pub mod cmdline;
pub mod model;
pub mod save_scheduler;
pub mod transport;

mod input_ctl;
mod meter_ctl;
mod misc_ctl;
mod mixer_ctl;
mod monitor_ctl;
mod mux_ctl;
mod output_ctl;

use {
    card_cntr::*,
    glib::Error,
    input_ctl::*,
    meter_ctl::*,
    misc_ctl::*,
    mixer_ctl::*,
    model::*,
    monitor_ctl::*,
    mux_ctl::*,
    nix::sys::signal::{SigSet, Signal},
    output_ctl::*,
    protocols::{
        config::*, gen2::*, gen3::*, input::*, led::*, meter::*, mixer::*, monitor::*, mux::*,
        port::*, sw_cfg::*, transaction::*, volume::*, *,
    },
    save_scheduler::*,
    std::{
        marker::PhantomData,
        sync::{
            atomic::{AtomicBool, Ordering},
            mpsc, Arc,
        },
        thread,
    },
    tracing::{debug, warn, Level},
    transport::*,
    usb_scarlett2_protocols as protocols,
};

/// Bit of the device_setup mask enabling the service for the unit.
pub const DEVICE_SETUP_ENABLE: u32 = 0x01;
/// Bit of the device_setup mask exposing the MSD mode switch even when the mode is off.
pub const DEVICE_SETUP_MSD_ENABLE: u32 = 0x02;

/// The timeout of one control transfer.
pub(crate) const TIMEOUT_MS: u32 = 100;

/// The level to debug the runtime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
}

pub trait RuntimeOperation<T>: Sized {
    fn new(arg: T, log_level: Option<LogLevel>) -> Result<Self, Error>;
    fn listen(&mut self) -> Result<(), Error>;
    fn run(&mut self) -> Result<(), Error>;
}

/// Events delivered into the single event loop of the runtime.
pub enum Event {
    Shutdown,
    Disconnected,
    Interrupt(u32),
    DeferredSave(u64),
}

/// Staleness of mirrored state, flipped from the notification dispatcher and consumed by lazy
/// refreshes under the event loop. The flags are a cooperative signal, not a barrier; a raised
/// flag clears only after the next successful read of the covered area.
#[derive(Default, Debug)]
pub struct NotificationFlags {
    vol: AtomicBool,
    line_ctl: AtomicBool,
    speaker: AtomicBool,
    sync: AtomicBool,
}

impl NotificationFlags {
    pub fn mark(&self, mask: u32) {
        if mask & (NOTIFY_VOL_CHANGE | NOTIFY_BUTTON_CHANGE | NOTIFY_SPEAKER_CHANGE) > 0 {
            self.vol.store(true, Ordering::Relaxed);
        }
        if mask & NOTIFY_LINE_CTL_CHANGE > 0 {
            self.line_ctl.store(true, Ordering::Relaxed);
        }
        if mask & NOTIFY_SPEAKER_CHANGE > 0 {
            self.speaker.store(true, Ordering::Relaxed);
        }
        if mask & NOTIFY_SYNC_CHANGE > 0 {
            self.sync.store(true, Ordering::Relaxed);
        }
    }

    /// Force the next read of everything; used once before the initial cache.
    pub fn mark_all(&self) {
        self.vol.store(true, Ordering::Relaxed);
        self.line_ctl.store(true, Ordering::Relaxed);
        self.speaker.store(true, Ordering::Relaxed);
        self.sync.store(true, Ordering::Relaxed);
    }

    pub fn vol_stale(&self) -> bool {
        self.vol.load(Ordering::Relaxed)
    }

    pub fn clear_vol(&self) {
        self.vol.store(false, Ordering::Relaxed);
    }

    pub fn line_ctl_stale(&self) -> bool {
        self.line_ctl.load(Ordering::Relaxed)
    }

    pub fn clear_line_ctl(&self) {
        self.line_ctl.store(false, Ordering::Relaxed);
    }

    pub fn speaker_stale(&self) -> bool {
        self.speaker.load(Ordering::Relaxed)
    }

    pub fn clear_speaker(&self) {
        self.speaker.store(false, Ordering::Relaxed);
    }

    pub fn sync_stale(&self) -> bool {
        self.sync.load(Ordering::Relaxed)
    }

    pub fn clear_sync(&self) {
        self.sync.store(false, Ordering::Relaxed);
    }
}

pub struct ScarlettRuntime {
    unit: SndScarlett2,
    model: ScarlettModel,
    card_cntr: CardCntr,
    rx: mpsc::Receiver<Event>,
    tx: mpsc::SyncSender<Event>,
    scheduler: SaveScheduler,
    flags: Arc<NotificationFlags>,
    handle: Arc<rusb::DeviceHandle<rusb::Context>>,
    vendor_interface: VendorInterface,
    interrupt: Option<InterruptDispatcher>,
    signal_waiter: Option<thread::JoinHandle<()>>,
    setup: u32,
}

impl RuntimeOperation<u32> for ScarlettRuntime {
    fn new(setup: u32, log_level: Option<LogLevel>) -> Result<Self, Error> {
        if let Some(level) = log_level {
            let fmt_level = match level {
                LogLevel::Debug => Level::DEBUG,
            };
            tracing_subscriber::fmt().with_max_level(fmt_level).init();
        }

        let (handle, product_id, vendor_interface) =
            transport::open_unit(&ScarlettModel::SUPPORTED_PRODUCT_IDS)?;

        let transport = UsbTransport::new(Arc::clone(&handle), vendor_interface.number);
        let unit = SndScarlett2::new(Box::new(transport));

        // Use uni-directional channel for communication from child threads.
        let (tx, rx) = mpsc::sync_channel(32);

        let scheduler = SaveScheduler::run(tx.clone());
        let flags = Arc::new(NotificationFlags::default());

        let model = ScarlettModel::new(product_id, &flags, scheduler.handle(), setup)?;

        Ok(Self {
            unit,
            model,
            card_cntr: CardCntr::default(),
            rx,
            tx,
            scheduler,
            flags,
            handle,
            vendor_interface,
            interrupt: None,
            signal_waiter: None,
            setup,
        })
    }

    fn listen(&mut self) -> Result<(), Error> {
        self.launch_signal_waiter()?;

        if self.setup & DEVICE_SETUP_ENABLE == 0 {
            warn!(
                "the service is disabled; launch with a device-setup mask carrying bit 0 to \
                 enable it"
            );
            return Ok(());
        }

        self.unit.initialize(TIMEOUT_MS)?;

        self.flags.mark_all();
        self.model.cache(&mut self.unit)?;
        self.model.load(&mut self.card_cntr)?;
        self.sync_surface()?;

        self.interrupt = Some(InterruptDispatcher::run(
            Arc::clone(&self.handle),
            self.vendor_interface,
            Arc::clone(&self.flags),
            self.tx.clone(),
        ));

        Ok(())
    }

    fn run(&mut self) -> Result<(), Error> {
        loop {
            let event = match self.rx.recv() {
                Ok(event) => event,
                Err(_) => break,
            };
            match event {
                Event::Shutdown | Event::Disconnected => break,
                Event::Interrupt(mask) => {
                    let res =
                        self.model
                            .dispatch_notification(&mut self.unit, &mut self.card_cntr, mask);
                    if let Err(cause) = res {
                        warn!("failed to handle notification: {}", cause);
                    }
                }
                Event::DeferredSave(generation) => {
                    // Expired slots overtaken by a later mutation are dropped.
                    if generation == self.scheduler.handle().generation() {
                        if let Err(cause) = self.unit.save_configuration(TIMEOUT_MS) {
                            warn!("deferred save failed: {}", cause);
                        }
                    }
                }
            }

            self.card_cntr
                .drain_elem_events()
                .iter()
                .for_each(|(elem_id, mask)| {
                    debug!(element = %elem_id, event = ?mask);
                });
        }

        // A pending save is flushed before the unit goes away.
        if self.scheduler.handle().cancel() {
            self.unit.save_configuration(TIMEOUT_MS)?;
        }

        Ok(())
    }
}

impl ScarlettRuntime {
    fn launch_signal_waiter(&mut self) -> Result<(), Error> {
        let mut mask = SigSet::empty();
        mask.add(Signal::SIGINT);
        mask.add(Signal::SIGTERM);
        mask.thread_block().map_err(|cause| {
            let msg = format!("failed to block signals: {}", cause);
            Error::new(Scarlett2ControlError::IoTransport, &msg)
        })?;

        let tx = self.tx.clone();
        let th = thread::spawn(move || {
            if mask.wait().is_ok() {
                let _ = tx.send(Event::Shutdown);
            }
        });
        self.signal_waiter = Some(th);

        Ok(())
    }

    /// Fill the surface caches from the mirror once, before any event arrives.
    fn sync_surface(&mut self) -> Result<(), Error> {
        let elem_id_list = self.card_cntr.elem_id_list();
        elem_id_list.iter().try_for_each(|elem_id| {
            let mut elem_value = ElemValue::new();
            if self.model.read(&mut self.unit, elem_id, &mut elem_value)? {
                self.card_cntr.cache_elem_value(elem_id, &elem_value);
            }
            Ok(())
        })
    }

    /// Entry for values written by the host framework.
    pub fn write_elem(&mut self, elem_id: &ElemId, elem_value: &ElemValue) -> Result<(), Error> {
        self.model
            .dispatch_elem_event(&mut self.unit, &mut self.card_cntr, elem_id, elem_value)
    }

    /// Entry for metering readers of the host framework.
    pub fn measure_elems(&mut self) -> Result<(), Error> {
        self.model
            .measure_elems(&mut self.unit, &mut self.card_cntr)
    }
}

impl Drop for ScarlettRuntime {
    fn drop(&mut self) {
        // Stop the notification dispatcher first to avoid queueing new events.
        self.interrupt = None;

        // Consume everything left in the queue to release blocked senders.
        for _ in self.rx.try_iter() {}
    }
}
