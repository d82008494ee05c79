//! Frame transmission loop.
//!
//! A single long-lived task that wakes once per frame interval, snapshots the
//! color store into a private scratch frame and pushes it through the
//! transport between the frame-start and frame-end signals.
//!
//! The loop is the only transport user at runtime. It observes stop requests
//! at iteration boundaries only, so shutdown takes at most one frame interval.

use alloc::boxed::Box;
use core::cell::Cell;

use critical_section::Mutex;
use embassy_time::{Duration, Timer};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::store::{ColorDataStore, try_alloc_frame};
use crate::{DATA_BUF_LEN, Error, Transport};

/// Default pause between two frames (one physical rotation).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(20);

/// When a frame is pushed to the transport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransmitPolicy {
    /// Only transmit frames that changed since the last transmission
    #[default]
    OnChange,
    /// Transmit on every iteration, changed or not
    EveryFrame,
}

/// Configuration for the transmission loop
#[derive(Debug, Clone, Copy)]
pub struct TransmissionConfig {
    /// Fixed sleep between iterations
    pub frame_interval: Duration,
    pub policy: TransmitPolicy,
}

impl Default for TransmissionConfig {
    fn default() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            policy: TransmitPolicy::default(),
        }
    }
}

/// Lifecycle of the loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoopState {
    #[default]
    Running,
    /// Stop requested; the loop exits at the next iteration boundary
    Stopping,
    /// Terminal; the transport has been torn down
    Stopped,
}

/// Snapshot of the loop state and counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStatus {
    pub state: LoopState,
    pub frames_sent: u32,
    pub frames_skipped: u32,
    pub write_failures: u32,
}

/// Shared cancellation token and status of a transmission loop.
///
/// The owner keeps a reference to request a stop and observe progress; the
/// loop borrows it for its whole lifetime.
pub struct LoopControl {
    status: Mutex<Cell<LoopStatus>>,
}

impl LoopControl {
    pub const fn new() -> Self {
        Self {
            status: Mutex::new(Cell::new(LoopStatus {
                state: LoopState::Running,
                frames_sent: 0,
                frames_skipped: 0,
                write_failures: 0,
            })),
        }
    }

    /// Ask the loop to stop after its current iteration.
    ///
    /// Has no effect once the loop is already stopping or stopped.
    pub fn request_stop(&self) {
        self.update(|status| {
            if status.state == LoopState::Running {
                status.state = LoopState::Stopping;
            }
        });
    }

    pub fn state(&self) -> LoopState {
        self.status().state
    }

    pub fn status(&self) -> LoopStatus {
        critical_section::with(|cs| self.status.borrow(cs).get())
    }

    fn update(&self, f: impl FnOnce(&mut LoopStatus)) {
        critical_section::with(|cs| {
            let cell = self.status.borrow(cs);
            let mut status = cell.get();
            f(&mut status);
            cell.set(status);
        });
    }
}

impl Default for LoopControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A frame was written to the transport
    Sent,
    /// Nothing changed, no bus traffic
    Unchanged,
    /// The transport rejected the frame; the next iteration resends it
    WriteFailed,
    /// A stop was requested; no more iterations should run
    Stopped,
}

/// Periodic transmission task.
///
/// Borrows the transport for its whole lifetime and tears it down exactly
/// once, on [`TransmissionLoop::shutdown`] or when dropped.
pub struct TransmissionLoop<'a, T: Transport, const SIZE: usize = DATA_BUF_LEN> {
    transport: &'a mut T,
    store: &'a ColorDataStore<SIZE>,
    control: &'a LoopControl,
    scratch: Box<[u8; SIZE]>,
    config: TransmissionConfig,
    force_next: bool,
    torn_down: bool,
}

impl<'a, T: Transport, const SIZE: usize> TransmissionLoop<'a, T, SIZE> {
    /// Prepare the loop: allocate the scratch frame, then initialize the
    /// transport.
    ///
    /// Any failure aborts startup before a single iteration runs.
    pub fn new(
        transport: &'a mut T,
        store: &'a ColorDataStore<SIZE>,
        control: &'a LoopControl,
        config: TransmissionConfig,
    ) -> Result<Self, Error> {
        let scratch = try_alloc_frame::<SIZE>()?;
        transport.init().map_err(|_err| {
            #[cfg(feature = "esp32-log")]
            println!("[TransmissionLoop.new] transport init failed: {:?}", _err);
            Error::TransportInit
        })?;

        Ok(Self {
            transport,
            store,
            control,
            scratch,
            config,
            force_next: true,
            torn_down: false,
        })
    }

    pub fn config(&self) -> &TransmissionConfig {
        &self.config
    }

    /// Run one iteration without sleeping.
    ///
    /// The first iteration always transmits so the ring starts from the
    /// store's contents, as does the iteration after a failed write.
    pub fn tick(&mut self) -> Tick {
        if self.control.state() != LoopState::Running {
            return Tick::Stopped;
        }

        let copied = if self.force_next || self.config.policy == TransmitPolicy::EveryFrame {
            self.store.copy_out(&mut self.scratch);
            true
        } else {
            self.store.copy_out_if_dirty(&mut self.scratch)
        };

        if !copied {
            self.control.update(|status| {
                status.frames_skipped = status.frames_skipped.saturating_add(1);
            });
            return Tick::Unchanged;
        }

        let outcome = self.transmit();
        self.force_next = outcome != Tick::Sent;
        self.control.update(|status| match outcome {
            Tick::Sent => status.frames_sent = status.frames_sent.saturating_add(1),
            _ => status.write_failures = status.write_failures.saturating_add(1),
        });
        outcome
    }

    fn transmit(&mut self) -> Tick {
        let written = self
            .transport
            .begin_frame()
            .and_then(|()| self.transport.write(self.scratch.as_slice()));
        let ended = self.transport.end_frame();

        match (written, ended) {
            (Ok(len), Ok(())) if len == SIZE => Tick::Sent,
            (Ok(_len), Ok(())) => {
                #[cfg(feature = "esp32-log")]
                println!("[TransmissionLoop] short write: {} of {} bytes", _len, SIZE);
                Tick::WriteFailed
            }
            (Err(_err), _) | (_, Err(_err)) => {
                #[cfg(feature = "esp32-log")]
                println!("[TransmissionLoop] frame failed: {:?}", _err);
                Tick::WriteFailed
            }
        }
    }

    /// Drive the loop until a stop is requested.
    ///
    /// Returns the final status once the transport is torn down and the
    /// loop reached [`LoopState::Stopped`]. Dropping the future early has
    /// the same effect as [`TransmissionLoop::shutdown`].
    pub async fn run(mut self) -> LoopStatus {
        #[cfg(feature = "esp32-log")]
        println!("[TransmissionLoop] running");
        while self.tick() != Tick::Stopped {
            Timer::after(self.config.frame_interval).await;
        }
        self.shutdown()
    }

    /// Tear down the transport and release the scratch frame.
    pub fn shutdown(mut self) -> LoopStatus {
        self.finish();
        self.control.status()
    }

    fn finish(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.transport.teardown();
        self.control.update(|status| status.state = LoopState::Stopped);
        #[cfg(feature = "esp32-log")]
        println!("[TransmissionLoop] stopped");
    }
}

impl<T: Transport, const SIZE: usize> Drop for TransmissionLoop<'_, T, SIZE> {
    fn drop(&mut self) {
        self.finish();
    }
}
