//! Host frame-callback facility.
//!
//! A mounted [`MapView`](crate::view::MapView) never loops on its own: it
//! asks a [`FrameHost`] for the next frame and ticks once when that frame is
//! delivered, exactly like a browser `requestAnimationFrame` loop. The view
//! keeps at most one request pending and cancels it on unmount.
//!
//! Two hosts are provided:
//! - [`ManualFrameHost`] – the caller decides when a frame is due (tests,
//!   embedding in another event loop)
//! - [`PacedFrameHost`] – sleeps until the next frame deadline for a fixed
//!   target FPS (the preview binary)

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::trace;

/// Token for one pending frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Per-frame callback scheduling, as offered by the rendering host.
pub trait FrameHost {
    /// Ask for one callback on the next frame.
    fn request_frame(&mut self) -> FrameHandle;
    /// Drop a request before it fires. Unknown or already fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Frame host driven by the caller.
#[derive(Debug, Default)]
pub struct ManualFrameHost {
    next_id: u64,
    pending: VecDeque<FrameHandle>,
    cancelled: u64,
}

impl ManualFrameHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the oldest pending request, as the host would when a frame is due.
    pub fn next_due(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    /// How many requests were cancelled before firing.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl FrameHost for ManualFrameHost {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(idx) = self.pending.iter().position(|h| *h == handle) {
            self.pending.remove(idx);
            self.cancelled += 1;
        } else {
            trace!("cancel_frame: {:?} is not pending", handle);
        }
    }
}

/// Frame host paced to a fixed target FPS.
#[derive(Debug)]
pub struct PacedFrameHost {
    inner: ManualFrameHost,
    frame_time: Duration,
    last_frame: Option<Instant>,
}

impl PacedFrameHost {
    pub fn new(target_fps: u32) -> Self {
        PacedFrameHost {
            inner: ManualFrameHost::new(),
            frame_time: Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1))),
            last_frame: None,
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Blocks until the next frame deadline, then returns the due request
    /// and the seconds elapsed since the previous frame.
    ///
    /// Returns `None` when nothing is pending (the view was unmounted).
    pub fn wait_next(&mut self) -> Option<(FrameHandle, f32)> {
        let handle = self.inner.next_due()?;
        let dt = match self.last_frame {
            Some(last) => {
                let deadline = last + self.frame_time;
                let now = Instant::now();
                if now < deadline {
                    std::thread::sleep(deadline - now);
                }
                last.elapsed().as_secs_f32()
            }
            None => self.frame_time.as_secs_f32(),
        };
        self.last_frame = Some(Instant::now());
        Some((handle, dt))
    }

    pub fn pending_count(&self) -> usize {
        self.inner.pending_count()
    }
}

impl FrameHost for PacedFrameHost {
    fn request_frame(&mut self) -> FrameHandle {
        self.inner.request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.inner.cancel_frame(handle);
    }
}
