//! In-memory window backend.
//!
//! The window owns a 32-bit framebuffer that blits are resampled into, and
//! counts every native resource it hands out. Presenting into it needs no
//! display server, which makes it usable for offscreen capture and tests.
//!
//! A per-call event log is kept only for windows opened with
//! [`HeadlessWindow::with_event_log`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::core::dib::{Blit, DibDescriptor, BYTES_PER_PIXEL};
use crate::error::{Result, SurfaceError};
use crate::traits::NativeWindow;
use crate::types::{Extent2D, Rect};

/// Application instance for headless windows; carries nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessInstance;

/// Running totals of native resource traffic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResourceCounters {
    pub draw_contexts_acquired: u64,
    pub draw_contexts_released: u64,
    pub headers_created: u64,
    pub headers_freed: u64,
    pub blits: u64,
}

impl ResourceCounters {
    pub fn live_draw_contexts(&self) -> u64 {
        self.draw_contexts_acquired - self.draw_contexts_released
    }

    pub fn live_headers(&self) -> u64 {
        self.headers_created - self.headers_freed
    }
}

/// One entry in the window's resource log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceEvent {
    AcquireDrawContext,
    ReleaseDrawContext,
    CreateHeader(Extent2D),
    FreeHeader(Extent2D),
    Blit { destination: Rect, source: Rect },
}

#[derive(Debug, Default)]
struct Faults {
    draw_context: bool,
    header: bool,
    blit: bool,
}

#[derive(Debug)]
struct HeadlessState {
    extent: Extent2D,
    framebuffer: Vec<u32>,
    open: bool,
    counters: ResourceCounters,
    /// `None` unless the window was opened with an event log
    events: Option<Vec<ResourceEvent>>,
    faults: Faults,
}

impl HeadlessState {
    fn record(&mut self, event: ResourceEvent) {
        if let Some(events) = &mut self.events {
            events.push(event);
        }
    }
}

type Shared = Arc<Mutex<HeadlessState>>;

fn lock(shared: &Shared) -> MutexGuard<'_, HeadlessState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to an in-memory window. Clones refer to the same window.
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    shared: Shared,
}

impl HeadlessWindow {
    /// Open a window with the given client extent and a black framebuffer
    pub fn new(extent: Extent2D) -> Self {
        Self::open(extent, None)
    }

    /// Like [`new`](Self::new), but every resource call and blit is appended
    /// to a log read back with [`events`](Self::events). The log grows with
    /// every present until [`clear_events`](Self::clear_events) is called.
    pub fn with_event_log(extent: Extent2D) -> Self {
        Self::open(extent, Some(Vec::new()))
    }

    fn open(extent: Extent2D, events: Option<Vec<ResourceEvent>>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(HeadlessState {
                extent,
                framebuffer: vec![0; extent.pixel_count()],
                open: true,
                counters: ResourceCounters::default(),
                events,
                faults: Faults::default(),
            })),
        }
    }

    /// Resize the client area. The framebuffer is cleared.
    pub fn resize(&self, extent: Extent2D) {
        let mut state = lock(&self.shared);
        state.extent = extent;
        state.framebuffer.clear();
        state.framebuffer.resize(extent.pixel_count(), 0);
    }

    /// Destroy the window; every later native call reports an invalid handle
    pub fn close(&self) {
        lock(&self.shared).open = false;
    }

    pub fn is_open(&self) -> bool {
        lock(&self.shared).open
    }

    /// Snapshot of the framebuffer, top row first, `0x00RRGGBB` per pixel
    pub fn framebuffer(&self) -> Vec<u32> {
        lock(&self.shared).framebuffer.clone()
    }

    /// Framebuffer pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        let state = lock(&self.shared);
        if x >= state.extent.width || y >= state.extent.height {
            return None;
        }
        state
            .framebuffer
            .get(y as usize * state.extent.width as usize + x as usize)
            .copied()
    }

    pub fn counters(&self) -> ResourceCounters {
        lock(&self.shared).counters
    }

    /// Resource log in call order; empty when the log is disabled
    pub fn events(&self) -> Vec<ResourceEvent> {
        lock(&self.shared).events.clone().unwrap_or_default()
    }

    pub fn clear_events(&self) {
        let mut state = lock(&self.shared);
        if let Some(events) = state.events.as_mut() {
            events.clear();
        }
    }

    /// Make the next draw context acquisition fail
    pub fn fail_next_draw_context(&self) {
        lock(&self.shared).faults.draw_context = true;
    }

    /// Make the next header allocation fail
    pub fn fail_next_header(&self) {
        lock(&self.shared).faults.header = true;
    }

    /// Make the next blit fail
    pub fn fail_next_blit(&self) {
        lock(&self.shared).faults.blit = true;
    }

    fn open_state(&self) -> Result<MutexGuard<'_, HeadlessState>> {
        let state = lock(&self.shared);
        if state.open {
            Ok(state)
        } else {
            Err(SurfaceError::InvalidHandle)
        }
    }
}

/// Draw context of a headless window; released on drop
#[derive(Debug)]
pub struct HeadlessDrawContext {
    shared: Shared,
}

impl Drop for HeadlessDrawContext {
    fn drop(&mut self) {
        let mut state = lock(&self.shared);
        state.counters.draw_contexts_released += 1;
        state.record(ResourceEvent::ReleaseDrawContext);
    }
}

/// Header block of a headless window; freed on drop
#[derive(Debug)]
pub struct HeadlessHeader {
    shared: Shared,
    descriptor: DibDescriptor,
}

impl HeadlessHeader {
    pub fn descriptor(&self) -> &DibDescriptor {
        &self.descriptor
    }
}

impl Drop for HeadlessHeader {
    fn drop(&mut self) {
        let extent = self.descriptor.extent();
        let mut state = lock(&self.shared);
        state.counters.headers_freed += 1;
        state.record(ResourceEvent::FreeHeader(extent));
    }
}

impl NativeWindow for HeadlessWindow {
    type Instance = HeadlessInstance;
    type DrawContext = HeadlessDrawContext;
    type Header = HeadlessHeader;

    fn client_extent(&self) -> Result<Extent2D> {
        Ok(self.open_state()?.extent)
    }

    fn acquire_draw_context(&self) -> Result<HeadlessDrawContext> {
        let mut state = self.open_state()?;
        if std::mem::take(&mut state.faults.draw_context) {
            return Err(SurfaceError::allocation("draw context unavailable"));
        }
        state.counters.draw_contexts_acquired += 1;
        state.record(ResourceEvent::AcquireDrawContext);
        Ok(HeadlessDrawContext {
            shared: Arc::clone(&self.shared),
        })
    }

    fn create_header(&self, descriptor: &DibDescriptor) -> Result<HeadlessHeader> {
        let mut state = self.open_state()?;
        if std::mem::take(&mut state.faults.header) {
            return Err(SurfaceError::allocation("header block unavailable"));
        }
        state.counters.headers_created += 1;
        state.record(ResourceEvent::CreateHeader(descriptor.extent()));
        Ok(HeadlessHeader {
            shared: Arc::clone(&self.shared),
            descriptor: descriptor.clone(),
        })
    }

    fn stretch_blit(
        &self,
        _context: &mut HeadlessDrawContext,
        header: &HeadlessHeader,
        blit: &Blit<'_>,
    ) -> Result<()> {
        let mut state = self.open_state()?;
        if std::mem::take(&mut state.faults.blit) {
            return Err(SurfaceError::presentation("blit rejected by window"));
        }

        let fb_extent = state.extent;
        stretch_delete_scans(
            &mut state.framebuffer,
            fb_extent,
            blit,
            header.descriptor.is_top_down(),
        )?;

        state.counters.blits += 1;
        state.record(ResourceEvent::Blit {
            destination: blit.destination,
            source: blit.source,
        });
        Ok(())
    }
}

/// Nearest-neighbour stretch: every destination pixel samples the source scan
/// line and column it maps onto, eliminated lines are dropped.
fn stretch_delete_scans(
    framebuffer: &mut [u32],
    fb_extent: Extent2D,
    blit: &Blit<'_>,
    top_down: bool,
) -> Result<()> {
    let dst = blit.destination;
    let src = blit.source;
    if dst.width == 0 || dst.height == 0 || src.width == 0 || src.height == 0 {
        return Ok(());
    }

    let pitch = blit.row_pitch();
    let memory_rows = u64::from(blit.memory_extent.height);

    for dy in 0..dst.height {
        let fy = dst.y + dy;
        if fy >= fb_extent.height {
            break;
        }
        let sy = u64::from(src.y) + u64::from(dy) * u64::from(src.height) / u64::from(dst.height);
        if sy >= memory_rows {
            return Err(SurfaceError::presentation("source rectangle outside image memory"));
        }
        let memory_row = if top_down { sy } else { memory_rows - 1 - sy };
        let row_start = memory_row as usize * pitch;

        for dx in 0..dst.width {
            let fx = dst.x + dx;
            if fx >= fb_extent.width {
                break;
            }
            let sx = u64::from(src.x) + u64::from(dx) * u64::from(src.width) / u64::from(dst.width);
            let offset = row_start + sx as usize * BYTES_PER_PIXEL;
            let bytes = blit
                .pixels
                .get(offset..offset + BYTES_PER_PIXEL)
                .ok_or_else(|| SurfaceError::presentation("source rectangle outside image memory"))?;
            let bgra = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            // Reserved byte is not carried through for uncompressed RGB
            framebuffer[fy as usize * fb_extent.width as usize + fx as usize] = bgra & 0x00FF_FFFF;
        }
    }
    Ok(())
}
