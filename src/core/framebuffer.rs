use atomic_float::AtomicF32;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

/// Number of striped locks guarding depth+color writes.
const LOCK_STRIPES: usize = 1024;

/// Color and depth buffers for one frame.
///
/// Thread-safe for parallel rasterization: depth is stored in `AtomicF32`, the
/// packed 0x00RRGGBB color in `AtomicU32`, and every accepting write holds the
/// stripe lock of its pixel while it re-tests depth and stores both values.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,

    color_buffer: Vec<AtomicU32>,
    depth_buffer: Vec<AtomicF32>,

    /// Pixel index maps to lock index by modulo to keep memory bounded.
    locks: Vec<Mutex<()>>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: (0..size).map(|_| AtomicU32::new(0)).collect(),
            depth_buffer: (0..size).map(|_| AtomicF32::new(f32::INFINITY)).collect(),
            locks: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Resets color to `background` and depth to +infinity.
    pub fn clear(&mut self, background: u32) {
        self.color_buffer
            .par_iter()
            .for_each(|c| c.store(background, Ordering::Relaxed));
        self.depth_buffer
            .par_iter()
            .for_each(|d| d.store(f32::INFINITY, Ordering::Relaxed));
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Lock-free early depth test. A `true` result is only a hint; the write
    /// itself must go through [`Self::write_if_nearer`].
    #[inline]
    pub fn is_nearer(&self, x: usize, y: usize, depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        depth < self.depth_buffer[self.index(x, y)].load(Ordering::Relaxed)
    }

    /// Atomic depth-test-and-write.
    ///
    /// Stores `depth` and `color` together iff `depth` is strictly less than
    /// the stored depth. Returns whether the fragment was accepted.
    #[inline]
    pub fn write_if_nearer(&self, x: usize, y: usize, depth: f32, color: u32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        let _guard = self.locks[idx % self.locks.len()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let slot = &self.depth_buffer[idx];
        if depth >= slot.load(Ordering::Relaxed) {
            return false;
        }
        slot.store(depth, Ordering::Relaxed);
        self.color_buffer[idx].store(color, Ordering::Relaxed);
        true
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.color_buffer[self.index(x, y)].load(Ordering::Relaxed))
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.depth_buffer[self.index(x, y)].load(Ordering::Relaxed))
    }

    /// Copies the row-major packed color buffer into `out`.
    pub fn copy_to(&self, out: &mut [u32]) {
        out.par_iter_mut()
            .zip(self.color_buffer.par_iter())
            .for_each(|(dst, src)| *dst = src.load(Ordering::Relaxed));
    }

    pub fn color_snapshot(&self) -> Vec<u32> {
        let mut out = vec![0; self.color_buffer.len()];
        self.copy_to(&mut out);
        out
    }

    pub fn depth_snapshot(&self) -> Vec<f32> {
        self.depth_buffer
            .iter()
            .map(|d| d.load(Ordering::Relaxed))
            .collect()
    }
}
