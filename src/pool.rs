//! Reusable record buffers.

use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};

pub const DEFAULT_BUFFER_CAP: usize = 256;

/// Buffers grown past this are dropped on release instead of kept around.
pub const MAX_POOLED_CAP: usize = 64 * 1024;

const MAX_IDLE: usize = 64;

/// A free list of byte buffers.
///
/// [BufferPool::acquire] hands out an empty buffer which keeps the capacity of its previous use.
/// The buffer goes back to the pool when the [PooledBuffer] is dropped, so it can never be used
/// after release.
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    cap: usize,
}

impl BufferPool {
    pub const fn new(cap: usize) -> Self {
        Self { free: Mutex::new(Vec::new()), cap }
    }

    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self.free.lock().pop().unwrap_or_else(|| Vec::with_capacity(self.cap));
        PooledBuffer { buf, pool: self }
    }

    fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_POOLED_CAP {
            return;
        }
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < MAX_IDLE {
            free.push(buf);
        }
    }

    /// Number of idle buffers.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

static GLOBAL_POOL: BufferPool = BufferPool::new(DEFAULT_BUFFER_CAP);

/// The pool shared by every logger.
#[inline]
pub fn global_pool() -> &'static BufferPool {
    &GLOBAL_POOL
}

/// A buffer borrowed from a [BufferPool], returned on drop.
pub struct PooledBuffer<'a> {
    buf: Vec<u8>,
    pool: &'a BufferPool,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    #[inline(always)]
    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
