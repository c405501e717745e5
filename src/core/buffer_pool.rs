//! Reusable byte buffers for record encoding
//!
//! Each log call borrows one buffer for encode-and-write and hands it back
//! when the `PooledBuffer` guard drops, so steady-state logging does not
//! touch the allocator. The free list is a bounded crossbeam channel:
//! acquire is a `try_recv`, release a `try_send`, neither takes a lock.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default number of idle buffers kept
pub const DEFAULT_MAX_BUFFERS: usize = 256;

/// Initial capacity of a newly allocated buffer
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Buffers grown past this are dropped instead of pooled
pub const DEFAULT_MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// Counters describing pool traffic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Buffers handed out
    pub acquired: u64,
    /// Buffers created because the free list was empty
    pub allocated: u64,
    /// Buffers put back on the free list
    pub released: u64,
    /// Buffers dropped on release (oversized or pool full)
    pub discarded: u64,
}

#[derive(Debug, Default)]
struct PoolCounters {
    acquired: AtomicU64,
    allocated: AtomicU64,
    released: AtomicU64,
    discarded: AtomicU64,
}

struct PoolInner {
    free_tx: Sender<Vec<u8>>,
    free_rx: Receiver<Vec<u8>>,
    buffer_capacity: usize,
    max_retained_capacity: usize,
    counters: PoolCounters,
}

/// A shared pool of byte buffers.
///
/// Cloning is cheap; clones share the same free list.
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<PoolInner>,
}

impl BufferPool {
    /// Creates a pool that keeps at most `max_buffers` idle buffers.
    pub fn new(max_buffers: usize) -> Self {
        Self::with_limits(max_buffers, DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_RETAINED_CAPACITY)
    }

    pub fn with_limits(
        max_buffers: usize,
        buffer_capacity: usize,
        max_retained_capacity: usize,
    ) -> Self {
        let (free_tx, free_rx) = bounded(max_buffers.max(1));
        Self {
            inner: Arc::new(PoolInner {
                free_tx,
                free_rx,
                buffer_capacity,
                max_retained_capacity,
                counters: PoolCounters::default(),
            }),
        }
    }

    /// Takes an empty buffer from the pool, allocating one if none is idle.
    pub fn acquire(&self) -> PooledBuffer {
        let counters = &self.inner.counters;
        counters.acquired.fetch_add(1, Ordering::Relaxed);

        let data = match self.inner.free_rx.try_recv() {
            Ok(buf) => buf,
            Err(_) => {
                counters.allocated.fetch_add(1, Ordering::Relaxed);
                Vec::with_capacity(self.inner.buffer_capacity)
            }
        };
        debug_assert!(data.is_empty());

        PooledBuffer {
            data: Some(data),
            pool: Arc::clone(&self.inner),
        }
    }

    /// Number of idle buffers currently in the pool
    pub fn idle(&self) -> usize {
        self.inner.free_rx.len()
    }

    pub fn stats(&self) -> PoolStats {
        let counters = &self.inner.counters;
        PoolStats {
            acquired: counters.acquired.load(Ordering::Relaxed),
            allocated: counters.allocated.load(Ordering::Relaxed),
            released: counters.released.load(Ordering::Relaxed),
            discarded: counters.discarded.load(Ordering::Relaxed),
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BUFFERS)
    }
}

impl PoolInner {
    fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() > self.max_retained_capacity {
            self.counters.discarded.fetch_add(1, Ordering::Relaxed);
            return;
        }

        buf.clear();
        match self.free_tx.try_send(buf) {
            Ok(()) => {
                self.counters.released.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.counters.discarded.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// RAII handle to a pooled buffer. Returns the buffer to the pool on drop,
/// including when unwinding.
pub struct PooledBuffer {
    data: Option<Vec<u8>>,
    pool: Arc<PoolInner>,
}

impl PooledBuffer {
    pub fn as_slice(&self) -> &[u8] {
        self
    }
}

impl Deref for PooledBuffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        // Only `Drop` takes the data out.
        match self.data.as_ref() {
            Some(data) => data,
            None => unreachable!("pooled buffer used after release"),
        }
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        match self.data.as_mut() {
            Some(data) => data,
            None => unreachable!("pooled buffer used after release"),
        }
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if let Some(data) = self.data.take() {
            self.pool.release(data);
        }
    }
}
