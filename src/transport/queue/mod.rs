//! Fixed-capacity handoff queue between the CAN receive interrupt and the
//! dispatch loop.
//!
//! Built on `heapless::spsc::Queue`: single-producer (interrupt context) /
//! single-consumer (loop context) with lock-free index updates, so the
//! critical section on either side is a handful of instructions. When the
//! queue is full the incoming frame is dropped (drop-newest) and counted;
//! the loop reads the counter and logs from thread context, never from the
//! interrupt handler.
use heapless::spsc::Queue;

use crate::transport::can_frame::CanMessage;

/// Receive queue with overflow accounting.
///
/// `N` is the backing storage size; the queue holds up to `N - 1` frames.
/// Size it for the worst-case gap between two loop iterations.
pub struct ReceiveQueue<const N: usize> {
    queue: Queue<CanMessage, N>,
    dropped: u32,
}

impl<const N: usize> ReceiveQueue<N> {
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
            dropped: 0,
        }
    }

    /// Enqueue one received frame. Returns `false` when the frame had to be
    /// dropped because the loop has not drained the queue yet.
    pub fn push(&mut self, message: CanMessage) -> bool {
        match self.queue.enqueue(message) {
            Ok(()) => true,
            Err(_rejected) => {
                self.dropped = self.dropped.wrapping_add(1);
                false
            }
        }
    }

    /// Dequeue the oldest frame, preserving wire receipt order.
    pub fn pop(&mut self) -> Option<CanMessage> {
        self.queue.dequeue()
    }

    /// Frames dropped since the counter was last taken.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Read and reset the drop counter; the loop logs the total once.
    pub fn take_dropped(&mut self) -> u32 {
        core::mem::replace(&mut self.dropped, 0)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Usable capacity (one slot less than the backing storage).
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }
}

impl<const N: usize> Default for ReceiveQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
