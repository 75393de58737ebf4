//! Lock-free SPSC sample queue between the PCM feed thread (producer) and
//! the cpal output callback (consumer).

use std::sync::atomic::{AtomicUsize, Ordering};

/// Single-producer single-consumer ring of interleaved f32 samples.
pub struct RingBuffer {
    slots: Box<[f32]>,
    /// Slot count; one slot is always left empty so full != empty.
    len: usize,
    head: AtomicUsize,
    tail: AtomicUsize,
}

// SAFETY: the producer only touches slots in [tail, head) complement and the
// consumer only touches [head, tail); the atomics publish each side's
// progress with release/acquire ordering.
unsafe impl Send for RingBuffer {}
unsafe impl Sync for RingBuffer {}

impl RingBuffer {
    /// Create a ring able to hold `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        let len = capacity + 1;
        Self {
            slots: vec![0.0f32; len].into_boxed_slice(),
            len,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.len - 1
    }

    /// Samples queued for the consumer.
    pub fn queued(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        (tail + self.len - head) % self.len
    }

    pub fn is_empty(&self) -> bool {
        self.queued() == 0
    }

    /// Free slots available to the producer.
    pub fn free(&self) -> usize {
        self.capacity() - self.queued()
    }

    /// Enqueue as many samples as fit. Returns the number taken.
    pub fn push(&self, samples: &[f32]) -> usize {
        let count = samples.len().min(self.free());
        if count == 0 {
            return 0;
        }
        let tail = self.tail.load(Ordering::Relaxed);
        let first = (self.len - tail).min(count);
        let base = self.slots.as_ptr() as *mut f32;
        // SAFETY: [tail, tail + count) lies in the free region, wrapping once.
        unsafe {
            std::ptr::copy_nonoverlapping(samples.as_ptr(), base.add(tail), first);
            std::ptr::copy_nonoverlapping(samples[first..].as_ptr(), base, count - first);
        }
        self.tail.store((tail + count) % self.len, Ordering::Release);
        count
    }

    /// Dequeue into `out`. Returns the number of samples copied.
    pub fn pop(&self, out: &mut [f32]) -> usize {
        let count = out.len().min(self.queued());
        if count == 0 {
            return 0;
        }
        let head = self.head.load(Ordering::Relaxed);
        let first = (self.len - head).min(count);
        let base = self.slots.as_ptr();
        // SAFETY: [head, head + count) lies in the queued region, wrapping once.
        unsafe {
            std::ptr::copy_nonoverlapping(base.add(head), out.as_mut_ptr(), first);
            std::ptr::copy_nonoverlapping(base, out[first..].as_mut_ptr(), count - first);
        }
        self.head.store((head + count) % self.len, Ordering::Release);
        count
    }

    /// Fill an output block, padding any underrun with silence.
    ///
    /// Returns the number of real samples delivered.
    pub fn fill(&self, out: &mut [f32]) -> usize {
        let delivered = self.pop(out);
        out[delivered..].fill(0.0);
        delivered
    }

    /// Drop everything queued. Call only while the consumer is not popping.
    pub fn clear(&self) {
        self.head
            .store(self.tail.load(Ordering::Acquire), Ordering::Release);
    }
}
