use std::sync::atomic::{AtomicU64, Ordering};

/// Cursor call statistics
///
/// Thread-safe counters for the traversal calls issued to a cursor.
/// Uses atomic counters for lock-free updates, so a handle can be kept in an
/// `Arc` and inspected while the cursor itself is owned elsewhere.
#[derive(Debug, Default)]
pub struct CursorStatistics {
    // Movement
    pub move_next_calls: AtomicU64,
    pub move_previous_calls: AtomicU64,
    pub move_first_calls: AtomicU64,
    pub move_last_calls: AtomicU64,
    pub move_before_first_calls: AtomicU64,
    pub move_to_calls: AtomicU64,

    // Failed movement calls, any kind
    pub failed_moves: AtomicU64,

    // Row access
    pub value_reads: AtomicU64,

    // Lifecycle
    pub releases: AtomicU64,
}

impl CursorStatistics {
    pub fn new() -> Self {
        CursorStatistics::default()
    }

    #[inline]
    fn record_outcome(&self, ok: bool) {
        if !ok {
            self.failed_moves.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_move_next(&self, ok: bool) {
        self.move_next_calls.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(ok);
    }

    #[inline]
    pub fn record_move_previous(&self, ok: bool) {
        self.move_previous_calls.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(ok);
    }

    #[inline]
    pub fn record_move_first(&self, ok: bool) {
        self.move_first_calls.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(ok);
    }

    #[inline]
    pub fn record_move_last(&self, ok: bool) {
        self.move_last_calls.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(ok);
    }

    #[inline]
    pub fn record_move_before_first(&self, ok: bool) {
        self.move_before_first_calls.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(ok);
    }

    #[inline]
    pub fn record_move_to(&self, ok: bool) {
        self.move_to_calls.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(ok);
    }

    #[inline]
    pub fn record_value_read(&self) {
        self.value_reads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    // Getters (snapshot values)
    pub fn move_next_calls(&self) -> u64 {
        self.move_next_calls.load(Ordering::Relaxed)
    }

    pub fn move_previous_calls(&self) -> u64 {
        self.move_previous_calls.load(Ordering::Relaxed)
    }

    pub fn move_first_calls(&self) -> u64 {
        self.move_first_calls.load(Ordering::Relaxed)
    }

    pub fn move_last_calls(&self) -> u64 {
        self.move_last_calls.load(Ordering::Relaxed)
    }

    pub fn move_before_first_calls(&self) -> u64 {
        self.move_before_first_calls.load(Ordering::Relaxed)
    }

    pub fn move_to_calls(&self) -> u64 {
        self.move_to_calls.load(Ordering::Relaxed)
    }

    pub fn failed_moves(&self) -> u64 {
        self.failed_moves.load(Ordering::Relaxed)
    }

    pub fn value_reads(&self) -> u64 {
        self.value_reads.load(Ordering::Relaxed)
    }

    pub fn releases(&self) -> u64 {
        self.releases.load(Ordering::Relaxed)
    }

    /// Calls that position the cursor directly rather than stepping.
    pub fn seeks(&self) -> u64 {
        self.move_to_calls() + self.move_first_calls() + self.move_last_calls()
    }

    /// Calls that step the cursor backwards.
    pub fn backward_moves(&self) -> u64 {
        self.move_previous_calls()
    }

    /// Reset all statistics to zero
    pub fn reset(&self) {
        self.move_next_calls.store(0, Ordering::Relaxed);
        self.move_previous_calls.store(0, Ordering::Relaxed);
        self.move_first_calls.store(0, Ordering::Relaxed);
        self.move_last_calls.store(0, Ordering::Relaxed);
        self.move_before_first_calls.store(0, Ordering::Relaxed);
        self.move_to_calls.store(0, Ordering::Relaxed);
        self.failed_moves.store(0, Ordering::Relaxed);
        self.value_reads.store(0, Ordering::Relaxed);
        self.releases.store(0, Ordering::Relaxed);
    }

    /// Format statistics as a human-readable string
    pub fn report(&self) -> String {
        format!(
            "** Cursor Statistics **\n\
             Movement:\n\
             - move_next: {}\n\
             - move_previous: {}\n\
             - move_first: {}\n\
             - move_last: {}\n\
             - move_before_first: {}\n\
             - move_to: {}\n\
             - failed: {}\n\
             \n\
             Access:\n\
             - value reads: {}\n\
             - releases: {}\n",
            self.move_next_calls(),
            self.move_previous_calls(),
            self.move_first_calls(),
            self.move_last_calls(),
            self.move_before_first_calls(),
            self.move_to_calls(),
            self.failed_moves(),
            self.value_reads(),
            self.releases(),
        )
    }
}
