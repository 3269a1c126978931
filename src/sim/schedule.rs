//! Delayed effects keyed by simulation time
//!
//! Sticky-hazard release and the gravity well's decay are queued here instead
//! of running on wall-clock timers. The tick drains whatever is due at its
//! start, so delayed effects replay exactly for a given seed and input stream.

/// Something that fires once the clock reaches its due time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledEvent {
    /// Let a stuck ball go; ignored if the ball with this serial is gone
    ReleaseBall { serial: u32 },
    /// The well's active period is over
    BeginWellDecay,
    /// Walk the well's angle one step back toward zero
    WellDecayStep,
}

#[derive(Debug, Clone)]
struct Entry {
    due: f32,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
    event: ScheduledEvent,
}

/// Pending events, drained in (due, insertion) order
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Schedule {
    pub fn push(&mut self, due: f32, event: ScheduledEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { due, seq, event });
    }

    /// Remove and return every event due at or before `now`
    pub fn drain_due(&mut self, now: f32) -> Vec<ScheduledEvent> {
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|e| {
            if e.due <= now {
                due.push(e.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|e| e.event).collect()
    }

    /// Drop pending events matching `pred`
    pub fn cancel<F>(&mut self, pred: F)
    where
        F: Fn(&ScheduledEvent) -> bool,
    {
        self.entries.retain(|e| !pred(&e.event));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Due time of the first pending event matching `pred`
    pub fn next_due<F>(&self, pred: F) -> Option<f32>
    where
        F: Fn(&ScheduledEvent) -> bool,
    {
        self.entries
            .iter()
            .filter(|e| pred(&e.event))
            .map(|e| e.due)
            .min_by(|a, b| a.total_cmp(b))
    }
}
