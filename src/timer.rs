use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::clock::Millis;

/// Handle to one scheduled deadline. Generation-checked, so a handle held
/// across cancel or fire can never observe a reused slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId {
    slot: u32,
    generation: u32,
}

/// Single-threaded one-shot timer queue.
///
/// Drives every discrete state transition in the engine: each transition
/// schedules exactly one future deadline, and reconfiguration cancels before
/// rescheduling so stale deadlines never fire against superseded state.
/// Cancellation is lazy; stale heap entries are skipped at pop.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<(Millis, u32, u32)>>,
    generations: Vec<u32>,
    armed: Vec<bool>,
    free: Vec<u32>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline: Millis) -> TimerId {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.generations.push(0);
                self.armed.push(false);
                (self.generations.len() - 1) as u32
            }
        };
        let idx = slot as usize;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.armed[idx] = true;
        let generation = self.generations[idx];
        self.heap.push(Reverse((deadline, slot, generation)));
        TimerId { slot, generation }
    }

    pub fn schedule_after(&mut self, now: Millis, delay: Millis) -> TimerId {
        self.schedule(now.saturating_add(delay))
    }

    pub fn cancel(&mut self, id: TimerId) {
        let idx = id.slot as usize;
        if self.generations.get(idx) == Some(&id.generation) && self.armed[idx] {
            self.armed[idx] = false;
            self.free.push(id.slot);
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        let idx = id.slot as usize;
        self.generations.get(idx) == Some(&id.generation) && self.armed[idx]
    }

    pub fn pending(&self) -> usize {
        self.armed.iter().filter(|&&a| a).count()
    }

    /// Next live deadline, if any.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.heap
            .iter()
            .filter(|Reverse((_, slot, generation))| {
                let idx = *slot as usize;
                self.generations[idx] == *generation && self.armed[idx]
            })
            .map(|Reverse((deadline, _, _))| *deadline)
            .min()
    }

    /// Pops every deadline at or before `now`, in deadline order.
    /// Idempotent against torn-down owners: a fired id is simply never
    /// matched by anyone.
    pub fn poll(&mut self, now: Millis) -> Vec<TimerId> {
        let mut fired = Vec::new();
        while let Some(Reverse((deadline, slot, generation))) = self.heap.peek().copied() {
            if deadline > now {
                break;
            }
            self.heap.pop();
            let idx = slot as usize;
            if self.generations[idx] != generation || !self.armed[idx] {
                continue; // cancelled or reused slot
            }
            self.armed[idx] = false;
            self.free.push(slot);
            fired.push(TimerId { slot, generation });
        }
        fired
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        for (idx, armed) in self.armed.iter_mut().enumerate() {
            if *armed {
                *armed = false;
                self.free.push(idx as u32);
            }
        }
    }
}
