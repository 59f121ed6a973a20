use tracing::debug;

use crate::clock::Millis;
use crate::timer::{TimerId, TimerQueue};

/// Default per-item delay of the staggered show pass.
pub const STEP_DELAY: Millis = Millis(150);
/// Default per-item delay of the looping hide pass (shorter than the show
/// step so the teardown reads as one motion).
pub const HIDE_STEP_DELAY: Millis = Millis(80);
/// Gap between hiding everything and showing the next item in one-by-one
/// mode. Fixed pacing independent of the configured speeds; overridable via
/// the `gap_ms` parameter.
pub const HIDE_TRANSITION_GAP: Millis = Millis(300);

/// One enumerable item (social platform etc.). Owned by the controller;
/// external code only reads it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SequencedItem {
    pub identity: String,
    pub display_text: String,
    pub visible: bool,
}

impl SequencedItem {
    pub fn new(identity: impl Into<String>, display_text: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            display_text: display_text.into(),
            visible: false,
        }
    }
}

/// Orders items by explicit rank: ranked items first in ascending rank,
/// unranked items after in their original order. The sort is stable, so
/// rank ties also keep original order.
pub fn order_by_rank(mut items: Vec<SequencedItem>, ranks: &[(String, i64)]) -> Vec<SequencedItem> {
    let rank_of = |item: &SequencedItem| {
        ranks
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&item.identity))
            .map(|&(_, rank)| rank)
    };
    items.sort_by_key(|item| match rank_of(item) {
        Some(rank) => (0, rank),
        None => (1, 0),
    });
    items
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaggerTimings {
    pub step: Millis,
    pub hide_step: Millis,
    /// How long the full set stays visible before the hide pass (loop only).
    pub hold: Millis,
    /// Rest after the hide pass completes, before the loop restarts.
    pub pause: Millis,
    pub looping: bool,
}

impl Default for StaggerTimings {
    fn default() -> Self {
        Self {
            step: STEP_DELAY,
            hide_step: HIDE_STEP_DELAY,
            hold: Millis(4000),
            pause: Millis(2000),
            looping: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StaggerAction {
    Show(usize),
    Hide(usize),
    Restart,
}

/// Staggered simultaneous reveal: every item is scheduled at the shared
/// trigger, item `i` flips visible after `i * step`. With looping, a
/// symmetric hide pass runs on the shorter hide step, then the controller
/// pauses and restarts.
#[derive(Debug)]
pub struct StaggerReveal {
    items: Vec<SequencedItem>,
    timings: StaggerTimings,
    pending: Vec<(TimerId, StaggerAction)>,
}

impl StaggerReveal {
    pub fn new(
        items: Vec<SequencedItem>,
        timings: StaggerTimings,
        queue: &mut TimerQueue,
        now: Millis,
    ) -> Self {
        let mut reveal = Self {
            items,
            timings,
            pending: Vec::new(),
        };
        reveal.begin(queue, now);
        reveal
    }

    pub fn items(&self) -> &[SequencedItem] {
        &self.items
    }

    /// Replaces items and timings; all outstanding per-item timers are
    /// cancelled first so stale callbacks never touch the new item set.
    pub fn reconfigure(
        &mut self,
        items: Vec<SequencedItem>,
        timings: StaggerTimings,
        queue: &mut TimerQueue,
        now: Millis,
    ) {
        self.cancel_all(queue);
        self.items = items;
        self.timings = timings;
        self.begin(queue, now);
    }

    pub fn tick(&mut self, queue: &mut TimerQueue, now: Millis, fired: &[TimerId]) {
        let mut actions = Vec::new();
        self.pending.retain(|&(id, action)| {
            if fired.contains(&id) {
                actions.push(action);
                false
            } else {
                true
            }
        });
        for action in actions {
            match action {
                StaggerAction::Show(i) => {
                    if let Some(item) = self.items.get_mut(i) {
                        item.visible = true;
                    }
                }
                StaggerAction::Hide(i) => {
                    if let Some(item) = self.items.get_mut(i) {
                        item.visible = false;
                    }
                }
                StaggerAction::Restart => {
                    debug!("stagger loop restart");
                    self.begin(queue, now);
                }
            }
        }
    }

    fn begin(&mut self, queue: &mut TimerQueue, now: Millis) {
        self.cancel_all(queue);
        for item in &mut self.items {
            item.visible = false;
        }
        let n = self.items.len();
        if n == 0 {
            return;
        }

        for i in 0..n {
            let at = now.saturating_add(self.timings.step.scaled(i as u64));
            self.pending.push((queue.schedule(at), StaggerAction::Show(i)));
        }

        if self.timings.looping {
            let show_end = self.timings.step.scaled((n - 1) as u64);
            let hide_start = now
                .saturating_add(show_end)
                .saturating_add(self.timings.hold);
            for i in 0..n {
                let at = hide_start.saturating_add(self.timings.hide_step.scaled(i as u64));
                self.pending.push((queue.schedule(at), StaggerAction::Hide(i)));
            }
            let hide_end = hide_start.saturating_add(self.timings.hide_step.scaled((n - 1) as u64));
            let restart_at = hide_end.saturating_add(self.timings.pause);
            self.pending
                .push((queue.schedule(restart_at), StaggerAction::Restart));
        }
    }

    fn cancel_all(&mut self, queue: &mut TimerQueue) {
        for (id, _) in self.pending.drain(..) {
            queue.cancel(id);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OneByOneTimings {
    /// How long each item is held visible.
    pub each: Millis,
    /// Extra rest after the hold, still inside the item's window.
    pub each_pause: Millis,
    /// Hide-to-show transition gap at the start of each window.
    pub gap: Millis,
}

impl Default for OneByOneTimings {
    fn default() -> Self {
        Self {
            each: Millis(2000),
            each_pause: Millis(500),
            gap: HIDE_TRANSITION_GAP,
        }
    }
}

impl OneByOneTimings {
    /// Window length per item, measured hide-all to hide-all.
    pub fn window(&self) -> Millis {
        self.each.saturating_add(self.each_pause)
    }
}

/// One-by-one cyclic reveal: exactly one item visible at a time. Each
/// window starts with everything hidden, shows the current item after the
/// transition gap, and advances `current` modulo the item count at the end
/// of the window. An empty item list is a no-op cycle.
#[derive(Debug)]
pub struct OneByOne {
    items: Vec<SequencedItem>,
    timings: OneByOneTimings,
    current: usize,
    show: Option<TimerId>,
    advance: Option<TimerId>,
}

impl OneByOne {
    pub fn new(
        items: Vec<SequencedItem>,
        timings: OneByOneTimings,
        queue: &mut TimerQueue,
        now: Millis,
    ) -> Self {
        let mut reveal = Self {
            items,
            timings,
            current: 0,
            show: None,
            advance: None,
        };
        reveal.begin_window(queue, now);
        reveal
    }

    pub fn items(&self) -> &[SequencedItem] {
        &self.items
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn reconfigure(
        &mut self,
        items: Vec<SequencedItem>,
        timings: OneByOneTimings,
        queue: &mut TimerQueue,
        now: Millis,
    ) {
        self.cancel_all(queue);
        self.items = items;
        self.timings = timings;
        self.current = 0;
        self.begin_window(queue, now);
    }

    pub fn tick(&mut self, queue: &mut TimerQueue, now: Millis, fired: &[TimerId]) {
        if let Some(id) = self.show
            && fired.contains(&id)
        {
            self.show = None;
            if let Some(item) = self.items.get_mut(self.current) {
                item.visible = true;
            }
        }
        if let Some(id) = self.advance
            && fired.contains(&id)
        {
            self.advance = None;
            // A show still pending here means the gap outlasted the window;
            // drop it rather than reveal a superseded index.
            if let Some(stale) = self.show.take() {
                queue.cancel(stale);
            }
            if !self.items.is_empty() {
                self.current = (self.current + 1) % self.items.len();
            }
            debug!(current = self.current, "one-by-one advance");
            self.begin_window(queue, now);
        }
    }

    fn begin_window(&mut self, queue: &mut TimerQueue, now: Millis) {
        for item in &mut self.items {
            item.visible = false;
        }
        if self.items.is_empty() {
            return;
        }
        self.show = Some(queue.schedule_after(now, self.timings.gap));
        self.advance = Some(queue.schedule_after(now, self.timings.window()));
    }

    fn cancel_all(&mut self, queue: &mut TimerQueue) {
        if let Some(id) = self.show.take() {
            queue.cancel(id);
        }
        if let Some(id) = self.advance.take() {
            queue.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<SequencedItem> {
        (0..n)
            .map(|i| SequencedItem::new(format!("p{i}"), format!("handle{i}")))
            .collect()
    }

    fn visible_indices(items: &[SequencedItem]) -> Vec<usize> {
        items
            .iter()
            .enumerate()
            .filter(|(_, it)| it.visible)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn rank_order_is_stable() {
        let ranked = order_by_rank(
            vec![
                SequencedItem::new("twitch", "a"),
                SequencedItem::new("youtube", "b"),
                SequencedItem::new("discord", "c"),
                SequencedItem::new("github", "d"),
            ],
            &[
                ("discord".to_owned(), 1),
                ("youtube".to_owned(), 1),
                ("github".to_owned(), 0),
            ],
        );
        let ids: Vec<&str> = ranked.iter().map(|i| i.identity.as_str()).collect();
        // github rank 0, then the rank-1 tie in original order, then unranked.
        assert_eq!(ids, ["github", "youtube", "discord", "twitch"]);
    }

    #[test]
    fn stagger_reveals_at_fixed_offsets() {
        let mut queue = TimerQueue::new();
        let timings = StaggerTimings {
            step: Millis(150),
            ..Default::default()
        };
        let mut reveal = StaggerReveal::new(items(3), timings, &mut queue, Millis::ZERO);

        let fired = queue.poll(Millis(0));
        reveal.tick(&mut queue, Millis(0), &fired);
        assert_eq!(visible_indices(reveal.items()), [0]);

        let fired = queue.poll(Millis(150));
        reveal.tick(&mut queue, Millis(150), &fired);
        assert_eq!(visible_indices(reveal.items()), [0, 1]);

        let fired = queue.poll(Millis(300));
        reveal.tick(&mut queue, Millis(300), &fired);
        assert_eq!(visible_indices(reveal.items()), [0, 1, 2]);

        // Non-looping: nothing left to fire.
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn stagger_loop_hides_and_restarts() {
        let mut queue = TimerQueue::new();
        let timings = StaggerTimings {
            step: Millis(100),
            hide_step: Millis(50),
            hold: Millis(1000),
            pause: Millis(500),
            looping: true,
        };
        let mut reveal = StaggerReveal::new(items(2), timings, &mut queue, Millis::ZERO);

        let mut step = |reveal: &mut StaggerReveal, queue: &mut TimerQueue, now: u64| {
            let fired = queue.poll(Millis(now));
            reveal.tick(queue, Millis(now), &fired);
        };

        step(&mut reveal, &mut queue, 100);
        assert_eq!(visible_indices(reveal.items()), [0, 1]);

        // Show pass ended at 100; hide pass runs at 1100 and 1150.
        step(&mut reveal, &mut queue, 1100);
        assert_eq!(visible_indices(reveal.items()), [1]);
        step(&mut reveal, &mut queue, 1150);
        assert_eq!(visible_indices(reveal.items()), Vec::<usize>::new());

        // Pause, then the loop restarts and the first item shows again.
        step(&mut reveal, &mut queue, 1650);
        step(&mut reveal, &mut queue, 1651);
        assert_eq!(visible_indices(reveal.items()), [0]);
    }

    #[test]
    fn stagger_empty_items_is_noop() {
        let mut queue = TimerQueue::new();
        let timings = StaggerTimings {
            looping: true,
            ..Default::default()
        };
        let mut reveal = StaggerReveal::new(items(0), timings, &mut queue, Millis::ZERO);
        assert_eq!(queue.pending(), 0);
        let fired = queue.poll(Millis(60_000));
        reveal.tick(&mut queue, Millis(60_000), &fired);
        assert!(reveal.items().is_empty());
    }

    #[test]
    fn stagger_reconfigure_cancels_stale_timers() {
        let mut queue = TimerQueue::new();
        let mut reveal =
            StaggerReveal::new(items(3), StaggerTimings::default(), &mut queue, Millis::ZERO);
        reveal.reconfigure(items(1), StaggerTimings::default(), &mut queue, Millis(10));
        assert_eq!(queue.pending(), 1);

        let fired = queue.poll(Millis(1000));
        reveal.tick(&mut queue, Millis(1000), &fired);
        assert_eq!(visible_indices(reveal.items()), [0]);
        assert_eq!(reveal.items().len(), 1);
    }

    #[test]
    fn one_by_one_windows_are_exclusive() {
        let mut queue = TimerQueue::new();
        let timings = OneByOneTimings {
            each: Millis(2000),
            each_pause: Millis(500),
            gap: Millis(300),
        };
        let mut reveal = OneByOne::new(items(3), timings, &mut queue, Millis::ZERO);

        let mut step = |reveal: &mut OneByOne, queue: &mut TimerQueue, now: u64| {
            let fired = queue.poll(Millis(now));
            reveal.tick(queue, Millis(now), &fired);
        };

        // Window 0: hidden during the gap, then item 0 alone.
        step(&mut reveal, &mut queue, 100);
        assert_eq!(visible_indices(reveal.items()), Vec::<usize>::new());
        step(&mut reveal, &mut queue, 300);
        assert_eq!(visible_indices(reveal.items()), [0]);
        step(&mut reveal, &mut queue, 2400);
        assert_eq!(visible_indices(reveal.items()), [0]);

        // Window 1 starts at 2500: hide-all, then item 1 at 2800.
        step(&mut reveal, &mut queue, 2500);
        assert_eq!(visible_indices(reveal.items()), Vec::<usize>::new());
        assert_eq!(reveal.current(), 1);
        step(&mut reveal, &mut queue, 2800);
        assert_eq!(visible_indices(reveal.items()), [1]);

        // Window 2, then wrap back to item 0.
        step(&mut reveal, &mut queue, 5000);
        step(&mut reveal, &mut queue, 5300);
        assert_eq!(visible_indices(reveal.items()), [2]);
        step(&mut reveal, &mut queue, 7500);
        assert_eq!(reveal.current(), 0);
        step(&mut reveal, &mut queue, 7800);
        assert_eq!(visible_indices(reveal.items()), [0]);
    }

    #[test]
    fn one_by_one_empty_items_is_noop() {
        let mut queue = TimerQueue::new();
        let mut reveal = OneByOne::new(items(0), OneByOneTimings::default(), &mut queue, Millis::ZERO);
        assert_eq!(queue.pending(), 0);
        let fired = queue.poll(Millis(60_000));
        reveal.tick(&mut queue, Millis(60_000), &fired);
        assert_eq!(reveal.current(), 0);
    }

    #[test]
    fn one_by_one_gap_longer_than_window_never_shows_stale_index() {
        let mut queue = TimerQueue::new();
        let timings = OneByOneTimings {
            each: Millis(100),
            each_pause: Millis::ZERO,
            gap: Millis(1000),
        };
        let mut reveal = OneByOne::new(items(2), timings, &mut queue, Millis::ZERO);

        // The advance at 100 fires before the show at 1000; the stale show
        // must be cancelled, not fired against the advanced index.
        let fired = queue.poll(Millis(100));
        reveal.tick(&mut queue, Millis(100), &fired);
        assert_eq!(reveal.current(), 1);

        let fired = queue.poll(Millis(1000));
        reveal.tick(&mut queue, Millis(1000), &fired);
        assert_eq!(visible_indices(reveal.items()), Vec::<usize>::new());
    }

    #[test]
    fn one_by_one_reconfigure_resets_current() {
        let mut queue = TimerQueue::new();
        let mut reveal =
            OneByOne::new(items(3), OneByOneTimings::default(), &mut queue, Millis::ZERO);
        let fired = queue.poll(Millis(2500));
        reveal.tick(&mut queue, Millis(2500), &fired);
        assert_eq!(reveal.current(), 1);

        reveal.reconfigure(items(2), OneByOneTimings::default(), &mut queue, Millis(2600));
        assert_eq!(reveal.current(), 0);
        assert_eq!(queue.pending(), 2);
    }
}
