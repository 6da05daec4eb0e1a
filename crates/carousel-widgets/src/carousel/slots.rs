//! Index-addressed store of materialized views.
//!
//! Slots are kept in a dense `Vec<Option<Slot<V>>>` covering the populated
//! index range `[base, span)`, so indices can be populated in any order and a
//! deep offset does not allocate entries for the indices before it. The
//! vector still spans every index between the lowest and highest resident
//! slot. A slot outlives its
//! attachment: scrolling an index out of the window detaches the view but,
//! under [`SlotResidency::Unbounded`], leaves it resident for reuse.

use std::fmt;

use carousel_core::geometry::Rect;

use super::source::CarouselView;

/// How many detached views the store keeps resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotResidency {
    /// Detached views stay resident until a reload. Memory grows with the
    /// number of distinct indices ever shown.
    #[default]
    Unbounded,
    /// Keep at most this many detached views; least-recently-attached go first.
    ///
    /// This caps the resident count, not the store's index range: two
    /// resident slots far apart still span every index between them.
    Bounded(usize),
}

impl SlotResidency {
    /// Parse `unbounded` or a detached-slot limit (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        match value.as_str() {
            "unbounded" | "unlimited" | "all" => Some(Self::Unbounded),
            other => other.parse::<usize>().ok().map(Self::Bounded),
        }
    }
}

impl fmt::Display for SlotResidency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("unbounded"),
            Self::Bounded(limit) => write!(f, "{limit}"),
        }
    }
}

/// A materialized view and its attachment state.
#[derive(Debug)]
pub struct Slot<V> {
    view: V,
    frame: Option<Rect>,
    attached: bool,
    /// Layout pass in which the view was last attached.
    last_attached: u64,
}

impl<V> Slot<V> {
    fn new(view: V) -> Self {
        Self {
            view,
            frame: None,
            attached: false,
            last_attached: 0,
        }
    }

    #[inline]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[inline]
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    #[inline]
    pub fn into_view(self) -> V {
        self.view
    }

    /// Frame assigned at the last attach or reposition.
    #[inline]
    pub fn frame(&self) -> Option<Rect> {
        self.frame
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl<V: CarouselView> Slot<V> {
    fn attach(&mut self, frame: Rect, tick: u64) {
        self.view.set_frame(frame);
        self.frame = Some(frame);
        self.view.will_appear(false);
        self.attached = true;
        self.last_attached = tick;
        self.view.did_appear(false);
    }

    /// Detach with disappear notifications. Returns `false` if already detached.
    pub(crate) fn detach(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        self.view.will_disappear(false);
        self.attached = false;
        self.view.did_disappear(false);
        true
    }
}

/// Dense, index-addressed slot collection.
#[derive(Debug)]
pub struct SlotStore<V> {
    /// Absolute index of `slots[0]`.
    base: usize,
    slots: Vec<Option<Slot<V>>>,
    resident: usize,
    tick: u64,
}

impl<V> Default for SlotStore<V> {
    fn default() -> Self {
        Self {
            base: 0,
            slots: Vec::new(),
            resident: 0,
            tick: 0,
        }
    }
}

impl<V> SlotStore<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One past the highest populated index.
    #[inline]
    pub fn span(&self) -> usize {
        self.base + self.slots.len()
    }

    /// Lowest populated index, or `span()` when empty.
    #[inline]
    pub fn first_index(&self) -> usize {
        self.base
    }

    /// Entries currently allocated, including holes.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// Number of populated slots, attached or not.
    #[inline]
    pub fn resident_count(&self) -> usize {
        self.resident
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.resident == 0
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn get(&self, index: usize) -> Option<&Slot<V>> {
        let position = index.checked_sub(self.base)?;
        self.slots.get(position).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Slot<V>> {
        let position = index.checked_sub(self.base)?;
        self.slots.get_mut(position).and_then(Option::as_mut)
    }

    /// Store a freshly materialized (detached) view, returning any slot it replaces.
    pub fn insert(&mut self, index: usize, view: V) -> Option<Slot<V>> {
        if self.slots.is_empty() {
            self.base = index;
        } else if index < self.base {
            let gap = self.base - index;
            self.slots
                .splice(0..0, std::iter::repeat_with(|| None).take(gap));
            self.base = index;
        }
        let position = index - self.base;
        if position >= self.slots.len() {
            self.slots.resize_with(position + 1, || None);
        }
        let previous = self.slots[position].replace(Slot::new(view));
        if previous.is_none() {
            self.resident += 1;
        }
        previous
    }

    pub fn remove(&mut self, index: usize) -> Option<Slot<V>> {
        let position = index.checked_sub(self.base)?;
        let removed = self.slots.get_mut(position).and_then(Option::take);
        if removed.is_some() {
            self.resident -= 1;
            self.trim();
        }
        removed
    }

    /// Remove every slot at or after `from`, in index order.
    pub fn split_off(&mut self, from: usize) -> Vec<(usize, Slot<V>)> {
        if from >= self.span() {
            return Vec::new();
        }
        let start = from.max(self.base);
        let removed: Vec<(usize, Slot<V>)> = self
            .slots
            .split_off(start - self.base)
            .into_iter()
            .enumerate()
            .filter_map(|(offset, slot)| slot.map(|s| (start + offset, s)))
            .collect();
        self.resident -= removed.len();
        self.trim();
        removed
    }

    /// Remove every slot, in index order.
    pub fn drain(&mut self) -> Vec<(usize, Slot<V>)> {
        self.split_off(0)
    }

    /// Populated `(index, slot)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Slot<V>)> + '_ {
        let base = self.base;
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(position, slot)| slot.as_ref().map(|s| (base + position, s)))
    }

    pub fn attached_indices(&self) -> Vec<usize> {
        self.iter()
            .filter(|(_, slot)| slot.is_attached())
            .map(|(index, _)| index)
            .collect()
    }

    /// Start a new layout pass; attach ticks order eviction.
    pub(crate) fn advance_tick(&mut self) -> u64 {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }

    /// Drop detached slots beyond the residency limit, least-recently-attached
    /// first (ties broken by index). Attached slots are never evicted.
    pub fn evict(&mut self, residency: SlotResidency) -> Vec<(usize, V)> {
        let SlotResidency::Bounded(limit) = residency else {
            return Vec::new();
        };

        let mut detached: Vec<(u64, usize)> = self
            .iter()
            .filter(|(_, slot)| !slot.is_attached())
            .map(|(index, slot)| (slot.last_attached, index))
            .collect();
        if detached.len() <= limit {
            return Vec::new();
        }
        detached.sort_unstable();
        let excess = detached.len() - limit;

        let victims: Vec<usize> = detached[..excess].iter().map(|&(_, index)| index).collect();
        victims
            .into_iter()
            .filter_map(|index| self.remove(index).map(|slot| (index, slot.into_view())))
            .collect()
    }

    /// Drop holes at both ends so `slots[0]` is always populated.
    fn trim(&mut self) {
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        let leading = self.slots.iter().take_while(|slot| slot.is_none()).count();
        if leading > 0 {
            self.slots.drain(..leading);
            self.base += leading;
        }
        if self.slots.is_empty() {
            self.base = 0;
        }
    }
}

impl<V: CarouselView> SlotStore<V> {
    /// Attach the view at `index` with the given frame. Returns `false` if
    /// the slot is missing or already attached.
    pub(crate) fn attach(&mut self, index: usize, frame: Rect) -> bool {
        let tick = self.tick;
        match self.get_mut(index) {
            Some(slot) if !slot.is_attached() => {
                slot.attach(frame, tick);
                true
            }
            _ => false,
        }
    }

    /// Move an attached view whose frame changed, without lifecycle
    /// notifications. Returns `true` if the view moved.
    pub(crate) fn reposition(&mut self, index: usize, frame: Rect) -> bool {
        match self.get_mut(index) {
            Some(slot) if slot.is_attached() && slot.frame != Some(frame) => {
                slot.view.set_frame(frame);
                slot.frame = Some(frame);
                true
            }
            _ => false,
        }
    }

    /// Detach the view at `index`, keeping it resident.
    pub(crate) fn detach(&mut self, index: usize) -> bool {
        self.get_mut(index).is_some_and(Slot::detach)
    }
}
