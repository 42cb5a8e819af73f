//! Recency list: doubly-linked list of slots stored in an arena
//!
//! The list owns every slot. A [`SlotId`] is an arena index plus the
//! generation of the slot it was issued for, so holding one never keeps a
//! slot alive. Vacated indices go on a free list and are reused by the next
//! push; freeing bumps the generation so old handles stop resolving.

use crate::error::{Error, Result};

/// Handle to a slot in a [`RecencyList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    idx: usize,
    generation: u32,
}

/// Node in the arena
struct Slot<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly-linked list ordered front (most recent) to back (least recent)
pub struct RecencyList<T> {
    slots: Vec<Option<Slot<T>>>,
    /// Current generation of each arena index, bumped whenever it is freed
    generations: Vec<u32>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> RecencyList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Number of linked slots
    pub fn len(&self) -> usize {
        self.len
    }

    /// True iff no slot is linked
    pub fn is_empty(&self) -> bool {
        self.tail.is_none()
    }

    /// Handle of the most recently used slot
    pub fn front(&self) -> Option<SlotId> {
        self.head.map(|idx| self.handle(idx))
    }

    /// Handle of the least recently used slot
    pub fn back(&self) -> Option<SlotId> {
        self.tail.map(|idx| self.handle(idx))
    }

    /// Payload of a slot. `None` for a stale handle.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        let idx = self.resolve(id)?;
        self.slot(idx).map(|slot| &slot.value)
    }

    /// Mutable payload of a slot. `None` for a stale handle.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        let idx = self.resolve(id)?;
        self.slot_mut(idx).map(|slot| &mut slot.value)
    }

    /// Insert `value` in a new slot at the front
    pub fn push_front(&mut self, value: T) -> SlotId {
        let idx = self.alloc_slot(value);
        self.link_front(idx);
        self.len += 1;
        self.handle(idx)
    }

    /// Insert `value` in a new slot at the back
    pub fn push_back(&mut self, value: T) -> SlotId {
        let idx = self.alloc_slot(value);
        self.link_back(idx);
        self.len += 1;
        self.handle(idx)
    }

    /// Unlink a slot, stitch its neighbours together and return its payload.
    ///
    /// Returns `None` if the handle was already removed, even when its arena
    /// index has since been reused by another push.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let idx = self.resolve(id)?;
        self.free_slot(idx)
    }

    /// Remove and return the front payload
    pub fn pop_front(&mut self) -> Result<T> {
        let idx = self.head.ok_or(Error::Empty)?;
        self.free_slot(idx).ok_or(Error::Empty)
    }

    /// Remove and return the back payload
    pub fn pop_back(&mut self) -> Result<T> {
        let idx = self.tail.ok_or(Error::Empty)?;
        self.free_slot(idx).ok_or(Error::Empty)
    }

    /// Relink a slot at the front. No-op if it is already there or stale.
    pub fn move_to_front(&mut self, id: SlotId) {
        let Some(idx) = self.resolve(id) else {
            return;
        };
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    /// Relink a slot at the back. No-op if it is already there or stale.
    pub fn move_to_back(&mut self, id: SlotId) {
        let Some(idx) = self.resolve(id) else {
            return;
        };
        if self.tail == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.link_back(idx);
    }

    /// Drop every slot. Handles issued before the call stop resolving.
    pub fn clear(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.generations[idx] = self.generations[idx].wrapping_add(1);
            }
        }
        self.free_list.clear();
        self.free_list.extend((0..self.slots.len()).rev());
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterate front to back
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            next: self.head,
            remaining: self.len,
        }
    }

    fn handle(&self, idx: usize) -> SlotId {
        SlotId {
            idx,
            generation: self.generations[idx],
        }
    }

    fn resolve(&self, id: SlotId) -> Option<usize> {
        let live = self.generations.get(id.idx) == Some(&id.generation)
            && self.slot(id.idx).is_some();
        live.then_some(id.idx)
    }

    fn slot(&self, idx: usize) -> Option<&Slot<T>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, idx: usize) -> Option<&mut Slot<T>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    fn alloc_slot(&mut self, value: T) -> usize {
        let slot = Slot {
            value,
            prev: None,
            next: None,
        };
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(slot);
            idx
        } else {
            self.slots.push(Some(slot));
            self.generations.push(0);
            self.slots.len() - 1
        }
    }

    /// Unlink a live slot and return its index to the free list.
    fn free_slot(&mut self, idx: usize) -> Option<T> {
        self.unlink(idx);
        let slot = self.slots.get_mut(idx)?.take()?;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_list.push(idx);
        self.len -= 1;
        Some(slot.value)
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(slot) = self.slot_mut(idx) {
            slot.prev = None;
            slot.next = old_head;
        }

        match old_head.and_then(|head_idx| self.slot_mut(head_idx)) {
            Some(head) => head.prev = Some(idx),
            None => self.tail = Some(idx),
        }

        self.head = Some(idx);
    }

    fn link_back(&mut self, idx: usize) {
        let old_tail = self.tail;
        if let Some(slot) = self.slot_mut(idx) {
            slot.prev = old_tail;
            slot.next = None;
        }

        match old_tail.and_then(|tail_idx| self.slot_mut(tail_idx)) {
            Some(tail) => tail.next = Some(idx),
            None => self.head = Some(idx),
        }

        self.tail = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slot_mut(idx) {
            Some(slot) => (slot.prev.take(), slot.next.take()),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_slot) = self.slot_mut(prev_idx) {
                    prev_slot.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_slot) = self.slot_mut(next_idx) {
                    next_slot.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    /// Walk the list both ways and check every link.
    #[cfg(test)]
    pub(crate) fn debug_validate_invariants(&self) {
        assert_eq!(self.head.is_none(), self.tail.is_none());

        let mut forward = Vec::with_capacity(self.len);
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let slot = self.slot(idx).expect("linked slot is vacant");
            assert_eq!(slot.prev, prev, "broken prev link at {}", idx);
            forward.push(idx);
            assert!(forward.len() <= self.len, "cycle in next links");
            prev = Some(idx);
            cursor = slot.next;
        }
        assert_eq!(prev, self.tail);
        assert_eq!(forward.len(), self.len);

        let mut backward = Vec::with_capacity(self.len);
        let mut cursor = self.tail;
        while let Some(idx) = cursor {
            backward.push(idx);
            assert!(backward.len() <= self.len, "cycle in prev links");
            cursor = self.slot(idx).and_then(|slot| slot.prev);
        }
        backward.reverse();
        assert_eq!(forward, backward);

        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(occupied, self.len);
        assert_eq!(self.slots.len(), self.len + self.free_list.len());
        assert_eq!(self.slots.len(), self.generations.len());
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over a [`RecencyList`]
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let slot = self.list.slot(idx)?;
        self.next = slot.next;
        self.remaining -= 1;
        Some((self.list.handle(idx), &slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
