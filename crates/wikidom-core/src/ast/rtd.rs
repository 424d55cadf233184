//! Formatting token stream ("round-trip data") attached to syntax tree
//! nodes.
//!
//! A stream records the literal separator text around a node's children:
//! for `N` children it holds exactly `N + 1` slots: one before each child
//! and one after the last. Slot `i` is the text printed immediately before
//! child `i`; the final slot is the text printed after the last child.
//! Tag-opening literals that can be derived from the node itself (element
//! names, attribute quoting defaults) are not part of the stream.
//!
//! The slot-count invariant is maintained by the splice operations on
//! [`Ast`](super::Ast); no other code mutates a stream's arity.

/// Per-node formatting token stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RtData {
    slots: Vec<String>,
}

impl RtData {
    /// Create a stream from explicit slot texts.
    pub fn new(slots: Vec<impl Into<String>>) -> Self {
        Self {
            slots: slots.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an all-empty stream for a node with `child_count` children.
    pub fn for_child_count(child_count: usize) -> Self {
        Self {
            slots: vec![String::new(); child_count + 1],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The literal text of slot `index`, empty when out of range.
    pub fn slot(&self, index: usize) -> &str {
        self.slots.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn set_slot(&mut self, index: usize, text: impl Into<String>) {
        if index < self.slots.len() {
            self.slots[index] = text.into();
        }
    }

    /// Insert an empty slot before position `index`; called when a child is
    /// inserted at that position.
    pub(crate) fn insert_gap(&mut self, index: usize) {
        let index = index.min(self.slots.len());
        self.slots.insert(index, String::new());
    }

    /// Drop the slot at position `index`; called when the child at that
    /// position is removed, taking its leading separator with it.
    pub(crate) fn remove_gap(&mut self, index: usize) {
        if index < self.slots.len() {
            self.slots.remove(index);
        }
    }

    /// Re-establish the slot-count invariant for `child_count` children,
    /// dropping surplus slots or padding with empty ones.
    pub(crate) fn resize_for(&mut self, child_count: usize) {
        self.slots.resize(child_count + 1, String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_access_is_total() {
        let rtd = RtData::new(vec![" ", ""]);
        assert_eq!(rtd.slot(0), " ");
        assert_eq!(rtd.slot(5), "");
    }

    #[test]
    fn gap_insertion_and_removal_are_symmetric() {
        let mut rtd = RtData::new(vec!["a", "b", "c"]);
        rtd.insert_gap(1);
        assert_eq!(rtd.slot_count(), 4);
        assert_eq!(rtd.slot(1), "");
        assert_eq!(rtd.slot(2), "b");
        rtd.remove_gap(1);
        assert_eq!(rtd, RtData::new(vec!["a", "b", "c"]));
    }

    #[test]
    fn resize_pads_and_truncates() {
        let mut rtd = RtData::new(vec!["a", "b", "c", "d"]);
        rtd.resize_for(1);
        assert_eq!(rtd.slot_count(), 2);
        rtd.resize_for(3);
        assert_eq!(rtd.slot_count(), 4);
        assert_eq!(rtd.slot(3), "");
    }
}
