//! Trackable container family.
//!
//! Each container decorates a live current container plus an immutable
//! [`Baseline`](baseline::Baseline) snapshot captured at wrap time, and keeps
//! `added_items` / `removed_items` equal to the set difference between the
//! current contents and the baseline after every mutating call.

pub mod baseline;
pub mod map;
pub mod sequence;
pub mod set;

pub use baseline::Baseline;
pub use map::TrackedMap;
pub use sequence::TrackedSequence;
pub use set::TrackedSet;

/// Read-only delta surface exposed by every tracked container.
///
/// `added_items` and `removed_items` are derived state: at any observation
/// point they equal `current ∖ baseline` and `baseline ∖ current`
/// respectively, and are always disjoint.
pub trait DeltaView {
    type Item;

    fn added_items(&self) -> &[Self::Item];
    fn removed_items(&self) -> &[Self::Item];
    fn count(&self) -> usize;
}

/// Receives a notification for every mutating call a tracked container
/// observes, including calls that net to no delta. The graph layer installs
/// a sink that marks the container's owning property changed.
pub trait DirtySink {
    fn mark_dirty(&self);
}
