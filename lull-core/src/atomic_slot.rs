// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Lock-free single-value cell.
//!
//! [`AtomicSlot`] holds at most one boxed value behind an [`AtomicPtr`]. The
//! only way in or out is an atomic exchange, so a value placed in the slot is
//! handed to exactly one caller of [`swap`](AtomicSlot::swap) or
//! [`take`](AtomicSlot::take).

use core::fmt;
use core::marker::PhantomData;
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

/// A lock-free cell holding zero or one value of type `T`.
///
/// # Example
///
/// ```
/// use lull_core::AtomicSlot;
///
/// let slot = AtomicSlot::new();
/// assert_eq!(slot.swap(Some("first")), None);
/// assert_eq!(slot.swap(Some("second")), Some("first"));
/// assert_eq!(slot.take(), Some("second"));
/// assert_eq!(slot.take(), None);
/// ```
pub struct AtomicSlot<T> {
    ptr: AtomicPtr<T>,
    _owns: PhantomData<Box<T>>,
}

impl<T> AtomicSlot<T> {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self {
            ptr: AtomicPtr::new(ptr::null_mut()),
            _owns: PhantomData,
        }
    }

    /// Atomically replace the content, returning what was there before.
    pub fn swap(&self, value: Option<T>) -> Option<T> {
        let new = value.map_or(ptr::null_mut(), |v| Box::into_raw(Box::new(v)));
        let old = self.ptr.swap(new, Ordering::AcqRel);
        Self::reclaim(old)
    }

    /// Atomically take the content, leaving the slot empty.
    pub fn take(&self) -> Option<T> {
        self.swap(None)
    }

    /// Whether the slot currently holds a value.
    ///
    /// The answer may be stale by the time the caller acts on it.
    pub fn is_occupied(&self) -> bool {
        !self.ptr.load(Ordering::Acquire).is_null()
    }

    fn reclaim(raw: *mut T) -> Option<T> {
        if raw.is_null() {
            None
        } else {
            // SAFETY: non-null pointers stored in the slot always come from
            // `Box::into_raw`, and the exchange that returned `raw` removed it
            // from the slot, so this caller is its sole owner.
            Some(*unsafe { Box::from_raw(raw) })
        }
    }
}

impl<T> Default for AtomicSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for AtomicSlot<T> {
    fn drop(&mut self) {
        drop(self.take());
    }
}

impl<T> fmt::Debug for AtomicSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicSlot")
            .field("occupied", &self.is_occupied())
            .finish()
    }
}

// SAFETY: values move between threads through the slot, never shared by reference.
unsafe impl<T: Send> Send for AtomicSlot<T> {}
// SAFETY: `&AtomicSlot<T>` only allows moving whole values in and out.
unsafe impl<T: Send> Sync for AtomicSlot<T> {}
