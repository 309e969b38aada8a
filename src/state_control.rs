//! Boolean State Tracker
//!
//! [`StateControl`] owns a fixed-size array of boolean flags and a cached
//! "current" index, the flag most recently switched on through a path that
//! tracks it. Firmware UI and protocol layers build their own state machines
//! on top of it: one flag per screen, mode or module status, usually with
//! exactly one flag set at a time.
//!
//! # Capacity
//! The number of flags is fixed at construction and clamped to
//! `1..=MAX_CAPACITY`. Both the flag array and the snapshot buffer are
//! allocated once, fallibly. If either allocation fails the tracker is
//! *disabled*: its capacity is 0 and every operation is a no-op or returns
//! its "nothing" value.
//!
//! # Current index
//! The current index is a cache, not a derived value. Operations that set a
//! flag true update it; operations that clear the current flag drop it. Only
//! [`StateControl::invert_all`] searches for a replacement.
//!
//! # Invalid input
//! Out-of-range indices are ignored by mutations and read as `false` or
//! `None` by queries. Use [`StateControl::is_valid_index`] when the caller
//! needs to tell "unset" and "out of range" apart.
//!
//! # Usage
//! ```rust
//! use state_control::StateControl;
//!
//! let mut states = StateControl::new(4);
//! states.set_default();
//! assert_eq!(states.serialize(), "1000");
//!
//! states.save();
//! states.set_true(2, true);
//! assert_eq!(states.current_index(), Some(2));
//!
//! states.restore();
//! assert_eq!(states.current_index(), Some(0));
//! ```

use alloc::{boxed::Box, string::String, vec::Vec};
use core::fmt;

use crate::options::StateIndex;
use crate::text;

/// Largest number of flags a tracker holds
pub const MAX_CAPACITY: usize = 254;

/// Smallest number of flags a tracker holds
pub const MIN_CAPACITY: usize = 1;

/// Fixed-size boolean state array with a cached current index and one snapshot slot
#[derive(Debug, Clone)]
pub struct StateControl {
    /// Live flags, `capacity` entries
    flags: Box<[bool]>,
    /// Index of the flag most recently set true, if any
    current: Option<u8>,
    /// Snapshot written by `save`, same length as `flags`
    saved: Box<[bool]>,
    /// Current index at the time of `save`
    saved_current: Option<u8>,
}

/// Reasons [`StateControl::copy_from`] refuses to copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CopyError {
    /// Source or target is disabled
    Disabled,
    /// Source and target hold a different number of flags
    CapacityMismatch {
        /// Capacity of the target
        expected: usize,
        /// Capacity of the source
        found: usize,
    },
}

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyError::Disabled => write!(f, "state control is disabled"),
            CopyError::CapacityMismatch { expected, found } => {
                write!(f, "capacity mismatch: expected {expected}, found {found}")
            }
        }
    }
}

/// Human-readable form of the current index
///
/// Displays as `"<N> assigned"`, or `"- unassigned"` when there is no current index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentIndexText(pub Option<u8>);

impl fmt::Display for CurrentIndexText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(index) => write!(f, "{index} assigned"),
            None => f.write_str("- unassigned"),
        }
    }
}

impl StateControl {
    /// Creates a tracker with `requested` flags, all false
    ///
    /// `requested` is clamped to `MIN_CAPACITY..=MAX_CAPACITY`. If the flag or
    /// snapshot buffer cannot be allocated the tracker comes back disabled.
    pub fn new(requested: usize) -> Self {
        let capacity = requested.clamp(MIN_CAPACITY, MAX_CAPACITY);
        if capacity != requested {
            warn!("Requested {} states, clamped to {}", requested, capacity);
        }

        let Some(flags) = alloc_flags(capacity) else {
            warn!("State buffer allocation failed, state control disabled");
            return Self::disabled();
        };
        let Some(saved) = alloc_flags(capacity) else {
            warn!("Snapshot buffer allocation failed, state control disabled");
            return Self::disabled();
        };

        Self {
            flags,
            current: None,
            saved,
            saved_current: None,
        }
    }

    /// Creates a tracker sized to hold every value of `T`
    pub fn for_options<T: StateIndex>() -> Self {
        Self::new(usize::from(T::COUNT))
    }

    /// Creates a disabled tracker with no storage
    pub fn disabled() -> Self {
        Self {
            flags: Box::default(),
            current: None,
            saved: Box::default(),
            saved_current: None,
        }
    }

    /// Number of flags, 0 when disabled
    pub fn capacity(&self) -> usize {
        self.flags.len()
    }

    pub fn is_enabled(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Checks that `index` addresses a flag of an enabled tracker
    pub fn is_valid_index(&self, index: u8) -> bool {
        usize::from(index) < self.flags.len()
    }

    /// Sets `index` true and makes it current
    ///
    /// With `exclusive` every other flag is cleared.
    pub fn set_true(&mut self, index: u8, exclusive: bool) {
        if !self.is_valid_index(index) {
            return;
        }
        self.flags[usize::from(index)] = true;
        self.current = Some(index);
        if exclusive {
            self.clear_others(index);
        }
    }

    /// Sets `index` to `value`
    ///
    /// `true` behaves like [`set_true`](Self::set_true). `false` drops the
    /// current index if it pointed at `index`, without looking for another
    /// flag that is still set.
    pub fn set_value(&mut self, index: u8, value: bool, exclusive: bool) {
        if !self.is_valid_index(index) {
            return;
        }
        if value {
            self.set_true(index, exclusive);
            return;
        }
        self.flags[usize::from(index)] = false;
        if self.current == Some(index) {
            self.current = None;
        }
    }

    /// Flips `index`; switching on is always exclusive
    pub fn toggle(&mut self, index: u8) {
        if !self.is_valid_index(index) {
            return;
        }
        let slot = usize::from(index);
        self.flags[slot] = !self.flags[slot];
        if self.flags[slot] {
            self.current = Some(index);
            self.clear_others(index);
        } else if self.current == Some(index) {
            self.current = None;
        }
    }

    /// Clears every flag and the current index
    pub fn reset_all(&mut self) {
        self.flags.fill(false);
        self.current = None;
    }

    /// Sets every flag to `value`
    ///
    /// When `value` is true index 0 becomes current.
    pub fn set_all(&mut self, value: bool) {
        if !self.is_enabled() {
            return;
        }
        self.flags.fill(value);
        self.current = if value { Some(0) } else { None };
    }

    /// Rest state: only flag 0 set, and current
    pub fn set_default(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.flags.fill(false);
        self.flags[0] = true;
        self.current = Some(0);
    }

    /// Clears the whole array, then sets `start..=end` to `value`
    ///
    /// `end` is clamped to the last index. Flags outside the range end up
    /// false as well. When `value` is true the first index in the range
    /// becomes current. Nothing happens if `start` is out of range.
    pub fn set_range(&mut self, start: u8, end: u8, value: bool) {
        if !self.is_valid_index(start) {
            return;
        }
        let last = self.flags.len() - 1;
        let end = usize::from(end).min(last);

        self.reset_all();
        for slot in usize::from(start)..=end {
            self.flags[slot] = value;
        }
        if value && usize::from(start) <= end {
            self.current = Some(start);
        }
    }

    /// Flips every flag
    ///
    /// The current index survives if its flag is now set, otherwise the
    /// first set flag takes over.
    pub fn invert_all(&mut self) {
        if !self.is_enabled() {
            return;
        }
        for flag in self.flags.iter_mut() {
            *flag = !*flag;
        }
        self.current = match self.current {
            Some(index) if self.flags[usize::from(index)] => Some(index),
            _ => self.first_true_index(),
        };
    }

    /// Value of `index`, `false` when out of range
    pub fn get(&self, index: u8) -> bool {
        self.flags.get(usize::from(index)).copied().unwrap_or(false)
    }

    /// Iterates over the flags in index order
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.flags.iter().copied()
    }

    pub fn first_true_index(&self) -> Option<u8> {
        self.find_first(true)
    }

    /// First index whose flag equals `value`
    pub fn find_first(&self, value: bool) -> Option<u8> {
        self.flags
            .iter()
            .position(|&flag| flag == value)
            .map(|slot| slot as u8)
    }

    /// All set indices in ascending order
    pub fn all_true_indices(&self) -> Vec<u8> {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(slot, &flag)| flag.then_some(slot as u8))
            .collect()
    }

    /// Cached current index, no scan
    pub fn current_index(&self) -> Option<u8> {
        self.current
    }

    pub fn current_index_text(&self) -> CurrentIndexText {
        CurrentIndexText(self.current)
    }

    /// Writes [`current_index_text`](Self::current_index_text) into `buf`
    ///
    /// The text is truncated to fit and always NUL terminated inside `buf`.
    /// Returns the number of bytes before the terminator.
    pub fn write_current_index(&self, buf: &mut [u8]) -> usize {
        text::write_terminated(buf, format_args!("{}", self.current_index_text()))
    }

    /// True when at least one flag is set
    pub fn is_any_assigned(&self) -> bool {
        self.first_true_index().is_some()
    }

    pub fn count_true(&self) -> u8 {
        self.flags.iter().filter(|&&flag| flag).count() as u8
    }

    pub fn is_exactly_one_true(&self) -> bool {
        self.count_true() == 1
    }

    /// Buffer size needed by [`serialize_into`](Self::serialize_into), terminator included
    pub fn serialized_size(&self) -> usize {
        self.flags.len() + 1
    }

    /// Writes one `'1'`/`'0'` byte per flag followed by a NUL
    ///
    /// At most `buf.len() - 1` flags are written. A disabled tracker writes
    /// only the terminator. Returns the number of flag bytes written.
    pub fn serialize_into(&self, buf: &mut [u8]) -> usize {
        let Some(room) = buf.len().checked_sub(1) else {
            return 0;
        };
        let len = self.flags.len().min(room);
        for (byte, &flag) in buf.iter_mut().zip(self.flags.iter()).take(len) {
            *byte = if flag { b'1' } else { b'0' };
        }
        buf[len] = 0;
        len
    }

    /// Flags as a `'0'`/`'1'` string in index order
    pub fn serialize(&self) -> String {
        self.flags.iter().map(|&flag| if flag { '1' } else { '0' }).collect()
    }

    /// Stores the flags and current index in the snapshot slot
    ///
    /// A later call overwrites the previous snapshot.
    pub fn save(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.saved.copy_from_slice(&self.flags);
        self.saved_current = self.current;
    }

    /// Brings back the flags and current index from the last [`save`](Self::save)
    pub fn restore(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.flags.copy_from_slice(&self.saved);
        self.current = self.saved_current;
        trace!("States restored, current index {}", self.current);
    }

    /// Copies flags and current index from `source`
    ///
    /// Both trackers must be enabled and of equal capacity; on error `self`
    /// is left unchanged. The snapshot slot is not copied.
    pub fn copy_from(&mut self, source: &StateControl) -> Result<(), CopyError> {
        if !self.is_enabled() || !source.is_enabled() {
            debug!("Copy refused, state control disabled");
            return Err(CopyError::Disabled);
        }
        if self.capacity() != source.capacity() {
            debug!(
                "Copy refused, capacity {} vs {}",
                self.capacity(),
                source.capacity()
            );
            return Err(CopyError::CapacityMismatch {
                expected: self.capacity(),
                found: source.capacity(),
            });
        }
        self.flags.copy_from_slice(&source.flags);
        self.current = source.current;
        Ok(())
    }

    /// Sets the flag named by `option`, see [`set_value`](Self::set_value)
    pub fn set_option<T: StateIndex>(&mut self, option: T, value: bool, exclusive: bool) {
        self.set_value(option.index(), value, exclusive);
    }

    /// True when `option` is the current index and its flag is set
    pub fn is_option<T: StateIndex>(&self, option: T) -> bool {
        let index = option.index();
        self.current == Some(index) && self.get(index)
    }

    fn clear_others(&mut self, index: u8) {
        let keep = usize::from(index);
        for (slot, flag) in self.flags.iter_mut().enumerate() {
            if slot != keep {
                *flag = false;
            }
        }
    }
}

impl Default for StateControl {
    fn default() -> Self {
        Self::new(MIN_CAPACITY)
    }
}

impl fmt::Display for StateControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &flag in self.flags.iter() {
            f.write_str(if flag { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StateControl {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "StateControl {{ flags: {=[?]}, current: {} }}",
            &self.flags[..],
            self.current
        )
    }
}

/// Zeroed flag buffer, `None` if the allocator refuses
fn alloc_flags(len: usize) -> Option<Box<[bool]>> {
    let mut flags = Vec::new();
    flags.try_reserve_exact(len).ok()?;
    flags.resize(len, false);
    Some(flags.into_boxed_slice())
}
