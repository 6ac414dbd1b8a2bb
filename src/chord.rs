//! Chord Matcher
//!
//! Recognizes unordered sets of simultaneously held symbols. Each registered
//! chord carries independent pressed/held/released callback slots and an
//! active flag; the matcher evaluates subset relationships against the live
//! held-set on every input transition.
//!
//! The subset test is the sole membership predicate: extra unrelated held
//! keys never prevent a chord from being considered engaged, and overlapping
//! chords are tracked as fully independent entries.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, trace};

use crate::error::{RegisterError, Result};
use crate::Symbol;

/// Callback invoked on a chord transition.
pub type ChordAction = Box<dyn FnMut() + 'static>;

/// One registered chord: its symbol set, callback slots, and engagement flag.
struct ChordEntry<S> {
    chord: HashSet<S>,
    pressed: Option<ChordAction>,
    held: Option<ChordAction>,
    released: Option<ChordAction>,
    active: bool,
}

impl<S> ChordEntry<S> {
    fn new(chord: HashSet<S>) -> Self {
        Self {
            chord,
            pressed: None,
            held: None,
            released: None,
            active: false,
        }
    }
}

/// Matcher for simultaneous-hold chords.
///
/// Entry identity is set equality: registrations whose symbol lists differ
/// only by order or duplicates coalesce into one entry, and re-registering a
/// callback kind replaces only that slot.
pub struct ChordMatcher<S: Symbol> {
    entries: Vec<ChordEntry<S>>,
}

impl<S: Symbol> ChordMatcher<S> {
    /// Create a matcher with no registered chords.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a callback for the moment all of `symbols` become held.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::EmptyChord`] if `symbols` yields no symbols.
    pub fn register_pressed<I>(&mut self, symbols: I, action: impl FnMut() + 'static) -> Result<()>
    where
        I: IntoIterator<Item = S>,
    {
        let index = self.entry_index(symbols)?;
        self.entries[index].pressed = Some(Box::new(action));
        Ok(())
    }

    /// Register a callback for repeat notifications while the chord is held.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::EmptyChord`] if `symbols` yields no symbols.
    pub fn register_held<I>(&mut self, symbols: I, action: impl FnMut() + 'static) -> Result<()>
    where
        I: IntoIterator<Item = S>,
    {
        let index = self.entry_index(symbols)?;
        self.entries[index].held = Some(Box::new(action));
        Ok(())
    }

    /// Register a callback for the moment an engaged chord loses a symbol.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::EmptyChord`] if `symbols` yields no symbols.
    pub fn register_released<I>(&mut self, symbols: I, action: impl FnMut() + 'static) -> Result<()>
    where
        I: IntoIterator<Item = S>,
    {
        let index = self.entry_index(symbols)?;
        self.entries[index].released = Some(Box::new(action));
        Ok(())
    }

    /// Find or create the entry whose chord set equals `symbols`.
    fn entry_index<I>(&mut self, symbols: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
    {
        let chord: HashSet<S> = symbols.into_iter().collect();
        if chord.is_empty() {
            return Err(RegisterError::EmptyChord);
        }

        match self.entries.iter().position(|entry| entry.chord == chord) {
            Some(index) => Ok(index),
            None => {
                self.entries.push(ChordEntry::new(chord));
                Ok(self.entries.len() - 1)
            }
        }
    }

    /// Press transition: `held` already contains the newly pressed symbol.
    ///
    /// Every inactive entry whose chord is a subset of `held` fires its
    /// pressed callback (if any) and becomes active. Already-active entries
    /// are skipped entirely, so pressed never re-fires while engaged.
    ///
    /// Returns the number of entries that became active.
    pub fn on_press(&mut self, held: &HashSet<S>) -> usize {
        let mut engaged = 0;
        for entry in &mut self.entries {
            if entry.active || !entry.chord.is_subset(held) {
                continue;
            }
            debug!(chord = ?entry.chord, "chord engaged");
            if let Some(callback) = entry.pressed.as_mut() {
                callback();
            }
            entry.active = true;
            engaged += 1;
        }
        engaged
    }

    /// Repeat transition for a symbol that was already down.
    ///
    /// Every active entry whose chord is still a subset of `held` fires its
    /// held callback (if any). Activation state never changes here.
    ///
    /// Returns the number of held callbacks fired.
    pub fn on_hold(&mut self, held: &HashSet<S>) -> usize {
        let mut fired = 0;
        for entry in &mut self.entries {
            if !entry.active || !entry.chord.is_subset(held) {
                continue;
            }
            if let Some(callback) = entry.held.as_mut() {
                trace!(chord = ?entry.chord, "chord held");
                callback();
                fired += 1;
            }
        }
        fired
    }

    /// Release transition: `held` already excludes the lifted symbol.
    ///
    /// Every active entry whose chord is no longer a subset of `held` fires
    /// its released callback (if any) and becomes inactive. Active entries
    /// whose chord remains fully held are untouched.
    ///
    /// Returns the number of entries that disengaged.
    pub fn on_release(&mut self, held: &HashSet<S>) -> usize {
        let mut disengaged = 0;
        for entry in &mut self.entries {
            if !entry.active || entry.chord.is_subset(held) {
                continue;
            }
            debug!(chord = ?entry.chord, "chord disengaged");
            if let Some(callback) = entry.released.as_mut() {
                callback();
            }
            entry.active = false;
            disengaged += 1;
        }
        disengaged
    }

    /// Clear all engagement flags without firing released callbacks.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.active = false;
        }
    }

    /// Number of registered chord entries (after coalescing).
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of currently engaged chords.
    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.active).count()
    }
}

impl<S: Symbol> Default for ChordMatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> fmt::Debug for ChordMatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChordMatcher")
            .field("entries", &self.entries.len())
            .field("active", &self.active_count())
            .finish()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Random press/release walk over a small alphabet. After every release
    /// pass, engagement must agree exactly with the subset predicate.
    #[derive(Debug, Clone)]
    enum Op {
        Press(u8),
        Release(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..4).prop_map(Op::Press),
            (0u8..4).prop_map(Op::Release),
        ]
    }

    proptest! {
        #[test]
        fn engagement_tracks_the_subset_predicate(
            ops in prop::collection::vec(op_strategy(), 0..200),
        ) {
            let pressed = Rc::new(Cell::new(0i32));
            let released = Rc::new(Cell::new(0i32));
            let p = Rc::clone(&pressed);
            let r = Rc::clone(&released);

            let mut matcher = ChordMatcher::new();
            matcher.register_pressed(vec![0u8, 1], move || p.set(p.get() + 1)).unwrap();
            matcher.register_released(vec![0u8, 1], move || r.set(r.get() + 1)).unwrap();

            let chord: HashSet<u8> = [0u8, 1].into_iter().collect();
            let mut held: HashSet<u8> = HashSet::new();

            for op in ops {
                match op {
                    Op::Press(symbol) => {
                        if held.insert(symbol) {
                            matcher.on_press(&held);
                        } else {
                            matcher.on_hold(&held);
                        }
                    }
                    Op::Release(symbol) => {
                        if held.remove(&symbol) {
                            matcher.on_release(&held);
                        }
                    }
                }

                let balance = pressed.get() - released.get();
                prop_assert!(balance == 0 || balance == 1);
                prop_assert_eq!(balance == 1, chord.is_subset(&held));
                prop_assert_eq!(matcher.active_count() == 1, chord.is_subset(&held));
            }
        }
    }
}
