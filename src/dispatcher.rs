//! Input Dispatcher
//!
//! Top-level facade that owns the matchers and held-sets for both symbol
//! domains and routes raw down/up notifications to them.
//!
//! The raw source (a DOM-style listener, a terminal, a test script) reports
//! only "key down" and "key up", each carrying the logical key name and the
//! physical code of the same underlying event. Key-down auto-repeat is not
//! distinguishable at the source, so the dispatcher synthesizes the
//! first-press vs repeat distinction itself, per domain, by checking held-set
//! membership before mutating it.

use std::collections::HashSet;

use tracing::trace;

use crate::chord::ChordMatcher;
use crate::config::{BindingsConfig, ChordPhase, SymbolDomain};
use crate::error::Result;
use crate::sequence::SequenceMatcher;
use crate::Symbol;

/// Raw key transition reported by the input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    /// Key is down. Covers both first presses and auto-repeats; the
    /// dispatcher tells them apart.
    Down {
        /// Logical key identity (e.g. `"q"`)
        key: String,
        /// Physical code identity (e.g. `"KeyQ"`)
        code: String,
    },
    /// Key transitioned to up.
    Up {
        /// Logical key identity
        key: String,
        /// Physical code identity
        code: String,
    },
}

/// Held-set plus matchers for one symbol domain.
struct Domain<S: Symbol> {
    name: &'static str,
    held: HashSet<S>,
    sequences: SequenceMatcher<S>,
    chords: ChordMatcher<S>,
}

impl<S: Symbol> Domain<S> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            held: HashSet::new(),
            sequences: SequenceMatcher::new(),
            chords: ChordMatcher::new(),
        }
    }

    /// Down transition. First press advances the sequence matcher and runs a
    /// chord press pass; a repeat runs a chord hold pass only.
    fn press(&mut self, symbol: S) {
        if self.held.contains(&symbol) {
            trace!(domain = self.name, ?symbol, "repeat");
            self.chords.on_hold(&self.held);
            return;
        }

        trace!(domain = self.name, ?symbol, "press");
        self.held.insert(symbol.clone());
        self.sequences.on_symbol(&symbol);
        self.chords.on_press(&self.held);
    }

    /// Up transition. The release pass must see the post-removal set so the
    /// lifted symbol counts as absent. An up for a symbol that was never
    /// held is ignored.
    fn release(&mut self, symbol: &S) {
        if !self.held.remove(symbol) {
            trace!(domain = self.name, ?symbol, "release of unheld symbol ignored");
            return;
        }

        trace!(domain = self.name, ?symbol, "release");
        self.chords.on_release(&self.held);
    }

    fn reset(&mut self) {
        self.held.clear();
        self.sequences.reset();
        self.chords.reset();
    }
}

/// Facade owning one sequence matcher, one chord matcher, and one held-set
/// per symbol domain.
///
/// The two domains (logical key, physical code) are driven from the same raw
/// event but tracked fully independently. There is no shared or global
/// instance; construct one explicitly and feed it events.
pub struct InputDispatcher {
    key: Domain<String>,
    code: Domain<String>,
    events_processed: u64,
}

impl InputDispatcher {
    /// Create a dispatcher with empty held-sets and no registered patterns.
    pub fn new() -> Self {
        Self {
            key: Domain::new("key"),
            code: Domain::new("code"),
            events_processed: 0,
        }
    }

    /// Feed one raw transition from the input source.
    ///
    /// The event is handled to completion, including firing any registered
    /// callbacks inline, before this returns.
    pub fn feed(&mut self, event: KeyEvent) {
        self.events_processed += 1;
        match event {
            KeyEvent::Down { key, code } => {
                self.key.press(key);
                self.code.press(code);
            }
            KeyEvent::Up { key, code } => {
                self.key.release(&key);
                self.code.release(&code);
            }
        }
    }

    /// Register an ordered sequence over logical key names.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegisterError::EmptySequence`] for an empty path.
    pub fn add_key_sequence<I, T>(&mut self, path: I, action: impl FnMut() + 'static) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.key
            .sequences
            .register(path.into_iter().map(Into::into), action)
    }

    /// Register an ordered sequence over physical codes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegisterError::EmptySequence`] for an empty path.
    pub fn add_code_sequence<I, T>(&mut self, path: I, action: impl FnMut() + 'static) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.code
            .sequences
            .register(path.into_iter().map(Into::into), action)
    }

    /// Register a key-domain sequence whose only effect is resetting that
    /// domain's sequence matcher.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegisterError::EmptySequence`] for an empty path.
    pub fn add_reset_key_sequence<I, T>(&mut self, path: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.key
            .sequences
            .register_reset(path.into_iter().map(Into::into))
    }

    /// Register a code-domain sequence whose only effect is resetting that
    /// domain's sequence matcher.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegisterError::EmptySequence`] for an empty path.
    pub fn add_reset_code_sequence<I, T>(&mut self, path: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.code
            .sequences
            .register_reset(path.into_iter().map(Into::into))
    }

    /// Register a pressed callback for a chord of logical key names.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegisterError::EmptyChord`] for an empty symbol set.
    pub fn add_key_chord_pressed<I, T>(
        &mut self,
        symbols: I,
        action: impl FnMut() + 'static,
    ) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.key
            .chords
            .register_pressed(symbols.into_iter().map(Into::into), action)
    }

    /// Register a held callback for a chord of logical key names.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegisterError::EmptyChord`] for an empty symbol set.
    pub fn add_key_chord_held<I, T>(
        &mut self,
        symbols: I,
        action: impl FnMut() + 'static,
    ) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.key
            .chords
            .register_held(symbols.into_iter().map(Into::into), action)
    }

    /// Register a released callback for a chord of logical key names.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegisterError::EmptyChord`] for an empty symbol set.
    pub fn add_key_chord_released<I, T>(
        &mut self,
        symbols: I,
        action: impl FnMut() + 'static,
    ) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.key
            .chords
            .register_released(symbols.into_iter().map(Into::into), action)
    }

    /// Register a pressed callback for a chord of physical codes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegisterError::EmptyChord`] for an empty symbol set.
    pub fn add_code_chord_pressed<I, T>(
        &mut self,
        symbols: I,
        action: impl FnMut() + 'static,
    ) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.code
            .chords
            .register_pressed(symbols.into_iter().map(Into::into), action)
    }

    /// Register a held callback for a chord of physical codes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegisterError::EmptyChord`] for an empty symbol set.
    pub fn add_code_chord_held<I, T>(
        &mut self,
        symbols: I,
        action: impl FnMut() + 'static,
    ) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.code
            .chords
            .register_held(symbols.into_iter().map(Into::into), action)
    }

    /// Register a released callback for a chord of physical codes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegisterError::EmptyChord`] for an empty symbol set.
    pub fn add_code_chord_released<I, T>(
        &mut self,
        symbols: I,
        action: impl FnMut() + 'static,
    ) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.code
            .chords
            .register_released(symbols.into_iter().map(Into::into), action)
    }

    /// Register every binding from a loaded config.
    ///
    /// Each binding becomes a closure that forwards the binding's action
    /// name to `handler` when it fires.
    ///
    /// # Errors
    ///
    /// Propagates registration errors for bindings with empty symbol lists
    /// (a validated config never produces these).
    pub fn apply_bindings<F>(&mut self, config: &BindingsConfig, handler: F) -> Result<()>
    where
        F: Fn(&str) + Clone + 'static,
    {
        for binding in &config.sequences {
            let name = binding.action.clone();
            let forward = handler.clone();
            let action = move || forward(&name);
            let path = binding.keys.iter().cloned();
            match binding.domain {
                SymbolDomain::Key => self.key.sequences.register(path, action)?,
                SymbolDomain::Code => self.code.sequences.register(path, action)?,
            }
        }

        for binding in &config.reset_sequences {
            let path = binding.keys.iter().cloned();
            match binding.domain {
                SymbolDomain::Key => self.key.sequences.register_reset(path)?,
                SymbolDomain::Code => self.code.sequences.register_reset(path)?,
            }
        }

        for binding in &config.chords {
            let name = binding.action.clone();
            let forward = handler.clone();
            let action = move || forward(&name);
            let symbols = binding.keys.iter().cloned();
            let chords = match binding.domain {
                SymbolDomain::Key => &mut self.key.chords,
                SymbolDomain::Code => &mut self.code.chords,
            };
            match binding.phase {
                ChordPhase::Pressed => chords.register_pressed(symbols, action)?,
                ChordPhase::Held => chords.register_held(symbols, action)?,
                ChordPhase::Released => chords.register_released(symbols, action)?,
            }
        }

        Ok(())
    }

    /// Whether a logical key is currently held.
    pub fn is_key_held(&self, key: &str) -> bool {
        self.key.held.contains(key)
    }

    /// Whether a physical code is currently held.
    pub fn is_code_held(&self, code: &str) -> bool {
        self.code.held.contains(code)
    }

    /// Number of logical keys currently held.
    pub fn held_key_count(&self) -> usize {
        self.key.held.len()
    }

    /// Total raw events fed so far.
    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Clear all held-sets, sequence positions, and chord engagement.
    ///
    /// Registered patterns are kept; released callbacks are not fired.
    pub fn reset(&mut self) {
        self.key.reset();
        self.code.reset();
        trace!("dispatcher state reset");
    }
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
