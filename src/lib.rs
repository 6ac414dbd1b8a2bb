//! # keyweave
//!
//! Online recognition of temporal key patterns from a live input stream.
//!
//! Two independent engines recognize two kinds of patterns:
//! - **Sequences**: exact ordered runs of pressed symbols ("press A, then B,
//!   then C"), matched by a prefix trie with a single current position.
//! - **Chords**: unordered sets of simultaneously held symbols ("A and B and
//!   C all down at once"), matched by subset tests against the live held-set.
//!
//! # Architecture
//!
//! ```text
//! Raw down/up events
//!       ↓
//! ┌─────────────────────────┐
//! │  InputDispatcher        │ ← Held-set per domain, repeat synthesis
//! │  - key domain           │
//! │  - code domain          │
//! └─────────────────────────┘
//!       ↓              ↓
//! ┌──────────────┐ ┌──────────────┐
//! │  Sequence    │ │  Chord       │
//! │  Matcher     │ │  Matcher     │
//! │  (trie)      │ │  (subset)    │
//! └──────────────┘ └──────────────┘
//!       ↓              ↓
//! Registered callbacks fire inline
//! ```
//!
//! Everything is single-threaded and strictly synchronous: each fed event is
//! handled to completion, callbacks included, before the next is accepted.
//!
//! # Usage Example
//!
//! ```rust
//! use keyweave::{InputDispatcher, KeyEvent};
//!
//! # fn main() -> keyweave::Result<()> {
//! let mut dispatcher = InputDispatcher::new();
//!
//! dispatcher.add_code_sequence(["KeyQ", "KeyW", "KeyE"], || {
//!     println!("fork in the road");
//! })?;
//! dispatcher.add_key_chord_pressed(["q", "w"], || {
//!     println!("chord engaged");
//! })?;
//! dispatcher.add_reset_code_sequence(["Escape"])?;
//!
//! dispatcher.feed(KeyEvent::Down {
//!     key: "q".to_string(),
//!     code: "KeyQ".to_string(),
//! });
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Chord (simultaneous-hold) matching
pub mod chord;

/// Declarative TOML bindings
pub mod config;

/// Facade routing raw events to the matchers
pub mod dispatcher;

/// Registration error types
pub mod error;

/// Prefix-trie sequence matching
pub mod sequence;

pub use chord::{ChordAction, ChordMatcher};
pub use config::{
    BindingsConfig, ChordBinding, ChordPhase, ResetSequenceBinding, SequenceBinding, SymbolDomain,
};
pub use dispatcher::{InputDispatcher, KeyEvent};
pub use error::{RegisterError, Result};
pub use sequence::{SequenceAction, SequenceMatcher};

use std::fmt::Debug;
use std::hash::Hash;

/// Marker for types usable as input symbols.
///
/// A symbol is an opaque identifier for one input unit: a logical key name,
/// a physical code, a gamepad button. Equality is by value; any clonable,
/// hashable, debuggable type qualifies via the blanket impl.
pub trait Symbol: Clone + Eq + Hash + Debug {}

impl<T> Symbol for T where T: Clone + Eq + Hash + Debug {}
