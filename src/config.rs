//! Bindings configuration
//!
//! Declarative TOML description of sequences, reset sequences, and chords,
//! binding symbol lists to named actions. The dispatcher applies a loaded
//! config by registering one closure per binding that forwards the action
//! name to a caller-supplied handler.
//!
//! ```toml
//! [[sequences]]
//! keys = ["KeyQ", "KeyW", "KeyE"]
//! action = "fork-in-the-road"
//! domain = "code"
//!
//! [[reset_sequences]]
//! keys = ["Escape"]
//! domain = "code"
//!
//! [[chords]]
//! keys = ["q", "w", "e"]
//! action = "chord-held"
//! phase = "held"
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete set of declarative bindings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingsConfig {
    /// Ordered sequence bindings
    #[serde(default)]
    pub sequences: Vec<SequenceBinding>,
    /// Sequences that only reset the matcher for their domain
    #[serde(default)]
    pub reset_sequences: Vec<ResetSequenceBinding>,
    /// Simultaneous-hold chord bindings
    #[serde(default)]
    pub chords: Vec<ChordBinding>,
}

/// One ordered sequence bound to a named action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceBinding {
    /// Symbols in press order
    pub keys: Vec<String>,
    /// Action name forwarded to the handler on recognition
    pub action: String,
    /// Symbol domain the sequence is matched in
    #[serde(default)]
    pub domain: SymbolDomain,
}

/// One sequence that resets its domain's sequence matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetSequenceBinding {
    /// Symbols in press order
    pub keys: Vec<String>,
    /// Symbol domain the sequence is matched in
    #[serde(default)]
    pub domain: SymbolDomain,
}

/// One chord bound to a named action for a single transition phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChordBinding {
    /// Symbols that must be simultaneously held (order irrelevant)
    pub keys: Vec<String>,
    /// Action name forwarded to the handler on the chosen phase
    pub action: String,
    /// Which chord transition triggers the action
    #[serde(default)]
    pub phase: ChordPhase,
    /// Symbol domain the chord is matched in
    #[serde(default)]
    pub domain: SymbolDomain,
}

/// Which symbol identity a binding is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolDomain {
    /// Logical key identity (layout-dependent, e.g. `"q"`)
    #[default]
    Key,
    /// Physical code identity (layout-independent, e.g. `"KeyQ"`)
    Code,
}

/// Chord transition phase a binding listens to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordPhase {
    /// The moment all chord symbols become held
    #[default]
    Pressed,
    /// Repeat notifications while the chord stays held
    Held,
    /// The moment an engaged chord loses a symbol
    Released,
}

impl BindingsConfig {
    /// Load and validate a bindings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read bindings file: {}", path.display()))?;

        let config: Self = toml::from_str(&content).context("Failed to parse bindings file")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate binding contents beyond what deserialization enforces.
    pub fn validate(&self) -> Result<()> {
        for (index, binding) in self.sequences.iter().enumerate() {
            if binding.keys.is_empty() {
                bail!("sequence binding #{} has no keys", index + 1);
            }
            if binding.action.is_empty() {
                bail!("sequence binding #{} has an empty action name", index + 1);
            }
        }
        for (index, binding) in self.reset_sequences.iter().enumerate() {
            if binding.keys.is_empty() {
                bail!("reset sequence binding #{} has no keys", index + 1);
            }
        }
        for (index, binding) in self.chords.iter().enumerate() {
            if binding.keys.is_empty() {
                bail!("chord binding #{} has no keys", index + 1);
            }
            if binding.action.is_empty() {
                bail!("chord binding #{} has an empty action name", index + 1);
            }
        }
        Ok(())
    }

    /// Total number of bindings of all kinds.
    pub fn binding_count(&self) -> usize {
        self.sequences.len() + self.reset_sequences.len() + self.chords.len()
    }
}
