//! Prefix-Trie Sequence Matcher
//!
//! Recognizes ordered key sequences from a live stream of pressed symbols.
//! Registered paths are stored in a trie; the matcher keeps a single current
//! position that advances on each matching symbol and hard-resets to the root
//! on the first mismatch.
//!
//! This is a direct-transition automaton, not an Aho-Corasick-style
//! failure-link automaton: a mismatch returns fully to the root and the
//! mismatching symbol is spent. It does not get re-evaluated as the start of
//! a fresh attempt.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::error::{RegisterError, Result};
use crate::Symbol;

/// Callback invoked when a registered sequence completes.
pub type SequenceAction = Box<dyn FnMut() + 'static>;

/// Terminal action attached to a trie node.
enum NodeAction {
    /// Run a caller-supplied callback.
    Run(SequenceAction),
    /// Return the matcher to the root position, nothing else.
    Reset,
}

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

const ROOT: NodeId = NodeId(0);

/// One trie node: child transitions plus an optional terminal action.
struct Node<S> {
    children: HashMap<S, NodeId>,
    action: Option<NodeAction>,
}

impl<S> Node<S> {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            action: None,
        }
    }
}

/// Online matcher for ordered symbol sequences.
///
/// Nodes are created lazily during registration and live for the lifetime of
/// the matcher. Registration may continue at any time, including after
/// matches have occurred; extending an existing path does not disturb the
/// current position.
pub struct SequenceMatcher<S: Symbol> {
    nodes: Vec<Node<S>>,
    current: NodeId,
}

impl<S: Symbol> SequenceMatcher<S> {
    /// Create an empty matcher positioned at the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            current: ROOT,
        }
    }

    /// Register an ordered sequence of symbols with a completion callback.
    ///
    /// Paths sharing a prefix share trie structure. Registering the exact
    /// same path again overwrites the previous action (last write wins). A
    /// shorter path's terminal may be an interior node of a longer path.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::EmptySequence`] if `path` yields no symbols.
    pub fn register<I>(&mut self, path: I, action: impl FnMut() + 'static) -> Result<()>
    where
        I: IntoIterator<Item = S>,
    {
        self.insert(path, NodeAction::Run(Box::new(action)))
    }

    /// Register a sequence whose only effect is resetting this matcher.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::EmptySequence`] if `path` yields no symbols.
    pub fn register_reset<I>(&mut self, path: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
    {
        self.insert(path, NodeAction::Reset)
    }

    /// Iterative insertion walk: advance one symbol at a time, creating a
    /// child when absent, then attach the action to the terminal node.
    fn insert<I>(&mut self, path: I, action: NodeAction) -> Result<()>
    where
        I: IntoIterator<Item = S>,
    {
        let mut cursor = ROOT;
        let mut len = 0usize;

        for symbol in path {
            len += 1;
            cursor = match self.nodes[cursor.0].children.get(&symbol) {
                Some(&child) => child,
                None => {
                    let child = NodeId(self.nodes.len());
                    self.nodes.push(Node::new());
                    self.nodes[cursor.0].children.insert(symbol, child);
                    child
                }
            };
        }

        if len == 0 {
            return Err(RegisterError::EmptySequence);
        }

        self.nodes[cursor.0].action = Some(action);
        trace!(depth = len, nodes = self.nodes.len(), "sequence registered");
        Ok(())
    }

    /// Advance the matcher by one pressed symbol.
    ///
    /// Called once per first-press event (not per repeat or release). If the
    /// current node has a transition for `symbol` the matcher advances, runs
    /// the terminal action if one is present, and auto-resets when the new
    /// node is a leaf. Otherwise the matcher hard-resets to the root; the
    /// mismatching symbol is not retried from the root.
    ///
    /// Returns `true` if a terminal action fired at this step.
    pub fn on_symbol(&mut self, symbol: &S) -> bool {
        let Some(&next) = self.nodes[self.current.0].children.get(symbol) else {
            trace!(?symbol, "no transition, hard reset to root");
            self.current = ROOT;
            return false;
        };

        self.current = next;

        let fired = match self.nodes[next.0].action.as_mut() {
            Some(NodeAction::Run(callback)) => {
                debug!(?symbol, "sequence completed");
                callback();
                true
            }
            Some(NodeAction::Reset) => {
                debug!(?symbol, "reset sequence completed");
                self.current = ROOT;
                true
            }
            None => false,
        };

        // A leaf terminal has nothing left to extend; a terminal with
        // children stays put so a longer shared-prefix sequence can still
        // complete.
        if self.nodes[next.0].children.is_empty() {
            self.current = ROOT;
        }

        fired
    }

    /// Return the matcher to the root position.
    pub fn reset(&mut self) {
        self.current = ROOT;
    }

    /// Whether the matcher is positioned at the root (no partial match).
    pub fn at_root(&self) -> bool {
        self.current == ROOT
    }

    /// Total number of trie nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<S: Symbol> Default for SequenceMatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> fmt::Debug for SequenceMatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceMatcher")
            .field("nodes", &self.nodes.len())
            .field("at_root", &self.at_root())
            .finish()
    }
}
