/// Module that provides the lazy DFA store and its step function.
pub(crate) mod dfa;

/// Module with conversion to graphviz dot format.
#[cfg(feature = "dot_writer")]
pub(crate) mod dot;

/// Module for several ID types.
mod ids;

/// Module that provides the pattern compiler.
pub(crate) mod keys;

/// Module that provides the engine behind the public matcher.
pub(crate) mod matcher_impl;
pub(crate) use matcher_impl::MatcherImpl;

/// Module that provides the ternary path codec.
pub(crate) mod path;

/// Module that provides the byte translation tables.
pub(crate) mod translate;

/// Module that provides the row deduplication trie.
pub(crate) mod trie;
