//! # treedump
//!
//! Structural snapshots of UI element trees.
//!
//! A [`TreeDumper`] walks any tree that implements [`Node`], keeps the attributes
//! the [`PropertyFilter`] allows, renders each one with the output format's
//! translator, and writes a deterministic document (JSON by default). Two such
//! documents are then checked for semantic equality with [`compare_dumps`], which
//! tolerates small numeric drift, honors the `<ANYTHING>` wildcard and ignores
//! collapsed subtrees.
//!
//! ```text
//! Node tree ──► PropertyFilter ──► ValueTranslator ──► TreeSink ──► SerializedDocument
//!                                                                       │
//!                                        expected document ──► Comparator ◄──┘
//! ```
//!
//! [`MemoryNode`] is an owned tree that implements [`Node`]; it backs the tests and
//! the command-line tool, which reads trees from JSON files.

pub mod compare;
pub mod error;
pub mod filter;
pub mod format;
pub mod lookup;
pub mod memory;
pub mod node;
pub mod sink;
pub mod translator;
pub mod value;
pub mod walker;

pub use compare::{
    compare_dumps, compare_values, dumps_are_equal, Comparator, ComparisonResult, WILDCARD,
};
pub use error::{CompareError, DocumentSide, DumpError, FormatError};
pub use filter::{AttributeSpec, FilterConfig, PropertyFilter};
pub use format::OutputFormat;
pub use lookup::{find_by_identity, find_node_by_identity};
pub use memory::MemoryNode;
pub use node::{AttachedValue, ExtractionFailure, Node};
pub use value::AttributeValue;
pub use walker::{dump_tree, SerializedDocument, TreeDumper};
