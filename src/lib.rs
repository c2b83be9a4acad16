//! Implements arena-allocated trees whose nodes are addressed by caller-chosen keys.
//!
//! # Overview
//! Birch stores every node of a [`Forest`] in an arena (a `granite` storage, by default a sparse [`Vec`]) and links nodes with storage keys instead of pointers, so parent links are plain non-owning handles and no reference cycles can ever form between a parent and its children. Each node carries:
//! - an *id* of a type chosen by the caller, which must not be the type's default value;
//! - a payload of any type;
//! - a link to its parent, if it has one;
//! - a map from child ids to the children themselves.
//!
//! A forest can hold any number of independent trees, as well as nodes which were created but never attached. Nodes are attached with [`add_child`], which refuses to introduce an id that already exists anywhere in the tree, and detached with [`remove_child`]. Any node can be used to [`find`] any other node of its tree, to enumerate the whole tree with [`all`], or to rebuild the tree with a different id and payload type via [`transform`].
//!
//! # Key matching
//! Whole-tree searches compare ids through a [`KeyMatch`] policy chosen as a type parameter of the forest. The default is [`ExactMatch`]; [`CaseInsensitive`] provides string-keyed trees where `find("foo")` locates a node stored as `"Foo"`. See the [`key_match`] module for details.
//!
//! # Example
//! ```rust
//! use birch::Forest;
//!
//! let mut forest = Forest::<&str>::new();
//! let root = forest.create_default("a").unwrap();
//! let b = forest.create_default("b").unwrap();
//! let c = forest.create_default("c").unwrap();
//!
//! let mut root_mut = forest.node_mut(root).unwrap();
//! assert!(root_mut.add_child(b).is_some());
//! assert!(root_mut.add_child(c).is_some());
//!
//! // Any node can reach any other node of its tree:
//! let b_ref = forest.node(b).unwrap();
//! assert_eq!(b_ref.find(&"c").map(|n| n.into_raw_key()), Some(c));
//! assert_eq!(b_ref.all().count(), 3);
//! ```
//!
//! # Feature flags
//! - `std` (**enabled by default**) — enables the full standard library, disabling `no_std` for the crate. Currently, this only adds [`Error`] trait implementations for the error types. An allocator is always required.
//! - `arrayvec`, `smallvec`, `slab`, `slotmap` — enable the corresponding storage implementations in `granite`, making them usable as the `S` parameter of [`Forest`].
//! - `union_optimizations` — forwarded to `granite`. **Requires a nightly compiler.**
//!
//! # Logging
//! Attach operations never fail loudly. Rejected attachments are reported through the [`log`] facade at the `trace` level, and children dropped during a transform at the `debug` level; install any `log`-compatible logger to see them.
//!
//! [`Forest`]: forest/struct.Forest.html " "
//! [`add_child`]: forest/struct.NodeRefMut.html#method.add_child " "
//! [`remove_child`]: forest/struct.NodeRefMut.html#method.remove_child " "
//! [`find`]: forest/struct.NodeRef.html#method.find " "
//! [`all`]: forest/struct.NodeRef.html#method.all " "
//! [`transform`]: forest/struct.NodeRef.html#method.transform " "
//! [`KeyMatch`]: key_match/trait.KeyMatch.html " "
//! [`ExactMatch`]: key_match/struct.ExactMatch.html " "
//! [`CaseInsensitive`]: key_match/struct.CaseInsensitive.html " "
//! [`key_match`]: key_match/index.html " "
//! [`Error`]: https://doc.rust-lang.org/std/error/trait.Error.html " "
//! [`Vec`]: https://doc.rust-lang.org/std/vec/struct.Vec.html " "
//! [`log`]: https://docs.rs/log " "

#![warn(
    rust_2018_idioms,
    clippy::cargo,
    clippy::nursery,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    variant_size_differences,
    clippy::cast_lossless,
    clippy::checked_conversions,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
    clippy::filter_map_next,
    clippy::map_flatten,
    clippy::map_unwrap_or,
    clippy::implicit_hasher,
    clippy::inefficient_to_string,
    clippy::items_after_statements,
    clippy::let_unit_value,
    clippy::macro_use_imports,
    clippy::match_same_arms,
    clippy::match_wildcard_for_single_variants,
    clippy::mut_mut,
    clippy::needless_continue,
    clippy::needless_pass_by_value,
    clippy::option_option,
    clippy::redundant_closure_for_method_calls,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::too_many_lines,
    clippy::type_repetition_in_bounds,
    clippy::trivially_copy_pass_by_ref,
    clippy::unnested_or_patterns,
    clippy::unused_self,
    clippy::used_underscore_binding,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::get_unwrap,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unneeded_field_pattern,
    clippy::unwrap_used, // Only .expect() allowed
    clippy::use_debug,
)]
#![deny(
    anonymous_parameters,
    bare_trait_objects,
    clippy::exit,
)]
#![allow(clippy::use_self)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

extern crate alloc;

pub mod key_match;
#[doc(no_inline)]
pub use key_match::{KeyMatch, ExactMatch, CaseInsensitive};

pub mod forest;
pub use forest::{Forest, CaseInsensitiveForest};

/// A prelude for using Birch, containing the most used types in a renamed form for safe glob-importing.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::forest::{
        Forest,
        CaseInsensitiveForest,
        NodeRef as ForestNodeRef,
        NodeRefMut as ForestNodeRefMut,
    };
    #[doc(no_inline)]
    pub use crate::key_match::{
        KeyMatch as ForestKeyMatch,
        ExactMatch as ForestExactMatch,
        CaseInsensitive as ForestCaseInsensitive,
    };
    #[doc(no_inline)]
    pub use crate::InvalidKey as InvalidForestKey;
}

use core::fmt::{self, Formatter, Display, Debug};

/// The error type returned when a node is created with an id equal to the default value of the id type, such as `0` or an empty string.
///
/// The rejected id is returned back to the caller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct InvalidKey<I> {
    /// The id which was attempted to be used.
    pub id: I,
}
impl<I> Display for InvalidKey<I> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad("node ids cannot be equal to the default value of their type")
    }
}
#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
impl<I: Debug> std::error::Error for InvalidKey<I> {}
