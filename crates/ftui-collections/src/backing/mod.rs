#![forbid(unsafe_code)]

//! Backing stores for the container kinds the standard library lacks.
//!
//! Lists, sets and maps are backed by `Vec`, [`ahash::AHashSet`] and
//! [`ahash::AHashMap`]. Multisets and set multimaps use the types here.

pub mod multimap;
pub mod multiset;

pub use multimap::HashSetMultimap;
pub use multiset::HashMultiset;
