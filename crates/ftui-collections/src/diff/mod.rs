#![forbid(unsafe_code)]

//! Pure differs: mutation plus pre-state in, ordered sub-changes out.
//!
//! Nothing here touches a container or a listener. Every function returns
//! the sub-changes that, replayed in reverse against the post-state, give
//! back the pre-state. No-op sub-changes are never produced; a differ that
//! finds nothing to report returns `None` or an empty `Vec`.

pub mod keyed;
pub mod list;
pub mod multimap;
pub mod multiset;
