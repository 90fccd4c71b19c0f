//! Transformation engine.
//!
//! - `parsers`: swc parsing with comment extraction
//! - `backend`: the `{parse, print}` capability and its two implementations
//! - `edits`: byte-range edit log that printing applies to the original text
//! - `classify`, `ignore`: which literals are translatable and which are suppressed
//! - `rewrite`: replacement nodes for wrapped literals
//! - `detect`, `inject`: component heuristics and translation-binding injection
//! - `finalize`: module-level imports and the client directive
//! - `transform`: the traversal tying the above together
//! - `rsc`: client/server module classification for `auto` mode
//! - `files`: source file enumeration

pub mod backend;
pub mod classify;
pub mod context;
pub mod detect;
pub mod edits;
pub mod files;
pub mod finalize;
pub mod ignore;
pub mod inject;
pub mod parsers;
pub mod rewrite;
pub mod rsc;
pub mod transform;
