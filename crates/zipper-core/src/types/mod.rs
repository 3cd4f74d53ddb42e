//! Validated path and name types shared by archiving and extraction.
//!
//! `EntryName` is the canonical in-archive name of an entry. `DestDir` and
//! `SafePath` carry the extraction-side guarantees: a `SafePath` can only be
//! obtained by validating an `EntryName` against a `DestDir`, so every
//! filesystem mutation during extraction goes through a bound-checked path.

pub mod dest_dir;
pub mod entry_name;
pub mod safe_path;

pub use dest_dir::DestDir;
pub use entry_name::EntryName;
pub use safe_path::SafePath;
