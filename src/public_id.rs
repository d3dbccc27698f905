//! Opaque public-ID generation (spec glossary: "Public ID", an
//! externally visible, collision-resistant identifier distinct from the
//! numeric primary key).
//!
//! The source's public-ID generator is an external collaborator (spec
//! §1 non-goal); this wraps [`uuid`] v4 as that collaborator's Rust
//! stand-in, since no other ID scheme is named anywhere in the pack.

use uuid::Uuid;

/// Generates a fresh opaque public ID. Used inline by `Insert<S>` on any
/// table that has `public_id` (spec §4.6 item 8).
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}
