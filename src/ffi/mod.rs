//! C FFI layer for embedding the automaton in a host program.
//!
//! All functions are marked with `#[no_mangle]` and use `extern "C"`. The
//! automaton is handed out as an opaque boxed pointer.
//!
//! The actual logic is in the `automaton` module. These functions are thin wrappers
//! that handle null checks, pointer safety, and C-to-Rust conversions.

pub mod lifecycle;
pub mod stepping;

pub use lifecycle::{ae5_create, ae5_destroy, ae5_restore};
pub use stepping::{
    ae5_backup, ae5_get_from_position, ae5_get_size, ae5_get_step, ae5_is_changed, ae5_next_step,
};
