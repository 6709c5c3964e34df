//! Stepping, queries and backups through an automaton handle.

use std::ffi::{c_char, CStr};

use log::warn;

use super::lifecycle::path_arg;
use crate::automaton::lattice::Position;
use crate::automaton::Aether5D;

/// Advances the automaton by one step.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Aether5D, or null
///
/// # Returns
/// 1 if any position changed, 0 if not, -1 on a null pointer or a failed step.
/// A failed step leaves the automaton at its previous step.
#[no_mangle]
pub unsafe extern "C" fn ae5_next_step(ptr: *mut Aether5D) -> i32 {
    if ptr.is_null() {
        return -1;
    }
    match (*ptr).next_step() {
        Ok(changed) => changed as i32,
        Err(e) => {
            warn!("ae5_next_step failed: {}", e);
            -1
        }
    }
}

/// Whether the last step changed anything.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Aether5D, or null
///
/// # Returns
/// 1 or 0, or -1 before the first step and on a null pointer.
#[no_mangle]
pub unsafe extern "C" fn ae5_is_changed(ptr: *const Aether5D) -> i32 {
    if ptr.is_null() {
        return -1;
    }
    match (*ptr).is_changed() {
        Some(changed) => changed as i32,
        None => -1,
    }
}

/// # Safety
/// - `ptr` must be a valid pointer to an Aether5D, or null
///
/// # Returns
/// The current step, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn ae5_get_step(ptr: *const Aether5D) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).step()
}

/// # Safety
/// - `ptr` must be a valid pointer to an Aether5D, or null
///
/// # Returns
/// The current `maxV`, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn ae5_get_size(ptr: *const Aether5D) -> u32 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).size()
}

/// Reads the value at a canonical position (`v >= w >= x >= y >= z`) into `out`.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Aether5D, or null
/// - `out` must be a valid pointer to an i64, or null
///
/// # Returns
/// 0 on success, 1 on a null pointer or non-canonical coordinates, 2 on a read failure.
#[no_mangle]
pub unsafe extern "C" fn ae5_get_from_position(
    ptr: *const Aether5D,
    v: u32,
    w: u32,
    x: u32,
    y: u32,
    z: u32,
    out: *mut i64,
) -> i32 {
    if ptr.is_null() || out.is_null() {
        return 1;
    }
    let p = Position::new(v, w, x, y, z);
    if !p.is_canonical() {
        return 1;
    }
    match (*ptr).get_from_position(p) {
        Ok(value) => {
            *out = value;
            0
        }
        Err(e) => {
            warn!("ae5_get_from_position failed at {}: {}", p, e);
            2
        }
    }
}

/// Backs the automaton up into `<backup_path>/<name>`.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Aether5D, or null
/// - `backup_path` and `name` must be null or valid NUL-terminated strings
///
/// # Returns
/// 0 on success, 1 on a null or non-UTF-8 argument, 2 on an I/O failure.
#[no_mangle]
pub unsafe extern "C" fn ae5_backup(
    ptr: *const Aether5D,
    backup_path: *const c_char,
    name: *const c_char,
) -> i32 {
    if ptr.is_null() || name.is_null() {
        return 1;
    }
    let Some(backup_path) = path_arg(backup_path) else {
        return 1;
    };
    let Ok(name) = CStr::from_ptr(name).to_str() else {
        return 1;
    };
    match (*ptr).backup(backup_path, name) {
        Ok(()) => 0,
        Err(e) => {
            warn!("ae5_backup failed: {}", e);
            2
        }
    }
}
