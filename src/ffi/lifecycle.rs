//! Automaton creation, restoration and destruction.

use std::ffi::{c_char, CStr};
use std::path::PathBuf;
use std::ptr;

use log::warn;

use crate::automaton::Aether5D;

/// Borrow a NUL-terminated UTF-8 path argument.
///
/// # Safety
/// `ptr` must be null or point to a valid NUL-terminated string.
pub(crate) unsafe fn path_arg(ptr: *const c_char) -> Option<PathBuf> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(PathBuf::from)
}

/// Creates a new automaton whose generations live under `folder`.
///
/// # Returns
/// An opaque pointer, or null if `folder` is null or not UTF-8, the initial
/// value is too small, or the grid folder cannot be prepared.
///
/// # Safety
/// - `folder` must be null or a valid NUL-terminated string
/// - The returned pointer must eventually be freed with `ae5_destroy()`.
#[no_mangle]
pub unsafe extern "C" fn ae5_create(initial_value: i64, folder: *const c_char) -> *mut Aether5D {
    let Some(folder) = path_arg(folder) else {
        return ptr::null_mut();
    };
    match Aether5D::new(initial_value, folder) {
        Ok(aether) => Box::into_raw(Box::new(aether)),
        Err(e) => {
            warn!("ae5_create failed: {}", e);
            ptr::null_mut()
        }
    }
}

/// Restores an automaton from the backup folder at `backup_path`.
///
/// # Returns
/// An opaque pointer, or null on any failure.
///
/// # Safety
/// - `backup_path` and `folder` must be null or valid NUL-terminated strings
/// - The returned pointer must eventually be freed with `ae5_destroy()`.
#[no_mangle]
pub unsafe extern "C" fn ae5_restore(
    backup_path: *const c_char,
    folder: *const c_char,
) -> *mut Aether5D {
    let (Some(backup_path), Some(folder)) = (path_arg(backup_path), path_arg(folder)) else {
        return ptr::null_mut();
    };
    match Aether5D::restore(backup_path, folder) {
        Ok(aether) => Box::into_raw(Box::new(aether)),
        Err(e) => {
            warn!("ae5_restore failed: {}", e);
            ptr::null_mut()
        }
    }
}

/// Closes an automaton, removing its working grid folder, and frees it.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `ae5_create()` or `ae5_restore()`, or null
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn ae5_destroy(ptr: *mut Aether5D) {
    if ptr.is_null() {
        return;
    }
    let aether = Box::from_raw(ptr);
    if let Err(e) = aether.close() {
        warn!("ae5_destroy could not remove the grid folder: {}", e);
    }
}
