use std::ffi::{CStr, CString};
use std::ptr;

use num_integer::Integer;
use num_traits::{cast, NumCast};

use crate::internal_prelude::*;

/// Copies a zero-terminated C string; invalid UTF-8 is replaced and null reads as empty.
pub fn string_from_cstr(string: *const c_char) -> String {
    if string.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(string) }.to_string_lossy().into_owned()
}

pub fn to_cstring<S: AsRef<str>>(string: S) -> Result<CString> {
    let string = string.as_ref();
    match CString::new(string) {
        Ok(cstring) => Ok(cstring),
        Err(_) => fail!("null byte in string: {:?}", string),
    }
}

/// Releases memory allocated by the library on our behalf.
pub fn h5_free_memory(mem: *mut c_void) {
    cfg_if::cfg_if! {
        if #[cfg(feature = "1.8.13")] {
            unsafe { hdf5_sys::h5::H5free_memory(mem) };
        } else {
            // older versions have no deallocator of their own
            unsafe { libc::free(mem) };
        }
    }
}

/// Reads a name from a two-step query function: a first call with a null buffer returns
/// the length, a second call fills a buffer of that length plus the terminator.
#[doc(hidden)]
pub fn get_h5_str<T, F>(query: F) -> Result<String>
where
    F: Fn(*mut c_char, size_t) -> T,
    T: Integer + NumCast,
{
    let len: usize = match cast(query(ptr::null_mut(), 0)) {
        Some(len) => len,
        None => fail!("negative string length in get_h5_str()"),
    };
    if len == 0 {
        return Ok(String::new());
    }
    let mut buf: Vec<c_char> = vec![0; len + 1];
    query(buf.as_mut_ptr(), buf.len());
    Ok(string_from_cstr(buf.as_ptr()))
}
