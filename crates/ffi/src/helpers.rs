use crate::error::{with_last_error_mut, SoilError, SoilErrorCode};
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing `SoilError` trait.
pub(crate) fn set_last_error(error: &impl SoilError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl SoilError) -> SoilErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = SoilErrorCode::Ok;
    });
}

/// Run an FFI body, recording its error or clearing the previous one.
pub(crate) fn handle_ffi_result<E, F>(f: F) -> SoilErrorCode
where
    E: SoilError,
    F: FnOnce() -> Result<(), E>,
{
    match f() {
        Ok(()) => {
            clear_last_error();
            SoilErrorCode::Ok
        }
        Err(e) => track_error(&e),
    }
}
