use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait SoilError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> SoilErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `SoilError` for the failures the C API reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultSoilError {
    code: SoilErrorCode,
    msg: String,
}

impl DefaultSoilError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out"`, `"out_lng"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: SoilErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for an invalid parameter value.
    ///
    /// # Arguments
    /// * `message` - Description of the error
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: SoilErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl SoilError for DefaultSoilError {
    fn code(&self) -> SoilErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by soil health functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoilErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Invalid parameter passed to function (non-finite temperature,
    /// unknown municipality code).
    InvalidParameter = 2,
}

impl From<DefaultSoilError> for SoilErrorCode {
    fn from(error: DefaultSoilError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored to prevent memory leaks when returning raw pointers via FFI.
    static LAST_ERROR: RefCell<(Option<CString>, SoilErrorCode)> = const { RefCell::new((None, SoilErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, SoilErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, SoilErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded.
///
/// The pointer stays valid until the next FFI call on this thread.
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// SoilParameters params;
/// if (soil_derive_parameters(temperature, &params) != Ok) {
///     const char* error = soil_get_last_error();
///     if (error) {
///         printf("Derivation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn soil_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` when the last call succeeded).
///
/// Error codes are stored per-thread, so each thread sees its own state.
#[no_mangle]
pub extern "C" fn soil_get_last_error_code() -> SoilErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
