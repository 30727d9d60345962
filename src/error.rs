use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::ops::Deref;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use ndarray::ShapeError;

#[cfg(not(feature = "1.10.0"))]
use hdf5_sys::h5::hssize_t;
use hdf5_sys::h5e::{
    H5E_auto2_t, H5E_error2_t, H5Eget_current_stack, H5Eget_msg, H5Eprint2, H5Eset_auto2, H5Ewalk2,
    H5E_DEFAULT, H5E_WALK_DOWNWARD,
};

use crate::internal_prelude::*;

/// Must be called with the global lock held.
pub(crate) unsafe fn silence_errors_no_sync(silence: bool) {
    let printer: H5E_auto2_t = if silence {
        None
    } else {
        // the printer's signature is compatible with the automatic handler's
        let print: unsafe extern "C" fn(hid_t, *mut libc::FILE) -> herr_t = H5Eprint2;
        std::mem::transmute(Some(print))
    };
    H5Eset_auto2(H5E_DEFAULT, printer, ptr::null_mut());
}

/// Turns the library's own printing of error stacks to stderr on or off.
///
/// Printing is off by default; failures are reported through [`Error`] instead.
pub fn silence_errors(silence: bool) {
    h5lock!(silence_errors_no_sync(silence));
}

/// Error stack captured from the library at the point of failure.
#[repr(transparent)]
#[derive(Clone)]
pub struct ErrorStack(Handle);

impl_class!(ErrorStack: "error stack", [H5I_ERROR_STACK]);

type WalkFrames = Vec<Result<ErrorFrame>>;

extern "C" fn collect_frame(_: c_uint, err: *const H5E_error2_t, data: *mut c_void) -> herr_t {
    let frames = unsafe { &mut *data.cast::<WalkFrames>() };
    match panic::catch_unwind(AssertUnwindSafe(|| unsafe { ErrorFrame::read(&*err) })) {
        Ok(frame) => {
            frames.push(frame);
            0
        }
        Err(_) => -1,
    }
}

impl ErrorStack {
    /// Copies the stack of the current thread, which clears it.
    pub(crate) fn take_current() -> Result<Self> {
        Handle::try_new(h5lock!(H5Eget_current_stack())).map(Self)
    }

    /// Walks the stack from the failing API call down into owned frames.
    ///
    /// Looking up message strings pushes onto the library's stack, so the walked copy is
    /// consumed.
    pub fn expand(self) -> Result<ExpandedErrorStack> {
        let mut frames = WalkFrames::new();
        h5lock!(H5Ewalk2(
            self.id(),
            H5E_WALK_DOWNWARD,
            Some(collect_frame),
            (&mut frames as *mut WalkFrames).cast()
        ));
        let frames = frames.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(ExpandedErrorStack::from_frames(frames))
    }

    fn id(&self) -> hid_t {
        self.0.id()
    }
}

/// One entry of an expanded error stack.
#[derive(Clone, Debug)]
pub struct ErrorFrame {
    func: String,
    desc: String,
    major: String,
    minor: String,
}

impl ErrorFrame {
    unsafe fn read(err: &H5E_error2_t) -> Result<Self> {
        let message = |id| get_h5_str(|buf, size| H5Eget_msg(id, ptr::null_mut(), buf, size));
        Ok(Self {
            func: string_from_cstr(err.func_name),
            desc: string_from_cstr(err.desc),
            major: message(err.maj_num)?,
            minor: message(err.min_num)?,
        })
    }

    /// The message attached to this frame.
    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// `"{function}(): {message}"`.
    pub fn description(&self) -> String {
        format!("{}(): {}", self.func, self.desc)
    }

    /// Description along with the major and minor error classes.
    pub fn detail(&self) -> String {
        format!("Error in {}(): {} [{}: {}]", self.func, self.desc, self.major, self.minor)
    }
}

/// Frames of an error stack, outermost call first.
#[derive(Clone, Debug, Default)]
pub struct ExpandedErrorStack {
    frames: Vec<ErrorFrame>,
    summary: Option<String>,
}

impl Deref for ExpandedErrorStack {
    type Target = [ErrorFrame];

    fn deref(&self) -> &[ErrorFrame] {
        &self.frames
    }
}

impl ExpandedErrorStack {
    fn from_frames(frames: Vec<ErrorFrame>) -> Self {
        // the API call that failed, followed by the innermost cause
        let summary = match frames.as_slice() {
            [] => None,
            [only] => Some(only.description()),
            [top, .., cause] => Some(format!("{}: {}", top.description(), cause.desc())),
        };
        Self { frames, summary }
    }

    pub fn top(&self) -> Option<&ErrorFrame> {
        self.frames.first()
    }

    pub fn description(&self) -> &str {
        self.summary.as_deref().unwrap_or("unknown library error")
    }

    pub fn detail(&self) -> Option<String> {
        self.top().map(ErrorFrame::detail)
    }
}

/// The error type for all fallible operations in this crate.
#[derive(Clone)]
pub enum Error {
    /// The library rejected a call; the full error stack is captured.
    HDF5(ErrorStack),
    /// Raised by this crate itself (inconsistent shapes, wrong object kinds, bad input).
    Internal(String),
}

pub type Result<T, E = Error> = ::std::result::Result<T, E>;

impl Error {
    /// Captures the current library error stack (possibly empty).
    pub fn query() -> Result<Self> {
        ErrorStack::take_current()
            .map(Self::HDF5)
            .map_err(|_| Self::Internal("unable to capture the library error stack".into()))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

impl From<&str> for Error {
    fn from(desc: &str) -> Self {
        Self::Internal(desc.to_owned())
    }
}

impl From<String> for Error {
    fn from(desc: String) -> Self {
        Self::Internal(desc)
    }
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl From<ShapeError> for Error {
    fn from(err: ShapeError) -> Self {
        Self::Internal(format!("shape error: {err}"))
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        Self::new(io::ErrorKind::Other, err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Internal(desc) => f.write_str(desc),
            Self::HDF5(stack) => match stack.clone().expand() {
                Ok(expanded) => f.write_str(expanded.description()),
                Err(_) => f.write_str("unable to read the library error stack"),
            },
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl StdError for Error {}

/// Converts a raw return code into a `Result`, capturing the error stack on failure.
pub fn h5check<T: H5ErrorCode>(value: T) -> Result<T> {
    if T::is_err_code(value) {
        Err(Error::query().unwrap_or_else(|err| err))
    } else {
        Ok(value)
    }
}

/// Return codes of library calls that can signal failure.
pub trait H5ErrorCode: Copy {
    fn is_err_code(value: Self) -> bool;
}

/// Sizes signal failure with zero.
impl H5ErrorCode for hsize_t {
    fn is_err_code(value: Self) -> bool {
        value == 0
    }
}

macro_rules! negative_is_error {
    ($($(#[$attr:meta])* $ty:ty;)+) => {
        $(
            $(#[$attr])*
            impl H5ErrorCode for $ty {
                fn is_err_code(value: Self) -> bool {
                    value < 0
                }
            }
        )+
    };
}

negative_is_error! {
    herr_t;
    libc::ssize_t;
    // before 1.10 ids are plain ints and share the impl with herr_t
    #[cfg(feature = "1.10.0")]
    hid_t;
    #[cfg(not(feature = "1.10.0"))]
    hssize_t;
}

#[cfg(test)]
pub mod tests {
    use hdf5_sys::h5p::{H5Pclose, H5Pcreate};

    use crate::globals::H5P_CLS_ROOT;
    use crate::internal_prelude::*;

    use super::{ExpandedErrorStack, H5ErrorCode};

    fn expand(err: Error) -> ExpandedErrorStack {
        match err {
            Error::HDF5(stack) => stack.expand().unwrap(),
            Error::Internal(internal) => panic!("expected a library error, got {}", internal),
        }
    }

    #[test]
    pub fn test_error_stack() {
        let clean = h5lock!({
            let plist_id = H5Pcreate(*H5P_CLS_ROOT);
            H5Pclose(plist_id);
            Error::query()
        })
        .unwrap();
        assert!(expand(clean).is_empty());

        let failed = h5lock!({
            let plist_id = H5Pcreate(*H5P_CLS_ROOT);
            H5Pclose(plist_id);
            H5Pclose(plist_id);
            Error::query()
        })
        .unwrap();
        let stack = expand(failed);
        assert!(!stack.is_empty());
        assert!(stack.description().starts_with("H5Pclose(): "));
        assert!(stack.detail().unwrap().starts_with("Error in H5Pclose(): "));
        assert_eq!(stack.top().unwrap().description(), stack[0].description());

        let empty = ExpandedErrorStack::default();
        assert!(empty.top().is_none());
        assert_eq!(empty.description(), "unknown library error");
    }

    #[test]
    pub fn test_h5call() {
        let ok = h5call!({
            let plist_id = H5Pcreate(*H5P_CLS_ROOT);
            H5Pclose(plist_id)
        });
        assert!(ok.is_ok());

        let double_close = h5call!({
            let plist_id = H5Pcreate(*H5P_CLS_ROOT);
            H5Pclose(plist_id);
            H5Pclose(plist_id)
        });
        assert!(!double_close.unwrap_err().is_internal());
    }

    #[test]
    pub fn test_h5try() {
        fn close_twice() -> Result<herr_t> {
            let plist_id = h5try!(H5Pcreate(*H5P_CLS_ROOT));
            h5try!(H5Pclose(plist_id));
            h5try!(H5Pclose(plist_id));
            Ok(1)
        }
        assert_err!(close_twice(), "H5Pclose(): ");

        fn bad_class() -> Result<hid_t> {
            Ok(h5try!(H5Pcreate(123_456)))
        }
        assert!(bad_class().is_err());
    }

    #[test]
    pub fn test_error_codes() {
        assert!(<hsize_t as H5ErrorCode>::is_err_code(0));
        assert!(!<hsize_t as H5ErrorCode>::is_err_code(5));
        assert!(<herr_t as H5ErrorCode>::is_err_code(-1));
        assert!(!<libc::ssize_t as H5ErrorCode>::is_err_code(0));
    }

    #[test]
    pub fn test_internal_errors() {
        fn positive(x: i32) -> Result<i32> {
            ensure!(x > 0, "expected positive value, got {}", x);
            Ok(x)
        }
        assert_eq!(positive(1).unwrap(), 1);
        assert_err!(positive(-1), "expected positive value, got -1");
        assert!(positive(-1).unwrap_err().is_internal());
        let io_err: std::io::Error = Error::from("boom").into();
        assert_eq!(io_err.to_string(), "boom");
    }
}
