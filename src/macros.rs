#![allow(unused_macros)]

macro_rules! fail {
    ($err:expr) => (
        return Err(From::from($err))
    );

    ($fmt:expr, $($arg:tt)*) => (
        fail!(format!($fmt, $($arg)*))
    );
}

macro_rules! ensure {
    ($expr:expr, $err:expr) => (
        if !($expr) {
            fail!($err);
        }
    );
    ($expr: expr, $fmt:expr, $($arg:tt)*) => (
        if !($expr) {
            fail!(format!($fmt, $($arg)*));
        }
    );
}

/// Asserts that `$expr` fails with a message matching the regex `$re`.
#[cfg(test)]
macro_rules! assert_err_re {
    ($expr:expr, $re:expr) => {{
        let desc = match $expr {
            Ok(_) => panic!("expected an error from `{}`", stringify!($expr)),
            Err(err) => err.to_string(),
        };
        let re = regex::Regex::new($re).unwrap();
        assert!(re.is_match(&desc), "error `{}` from `{}` does not match `{}`", desc, stringify!($expr), re);
    }};
}

/// Asserts that `$expr` fails with a message containing `$err`.
#[cfg(test)]
macro_rules! assert_err {
    ($expr:expr, $err:expr) => {{
        let desc = match $expr {
            Ok(_) => panic!("expected an error from `{}`", stringify!($expr)),
            Err(err) => err.to_string(),
        };
        assert!(desc.contains($err), "error `{}` from `{}` does not contain `{}`", desc, stringify!($expr), $err);
    }};
}

/// Declares a handle-backed class: its `ObjectClass` impl (with any extra trait items given
/// in braces), `Debug` through `debug_fmt`, and `Deref` to the class it extends.
macro_rules! impl_class {
    (
        $ty:ident: $name:literal, [$($id_type:ident),* $(,)?]
        $(=> $parent:ty)?
        $({ $($items:tt)* })?
    ) => {
        impl $crate::class::ObjectClass for $ty {
            const NAME: &'static str = $name;
            const VALID_TYPES: &'static [hdf5_sys::h5i::H5I_type_t] = &[$($id_type),*];

            fn from_handle(handle: $crate::handle::Handle) -> Self {
                Self(handle)
            }

            fn handle(&self) -> &$crate::handle::Handle {
                &self.0
            }

            $($($items)*)?
        }

        impl ::std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                $crate::class::ObjectClass::debug_fmt(self, f)
            }
        }

        $(
            impl ::std::ops::Deref for $ty {
                type Target = $parent;

                fn deref(&self) -> &$parent {
                    unsafe { $crate::class::ObjectClass::transmute(self) }
                }
            }
        )?
    };
}

/// Run code containing HDF5 calls in a closure synchronized by a global reentrant mutex.
#[macro_export]
#[doc(hidden)]
macro_rules! h5lock {
    ($expr:expr) => {{
        #[allow(clippy::redundant_closure)]
        #[allow(unused_unsafe)]
        unsafe {
            $crate::sync::sync(|| $expr)
        }
    }};
}

/// Convert result of an HDF5 call to `Result` (guarded by a global reentrant mutex).
#[macro_export]
#[doc(hidden)]
macro_rules! h5call {
    ($expr:expr) => {
        $crate::h5lock!($crate::h5check($expr))
    };
}

/// `h5try!(..)` is a convenience shortcut for `h5call!(..)?`.
#[macro_export]
#[doc(hidden)]
macro_rules! h5try {
    ($expr:expr) => {
        match $crate::h5call!($expr) {
            Ok(value) => value,
            Err(err) => return Err(From::from(err)),
        }
    };
}

/// Read a value through an out-pointer, e.g. `h5get!(H5Fget_filesize(id): hsize_t)`.
macro_rules! h5get {
    ($func:ident($($arg:expr),*): $ty:ty) => {{
        #[allow(unused_unsafe)]
        unsafe {
            let mut value: $ty = ::std::mem::zeroed();
            h5call!($func($($arg),*, &mut value)).map(|_| value)
        }
    }};
}

/// Same as `h5get!`, falling back to the type's default value on error.
macro_rules! h5get_d {
    ($func:ident($($arg:expr),*): $ty:ty) => {
        h5get!($func($($arg),*): $ty).unwrap_or_default()
    };
}
