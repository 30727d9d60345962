#![allow(unused_macros)]

macro_rules! assert_err {
    ($expr:expr, $err:expr) => {{
        let desc = match $expr {
            Ok(_) => panic!("expected an error from `{}`", stringify!($expr)),
            Err(err) => err.to_string(),
        };
        assert!(desc.contains($err), "error `{}` from `{}` does not contain `{}`", desc, stringify!($expr), $err);
    }};
}

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
