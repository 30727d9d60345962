use std::mem;
use std::path::Path as FsPath;
use std::str::FromStr;

use hdf5_sys::h5f::{
    H5Fclose, H5Fcreate, H5Fflush, H5Fget_filesize, H5Fget_intent, H5Fopen, H5F_ACC_DEFAULT,
    H5F_ACC_EXCL, H5F_ACC_RDONLY, H5F_ACC_RDWR, H5F_ACC_TRUNC, H5F_SCOPE_LOCAL,
};

use crate::internal_prelude::*;

/// How a file is opened, parsed from the usual mode strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    /// `"r"`: the file must exist and is not written to.
    Read,
    /// `"r+"`: the file must exist.
    ReadWrite,
    /// `"w"`: an existing file is truncated.
    Create,
    /// `"w-"` or `"x"`: fails if the file exists.
    CreateExcl,
    /// `"a"`: opens for writing if the file exists, creates it otherwise.
    Append,
}

const MODE_STRINGS: &[(&str, OpenMode)] = &[
    ("r", OpenMode::Read),
    ("r+", OpenMode::ReadWrite),
    ("w", OpenMode::Create),
    ("w-", OpenMode::CreateExcl),
    ("x", OpenMode::CreateExcl),
    ("a", OpenMode::Append),
];

impl OpenMode {
    fn creates(self) -> bool {
        !matches!(self, Self::Read | Self::ReadWrite)
    }

    fn flags(self) -> c_uint {
        match self {
            Self::Read => H5F_ACC_RDONLY,
            Self::ReadWrite => H5F_ACC_RDWR,
            Self::Create => H5F_ACC_TRUNC,
            Self::CreateExcl | Self::Append => H5F_ACC_EXCL,
        }
    }
}

impl FromStr for OpenMode {
    type Err = Error;

    fn from_str(mode: &str) -> Result<Self> {
        match MODE_STRINGS.iter().find(|(s, _)| *s == mode) {
            Some(&(_, mode)) => Ok(mode),
            None => fail!("Invalid file access mode, expected r|r+|w|w-|x|a: {}", mode),
        }
    }
}

/// An open file; derefs into its root group.
#[repr(transparent)]
#[derive(Clone)]
pub struct File(Handle);

impl_class!(File: "file", [H5I_FILE] => Group {
    fn short_repr(&self) -> Option<String> {
        let filename = self.filename();
        let basename = FsPath::new(&filename).file_name().map(|s| s.to_string_lossy());
        let intent = if self.is_read_only() { "read-only" } else { "read/write" };
        Some(format!("\"{}\" ({})", basename.unwrap_or_default(), intent))
    }
});

impl File {
    /// Opens a file as read-only, file must exist.
    pub fn open<P: AsRef<FsPath>>(filename: P) -> Result<Self> {
        Self::open_as(filename, OpenMode::Read)
    }

    /// Opens a file as read/write, file must exist.
    pub fn open_rw<P: AsRef<FsPath>>(filename: P) -> Result<Self> {
        Self::open_as(filename, OpenMode::ReadWrite)
    }

    /// Creates a file, truncates if exists.
    pub fn create<P: AsRef<FsPath>>(filename: P) -> Result<Self> {
        Self::open_as(filename, OpenMode::Create)
    }

    /// Creates a file, fails if exists.
    pub fn create_excl<P: AsRef<FsPath>>(filename: P) -> Result<Self> {
        Self::open_as(filename, OpenMode::CreateExcl)
    }

    /// Opens a file as read/write if exists, creates otherwise.
    pub fn append<P: AsRef<FsPath>>(filename: P) -> Result<Self> {
        Self::open_as(filename, OpenMode::Append)
    }

    /// Opens a file with a mode string: `r`, `r+`, `w`, `w-`/`x` or `a`.
    pub fn open_with_mode<P: AsRef<FsPath>>(filename: P, mode: &str) -> Result<Self> {
        Self::open_as(filename, mode.parse()?)
    }

    pub fn open_as<P: AsRef<FsPath>>(filename: P, mode: OpenMode) -> Result<Self> {
        let filename = filename.as_ref();
        if mode == OpenMode::Append {
            // fall through to an exclusive create when there is nothing to open
            if let Ok(file) = Self::open_as(filename, OpenMode::ReadWrite) {
                return Ok(file);
            }
        }
        let name = match filename.to_str() {
            Some(name) => to_cstring(name)?,
            None => fail!("Invalid UTF-8 in file name: {:?}", filename),
        };
        let id = if mode.creates() {
            h5try!(H5Fcreate(name.as_ptr(), mode.flags(), H5P_DEFAULT, H5P_DEFAULT))
        } else {
            h5try!(H5Fopen(name.as_ptr(), mode.flags(), H5P_DEFAULT))
        };
        Self::from_id(id)
    }

    /// File size in bytes (or 0 if the file handle is invalid).
    pub fn size(&self) -> u64 {
        h5get_d!(H5Fget_filesize(self.id()): hsize_t) as _
    }

    pub fn is_read_only(&self) -> bool {
        h5get!(H5Fget_intent(self.id()): c_uint).unwrap_or(H5F_ACC_DEFAULT) != H5F_ACC_RDWR
    }

    /// Flushes the file to the storage medium.
    pub fn flush(&self) -> Result<()> {
        h5call!(H5Fflush(self.id(), H5F_SCOPE_LOCAL)).and(Ok(()))
    }

    /// Closes this file handle. Objects still open inside the file keep it alive.
    pub fn close(self) -> Result<()> {
        let id = self.id();
        // the id is released here, not in Drop
        mem::forget(self.0);
        h5call!(H5Fclose(id)).map(|_| ())
    }
}

#[cfg(test)]
pub mod tests {
    use std::fs;
    use std::io::Write;

    use crate::internal_prelude::*;

    use super::OpenMode;

    #[test]
    pub fn test_open_mode_strings() {
        let parsed: Vec<OpenMode> = ["r", "r+", "w", "w-", "x", "a"].iter().map(|s| s.parse().unwrap()).collect();
        assert_eq!(
            parsed,
            [
                OpenMode::Read,
                OpenMode::ReadWrite,
                OpenMode::Create,
                OpenMode::CreateExcl,
                OpenMode::CreateExcl,
                OpenMode::Append
            ]
        );
        assert_err!("rw".parse::<OpenMode>(), "Invalid file access mode");
        assert_err!("".parse::<OpenMode>(), "expected r|r+|w|w-|x|a");
    }

    #[test]
    pub fn test_is_read_only() {
        with_tmp_path(|path| {
            assert!(!File::create(&path).unwrap().is_read_only());
            assert!(File::open(&path).unwrap().is_read_only());
            assert!(!File::open_rw(&path).unwrap().is_read_only());
            assert!(!File::append(&path).unwrap().is_read_only());
            assert!(File::open_with_mode(&path, "r").unwrap().is_read_only());
        });
        with_tmp_path(|path| {
            assert!(!File::append(&path).unwrap().is_read_only());
        });
        with_tmp_path(|path| {
            assert!(!File::create_excl(&path).unwrap().is_read_only());
        });
    }

    #[test]
    pub fn test_unable_to_open() {
        with_tmp_dir(|dir| {
            assert_err_re!(File::open(&dir), "unable to (?:synchronously )?open file");
            assert_err_re!(File::create(&dir), "unable to (?:synchronously )?create file");
        });
        with_tmp_path(|path| {
            fs::File::create(&path).unwrap().write_all(b"foo").unwrap();
            assert_err_re!(File::open(&path), "unable to (?:synchronously )?open file");
        })
    }

    #[test]
    pub fn test_create_excl_and_append() {
        with_tmp_path(|path| {
            File::create_excl(&path).unwrap().create_group("foo").unwrap();
            assert_err_re!(File::create_excl(&path), "unable to (?:synchronously )?create file");
            File::append(&path).unwrap().group("foo").unwrap();
        });
    }

    #[test]
    pub fn test_read_only_rejects_writes() {
        with_tmp_path(|path| {
            File::create(&path).unwrap().create_group("foo").unwrap();
            let file = File::open(&path).unwrap();
            file.group("foo").unwrap();
            assert_err_re!(
                file.create_group("bar"),
                "unable to (?:synchronously )?create group: no write intent on file"
            );
        });
    }

    #[test]
    pub fn test_flush_and_size() {
        with_tmp_file(|file| {
            assert!(file.size() > 0);
            file.create_group("foo").unwrap();
            file.flush().unwrap();
            assert_eq!(file.size(), fs::metadata(file.filename()).unwrap().len());
        })
    }

    #[test]
    pub fn test_close_keeps_objects_alive() {
        with_tmp_path(|path| {
            let file = File::create(&path).unwrap();
            let group = file.create_group("foo").unwrap();
            file.close().unwrap();
            assert!(group.is_valid());
            assert_eq!(group.name(), "/foo");
        });
    }

    #[test]
    pub fn test_debug() {
        with_tmp_dir(|dir| {
            let path = dir.join("qwe.h5");
            let file = File::create(&path).unwrap();
            assert_eq!(format!("{file:?}"), "<HDF5 file: \"qwe.h5\" (read/write)>");
            file.close().unwrap();
            let file = File::open(&path).unwrap();
            assert_eq!(format!("{file:?}"), "<HDF5 file: \"qwe.h5\" (read-only)>");
            assert_eq!(format!("{:?}", File::invalid()), "<HDF5 file: invalid id>");
        })
    }
}
