use std::path::PathBuf;

use crate::internal_prelude::*;

/// Runs `func` with a fresh temporary directory, removed afterwards.
pub fn with_tmp_dir<F: Fn(PathBuf)>(func: F) {
    let tmp = tempfile::Builder::new().prefix("hdf5-tree").tempdir().unwrap();
    func(tmp.path().to_owned());
}

pub fn with_tmp_path<F: Fn(PathBuf)>(func: F) {
    with_tmp_dir(|dir| func(dir.join("foo.h5")));
}

/// Runs `func` with a newly created, empty file.
pub fn with_tmp_file<F: Fn(File)>(func: F) {
    with_tmp_path(|path| func(File::create(path).unwrap()));
}
