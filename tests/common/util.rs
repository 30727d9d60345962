use std::path::PathBuf;

use hdf5_tree::File;

pub fn with_tmp_path<F: FnOnce(PathBuf)>(func: F) {
    let dir = tempfile::tempdir().unwrap();
    func(dir.path().join("test.h5"));
}

pub fn with_tmp_file<F: FnOnce(File)>(func: F) {
    with_tmp_path(|path| func(File::create(&path).unwrap()))
}
