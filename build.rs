use std::env;

fn main() {
    let print_feature = |key: &str| println!("cargo:rustc-cfg=feature=\"{}\"", key);
    for (key, _) in env::vars() {
        match key.as_str() {
            "DEP_HDF5_HAVE_DIRECT" => print_feature("have-direct"),
            "DEP_HDF5_HAVE_PARALLEL" => print_feature("have-parallel"),
            "DEP_HDF5_HAVE_THREADSAFE" => print_feature("threadsafe"),
            "DEP_HDF5_MSVC_DLL_INDIRECTION" => println!("cargo:rustc-cfg=msvc_dll_indirection"),
            key if key.starts_with("DEP_HDF5_VERSION_") => {
                let version = key.trim_start_matches("DEP_HDF5_VERSION_").replace('_', ".");
                print_feature(&version);
            }
            _ => continue,
        }
    }
}
