//! Link search path for `libws2811` when the `hardware` feature is on.
//!
//! The native library is usually installed with `scons` + `sudo cp` into
//! `/usr/local/lib`. Override with `WS2811_LIB_DIR` for cross builds.

fn main() {
    println!("cargo:rerun-if-env-changed=WS2811_LIB_DIR");

    if std::env::var_os("CARGO_FEATURE_HARDWARE").is_none() {
        return;
    }

    let dir = std::env::var("WS2811_LIB_DIR").unwrap_or_else(|_| "/usr/local/lib".to_string());
    println!("cargo:rustc-link-search=native={dir}");
}
