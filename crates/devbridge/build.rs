// Build facts reported in the startup log line.
fn main() {
    for (var, exported) in [
        ("TARGET", "DEVBRIDGE_BUILD_TARGET"),
        ("PROFILE", "DEVBRIDGE_BUILD_PROFILE"),
    ] {
        if let Ok(value) = std::env::var(var) {
            println!("cargo:rustc-env={exported}={value}");
        }
        println!("cargo:rerun-if-env-changed={var}");
    }
}
