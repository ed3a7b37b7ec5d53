fn main() {
    println!("cargo:rerun-if-env-changed=DEVICE_UID");

    // Host builds (tests, fuzzing) have no ESP-IDF toolchain to configure.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
