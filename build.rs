fn main() {
    // Propagate the ESP-IDF build environment to the linker when building
    // for the device. Host builds (tests, fuzzing) have nothing to do here.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
