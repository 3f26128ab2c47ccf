use std::sync::Once;

#[allow(dead_code)]
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        thermoq::logging::init_logging();
    });
}
