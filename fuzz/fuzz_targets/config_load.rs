#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = config::load_reader(data) else {
        return;
    };
    let text = match config::to_external(&config) {
        Ok(text) => text,
        Err(err) => panic!("loaded configuration failed to export: {err}"),
    };
    match config::load_str(&text) {
        Ok(reloaded) => assert_eq!(reloaded, config),
        Err(err) => panic!("exported configuration failed to load: {err}\n{text}"),
    }
});
