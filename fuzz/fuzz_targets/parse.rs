// cargo fuzz run parse corpus/parse -- -timeout=30

#![no_main]

use gifraffe::Gif;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut gif) = Gif::from_bytes(data) {
        assert_eq!(gif.to_bytes(), data);
        while gif.advance().is_ok() {
            let _ = gif.indices();
        }
    }
});
