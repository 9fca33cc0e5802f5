#![no_main]
use libfuzzer_sys::fuzz_target;
use velocypack::{Slice, Value};

fuzz_target!(|data: &[u8]| {
    let slice = Slice::new(data);
    let _ = slice.byte_size();
    let _ = slice.to_string();
    if let Ok(value) = Value::from_slice(slice) {
        // Anything that decodes must encode again
        let _ = value.to_vec().unwrap();
    }
});
