//! The generated C header declares the whole buffer API.

use std::fs;
use std::path::Path;

#[test]
fn header_declares_every_entry_point() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("include/ry.h");
    let header = fs::read_to_string(&path).expect("build script writes include/ry.h");
    for name in [
        "ry_buf_create",
        "ry_buf_capacity",
        "ry_buf_len",
        "ry_buf_element_size",
        "ry_buf_ensure_capacity",
        "ry_buf_append",
        "ry_buf_release",
    ] {
        assert!(header.contains(name), "{name} missing from {}", path.display());
    }
    assert!(header.contains("RY_H"));
}
