//! Common payload fixtures for objio testing

/// Size of a payload that spans several deflate blocks
pub const MULTI_BLOCK_SIZE: usize = 256 * 1024;

/// No bytes at all
pub fn empty() -> Vec<u8> {
    Vec::new()
}

/// A single byte
pub fn one_byte() -> Vec<u8> {
    vec![b'x']
}

/// Poorly compressible data larger than one compression block
pub fn multi_block() -> Vec<u8> {
    // xorshift keeps the data deterministic without a rand dependency
    let mut state: u32 = 0x9E37_79B9;
    (0..MULTI_BLOCK_SIZE)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state & 0xFF) as u8
        })
        .collect()
}

/// `lines` newline-delimited JSON records
pub fn ndjson(lines: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..lines {
        out.extend_from_slice(format!("{{\"id\":{},\"name\":\"row-{}\"}}\n", i, i).as_bytes());
    }
    out
}

/// The payloads every round-trip test should cover
pub fn round_trip_payloads() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("empty", empty()),
        ("one_byte", one_byte()),
        ("multi_block", multi_block()),
    ]
}
