//! JSON string escaping.
//!
//! The escaper appends straight into the record buffer, without any intermediate `String`.

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Bytes which can be copied into a JSON string literal as they are.
static NO_ESCAPE: [bool; 256] = {
    let mut table = [false; 256];
    let mut i = 0x20;
    while i <= 0x7e {
        table[i] = i != b'\\' as usize && i != b'"' as usize;
        i += 1;
    }
    table
};

/// Append `s` as a quoted JSON string into `dst`.
#[inline]
pub fn append_json_str(dst: &mut Vec<u8>, s: &str) {
    append_json_bytes(dst, s.as_bytes())
}

/// Append the bytes as a quoted JSON string into `dst`.
///
/// Invalid UTF-8 sequences are replaced with `�`, so the output is always valid JSON
/// even when the input is not valid text.
pub fn append_json_bytes(dst: &mut Vec<u8>, s: &[u8]) {
    dst.reserve(s.len() + 2);
    dst.push(b'"');
    match s.iter().position(|b| !NO_ESCAPE[*b as usize]) {
        None => dst.extend_from_slice(s),
        Some(i) => {
            dst.extend_from_slice(&s[..i]);
            append_complex(dst, &s[i..]);
        }
    }
    dst.push(b'"');
}

/// Slow path, taken over from the first byte which needs care.
fn append_complex(dst: &mut Vec<u8>, s: &[u8]) {
    for chunk in s.utf8_chunks() {
        let valid = chunk.valid().as_bytes();
        let mut start = 0;
        for (i, &b) in valid.iter().enumerate() {
            // multi-byte characters are kept as they are
            if b >= 0x80 || NO_ESCAPE[b as usize] {
                continue;
            }
            if start < i {
                dst.extend_from_slice(&valid[start..i]);
            }
            match b {
                b'"' | b'\\' => dst.extend_from_slice(&[b'\\', b]),
                0x08 => dst.extend_from_slice(b"\\b"),
                0x0c => dst.extend_from_slice(b"\\f"),
                b'\n' => dst.extend_from_slice(b"\\n"),
                b'\r' => dst.extend_from_slice(b"\\r"),
                b'\t' => dst.extend_from_slice(b"\\t"),
                _ => dst.extend_from_slice(&[
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    HEX[(b >> 4) as usize],
                    HEX[(b & 0xf) as usize],
                ]),
            }
            start = i + 1;
        }
        if start < valid.len() {
            dst.extend_from_slice(&valid[start..]);
        }
        if !chunk.invalid().is_empty() {
            dst.extend_from_slice(b"\\ufffd");
        }
    }
}
