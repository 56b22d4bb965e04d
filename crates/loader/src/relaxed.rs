//! Tolerant JSON pre-pass: comments and trailing commas.

/// Rewrites `text` into strict JSON by removing `//` and `/* */` comments
/// and commas that directly precede a closing bracket. String literals are
/// copied untouched, escapes included.
pub(crate) fn strip(text: &str) -> String {
	let bytes = text.as_bytes();
	let mut out = Vec::with_capacity(bytes.len());
	let mut i = 0;

	while i < bytes.len() {
		match bytes[i] {
			b'"' => {
				out.push(b'"');
				i += 1;
				while i < bytes.len() {
					let byte = bytes[i];
					out.push(byte);
					i += 1;
					if byte == b'\\' {
						if i < bytes.len() {
							out.push(bytes[i]);
							i += 1;
						}
					} else if byte == b'"' {
						break;
					}
				}
			}
			b'/' if bytes.get(i + 1) == Some(&b'/') => {
				i = skip_line_comment(bytes, i);
			}
			b'/' if bytes.get(i + 1) == Some(&b'*') => {
				i = skip_block_comment(bytes, i);
			}
			b',' => {
				if !closes_container(bytes, i + 1) {
					out.push(b',');
				}
				i += 1;
			}
			byte => {
				out.push(byte);
				i += 1;
			}
		}
	}

	String::from_utf8(out).expect("removals are ascii-aligned")
}

fn skip_line_comment(bytes: &[u8], mut i: usize) -> usize {
	while i < bytes.len() && bytes[i] != b'\n' {
		i += 1;
	}
	i
}

fn skip_block_comment(bytes: &[u8], mut i: usize) -> usize {
	i += 2;
	while i < bytes.len() {
		if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
			return i + 2;
		}
		i += 1;
	}
	i
}

/// Whether the next significant byte at or after `i` closes an array or an
/// object. Whitespace and comments are not significant.
fn closes_container(bytes: &[u8], mut i: usize) -> bool {
	loop {
		match bytes.get(i) {
			Some(b' ' | b'\t' | b'\r' | b'\n') => i += 1,
			Some(b'/') if bytes.get(i + 1) == Some(&b'/') => {
				i = skip_line_comment(bytes, i);
			}
			Some(b'/') if bytes.get(i + 1) == Some(&b'*') => {
				i = skip_block_comment(bytes, i);
			}
			Some(b']' | b'}') => return true,
			_ => return false,
		}
	}
}
