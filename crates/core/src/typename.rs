//! Short type names for factory keys and diagnostics.

/// Returns the unqualified name of `T`.
///
/// [`std::any::type_name`] yields a crate-qualified path such as
/// `app::sensors::Gps` or `dyn app::ports::Clock`, while factories and
/// diagnostics key on the bare `Gps` / `Clock`. Only the outermost path is
/// stripped; segments inside generic argument lists stay qualified.
pub fn short_type_name<T: ?Sized>() -> &'static str {
	let full = std::any::type_name::<T>();
	let bytes = full.as_bytes();
	let mut depth = 0usize;
	let mut start = 0usize;
	let mut i = 0;
	while i < bytes.len() {
		match bytes[i] {
			b'<' | b'(' | b'[' => depth += 1,
			b'>' | b')' | b']' => depth = depth.saturating_sub(1),
			b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
				start = i + 2;
				i += 1;
			}
			_ => {}
		}
		i += 1;
	}
	&full[start..]
}

#[cfg(test)]
mod tests {
	use super::*;

	trait Meter {}

	struct Gauge;

	#[allow(dead_code)]
	struct Wrapper<T>(T);

	#[test]
	fn test_strips_module_path() {
		assert_eq!(short_type_name::<Gauge>(), "Gauge");
	}

	#[test]
	fn test_dyn_trait_yields_bare_trait_name() {
		assert_eq!(short_type_name::<dyn Meter>(), "Meter");
	}

	#[test]
	fn test_primitives_pass_through() {
		assert_eq!(short_type_name::<u8>(), "u8");
		assert_eq!(short_type_name::<bool>(), "bool");
	}

	#[test]
	fn test_std_string_is_unqualified() {
		assert_eq!(short_type_name::<String>(), "String");
	}

	#[test]
	fn test_generic_arguments_stay_qualified() {
		let name = short_type_name::<Wrapper<Gauge>>();
		assert!(name.starts_with("Wrapper<"), "{name}");
		assert!(name.ends_with("Gauge>"), "{name}");
	}
}
