//! Width- and range-checked conversions between configuration value kinds.

/// The declared kind of a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
	Bool,
	U8,
	I8,
	U16,
	I16,
	U32,
	I32,
	U64,
	I64,
	Str,
}

impl ValueKind {
	/// Name used in diagnostics.
	pub fn name(self) -> &'static str {
		match self {
			ValueKind::Bool => "bool",
			ValueKind::U8 => "u8",
			ValueKind::I8 => "i8",
			ValueKind::U16 => "u16",
			ValueKind::I16 => "i16",
			ValueKind::U32 => "u32",
			ValueKind::I32 => "i32",
			ValueKind::U64 => "u64",
			ValueKind::I64 => "i64",
			ValueKind::Str => "String",
		}
	}

	/// Storage width in bytes. Text has no numeric width.
	pub fn width(self) -> usize {
		match self {
			ValueKind::Bool | ValueKind::U8 | ValueKind::I8 => 1,
			ValueKind::U16 | ValueKind::I16 => 2,
			ValueKind::U32 | ValueKind::I32 => 4,
			ValueKind::U64 | ValueKind::I64 => 8,
			ValueKind::Str => 0,
		}
	}

	/// Smallest representable value of a numeric kind.
	pub fn min(self) -> i128 {
		match self {
			ValueKind::Bool | ValueKind::Str => 0,
			ValueKind::U8 | ValueKind::U16 | ValueKind::U32 | ValueKind::U64 => 0,
			ValueKind::I8 => i128::from(i8::MIN),
			ValueKind::I16 => i128::from(i16::MIN),
			ValueKind::I32 => i128::from(i32::MIN),
			ValueKind::I64 => i128::from(i64::MIN),
		}
	}

	/// Largest representable value of a numeric kind.
	pub fn max(self) -> i128 {
		match self {
			ValueKind::Bool => 1,
			ValueKind::Str => 0,
			ValueKind::U8 => i128::from(u8::MAX),
			ValueKind::I8 => i128::from(i8::MAX),
			ValueKind::U16 => i128::from(u16::MAX),
			ValueKind::I16 => i128::from(i16::MAX),
			ValueKind::U32 => i128::from(u32::MAX),
			ValueKind::I32 => i128::from(i32::MAX),
			ValueKind::U64 => i128::from(u64::MAX),
			ValueKind::I64 => i128::from(i64::MAX),
		}
	}

	pub fn is_numeric(self) -> bool {
		!matches!(self, ValueKind::Str)
	}
}

/// Whether `value`, stored as kind `from`, may be read back as kind `to`.
///
/// A read is allowed when `to` is no wider than `from` and the concrete
/// stored value lies inside `to`'s representable range. Widening reads are
/// rejected even when the value would fit. Text takes part in no numeric
/// cast in either direction.
pub fn check(value: i128, from: ValueKind, to: ValueKind) -> bool {
	if !from.is_numeric() || !to.is_numeric() {
		return false;
	}
	to.width() <= from.width() && to.min() <= value && value <= to.max()
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::ValueKind::*;
	use super::*;

	/// Boundary probes for a source kind: minimum, `-1` cast onto the kind
	/// (the maximum for kinds with no negative range), zero, one, maximum.
	fn probes(kind: ValueKind) -> [i128; 5] {
		let wrapped_minus_one = if kind.min() < 0 { -1 } else { kind.max() };
		[kind.min(), wrapped_minus_one, 0, 1, kind.max()]
	}

	#[test]
	fn test_numeric_matrix() {
		let table: &[(ValueKind, ValueKind, [bool; 5])] = &[
			(Bool, Bool, [true, true, true, true, true]),
			(Bool, U8, [true, true, true, true, true]),
			(Bool, I8, [true, true, true, true, true]),
			(Bool, U16, [false, false, false, false, false]),
			(Bool, I16, [false, false, false, false, false]),
			(Bool, U32, [false, false, false, false, false]),
			(Bool, I32, [false, false, false, false, false]),
			(Bool, U64, [false, false, false, false, false]),
			(Bool, I64, [false, false, false, false, false]),
			(U8, Bool, [true, false, true, true, false]),
			(U8, U8, [true, true, true, true, true]),
			(U8, I8, [true, false, true, true, false]),
			(U8, U16, [false, false, false, false, false]),
			(U8, I16, [false, false, false, false, false]),
			(U8, U32, [false, false, false, false, false]),
			(U8, I32, [false, false, false, false, false]),
			(U8, U64, [false, false, false, false, false]),
			(U8, I64, [false, false, false, false, false]),
			(I8, Bool, [false, false, true, true, false]),
			(I8, U8, [false, false, true, true, true]),
			(I8, I8, [true, true, true, true, true]),
			(I8, U16, [false, false, false, false, false]),
			(I8, I16, [false, false, false, false, false]),
			(I8, U32, [false, false, false, false, false]),
			(I8, I32, [false, false, false, false, false]),
			(I8, U64, [false, false, false, false, false]),
			(I8, I64, [false, false, false, false, false]),
			(U16, Bool, [true, false, true, true, false]),
			(U16, U8, [true, false, true, true, false]),
			(U16, I8, [true, false, true, true, false]),
			(U16, U16, [true, true, true, true, true]),
			(U16, I16, [true, false, true, true, false]),
			(U16, U32, [false, false, false, false, false]),
			(U16, I32, [false, false, false, false, false]),
			(U16, U64, [false, false, false, false, false]),
			(U16, I64, [false, false, false, false, false]),
			(I16, Bool, [false, false, true, true, false]),
			(I16, U8, [false, false, true, true, false]),
			(I16, I8, [false, true, true, true, false]),
			(I16, U16, [false, false, true, true, true]),
			(I16, I16, [true, true, true, true, true]),
			(I16, U32, [false, false, false, false, false]),
			(I16, I32, [false, false, false, false, false]),
			(I16, U64, [false, false, false, false, false]),
			(I16, I64, [false, false, false, false, false]),
			(U32, Bool, [true, false, true, true, false]),
			(U32, U8, [true, false, true, true, false]),
			(U32, I8, [true, false, true, true, false]),
			(U32, U16, [true, false, true, true, false]),
			(U32, I16, [true, false, true, true, false]),
			(U32, U32, [true, true, true, true, true]),
			(U32, I32, [true, false, true, true, false]),
			(U32, U64, [false, false, false, false, false]),
			(U32, I64, [false, false, false, false, false]),
			(I32, Bool, [false, false, true, true, false]),
			(I32, U8, [false, false, true, true, false]),
			(I32, I8, [false, true, true, true, false]),
			(I32, U16, [false, false, true, true, false]),
			(I32, I16, [false, true, true, true, false]),
			(I32, U32, [false, false, true, true, true]),
			(I32, I32, [true, true, true, true, true]),
			(I32, U64, [false, false, false, false, false]),
			(I32, I64, [false, false, false, false, false]),
			(U64, Bool, [true, false, true, true, false]),
			(U64, U8, [true, false, true, true, false]),
			(U64, I8, [true, false, true, true, false]),
			(U64, U16, [true, false, true, true, false]),
			(U64, I16, [true, false, true, true, false]),
			(U64, U32, [true, false, true, true, false]),
			(U64, I32, [true, false, true, true, false]),
			(U64, U64, [true, true, true, true, true]),
			(U64, I64, [true, false, true, true, false]),
			(I64, Bool, [false, false, true, true, false]),
			(I64, U8, [false, false, true, true, false]),
			(I64, I8, [false, true, true, true, false]),
			(I64, U16, [false, false, true, true, false]),
			(I64, I16, [false, true, true, true, false]),
			(I64, U32, [false, false, true, true, false]),
			(I64, I32, [false, true, true, true, false]),
			(I64, U64, [false, false, true, true, true]),
			(I64, I64, [true, true, true, true, true]),
		];

		for &(from, to, expected) in table {
			let values = probes(from);
			for slot in 0..5 {
				assert_eq!(
					check(values[slot], from, to),
					expected[slot],
					"{} -> {} with value {}",
					from.name(),
					to.name(),
					values[slot],
				);
			}
		}
	}

	#[test]
	fn test_bool_rejects_values_past_one() {
		assert!(!check(2, U8, Bool));
		assert!(!check(2, U16, Bool));
		assert!(!check(2, I64, Bool));
	}

	#[test]
	fn test_text_never_casts() {
		assert!(!check(0, Str, Str));
		assert!(!check(0, Str, U8));
		assert!(!check(0, U8, Str));
		assert!(!check(1, Str, Bool));
	}

	fn kind_strategy() -> impl Strategy<Value = ValueKind> {
		prop::sample::select(vec![Bool, U8, I8, U16, I16, U32, I32, U64, I64])
	}

	fn kind_and_value() -> impl Strategy<Value = (ValueKind, i128)> {
		kind_strategy().prop_flat_map(|kind| (Just(kind), kind.min()..=kind.max()))
	}

	proptest! {
		#[test]
		fn prop_check_agrees_with_try_from((from, value) in kind_and_value(), to in kind_strategy()) {
			let fits = match to {
				Bool => value == 0 || value == 1,
				U8 => u8::try_from(value).is_ok(),
				I8 => i8::try_from(value).is_ok(),
				U16 => u16::try_from(value).is_ok(),
				I16 => i16::try_from(value).is_ok(),
				U32 => u32::try_from(value).is_ok(),
				I32 => i32::try_from(value).is_ok(),
				U64 => u64::try_from(value).is_ok(),
				I64 => i64::try_from(value).is_ok(),
				Str => false,
			};
			prop_assert_eq!(check(value, from, to), to.width() <= from.width() && fits);
		}

		#[test]
		fn prop_same_kind_always_casts((kind, value) in kind_and_value()) {
			prop_assert!(check(value, kind, kind));
		}
	}
}
