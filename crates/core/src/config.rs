//! Typed per-component configuration entries.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use crate::cast::{self, ValueKind};

/// Errors raised by [`Config`] writes and reads.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The key is already present; entries are write-once.
	#[error("Config entry \"{key}\" already defined.")]
	DuplicateKey { key: String },
	/// No entry stored under the key.
	#[error("Config entry \"{key}\" not found.")]
	NotFound { key: String },
	/// The stored value cannot be read as the requested kind.
	#[error("Could not cast config entry \"{key}\" from {from}{{{value}}} to {to}.")]
	Cast {
		key: String,
		value: String,
		from: &'static str,
		to: &'static str,
	},
}

/// A configuration value together with its declared kind.
///
/// The kind is part of the value: an entry stored as [`ConfigValue::U64`]
/// stays a `u64` entry and reads back under the cast rules in [`cast`],
/// never silently as some other kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
	/// Boolean flag.
	Bool(bool),
	/// Unsigned 8-bit integer.
	U8(u8),
	/// Signed 8-bit integer.
	I8(i8),
	/// Unsigned 16-bit integer.
	U16(u16),
	/// Signed 16-bit integer.
	I16(i16),
	/// Unsigned 32-bit integer.
	U32(u32),
	/// Signed 32-bit integer.
	I32(i32),
	/// Unsigned 64-bit integer.
	U64(u64),
	/// Signed 64-bit integer.
	I64(i64),
	/// Text value.
	Str(String),
}

impl ConfigValue {
	/// The declared kind of this value.
	pub fn kind(&self) -> ValueKind {
		match self {
			ConfigValue::Bool(_) => ValueKind::Bool,
			ConfigValue::U8(_) => ValueKind::U8,
			ConfigValue::I8(_) => ValueKind::I8,
			ConfigValue::U16(_) => ValueKind::U16,
			ConfigValue::I16(_) => ValueKind::I16,
			ConfigValue::U32(_) => ValueKind::U32,
			ConfigValue::I32(_) => ValueKind::I32,
			ConfigValue::U64(_) => ValueKind::U64,
			ConfigValue::I64(_) => ValueKind::I64,
			ConfigValue::Str(_) => ValueKind::Str,
		}
	}

	/// The numeric value widened to `i128`, or `None` for text.
	pub fn as_i128(&self) -> Option<i128> {
		match self {
			ConfigValue::Bool(v) => Some(i128::from(*v)),
			ConfigValue::U8(v) => Some(i128::from(*v)),
			ConfigValue::I8(v) => Some(i128::from(*v)),
			ConfigValue::U16(v) => Some(i128::from(*v)),
			ConfigValue::I16(v) => Some(i128::from(*v)),
			ConfigValue::U32(v) => Some(i128::from(*v)),
			ConfigValue::I32(v) => Some(i128::from(*v)),
			ConfigValue::U64(v) => Some(i128::from(*v)),
			ConfigValue::I64(v) => Some(i128::from(*v)),
			ConfigValue::Str(_) => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			ConfigValue::Str(v) => Some(v),
			_ => None,
		}
	}
}

impl fmt::Display for ConfigValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigValue::Bool(v) => write!(f, "{v}"),
			ConfigValue::U8(v) => write!(f, "{v}"),
			ConfigValue::I8(v) => write!(f, "{v}"),
			ConfigValue::U16(v) => write!(f, "{v}"),
			ConfigValue::I16(v) => write!(f, "{v}"),
			ConfigValue::U32(v) => write!(f, "{v}"),
			ConfigValue::I32(v) => write!(f, "{v}"),
			ConfigValue::U64(v) => write!(f, "{v}"),
			ConfigValue::I64(v) => write!(f, "{v}"),
			ConfigValue::Str(v) => f.write_str(v),
		}
	}
}

impl From<bool> for ConfigValue {
	fn from(value: bool) -> Self {
		ConfigValue::Bool(value)
	}
}

impl From<String> for ConfigValue {
	fn from(value: String) -> Self {
		ConfigValue::Str(value)
	}
}

impl From<&str> for ConfigValue {
	fn from(value: &str) -> Self {
		ConfigValue::Str(value.to_string())
	}
}

macro_rules! impl_numeric_value {
	($($ty:ty => $variant:ident),* $(,)?) => {$(
		impl From<$ty> for ConfigValue {
			fn from(value: $ty) -> Self {
				ConfigValue::$variant(value)
			}
		}

		impl sealed::Sealed for $ty {}

		impl FromConfigValue for $ty {
			fn kind() -> ValueKind {
				ValueKind::$variant
			}

			fn from_value(key: &str, value: &ConfigValue) -> Result<Self, ConfigError> {
				match value.as_i128() {
					Some(stored) if cast::check(stored, value.kind(), Self::kind()) => Ok(stored as $ty),
					_ => Err(cast_error(key, value, Self::kind())),
				}
			}
		}
	)*};
}

impl_numeric_value! {
	u8 => U8,
	i8 => I8,
	u16 => U16,
	i16 => I16,
	u32 => U32,
	i32 => I32,
	u64 => U64,
	i64 => I64,
}

// Seal the FromConfigValue trait to prevent external implementations.
mod sealed {
	pub trait Sealed {}

	impl Sealed for bool {}
	impl Sealed for String {}
}

/// Rust types a [`ConfigValue`] can be read back as.
pub trait FromConfigValue: sealed::Sealed + Sized {
	/// The kind this type reads as.
	fn kind() -> ValueKind;

	/// Extracts `Self` from a stored value, or reports why it cannot.
	fn from_value(key: &str, value: &ConfigValue) -> Result<Self, ConfigError>;
}

impl FromConfigValue for bool {
	fn kind() -> ValueKind {
		ValueKind::Bool
	}

	fn from_value(key: &str, value: &ConfigValue) -> Result<Self, ConfigError> {
		match value.as_i128() {
			Some(stored) if cast::check(stored, value.kind(), ValueKind::Bool) => Ok(stored != 0),
			_ => Err(cast_error(key, value, ValueKind::Bool)),
		}
	}
}

impl FromConfigValue for String {
	fn kind() -> ValueKind {
		ValueKind::Str
	}

	fn from_value(key: &str, value: &ConfigValue) -> Result<Self, ConfigError> {
		match value {
			ConfigValue::Str(stored) => Ok(stored.clone()),
			_ => Err(cast_error(key, value, ValueKind::Str)),
		}
	}
}

fn cast_error(key: &str, value: &ConfigValue, to: ValueKind) -> ConfigError {
	ConfigError::Cast {
		key: key.to_string(),
		value: value.to_string(),
		from: value.kind().name(),
		to: to.name(),
	}
}

/// Write-once, key-ordered configuration entries of one component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
	entries: BTreeMap<String, ConfigValue>,
}

impl Config {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores a value under `key`. Keys cannot be redefined.
	pub fn add(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Result<(), ConfigError> {
		match self.entries.entry(key.into()) {
			Entry::Occupied(entry) => Err(ConfigError::DuplicateKey { key: entry.key().clone() }),
			Entry::Vacant(entry) => {
				entry.insert(value.into());
				Ok(())
			}
		}
	}

	/// Reads the entry under `key` as `T`, applying the cast rules.
	pub fn get<T: FromConfigValue>(&self, key: &str) -> Result<T, ConfigError> {
		match self.entries.get(key) {
			Some(value) => T::from_value(key, value),
			None => Err(ConfigError::NotFound { key: key.to_string() }),
		}
	}

	/// The stored value under `key`, kind and all.
	pub fn value(&self, key: &str) -> Option<&ConfigValue> {
		self.entries.get(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Entries in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
		self.entries.iter().map(|(key, value)| (key.as_str(), value))
	}
}
