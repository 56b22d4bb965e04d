//! Populates a topology from JSON documents.
//!
//! The document root is an array of component objects with `type`, `id`,
//! optional `dependencies` (array of non-empty strings) and optional
//! `config` (object). Plain config values keep the widest kind of their
//! JSON representation; a one-key object such as `{"uint8_t": 255}` pins a
//! fixed-width kind, range-checked against the literal at load time.
//!
//! Validation stops at the first problem and reports exactly one error,
//! qualified with the entry index and, once known, the entry's type and id.
//! Files may carry `//` and `/* */` comments and trailing commas; documents
//! already parsed into a [`serde_json::Value`] are consumed as-is.

mod relaxed;

use std::fs;
use std::path::Path;

use backplane_core::{ConfigValue, Topology, TopologyBuilder, TopologyEntryBuilder, TopologyError};
use serde_json::{Map, Value};

const KEY_TYPE: &str = "type";
const KEY_ID: &str = "id";
const KEY_DEPENDENCIES: &str = "dependencies";
const KEY_CONFIG: &str = "config";

const KIND_UINT8: &str = "uint8_t";
const KIND_UINT16: &str = "uint16_t";
const KIND_UINT32: &str = "uint32_t";
const KIND_UINT64: &str = "uint64_t";
const KIND_INT8: &str = "int8_t";
const KIND_INT16: &str = "int16_t";
const KIND_INT32: &str = "int32_t";
const KIND_INT64: &str = "int64_t";

/// Errors raised while loading a topology from a document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	#[error(transparent)]
	Topology(#[from] TopologyError),
	/// The document violates the external format contract.
	#[error("{0}")]
	Document(String),
}

/// Loads a [`Topology`] from a parsed JSON document or a file.
#[derive(Debug)]
pub struct TopologyLoader {
	root: Value,
}

impl TopologyLoader {
	/// Wraps an already-parsed document.
	pub fn from_value(root: Value) -> Self {
		Self { root }
	}

	/// Reads and parses a topology file. Comments and trailing commas are
	/// tolerated.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
		let path = path.as_ref();
		let text = fs::read_to_string(path).map_err(|_| {
			LoadError::Document(format!("Topology file not accessible. Path: \"{}\".", path.display()))
		})?;
		let root = serde_json::from_str(&relaxed::strip(&text)).map_err(|error| {
			LoadError::Document(format!("Topology json syntax error. Details: \n{error}"))
		})?;
		tracing::debug!(path = %path.display(), "topology file parsed");
		Ok(Self { root })
	}

	/// Populates `topology` from the document, clearing it first.
	pub fn load(&self, topology: &mut Topology) -> Result<(), LoadError> {
		let mut builder = TopologyBuilder::new(topology);

		let Value::Array(entries) = &self.root else {
			return Err(LoadError::Document("Topology json shall be an array.".to_string()));
		};

		for (index, entry) in entries.iter().enumerate() {
			let Value::Object(fields) = entry else {
				return Err(LoadError::Document(format!(
					"Component{{#{index}}} - Component shall be an object."
				)));
			};

			let type_name = load_required_string(index, fields, KEY_TYPE, "Component type")?;
			let id = load_required_string(index, fields, KEY_ID, "Component id")?;

			let entry_builder = builder.component(type_name.clone(), id.clone())?;
			let entry_builder = load_dependencies(index, &type_name, &id, fields, entry_builder)?;
			load_config(index, &type_name, &id, fields, entry_builder)?;
		}

		tracing::debug!(entries = entries.len(), "topology loaded");
		Ok(())
	}
}

fn context(index: usize, type_name: &str, id: &str) -> String {
	format!("Component{{#{index}, \"{type_name}\" : \"{id}\"}}")
}

fn load_required_string(
	index: usize,
	fields: &Map<String, Value>,
	key: &str,
	what: &str,
) -> Result<String, LoadError> {
	let Some(value) = fields.get(key) else {
		return Err(LoadError::Document(format!(
			"Component{{#{index}}} - {what} shall be specified."
		)));
	};
	let Value::String(text) = value else {
		return Err(LoadError::Document(format!(
			"Component{{#{index}}} - {what} shall be a string."
		)));
	};
	if text.is_empty() {
		return Err(LoadError::Document(format!(
			"Component{{#{index}}} - {what} shall not be empty."
		)));
	}
	Ok(text.clone())
}

fn load_dependencies<'a>(
	index: usize,
	type_name: &str,
	id: &str,
	fields: &Map<String, Value>,
	mut entry: TopologyEntryBuilder<'a>,
) -> Result<TopologyEntryBuilder<'a>, LoadError> {
	let Some(value) = fields.get(KEY_DEPENDENCIES) else {
		return Ok(entry);
	};
	let Value::Array(items) = value else {
		return Err(LoadError::Document(format!(
			"{} - Dependencies shall be an array.",
			context(index, type_name, id),
		)));
	};

	for (dependency_index, item) in items.iter().enumerate() {
		let Value::String(dependency_id) = item else {
			return Err(LoadError::Document(format!(
				"{} : Dependency{{#{dependency_index}}} - Dependency type shall be a string.",
				context(index, type_name, id),
			)));
		};
		if dependency_id.is_empty() {
			return Err(LoadError::Document(format!(
				"{} : Dependency{{#{dependency_index}}} - Dependency id shall not be empty.",
				context(index, type_name, id),
			)));
		}
		entry = entry.dependency(dependency_id.as_str());
	}

	Ok(entry)
}

fn load_config<'a>(
	index: usize,
	type_name: &str,
	id: &str,
	fields: &Map<String, Value>,
	mut entry: TopologyEntryBuilder<'a>,
) -> Result<TopologyEntryBuilder<'a>, LoadError> {
	let Some(value) = fields.get(KEY_CONFIG) else {
		return Ok(entry);
	};
	let Value::Object(items) = value else {
		return Err(LoadError::Document(format!(
			"{} - Config shall be an object.",
			context(index, type_name, id),
		)));
	};

	for (key, item) in items {
		if key.is_empty() {
			return Err(LoadError::Document(format!(
				"{} - Config shall not consist of empty keys.",
				context(index, type_name, id),
			)));
		}
		entry = load_config_entry(index, type_name, id, key, item, entry)?;
	}

	Ok(entry)
}

fn load_config_entry<'a>(
	index: usize,
	type_name: &str,
	id: &str,
	key: &str,
	value: &Value,
	entry: TopologyEntryBuilder<'a>,
) -> Result<TopologyEntryBuilder<'a>, LoadError> {
	if let Value::Bool(flag) = value {
		return Ok(entry.config(key, *flag)?);
	}
	if let Some(unsigned) = value.as_u64() {
		return Ok(entry.config(key, unsigned)?);
	}
	if let Some(signed) = value.as_i64() {
		return Ok(entry.config(key, signed)?);
	}
	if let Value::String(text) = value {
		return Ok(entry.config(key, text.as_str())?);
	}
	if let Value::Object(fields) = value {
		return load_typed_config_entry(index, type_name, id, key, fields, entry);
	}

	Err(LoadError::Document(format!(
		"{} : Config{{\"{key}\"}} - Config entry type shall be one of {{bool, unsigned int, signed int, string, object}}.",
		context(index, type_name, id),
	)))
}

/// Handles the pinned-kind form `{"<kind>": <integer>}`, range-checking the
/// literal against the kind's exact bounds.
fn load_typed_config_entry<'a>(
	index: usize,
	type_name: &str,
	id: &str,
	key: &str,
	fields: &Map<String, Value>,
	entry: TopologyEntryBuilder<'a>,
) -> Result<TopologyEntryBuilder<'a>, LoadError> {
	let mut items = fields.iter();
	let (kind, value) = match (items.next(), items.next()) {
		(Some(item), None) => item,
		_ => {
			return Err(LoadError::Document(format!(
				"{} : Config{{\"{key}\"}} - Config entry object shall be of size 1.",
				context(index, type_name, id),
			)));
		}
	};

	let range_error = |value_text: &str| {
		LoadError::Document(format!(
			"{} : Config{{\"{key}\", {kind}{{{value_text}}}}} - Config entry value shall be in range of its declared type.",
			context(index, type_name, id),
		))
	};

	let stored = match kind.as_str() {
		KIND_UINT8 | KIND_UINT16 | KIND_UINT32 | KIND_UINT64 => {
			let Some(unsigned) = value.as_u64() else {
				return Err(LoadError::Document(format!(
					"{} : Config{{\"{key}\", {kind}}} - Config entry value type shall be unsigned integer.",
					context(index, type_name, id),
				)));
			};
			let converted = match kind.as_str() {
				KIND_UINT8 => u8::try_from(unsigned).map(ConfigValue::U8).ok(),
				KIND_UINT16 => u16::try_from(unsigned).map(ConfigValue::U16).ok(),
				KIND_UINT32 => u32::try_from(unsigned).map(ConfigValue::U32).ok(),
				_ => Some(ConfigValue::U64(unsigned)),
			};
			match converted {
				Some(stored) => stored,
				None => return Err(range_error(&unsigned.to_string())),
			}
		}
		KIND_INT8 | KIND_INT16 | KIND_INT32 | KIND_INT64 => {
			if !value.is_i64() && !value.is_u64() {
				return Err(LoadError::Document(format!(
					"{} : Config{{\"{key}\", {kind}}} - Config entry value type shall be integer.",
					context(index, type_name, id),
				)));
			}
			let Some(signed) = value.as_i64() else {
				// An integer, but past i64::MAX.
				return Err(range_error(&value.to_string()));
			};
			let converted = match kind.as_str() {
				KIND_INT8 => i8::try_from(signed).map(ConfigValue::I8).ok(),
				KIND_INT16 => i16::try_from(signed).map(ConfigValue::I16).ok(),
				KIND_INT32 => i32::try_from(signed).map(ConfigValue::I32).ok(),
				_ => Some(ConfigValue::I64(signed)),
			};
			match converted {
				Some(stored) => stored,
				None => return Err(range_error(&signed.to_string())),
			}
		}
		_ => {
			return Err(LoadError::Document(format!(
				"{} : Config{{\"{key}\"}} - Config entry object type shall be one of {{uint8_t, int8_t, uint16_t, int16_t, uint32_t, int32_t, uint64_t, int64_t}}.",
				context(index, type_name, id),
			)));
		}
	};

	Ok(entry.config(key, stored)?)
}
