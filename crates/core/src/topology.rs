//! Declarative description of the components to construct.

use std::fmt;

use crate::config::{Config, ConfigError, ConfigValue};
use crate::id::DependencyId;

/// Errors raised while populating a topology.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
	/// An instance id is used by more than one entry, regardless of type.
	#[error("Component id duplicated for component {type_name}{{\"{id}\"}}.")]
	ComponentIdDuplicated { type_name: String, id: DependencyId },
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// One component instance to construct.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyEntry {
	/// Component type name, matched against registered factories.
	pub type_name: String,
	/// Instance id, unique across the whole topology.
	pub id: DependencyId,
	/// Ordered dependency ids, bound positionally to dependency slots.
	pub dependency_ids: Vec<DependencyId>,
	/// Instance configuration.
	pub config: Config,
}

/// Ordered list of component entries; the list order is the construction
/// order.
///
/// Entries are descriptive and ephemeral: consumed once by
/// [`Assembly::new`](crate::Assembly::new) and not retained afterward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
	entries: Vec<TopologyEntry>,
}

impl Topology {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn entries(&self) -> &[TopologyEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, TopologyEntry> {
		self.entries.iter()
	}

	fn clear(&mut self) {
		self.entries.clear();
	}
}

impl IntoIterator for Topology {
	type Item = TopologyEntry;
	type IntoIter = std::vec::IntoIter<TopologyEntry>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

impl<'a> IntoIterator for &'a Topology {
	type Item = &'a TopologyEntry;
	type IntoIter = std::slice::Iter<'a, TopologyEntry>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

impl fmt::Display for Topology {
	/// Renders the builder-call script that would reproduce this topology.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for entry in &self.entries {
			write!(f, "builder\n    .component(\"{}\", \"{}\")?", entry.type_name, entry.id)?;
			for dependency_id in &entry.dependency_ids {
				write!(f, "\n    .dependency(\"{dependency_id}\")")?;
			}
			for (key, value) in entry.config.iter() {
				match value {
					ConfigValue::Str(text) => {
						write!(f, "\n    .config(\"{key}\", \"{text}\")?")?;
					}
					ConfigValue::Bool(flag) => {
						write!(f, "\n    .config(\"{key}\", {flag})?")?;
					}
					_ => {
						write!(f, "\n    .config(\"{key}\", {value}{})?", value.kind().name())?;
					}
				}
			}
			f.write_str(";\n")?;
		}
		Ok(())
	}
}

/// Fluent, validating population of a [`Topology`].
///
/// Attaching the builder clears the target first; entries accumulate through
/// [`component`](TopologyBuilder::component) calls.
#[derive(Debug)]
pub struct TopologyBuilder<'a> {
	topology: &'a mut Topology,
}

impl<'a> TopologyBuilder<'a> {
	pub fn new(topology: &'a mut Topology) -> Self {
		topology.clear();
		Self { topology }
	}

	/// Starts a new entry. Fails when `id` is already used by any entry,
	/// whatever its type.
	pub fn component(
		&mut self,
		type_name: impl Into<String>,
		id: impl Into<DependencyId>,
	) -> Result<TopologyEntryBuilder<'_>, TopologyError> {
		let type_name = type_name.into();
		let id = id.into();
		if self.topology.entries.iter().any(|entry| entry.id == id) {
			return Err(TopologyError::ComponentIdDuplicated { type_name, id });
		}
		self.topology.entries.push(TopologyEntry {
			type_name,
			id,
			dependency_ids: Vec::new(),
			config: Config::new(),
		});
		let end = self.topology.entries.len();
		Ok(TopologyEntryBuilder { entry: &mut self.topology.entries[end - 1] })
	}
}

/// Fluent configuration of a single entry.
#[derive(Debug)]
pub struct TopologyEntryBuilder<'a> {
	entry: &'a mut TopologyEntry,
}

impl TopologyEntryBuilder<'_> {
	/// Appends a dependency id. Repeats are allowed; the same id may feed
	/// more than one slot.
	pub fn dependency(self, id: impl Into<DependencyId>) -> Self {
		self.entry.dependency_ids.push(id.into());
		self
	}

	/// Adds a config entry. Fails when `key` is already set on this entry.
	pub fn config(
		self,
		key: impl Into<String>,
		value: impl Into<ConfigValue>,
	) -> Result<Self, TopologyError> {
		self.entry.config.add(key, value)?;
		Ok(self)
	}
}
