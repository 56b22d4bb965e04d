//! Per-type construction strategies and dependency slot resolution.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::component::{Assemble, Component, ComponentCore, Registrar};
use crate::config::ConfigError;
use crate::id::DependencyId;
use crate::registry::{DependencyRegistry, RegistryError};
use crate::topology::TopologyEntry;
use crate::typename::short_type_name;

/// Errors raised while constructing components from a topology.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
	/// No factory registered under the entry's type name.
	#[error("Factory of {type_name}{{}} not registered.")]
	FactoryNotFound { type_name: String },
	/// The entry supplies fewer dependency ids than the component consumes.
	#[error("Component {type_name}{{\"{id}\"}} - Dependency slot #{slot} has no id ({supplied} supplied).")]
	MissingDependencyId {
		type_name: &'static str,
		id: DependencyId,
		slot: usize,
		supplied: usize,
	},
	/// A side dependency was declared with an empty side id.
	#[error("Side id shall not be empty for component {type_name}{{\"{id}\"}}.")]
	EmptySideId { type_name: &'static str, id: DependencyId },
	/// Two side dependencies of one component share a side id.
	#[error("Side id \"{side_id}\" duplicated for component {type_name}{{\"{id}\"}}.")]
	SideIdDuplicated {
		type_name: &'static str,
		id: DependencyId,
		side_id: String,
	},
	#[error(transparent)]
	Registry(#[from] RegistryError),
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Positional cursor over a topology entry's dependency ids.
///
/// Each `next` call binds the current slot to a registry lookup under the
/// requested interface type and advances. Supplied ids past the last consumed
/// slot are ignored.
pub struct Injector<'a> {
	registry: &'a DependencyRegistry,
	ids: &'a [DependencyId],
	cursor: usize,
	type_name: &'static str,
	id: DependencyId,
}

impl<'a> Injector<'a> {
	pub(crate) fn new(
		registry: &'a DependencyRegistry,
		ids: &'a [DependencyId],
		type_name: &'static str,
		id: DependencyId,
	) -> Self {
		Self { registry, ids, cursor: 0, type_name, id }
	}

	/// Resolves the next dependency slot as interface `T`.
	pub fn next<T: ?Sized + 'static>(&mut self) -> Result<Arc<T>, BuildError> {
		let Some(id) = self.ids.get(self.cursor) else {
			return Err(BuildError::MissingDependencyId {
				type_name: self.type_name,
				id: self.id.clone(),
				slot: self.cursor,
				supplied: self.ids.len(),
			});
		};
		self.cursor += 1;
		Ok(self.registry.get::<T>(id.as_str())?)
	}

	/// Number of supplied ids not yet consumed.
	pub fn remaining(&self) -> usize {
		self.ids.len() - self.cursor
	}
}

/// Construction strategy for one component type.
pub trait ComponentFactory {
	/// Type name this factory serves, matched against topology entries.
	fn type_name(&self) -> &'static str;

	/// Builds one instance from `entry` and registers its capabilities.
	///
	/// Capability registration runs only after construction fully succeeds;
	/// a failed build leaves no trace of the instance in `registry`.
	fn build(
		&self,
		entry: TopologyEntry,
		registry: &mut DependencyRegistry,
	) -> Result<Arc<dyn Component>, BuildError>;
}

impl fmt::Debug for dyn ComponentFactory + '_ {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Factory of {}{{}}", self.type_name())
	}
}

/// Generic factory for any [`Assemble`] component type.
pub struct Factory<C> {
	_marker: PhantomData<fn() -> C>,
}

impl<C: Assemble> Factory<C> {
	pub fn new() -> Self {
		Self { _marker: PhantomData }
	}
}

impl<C: Assemble> Default for Factory<C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<C: Assemble> ComponentFactory for Factory<C> {
	fn type_name(&self) -> &'static str {
		short_type_name::<C>()
	}

	fn build(
		&self,
		entry: TopologyEntry,
		registry: &mut DependencyRegistry,
	) -> Result<Arc<dyn Component>, BuildError> {
		let TopologyEntry { id, dependency_ids, config, .. } = entry;
		let type_name = short_type_name::<C>();
		let core = ComponentCore::new(type_name, id, config);
		let owner_id = core.id().clone();

		let mut deps = Injector::new(registry, &dependency_ids, type_name, owner_id.clone());
		let component = Arc::new(C::assemble(core, &mut deps)?);

		let mut registrar = Registrar::new(registry, type_name, owner_id);
		C::expose(&component, &mut registrar)?;

		tracing::debug!(type_name, id = %component.id(), "component built");
		Ok(component)
	}
}

/// Explicit collection of component factories, keyed by type name.
///
/// Constructed once at startup and passed by reference into
/// [`Assembly::new`](crate::Assembly::new); isolated instances keep tests and
/// embedders from sharing state.
#[derive(Default)]
pub struct FactoryRegistry {
	factories: BTreeMap<&'static str, Box<dyn ComponentFactory>>,
}

impl FactoryRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the generic factory for `C`. Returns whether the type name
	/// was free.
	pub fn register<C: Assemble>(&mut self) -> bool {
		self.add(Box::new(Factory::<C>::new()))
	}

	/// Adds a custom factory. Returns whether its type name was free.
	pub fn add(&mut self, factory: Box<dyn ComponentFactory>) -> bool {
		match self.factories.entry(factory.type_name()) {
			Entry::Occupied(_) => false,
			Entry::Vacant(entry) => {
				tracing::debug!(type_name = factory.type_name(), "factory registered");
				entry.insert(factory);
				true
			}
		}
	}

	pub fn has(&self, type_name: &str) -> bool {
		self.factories.contains_key(type_name)
	}

	/// Looks up the factory serving `type_name`.
	pub fn get(&self, type_name: &str) -> Result<&dyn ComponentFactory, BuildError> {
		match self.factories.get(type_name) {
			Some(factory) => Ok(factory.as_ref()),
			None => Err(BuildError::FactoryNotFound { type_name: type_name.to_string() }),
		}
	}

	/// Registered type names, ordered.
	pub fn all(&self) -> Vec<&'static str> {
		self.factories.keys().copied().collect()
	}

	pub fn len(&self) -> usize {
		self.factories.len()
	}

	pub fn is_empty(&self) -> bool {
		self.factories.is_empty()
	}
}
