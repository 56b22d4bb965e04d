//! Composition root: builds and owns every component of a topology.

use std::fmt;
use std::sync::Arc;

use crate::component::Component;
use crate::factory::{BuildError, FactoryRegistry};
use crate::id::DependencyId;
use crate::registry::{DependencyRegistry, RegistryError};
use crate::topology::Topology;

/// Owns the components built from a topology, plus the registry indexing
/// their exposed capabilities.
///
/// Construction is strictly sequential: each entry may resolve anything
/// registered by earlier entries and nothing else. A failing entry aborts
/// the whole build. Teardown releases registry handles first, then drops
/// components in reverse construction order.
pub struct Assembly {
	registry: DependencyRegistry,
	components: Vec<Arc<dyn Component>>,
}

impl Assembly {
	/// Builds every component of `topology`, in entry order.
	///
	/// On failure the partial assembly unwinds exactly like a complete one:
	/// handles released, components dropped in reverse construction order.
	pub fn new(factories: &FactoryRegistry, topology: Topology) -> Result<Self, BuildError> {
		let mut assembly = Self {
			registry: DependencyRegistry::new(),
			components: Vec::with_capacity(topology.len()),
		};

		for entry in topology {
			let factory = factories.get(&entry.type_name)?;
			tracing::debug!(type_name = %entry.type_name, id = %entry.id, "building entry");
			let component = factory.build(entry, &mut assembly.registry)?;
			assembly.components.push(component);
		}

		Ok(assembly)
	}

	/// Every registered `(type name, id)` pair, ordered by type name then id.
	pub fn all(&self) -> Vec<(&'static str, &DependencyId)> {
		self.registry.all()
	}

	pub fn has<T: ?Sized + 'static>(&self, id: &str) -> bool {
		self.registry.has::<T>(id)
	}

	/// Resolves the capability registered under type `T` and `id`.
	pub fn get<T: ?Sized + 'static>(&self, id: &str) -> Result<Arc<T>, RegistryError> {
		self.registry.get::<T>(id)
	}

	/// Every capability registered under type `T`, in id order.
	pub fn get_all<T: ?Sized + 'static>(&self) -> Vec<Arc<T>> {
		self.registry.get_all::<T>()
	}

	pub fn len(&self) -> usize {
		self.components.len()
	}

	pub fn is_empty(&self) -> bool {
		self.components.is_empty()
	}
}

impl fmt::Debug for Assembly {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Assembly")
			.field("components", &self.components.len())
			.field("registry", &self.registry)
			.finish()
	}
}

impl Drop for Assembly {
	fn drop(&mut self) {
		// Registry handles go first; components then unwind in reverse
		// construction order.
		self.registry.clear();
		while let Some(component) = self.components.pop() {
			tracing::trace!(type_name = component.type_name(), id = %component.id(), "dropping component");
			drop(component);
		}
	}
}
