//! Component identity, configuration access, and capability registration.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::config::{Config, ConfigError, FromConfigValue};
use crate::factory::{BuildError, Injector};
use crate::id::DependencyId;
use crate::registry::DependencyRegistry;

/// Identity and configuration handed to a component at construction.
///
/// Immutable for the component's lifetime; every component embeds one.
#[derive(Debug)]
pub struct ComponentCore {
	type_name: &'static str,
	id: DependencyId,
	config: Config,
}

impl ComponentCore {
	pub fn new(type_name: &'static str, id: impl Into<DependencyId>, config: Config) -> Self {
		Self { type_name, id: id.into(), config }
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub fn id(&self) -> &DependencyId {
		&self.id
	}

	/// Reads a configuration entry as `T`, applying the cast rules.
	pub fn config<T: FromConfigValue>(&self, key: &str) -> Result<T, ConfigError> {
		self.config.get(key)
	}

	pub fn has_config(&self, key: &str) -> bool {
		self.config.contains_key(key)
	}
}

/// Object-safe face of a constructed component.
///
/// An assembly owns its components through this trait; everything else about
/// a component is reached through the interfaces it exposes.
pub trait Component: 'static {
	/// The identity and configuration backing this component.
	fn core(&self) -> &ComponentCore;

	fn type_name(&self) -> &'static str {
		self.core().type_name()
	}

	fn id(&self) -> &DependencyId {
		self.core().id()
	}
}

impl fmt::Debug for dyn Component {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{{{}}}", self.type_name(), self.id())
	}
}

/// Implements [`Component`] for a type with a `core: ComponentCore` field.
#[macro_export]
macro_rules! impl_component {
	($ty:ty) => {
		impl $crate::Component for $ty {
			fn core(&self) -> &$crate::ComponentCore {
				&self.core
			}
		}
	};
}

/// Declarative construction face of a component type.
///
/// `assemble` pulls dependency slots off the injector in declaration order;
/// `expose` then publishes the interfaces other components may resolve. The
/// default `expose` publishes nothing.
pub trait Assemble: Component + Sized {
	fn assemble(core: ComponentCore, deps: &mut Injector<'_>) -> Result<Self, BuildError>;

	fn expose(this: &Arc<Self>, registrar: &mut Registrar<'_>) -> Result<(), BuildError> {
		let _ = (this, registrar);
		Ok(())
	}
}

/// Publishes a freshly constructed component's capabilities.
///
/// Exposed interfaces register under the component's own id; side
/// dependencies register under `<id>_<side_id>`, with side ids unique within
/// the component across all interface types.
pub struct Registrar<'a> {
	registry: &'a mut DependencyRegistry,
	type_name: &'static str,
	id: DependencyId,
	side_ids: BTreeSet<DependencyId>,
}

impl<'a> Registrar<'a> {
	pub(crate) fn new(
		registry: &'a mut DependencyRegistry,
		type_name: &'static str,
		id: DependencyId,
	) -> Self {
		Self { registry, type_name, id, side_ids: BTreeSet::new() }
	}

	/// Registers `dependency` as interface `T` under the component's id.
	pub fn expose<T: ?Sized + 'static>(&mut self, dependency: Arc<T>) -> Result<(), BuildError> {
		self.registry.add::<T>(self.id.clone(), dependency)?;
		Ok(())
	}

	/// Registers an owned sub-object as interface `T` under the derived id
	/// `<id>_<side_id>`.
	pub fn side<T: ?Sized + 'static>(
		&mut self,
		side_id: &str,
		dependency: Arc<T>,
	) -> Result<(), BuildError> {
		if side_id.is_empty() {
			return Err(BuildError::EmptySideId {
				type_name: self.type_name,
				id: self.id.clone(),
			});
		}
		let derived = self.id.derived(side_id);
		if !self.side_ids.insert(derived.clone()) {
			return Err(BuildError::SideIdDuplicated {
				type_name: self.type_name,
				id: self.id.clone(),
				side_id: side_id.to_string(),
			});
		}
		self.registry.add::<T>(derived, dependency)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	trait Feed {}

	trait Sink {}

	struct Channel;

	impl Feed for Channel {}

	impl Sink for Channel {}

	fn registrar_fixture(registry: &mut DependencyRegistry) -> Registrar<'_> {
		Registrar::new(registry, "Channel", DependencyId::from("ch0"))
	}

	#[test]
	fn test_core_reads_config() {
		let mut config = Config::new();
		config.add("rate", 9600u32).unwrap();
		let core = ComponentCore::new("Channel", "ch0", config);

		assert_eq!(core.type_name(), "Channel");
		assert_eq!(core.id().as_str(), "ch0");
		assert_eq!(core.config::<u32>("rate").unwrap(), 9600);
		assert!(core.has_config("rate"));
		assert!(!core.has_config("baud"));
	}

	#[test]
	fn test_expose_registers_under_own_id() {
		let mut registry = DependencyRegistry::new();
		let channel = Arc::new(Channel);
		let mut registrar = registrar_fixture(&mut registry);
		registrar.expose::<dyn Feed>(channel.clone()).unwrap();
		registrar.expose::<dyn Sink>(channel).unwrap();

		assert!(registry.has::<dyn Feed>("ch0"));
		assert!(registry.has::<dyn Sink>("ch0"));
	}

	#[test]
	fn test_side_registers_under_derived_id() {
		let mut registry = DependencyRegistry::new();
		let channel = Arc::new(Channel);
		let mut registrar = registrar_fixture(&mut registry);
		registrar.side::<dyn Feed>("north", channel).unwrap();

		assert!(registry.has::<dyn Feed>("ch0_north"));
		assert!(!registry.has::<dyn Feed>("ch0"));
	}

	#[test]
	fn test_side_rejects_empty_id() {
		let mut registry = DependencyRegistry::new();
		let channel = Arc::new(Channel);
		let mut registrar = registrar_fixture(&mut registry);
		let err = registrar.side::<dyn Feed>("", channel).unwrap_err();
		assert_eq!(
			err.to_string(),
			"Side id shall not be empty for component Channel{\"ch0\"}.",
		);
	}

	#[test]
	fn test_side_id_unique_across_interface_types() {
		let mut registry = DependencyRegistry::new();
		let channel = Arc::new(Channel);
		let mut registrar = registrar_fixture(&mut registry);
		registrar.side::<dyn Feed>("north", channel.clone()).unwrap();
		let err = registrar.side::<dyn Sink>("north", channel).unwrap_err();
		assert_eq!(
			err.to_string(),
			"Side id \"north\" duplicated for component Channel{\"ch0\"}.",
		);
	}

	#[test]
	fn test_config_value_kinds_survive_core() {
		let mut config = Config::new();
		config.add("mode", "fast").unwrap();
		let core = ComponentCore::new("Channel", "ch0", config);
		let err = core.config::<u8>("mode").unwrap_err();
		assert_eq!(
			err.to_string(),
			"Could not cast config entry \"mode\" from String{fast} to u8.",
		);
		assert_eq!(core.config::<String>("mode").unwrap(), "fast");
	}
}
