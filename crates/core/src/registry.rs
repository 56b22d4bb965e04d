//! Type-indexed storage of named references to constructed components.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::id::DependencyId;
use crate::typename::short_type_name;

/// Errors raised by [`DependencyRegistry`] registration and lookups.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
	/// An entry already exists under the same type and id.
	#[error("Dependency {type_name}{{}} already registered with id=\"{id}\".")]
	Duplicated { type_name: &'static str, id: DependencyId },
	/// The type has entries, but none under the requested id.
	#[error("Dependency {type_name}{{}} with id=\"{id}\" not found.")]
	NotFound { type_name: &'static str, id: DependencyId },
	/// Nothing was ever registered under the requested type.
	#[error("Dependency {type_name}{{}} with id=\"{id}\" not found.")]
	RegisterNotFound { type_name: &'static str, id: DependencyId },
}

/// All entries registered under one interface type, ordered by id.
struct DependencyRegister<T: ?Sized> {
	entries: BTreeMap<DependencyId, Arc<T>>,
}

impl<T: ?Sized + 'static> DependencyRegister<T> {
	fn new() -> Self {
		Self { entries: BTreeMap::new() }
	}

	fn add(&mut self, id: DependencyId, dependency: Arc<T>) -> Result<(), RegistryError> {
		match self.entries.entry(id) {
			Entry::Occupied(entry) => Err(RegistryError::Duplicated {
				type_name: short_type_name::<T>(),
				id: entry.key().clone(),
			}),
			Entry::Vacant(entry) => {
				entry.insert(dependency);
				Ok(())
			}
		}
	}

	fn get(&self, id: &str) -> Result<Arc<T>, RegistryError> {
		match self.entries.get(id) {
			Some(dependency) => Ok(Arc::clone(dependency)),
			None => Err(RegistryError::NotFound {
				type_name: short_type_name::<T>(),
				id: DependencyId::from(id),
			}),
		}
	}
}

/// Object-safe view of a register, independent of its entry type.
trait ErasedRegister {
	fn type_name(&self) -> &'static str;
	fn len(&self) -> usize;
	fn ids(&self) -> Vec<&DependencyId>;
	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: ?Sized + 'static> ErasedRegister for DependencyRegister<T> {
	fn type_name(&self) -> &'static str {
		short_type_name::<T>()
	}

	fn len(&self) -> usize {
		self.entries.len()
	}

	fn ids(&self) -> Vec<&DependencyId> {
		self.entries.keys().collect()
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}

/// Heterogeneous collection of shared component references, keyed by the
/// declared interface type first and by id second.
///
/// The registry holds plain `Arc` handles; registering a component under a
/// trait object type and under its concrete type are two independent entries.
/// Lookups never construct anything.
#[derive(Default)]
pub struct DependencyRegistry {
	registers: FxHashMap<TypeId, Box<dyn ErasedRegister>>,
}

impl DependencyRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `dependency` under type `T` and `id`.
	pub fn add<T: ?Sized + 'static>(
		&mut self,
		id: impl Into<DependencyId>,
		dependency: Arc<T>,
	) -> Result<(), RegistryError> {
		let id = id.into();
		let register = self
			.registers
			.entry(TypeId::of::<T>())
			.or_insert_with(|| Box::new(DependencyRegister::<T>::new()));
		let register = register
			.as_any_mut()
			.downcast_mut::<DependencyRegister<T>>()
			.expect("register stored under its own TypeId");
		register.add(id.clone(), dependency)?;
		tracing::trace!(type_name = short_type_name::<T>(), id = %id, "dependency registered");
		Ok(())
	}

	/// Whether an entry exists under type `T` and `id`.
	pub fn has<T: ?Sized + 'static>(&self, id: &str) -> bool {
		self.register::<T>()
			.is_some_and(|register| register.entries.contains_key(id))
	}

	/// Resolves the entry under type `T` and `id`.
	pub fn get<T: ?Sized + 'static>(&self, id: &str) -> Result<Arc<T>, RegistryError> {
		match self.register::<T>() {
			Some(register) => register.get(id),
			None => Err(RegistryError::RegisterNotFound {
				type_name: short_type_name::<T>(),
				id: DependencyId::from(id),
			}),
		}
	}

	/// Every entry registered under type `T`, in id order. Empty when the
	/// type is unknown.
	pub fn get_all<T: ?Sized + 'static>(&self) -> Vec<Arc<T>> {
		match self.register::<T>() {
			Some(register) => register.entries.values().map(Arc::clone).collect(),
			None => Vec::new(),
		}
	}

	/// Every registered `(type name, id)` pair, ordered by type name then id.
	pub fn all(&self) -> Vec<(&'static str, &DependencyId)> {
		let mut pairs = Vec::with_capacity(self.len());
		for register in self.registers.values() {
			let type_name = register.type_name();
			for id in register.ids() {
				pairs.push((type_name, id));
			}
		}
		pairs.sort();
		pairs
	}

	pub fn len(&self) -> usize {
		self.registers.values().map(|register| register.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Drops every stored handle. Ownership of the components themselves
	/// stays with their holders.
	pub(crate) fn clear(&mut self) {
		self.registers.clear();
	}

	fn register<T: ?Sized + 'static>(&self) -> Option<&DependencyRegister<T>> {
		self.registers
			.get(&TypeId::of::<T>())
			.and_then(|register| register.as_any().downcast_ref())
	}
}

impl fmt::Display for DependencyRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for (type_name, id) in self.all() {
			if !first {
				f.write_str("\n")?;
			}
			write!(f, "{type_name}{{{id}}}")?;
			first = false;
		}
		Ok(())
	}
}

impl fmt::Debug for DependencyRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DependencyRegistry").field("entries", &self.all()).finish()
	}
}
