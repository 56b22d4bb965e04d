//! Opaque identifiers for dependencies and component instances.

use std::borrow::Borrow;
use std::fmt;

/// Identifier a dependency is registered and resolved under.
///
/// Uniqueness is scoped to a declared interface type: the same id may appear
/// under several types, and typically does when a component exposes more than
/// one interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DependencyId(String);

impl DependencyId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the derived id a side dependency is registered under:
	/// `<id>_<side_id>`.
	pub fn derived(&self, side_id: &str) -> DependencyId {
		DependencyId(format!("{}_{}", self.0, side_id))
	}
}

impl fmt::Display for DependencyId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for DependencyId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<String> for DependencyId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl Borrow<str> for DependencyId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for DependencyId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for DependencyId {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for DependencyId {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}
