//! Dependency-injection composition engine.
//!
//! An application is assembled from independently written components whose
//! wiring is declared, not hardcoded: a [`Topology`] lists the instances to
//! construct (type name, id, ordered dependency ids, configuration), a
//! [`FactoryRegistry`] maps type names to construction strategies, and
//! [`Assembly::new`] walks the topology in order. Each entry's dependency
//! slots are resolved against the shared [`DependencyRegistry`] by declared
//! interface type and id; the freshly built instance then registers its own
//! exposed interfaces so later entries can consume them.
//!
//! Construction is single-threaded and all-or-nothing, and teardown runs in
//! reverse construction order. Topologies are populated programmatically via
//! [`TopologyBuilder`] or from external data (see the companion loader
//! crate).

pub mod assembly;
pub mod cast;
pub mod component;
pub mod config;
pub mod factory;
pub mod id;
pub mod registry;
pub mod topology;
pub mod typename;

pub use assembly::Assembly;
pub use cast::ValueKind;
pub use component::{Assemble, Component, ComponentCore, Registrar};
pub use config::{Config, ConfigError, ConfigValue, FromConfigValue};
pub use factory::{BuildError, ComponentFactory, Factory, FactoryRegistry, Injector};
pub use id::DependencyId;
pub use registry::{DependencyRegistry, RegistryError};
pub use topology::{Topology, TopologyBuilder, TopologyEntry, TopologyEntryBuilder, TopologyError};
