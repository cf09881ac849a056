//! Container identifiers for the services every plugin registers.

/// The [`PluginInfo`](crate::PluginInfo) instance.
pub const PLUGIN: &str = "trellis.plugin";

/// The [`Environment`](crate::Environment) instance.
pub const ENVIRONMENT: &str = "trellis.environment";

/// The [`Kernel`](crate::Kernel) singleton.
pub const KERNEL: &str = "trellis.kernel";
