//! Logging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation. To see logs, install
//! a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("trellis::manager=debug,trellis::plugin=trace")
//!     .init();
//! ```
//!
//! Levels are used consistently across the workspace:
//!
//! - `debug`: section state mutations and stale references that were skipped
//! - `trace`: positional calls sent to the host widget, plugin dispatch
//! - `warn`: recoveries such as placeholder views or full-reload fallbacks

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "trellis_core";
    /// Signal emission target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Section state and manager target.
    pub const MANAGER: &str = "trellis::manager";
    /// Positional widget updates target.
    pub const WIDGET: &str = "trellis::widget";
    /// Generator materialization target.
    pub const GENERATOR: &str = "trellis::generator";
    /// Plugin pipeline target.
    pub const PLUGIN: &str = "trellis::plugin";
    /// Delegate and data source target.
    pub const BRIDGE: &str = "trellis::bridge";
}
