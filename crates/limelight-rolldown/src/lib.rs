#![cfg_attr(docsrs, feature(doc_cfg))]

//! # limelight-rolldown
//!
//! Rolldown integration for Limelight.
//!
//! [`LimelightPlugin`] answers `resolve_id` through the Limelight resolver
//! (import maps, vendored Ruby gems, `unbundle:`) and serves `.css` modules
//! through the CSS transformer in `load`. Everything else is left to
//! Rolldown.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use limelight_config::LimelightConfig;
//! use limelight_rolldown::LimelightPlugin;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = LimelightConfig::load(".")?;
//! let plugin = Arc::new(LimelightPlugin::from_config(&config)?.with_shared_mixins());
//! // Register `plugin` with the bundler's plugin list.
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `logging`: [`logging::init_logging`] and friends for hosts that don't
//!   install their own `tracing` subscriber
//! - `eval`: evaluate `config/import_map.js` with the embedded Boa engine

mod plugin;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

pub use plugin::LimelightPlugin;

// Re-exports so hosts need only this crate.
pub use limelight_config::LimelightConfig;
pub use limelight_resolver::{ResolutionKind, ResolvedTarget};
