//! Catalyst WP scaffolds local WordPress development projects.
//! It clones a boilerplate repository into a VVV environment, generates
//! configuration and virtual-host files from templates, and produces
//! MVC class skeletons for the child theme.

/// Command-line interface module for the Catalyst WP application
pub mod cli;

/// Settings, marker file handling and project root lookup
pub mod config;

pub mod constants;

/// Error types and handling for the Catalyst WP application
pub mod error;

/// MVC class skeleton generation
pub mod generator;

/// Existence and emptiness checks guarding every write
pub mod guard;

pub mod logger;

/// Sequential step runner with compensating actions
pub mod pipeline;

/// Project lifecycle orchestration
/// Sequences directories, clones, dependency install and config generation
pub mod project;

/// User input and interaction handling
pub mod prompt;

/// Template loading and rendering
pub mod renderer;

/// Git and dependency installer adapters
pub mod toolchain;

/// VVV environment backend
pub mod vvv;
