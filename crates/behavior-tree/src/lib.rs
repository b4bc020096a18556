//! Lightweight behavior tree library for real-time, per-tick game AI.
//!
//! - **Tick driven**: the caller evaluates the tree once per simulation tick
//! - **Running state**: multi-tick work reports `Running` instead of blocking
//! - **Stateless nodes**: all progress lives in the caller's context, so a
//!   single tree can be shared by every agent of a kind
//! - **Zero dependencies**: Pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`Behavior`]: Core trait for all nodes
//! - [`Status`]: Success, Failure, or Running
//! - Leaf nodes: [`Condition`], [`Action`]
//! - Composite nodes: [`Sequence`], [`Selector`]
//! - [`builder`]: boxed constructors for assembling trees inline

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod status;

pub use behavior::{Action, Behavior, Condition};
pub use composite::{Selector, Sequence};
pub use status::Status;
