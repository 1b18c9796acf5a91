//! HTTP client for the workflow engine REST API.
//!
//! This crate provides a typed client for an Argo-Workflows-compatible
//! server, plus the [`WorkflowEngine`] trait the orchestration layer is
//! written against.
//!
//! # Example
//!
//! ```no_run
//! use runplane_client::{EngineClient, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = EngineClient::builder()
//!     .base_url("https://argo-server.argo:2746")
//!     .build()?;
//!
//! let running = client
//!     .workflows()
//!     .list("simulations", "runner-id=r-42")
//!     .await?;
//! println!("{} workflows", running.len());
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Workflows**: create, get, stop, list by label, live pod logs
//! - **Archived workflows**: get by uid
//! - **Artifacts**: node output artifacts by workflow uid

pub mod api;
pub mod client;
pub mod engine;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, EngineClient};
pub use engine::WorkflowEngine;
pub use error::{Error, Result};
pub use types::*;
