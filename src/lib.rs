//! Sequential thinking for AI agents — a persisted, stage-aware record of a
//! reasoning sequence, served over MCP.
//!
//! A client submits thoughts one at a time. Each thought carries its position in
//! the sequence, the stage of reasoning it belongs to, and optional tags:
//!
//! | Stage | Typical content |
//! |-------|-----------------|
//! | **Problem Definition** | What is being asked, constraints, scope |
//! | **Research** | Facts gathered, sources consulted |
//! | **Analysis** | Breaking the problem down, weighing evidence |
//! | **Synthesis** | Combining findings into candidate answers |
//! | **Conclusion** | The decision and its justification |
//!
//! Every submission is written to `current_session.json` under the storage
//! directory (default `~/.mcp_sequential_thinking/`) and answered with a report
//! linking it to earlier thoughts in the same stage or sharing tags.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`error`] — Validation and storage error types
//! - [`thinking`] — Thought model, file-backed store, and analysis
//! - [`session`] — The operations exposed to clients, with tagged outcomes
//! - [`tools`] — MCP tool definitions
//! - [`server`] — stdio server bootstrap

pub mod config;
pub mod error;
pub mod server;
pub mod session;
pub mod thinking;
pub mod tools;
