//! Data model shared by the view synchronization policy, the host scene, and the shell.

pub mod domain;
pub mod error;
pub mod protocol;
