//! Council roster domain.
//!
//! - [`provider::ProviderKind`]: which backend a node talks to, and how
//! - [`node::Node`]: one configured participant
//! - [`credentials::CredentialSet`]: the active per-provider keys
//! - [`presets`]: built-in rosters

pub mod credentials;
pub mod node;
pub mod presets;
pub mod provider;
