//! Credential and token types.

mod credentials;
mod tokens;

pub use credentials::ClientCredentials;
pub use tokens::AccessToken;
