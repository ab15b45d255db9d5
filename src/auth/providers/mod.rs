pub mod local;
mod registry;

pub use local::{LocalAuthProvider, TokenTtl};
pub use registry::{AuthProvider, AuthProviderId, AuthProviders};
