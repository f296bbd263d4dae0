use thiserror::Error;

/// Why a registrar could not attach a service to a server handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttachError {
    /// A service with the same fully-qualified name was attached earlier
    #[error("service `{0}` is already registered")]
    DuplicateService(String),

    /// The service name cannot be routed
    #[error("service name `{name}` is invalid: {reason}")]
    InvalidServiceName { name: String, reason: &'static str },
}

/// A registration pair failed while the server was being built.
///
/// Carries the registrar's and implementation's type names so the caller can
/// see which pair was rejected and why.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "registration #{position} failed: registrar `{registrar}` could not attach `{implementation}`: {source}"
)]
pub struct RegistrationError {
    /// Zero-based position of the pair in registration order
    pub position: usize,
    /// Type name of the registrar
    pub registrar: &'static str,
    /// Type name of the service implementation
    pub implementation: &'static str,
    #[source]
    pub source: AttachError,
}

/// Invalid capability descriptor value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("TLS requested with an empty {0}")]
    EmptyTls(&'static str),

    #[error("Invalid TLS configuration: {0}")]
    Tls(String),

    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Malformed or conflicting HTTP route pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("route pattern is empty")]
    Empty,

    #[error("route pattern `{0}` must start with '/'")]
    MissingLeadingSlash(String),

    #[error("route pattern `{pattern}` is malformed: {reason}")]
    Malformed {
        pattern: String,
        reason: &'static str,
    },

    #[error("route pattern `{pattern}` conflicts with `{existing}`")]
    Conflict { pattern: String, existing: String },
}

/// Errors returned by a terminal `build` call.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
