//! Rich diagnostic error types for cubeweave.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so callers know exactly what
//! went wrong and whether anything was persisted.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for cubeweave.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum CubeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Propagation(#[from] PropagationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("resource not found: <{iri}>")]
    #[diagnostic(
        code(cube::store::not_found),
        help(
            "No document named <{iri}> exists in the backing store, or it was \
             deleted earlier in this operation. Check the identifier, or use a \
             tolerant lookup if absence is expected."
        )
    )]
    NotFound { iri: String },

    #[error("identity collision: <{iri}> is already in the working set")]
    #[diagnostic(
        code(cube::store::collision),
        help(
            "A resource with this IRI was already fetched, created or deleted \
             by this store. Mint a fresh identifier with `create_member` instead."
        )
    )]
    IdentityCollision { iri: String },

    #[error("invalid IRI {iri:?}: {message}")]
    #[diagnostic(
        code(cube::store::invalid_iri),
        help("Resource identifiers must be absolute IRIs, e.g. `https://example.org/project/1`.")
    )]
    InvalidIri { iri: String, message: String },

    #[error("resource <{iri}> is not a {expected}")]
    #[diagnostic(
        code(cube::store::type_mismatch),
        help(
            "The document exists but does not carry the rdf:type required for this \
             typed view. Verify that the IRI points at the expected kind of resource."
        )
    )]
    TypeMismatch { iri: String, expected: String },

    #[error("backing store error: {message}")]
    #[diagnostic(
        code(cube::store::backend),
        help(
            "The graph store rejected or failed a request. Check that the endpoint \
             is reachable and that the query is valid SPARQL 1.1."
        )
    )]
    Backend { message: String },

    #[error("flush of {graphs} document(s) failed: {message}")]
    #[diagnostic(
        code(cube::store::flush),
        help(
            "The batched write did not complete. The backing store gives no \
             multi-document atomicity, so some documents of this batch may already \
             be persisted. Reload the affected resources before retrying."
        )
    )]
    Flush { graphs: usize, message: String },
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("unexpected value of {field}: expected {expected}, got {actual}")]
    #[diagnostic(
        code(cube::validation::immutable_field),
        help("`{field}` cannot change after the resource was created. Submit the stored value.")
    )]
    ImmutableField {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("missing required field {field}")]
    #[diagnostic(
        code(cube::validation::missing_field),
        help("The submitted payload must carry `{field}`.")
    )]
    MissingField { field: String },

    #[error("invalid value for {field}: {message}")]
    #[diagnostic(code(cube::validation::invalid_value))]
    InvalidValue { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Propagation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PropagationError {
    #[error("failed to update observations for dimension <{dimension}>: {message}")]
    #[diagnostic(
        code(cube::propagate::update),
        help(
            "Replacing raw values with managed terms in the observation dataset failed. \
             The dictionary itself was saved; re-submit it with propagation enabled \
             to retry."
        )
    )]
    Update { dimension: String, message: String },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    #[diagnostic(
        code(cube::config::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    #[diagnostic(
        code(cube::config::parse),
        help(
            "The configuration must be valid TOML. Backends are declared as \
             `kind = \"memory\"`, `kind = \"local\"` with a `path`, or \
             `kind = \"remote\"` with `query_endpoint` and `update_endpoint`."
        )
    )]
    Parse { path: String, message: String },

    #[error("failed to write config file {path}")]
    #[diagnostic(
        code(cube::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open backend: {message}")]
    #[diagnostic(code(cube::config::backend))]
    Backend { message: String },
}

/// Result type for resource store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Convenience alias for functions returning cubeweave results.
pub type CubeResult<T> = std::result::Result<T, CubeError>;
