use std::fmt;

/// Machine-readable error codes for every failure category the engine knows.
///
/// Recoverable codes are attached to `tracing` warnings as a `code` field;
/// fatal codes surface through [`EngineError::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    MalformedFragment,
    UnresolvableActor,
    UnparsableTimestamp,
    ResolverUnavailable,
    MalformedResolverResponse,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::MalformedFragment => "E2001",
            Self::UnresolvableActor => "E2002",
            Self::UnparsableTimestamp => "E2003",
            Self::ResolverUnavailable => "E4001",
            Self::MalformedResolverResponse => "E4002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::MalformedFragment => "Malformed raw fragment skipped",
            Self::UnresolvableActor => "Event without attributable identity dropped",
            Self::UnparsableTimestamp => "Unparsable timestamp replaced by empty timestamp",
            Self::ResolverUnavailable => "Identity service unavailable",
            Self::MalformedResolverResponse => "Identity service returned malformed data",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in the engine config file and retry."),
            Self::MalformedFragment | Self::UnresolvableActor | Self::UnparsableTimestamp => None,
            Self::ResolverUnavailable => {
                Some("Check that the identity service is reachable and retry the whole run.")
            }
            Self::MalformedResolverResponse => {
                Some("Verify the identity service version and its person table contents.")
            }
        }
    }

    /// Fatal codes abort the whole run; the rest are logged and skipped.
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(
            self,
            Self::ConfigParseError
                | Self::ResolverUnavailable
                | Self::MalformedResolverResponse
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failure reported by an [`IdentityResolver`](crate::identity::IdentityResolver).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    /// The backing service could not be reached (after any retries).
    #[error("identity service unreachable: {0}")]
    Unavailable(String),

    /// The service answered, but not with the expected shape.
    #[error("identity service returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl ResolverError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unavailable(_) => ErrorCode::ResolverUnavailable,
            Self::MalformedResponse(_) => ErrorCode::MalformedResolverResponse,
        }
    }
}

/// Fatal engine errors. Anything recoverable is logged, never returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The resolver failed while canonicalizing `signature`.
    #[error("identity resolution failed for '{signature}': {source}")]
    Resolver {
        signature: String,
        #[source]
        source: ResolverError,
    },

    /// The resolver answered without a canonical name.
    #[error("identity service returned no canonical name for '{0}'")]
    IncompleteIdentity(String),
}

impl EngineError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Resolver { source, .. } => source.code(),
            Self::IncompleteIdentity(_) => ErrorCode::MalformedResolverResponse,
        }
    }
}
