//! Static path table used by the route guard.
//!
//! Rules are evaluated in table order and the first match wins, so every
//! ignored prefix is listed before any public or protected rule. Asset paths
//! must never fall through to a protected prefix.

/// Login entry point. Also the redirect target for unauthenticated callers.
pub const LOGIN_PATH: &str = "/";

/// Landing page for callers that already hold a valid credential.
pub const HOME_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Static assets and framework internals, never checked.
    Ignored,
    /// Reachable without a credential.
    Public,
    /// Requires a valid credential.
    Protected,
    /// Not listed anywhere; allowed by default.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Ignored(&'static str),
    Public(&'static str),
    Protected(&'static str),
}

impl Rule {
    /// Ignored and protected rules match by prefix, public rules by equality.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Ignored(prefix) | Self::Protected(prefix) => path.starts_with(prefix),
            Self::Public(exact) => path == *exact,
        }
    }

    #[must_use]
    pub const fn class(&self) -> Class {
        match self {
            Self::Ignored(_) => Class::Ignored,
            Self::Public(_) => Class::Public,
            Self::Protected(_) => Class::Protected,
        }
    }
}

pub const RULES: &[Rule] = &[
    Rule::Ignored("/_next"),
    Rule::Ignored("/favicon.ico"),
    Rule::Ignored("/icons"),
    Rule::Ignored("/images"),
    Rule::Ignored("/public"),
    Rule::Ignored("/api/health"),
    Rule::Public("/"),
    Rule::Public("/api/login"),
    Rule::Public("/api/logout"),
    Rule::Protected("/dashboard"),
    Rule::Protected("/sorteios"),
    Rule::Protected("/sorteio"),
    Rule::Protected("/criar-sorteio"),
];

/// Classify a request path against [`RULES`].
#[must_use]
pub fn classify(path: &str) -> Class {
    RULES
        .iter()
        .find(|rule| rule.matches(path))
        .map_or(Class::Other, Rule::class)
}

/// Whether the guard runs at all for `path`.
///
/// Mirrors a `/prefix/:path*` matcher: the login entry point plus each
/// protected prefix, either exactly or followed by a `/` segment.
#[must_use]
pub fn triggers(path: &str) -> bool {
    if path == LOGIN_PATH {
        return true;
    }

    RULES.iter().any(|rule| match rule {
        Rule::Protected(prefix) => path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
        Rule::Ignored(_) | Rule::Public(_) => false,
    })
}
