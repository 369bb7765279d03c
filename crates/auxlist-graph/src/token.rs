//! Identity tokens
//!
//! A token names one node for the duration of a single serialize or
//! deserialize call. Tokens are never persisted beyond the stream they
//! appear in.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// 128-bit identity of a node within one stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityToken(Uuid);

impl IdentityToken {
    /// Wrap a raw UUID
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Build a token from a raw 128-bit value
    #[inline]
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Underlying UUID
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Display for IdentityToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for IdentityToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Generator of fresh tokens
///
/// Implementations must never hand out the same token twice.
pub trait TokenSource {
    /// Produce a token distinct from all previously produced ones
    fn next_token(&mut self) -> IdentityToken;
}

/// Random v4 UUID tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokens;

impl TokenSource for RandomTokens {
    #[inline]
    fn next_token(&mut self) -> IdentityToken {
        IdentityToken(Uuid::new_v4())
    }
}

/// Deterministic counter tokens, starting at 1
#[derive(Debug, Clone, Default)]
pub struct SequentialTokens {
    counter: u128,
}

impl SequentialTokens {
    /// Start a fresh counter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenSource for SequentialTokens {
    #[inline]
    fn next_token(&mut self) -> IdentityToken {
        self.counter += 1;
        IdentityToken::from_u128(self.counter)
    }
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    #[inline]
    fn next_token(&mut self) -> IdentityToken {
        (**self).next_token()
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Box<T> {
    #[inline]
    fn next_token(&mut self) -> IdentityToken {
        (**self).next_token()
    }
}
