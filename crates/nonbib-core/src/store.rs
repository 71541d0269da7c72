//! The `NamespaceLoader` trait.
//!
//! Implemented by backends that can produce the full bibcode-keyed mapping
//! of one declared source (e.g. `nonbib-store-sqlite`). The
//! [`Session`](crate::session::Session) calls it at most once per namespace.

use std::future::Future;

use crate::{field::FieldDecl, session::Namespace};

/// Abstraction over wherever the per-source mappings live.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait NamespaceLoader: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Load every `bibcode -> value` entry of the source described by `decl`.
  ///
  /// Must fail (rather than return an empty namespace) when the source
  /// itself is unavailable; an empty namespace means the source exists but
  /// mentions no bibcodes.
  fn load_namespace<'a>(
    &'a self,
    decl: &'a FieldDecl,
  ) -> impl Future<Output = Result<Namespace, Self::Error>> + Send + 'a;
}
