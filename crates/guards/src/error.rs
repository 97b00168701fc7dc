use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// Guards kept redirecting past the configured hop limit.
    #[error("redirect loop: gave up after {hops} redirects (last target '{last}')")]
    RedirectLoop { hops: usize, last: String },
}
