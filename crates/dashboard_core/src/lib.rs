//! Remote collection views for the deployment dashboard.
//!
//! A [`CollectionView`] owns the state of one listed resource (accounts,
//! teams, clusters, deployments, releases). User intents enter as
//! [`CollectionAction`]s, the [`reducer`] derives the next state, and the
//! [`FetchCoordinator`] turns each issued request into exactly one
//! `Success` or `Error` action that is applied only if it still answers the
//! latest request.

pub mod action;
pub mod codec;
pub mod coordinator;
pub mod error;
pub mod locator;
pub mod poller;
pub mod query;
pub mod reducer;
pub mod transport;

pub use action::CollectionAction;
pub use codec::{decode, encode, Descriptor};
pub use coordinator::{CollectionView, FetchCoordinator, ViewClosed, ViewEvent, ViewHandle};
pub use error::{ErrorInfo, ErrorKind, FetchError, QueryError};
pub use locator::ViewLocator;
pub use poller::{spawn_poller, DEFAULT_POLL_INTERVAL};
pub use query::{FilterKeys, FilterPair, Pagination, QueryModel, Sort, SortDirection};
pub use reducer::{reduce, CollectionMeta, CollectionState, FetchTicket, Transition};
pub use transport::{CollectionTransport, HttpCollectionTransport, HttpTransportOptions};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
