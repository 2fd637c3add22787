//! Client side of the API: a bearer-token HTTP client, the on-device cache,
//! and the view models that turn fetched records into calendar cells and
//! monthly totals.

pub mod api;
pub mod cache;
pub mod explore;
pub mod fetch;
pub mod home;

pub use api::{ApiClient, ClientError, ClientResult, Session};
pub use cache::LocalCache;
pub use explore::ExploreView;
pub use fetch::{fetch_or_fallback, Fetched, Source};
pub use home::HomeView;
