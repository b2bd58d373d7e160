//! tableau-views
//!
//! Client for the view endpoints of a Tableau-style REST server: preview
//! thumbnails, rendered images (including trusted-ticket renders) and data
//! extracts. Sign-in is out of scope; callers hand in an established
//! [`SessionContext`].
#![deny(unsafe_code)]

pub mod blocking;
pub mod config;
pub mod defaults;
pub mod error;
pub mod execution;
pub mod fetcher;
pub mod interceptor;
pub mod session;
pub mod transport;
pub mod types;
pub mod urls;

pub use blocking::BlockingViewContentFetcher;
pub use config::{HttpConfig, ServerConfig, Settings, TrustedTicketEndpoint};
pub use error::{ErrorCategory, Operation, ViewError};
pub use fetcher::{ViewContentFetcher, ViewContentFetcherBuilder};
pub use interceptor::{HttpInterceptor, HttpRequestContext, LoggingInterceptor};
pub use session::SessionContext;
pub use transport::{
    ByteStream, HttpTransport, HttpTransportRequest, HttpTransportResponse, ReqwestTransport,
};
pub use types::{FilterParameter, ImageFilters, TicketToken, ViewIdentifier};
pub use urls::{ServerUrls, ViewUrlBuilder};
