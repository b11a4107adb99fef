mod client;
mod queries;
mod transport;
mod types;

pub use client::{AlertsApi, AlertsClient, ApiError};
pub use transport::{GraphqlTransport, HttpTransport, TransportError};
pub use types::{AccountRef, ConditionRecord, Nrql, Policy};
