//! OAuth 2.0 device-authorization flow client.
//!
//! - [`DeviceFlowInitiator`] - asks the identity provider for a device code
//! - [`TokenPoller`] - polls the token endpoint until sign-in completes
//! - [`Authenticator`] - composes both and emits the sign-in instruction
//! - [`FormTransport`] - the HTTP seam, with [`ReqwestTransport`] for real use
//!
//! # Flow
//!
//! ```text
//! Authenticator ──► DeviceFlowInitiator ──► DeviceFlowSession
//!       │                                        │
//!       ├──► InstructionSink::emit(session) ◄────┘
//!       │
//!       └──► TokenPoller ──► TokenResult | AuthError
//! ```
//!
//! # Example
//!
//! ```ignore
//! use meetings_auth::{AuthConfig, Authenticator};
//!
//! let authenticator = Authenticator::new(AuthConfig::microsoft(client_id))?;
//! let access_token = authenticator
//!     .authenticate_with_deadline(Some(Duration::from_secs(60)))
//!     .await?;
//! ```

pub mod authenticator;
pub mod config;
pub mod error;
pub mod initiator;
pub mod poller;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

pub use authenticator::{Authenticator, DeadlineElapsed, FnSink, InstructionSink, StderrSink};
pub use config::AuthConfig;
pub use error::{AuthError, AuthErrorCode, AuthResult};
pub use initiator::DeviceFlowInitiator;
pub use poller::{PollState, TokenPoller};
pub use session::{DeviceFlowSession, TokenResult};
pub use transport::{BoxFuture, FormTransport, ReqwestTransport, TransportResponse};
pub use tokio_util::sync::CancellationToken;
