//! Client side of the link bypass service: settings, HTTP transport and the
//! form controller with its enum-driven view.

pub mod config;
pub mod controller;
pub mod error;
pub mod transport;
pub mod view;

pub use config::{load_settings, ClientSettings};
pub use controller::{interpret_response, FormController};
pub use error::{SubmitError, TransportError};
pub use transport::{BypassTransport, HttpTransport, RawResponse};
pub use view::{ResultKind, ResultPanel, TriggerView, UiState};
