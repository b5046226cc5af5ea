//! checkwriter - physical mail through the OnlineCheckWriter API
//!
//! Builds checks, mail checks, letters, postcards and mailed PDF documents,
//! and submits them to OnlineCheckWriter. Document mail uses a two-step
//! upload-then-mail flow.
//!
//! # Architecture
//!
//! - **checkwriter_message**: Message builders and wire payloads (re-exported as [`message`])
//! - **config**: YAML configuration with `ONLINECHECKWRITER_*` overrides
//! - **transport**: HTTP transport trait and its reqwest implementation
//! - **client**: Endpoint routing and the document upload/mail sequence
//! - **channel**: Notification adapter that completes recipients and senders
//! - **retry**: Retry policy for idempotent requests
//!
//! # Example
//!
//! ```no_run
//! use checkwriter::config::CheckWriterConfig;
//! use checkwriter::message::{DocumentMail, Message};
//! use checkwriter::Client;
//!
//! # async fn run() -> checkwriter::Result<()> {
//! let config = CheckWriterConfig::load_default()?;
//! let client = Client::new(&config)?;
//!
//! let mail = DocumentMail::create()
//!     .file("invoice.pdf")
//!     .name("Jane Roe")
//!     .address1("1 Main St")
//!     .city("Austin")
//!     .state("TX")
//!     .zip("73301");
//!
//! let response = client.send(&Message::from(mail)).await?;
//! println!("{}", response);
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod retry;
pub mod transport;

pub use checkwriter_message as message;

// Re-exports
pub use channel::{Channel, Notifiable, Notification};
pub use client::Client;
pub use error::{CheckWriterError, Result};
pub use transport::{HttpTransport, Transport, TransportError, UploadForm};
