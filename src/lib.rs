//! # compass-ai
//!
//! Compass 教育规划应用的 AI 请求层：缓存、重试、响应归一化与统一错误分类。
//!
//! The AI request layer for the Compass education-planning app. Every
//! feature screen (course selection, scholarship search, essay feedback,
//! schedule optimization) obtains model-generated content through the
//! single facade this crate provides.
//!
//! ## Responsibilities
//!
//! - **Caching**: identical requests are deduplicated for a bounded time
//!   in a bounded, process-local store (FIFO eviction, per-entry TTL).
//! - **Retries**: transient upstream failures are retried with
//!   exponential backoff before anything is surfaced to the caller.
//! - **Normalization**: free-text model output is unwrapped from code
//!   fences and parsed into structured data when the caller asks for it.
//! - **Error taxonomy**: every failure becomes one of four stable kinds
//!   ([`Error`]) the UI can react to uniformly.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use compass_ai::{AiClient, GenerateOptions};
//!
//! #[tokio::main]
//! async fn main() -> compass_ai::Result<()> {
//!     let client = AiClient::builder().build()?;
//!
//!     // Free text.
//!     let feedback = client
//!         .generate(
//!             "Give feedback on this college essay draft: ...",
//!             GenerateOptions::new().with_context("essay_feedback"),
//!         )
//!         .await?;
//!
//!     // Structured output, parsed and validated.
//!     let courses = client
//!         .generate(
//!             "Recommend three electives as a JSON array of course codes.",
//!             GenerateOptions::structured().with_context("course_selection"),
//!         )
//!         .await?;
//!
//!     println!("{feedback:?} {courses:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | The facade: [`AiClient`], builder, request options |
//! | [`cache`] | Key generation and the bounded TTL response store |
//! | [`retry`] | Exponential-backoff retry executor |
//! | [`normalize`] | Fence stripping and structured-output parsing |
//! | [`provider`] | Upstream model endpoint boundary and HTTP implementation |
//! | [`types`] | The [`Payload`] a request resolves to |

pub mod cache;
pub mod client;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod retry;
pub mod types;

// Re-export main types for convenience
pub use cache::{CacheEntryInfo, CacheStats};
pub use client::{AiClient, AiClientBuilder, GenerateOptions};
pub use error::Error;
pub use provider::{HostedModelProvider, ModelProvider, ProviderError};
pub use retry::RetryPolicy;
pub use types::Payload;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
