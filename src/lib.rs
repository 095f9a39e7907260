//! unillm: unified multi-provider LLM client core
//!
//! Provides the provider-independent half of a multi-provider client: the
//! unified message and content types, and a streaming accumulator that turns
//! any provider's deltas into the same response a non-streaming call returns.
//!
//! # Quick Start
//!
//! ```no_run
//! use unillm::prelude::*;
//!
//! # async fn example(provider: &dyn ModelProvider) -> unillm::error::Result<()> {
//! let request = ProviderRequest::new(vec![ModelMessage::user("Hello!")]);
//! let response =
//!     unillm::generation::stream_response(provider, &request, UnillmConfig::global(), None)
//!         .await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

pub mod accumulator;
pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod stream_transform;
pub mod types;
pub mod util;
