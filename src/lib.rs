//! Rust's drop-in OAuth 2.0 login doorman - wire pluggable identity adapters,
//! provision-on-first-login user matching, and host session hand-off into any admin panel.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod adapter;
pub mod config;
pub mod error;
pub mod flow;
pub mod host;
pub mod http;
pub mod ident;
pub mod obs;
pub mod state;
pub mod ui;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::Duration;
	pub use url::Url;

	pub use crate::error::Result;
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};
