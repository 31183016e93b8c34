//! Host-framework seams consumed through traits defined by this crate.
//!
//! The admin-panel host owns the user resource, the auth/cookie subsystem, the
//! login-callback chain, and (optionally) file storage. The doorman reaches
//! each of those through a narrow trait so the crate never links against a
//! concrete framework.

pub mod memory;
pub mod record;
pub mod schema;
pub mod session;
pub mod store;
pub mod upload;

pub use memory::MemoryUserStore;
pub use record::{FieldValues, UserRecord};
pub use schema::{ColumnKind, ColumnSpec, ResourceSchema};
pub use session::{
	HookFuture, HostAuthPolicy, LoginDecision, LoginHooks, LoginIdentity, NoopLoginHooks,
	RequestContext, SessionError, SessionFuture, SessionSink, SessionTicket,
};
pub use store::{StoreError, StoreFuture, UserStore};
pub use upload::{UploadError, UploadFuture, UploadRequest, UploadSink, UploadSlot};
