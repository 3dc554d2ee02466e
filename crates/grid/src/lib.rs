//! Grid session controller for the tenant-scoped category hierarchy.
//!
//! - [`tree::TreeAccessor`] -- parent/child views queried per row expansion.
//! - [`pipeline::MutationPipeline`] -- payload validation and all-or-nothing
//!   create/update, including image promotion.
//! - [`controller::GridController`] -- the row-level operations the rendering
//!   layer calls, each scoped by an [`pressgrid_core::access::AccessContext`].

pub mod controller;
pub mod form;
pub mod pipeline;
pub mod row;
pub mod settings;
pub mod tree;

pub use controller::{DataChanged, GridController, SubmitOutcome, UploadReceipt};
pub use form::{CategoryPayload, FormMode, RowForm};
pub use row::{LocalizedRowRenderer, RowRenderer, RowView};
pub use settings::GridSettings;
