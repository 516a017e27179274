//! Terminal presentation of the attestation form.

pub mod follow;
pub mod links;
pub mod render;

pub use follow::follow;
pub use links::{truncate_hex, ExplorerLinks};
pub use render::{banners, render_fields, render_form, Banner};
