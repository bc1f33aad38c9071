pub mod content;
pub mod layout;

pub use content::{ContentDocument, ContentStore};
pub use layout::ProjectLayout;
