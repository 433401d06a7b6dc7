// Server-rendered UI: the upload form, the preview pane and the root
// container that holds the single result slot between them.

pub mod html;
pub mod page;
pub mod preview;
pub mod root;
pub mod upload_form;

pub use root::RootContainer;
