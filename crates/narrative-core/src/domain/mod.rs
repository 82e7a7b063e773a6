//! Domain entities - the core business objects.

mod gallery;
mod post;
mod user;
mod viewer;

pub use gallery::{Picture, Sponsor};
pub use post::Post;
pub use user::User;
pub use viewer::Viewer;
