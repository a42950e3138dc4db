pub mod domain;
pub mod session;
pub mod story;

pub use domain::MathDomain;
pub use session::{Session, SessionField, SessionKey};
pub use story::{SceneDescription, StoryOutline};
