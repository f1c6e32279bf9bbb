pub mod body;

pub use body::{Body, BodyHandle, IndexState};
