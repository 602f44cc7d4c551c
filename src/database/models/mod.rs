pub mod idea;

pub use idea::{Idea, IdeaDraft};
