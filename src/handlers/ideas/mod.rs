// handlers/ideas - /api/ideas resource

pub mod create;
pub mod delete;
pub mod list;
pub mod show;
pub mod update;

pub use create::idea_create;
pub use delete::idea_delete;
pub use list::idea_list;
pub use show::idea_show;
pub use update::idea_update;

pub const IDEA_NOT_FOUND: &str = "Idea not found";
