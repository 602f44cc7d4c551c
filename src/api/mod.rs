pub mod payload;

pub use payload::{idea_id_from_path, parse_idea_id, parse_limit, IdeaBody, IdeaPayload, TagsInput};
