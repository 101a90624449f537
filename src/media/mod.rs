pub mod resolver;
pub mod resolvers;

pub use resolver::{MediaError, MediaResolver, MediaSource, ResolvedMedia, guess_content_type};
pub use resolvers::{DefaultResolver, HttpResolver, LocalResolver};
