pub mod documents;
pub mod templates;
pub mod view;
