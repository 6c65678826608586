mod document;

pub use document::ResolutionDocument;
