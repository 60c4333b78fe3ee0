pub mod draft;
pub mod loaders;
pub mod question_type;

pub use draft::{
    Draft, DraftState, FieldSource, FieldValue, LocalId, RemoteId, SharedSettings, StagedRecord,
    WireRecord,
};
pub use loaders::load_question_batch;
pub use question_type::QuestionType;
