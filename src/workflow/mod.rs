pub mod draft_form;
pub mod staged_list;

pub use draft_form::{DraftFormController, FormState};
pub use staged_list::{PendingDraft, StagedListManager};
