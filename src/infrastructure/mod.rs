pub mod collaborators;

pub use collaborators::{
    AutoConfirmer, Confirmer, Notification, Notifier, NotifyLevel, RecordCreator, TracingNotifier,
};
