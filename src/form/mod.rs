//! The form engine: state store, renderer, composites, bulk-apply, validation,
//! import and the royalty draft editor.

pub mod bulk;
pub mod composite;
pub mod import;
pub mod notification;
pub mod renderer;
pub mod royalty_editor;
pub mod store;
pub mod validator;

pub use bulk::{apply_bulk, current_bulk_state, BulkChoice};
pub use composite::{Composite, EditOutcome, RowUpdate};
pub use import::{import_by_key, HistoricalRecords, ImportError, InMemoryHistory};
pub use notification::{Clock, ManualClock, Notification, NotificationKind, SystemClock};
pub use renderer::{Control, CompositeView, FieldEdit, RenderedField, TagKey};
pub use royalty_editor::{RoyaltyEditor, VolumeBound};
pub use store::{FormStore, JumpTarget};
pub use validator::{validate, MissingField};
