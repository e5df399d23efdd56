//! CrudService: model-driven CRUD using the safe SQL builder, plus form validation.

mod crud;
mod validation;
pub use crud::{CrudService, ListRow, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use validation::{FieldErrors, FormValidator};
