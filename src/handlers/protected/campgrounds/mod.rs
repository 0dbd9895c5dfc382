pub mod collection;
pub mod record;

pub use collection::{create, new_form};
pub use record::{delete, edit_form, update};
