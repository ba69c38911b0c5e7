//! ID type wrappers for type safety.

mod id_macro;

pub mod dialog_id;

pub use dialog_id::DialogId;
