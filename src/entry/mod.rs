//! The spread entry feature: the persisted table, the list page, the manual
//! form and the per-entry edit/update/delete flows.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_page;
mod entries_page;
mod new_entry_page;
mod update_endpoint;

pub use core::{
    all_entries, create_spread_table, delete_entry, get_entry, insert_entry, insert_entry_with_id,
    max_entry_id, update_entry, EntryFields, EntryId, SpreadEntry,
};
pub use create_endpoint::{create_entry_endpoint, EntryForm};
pub(crate) use create_endpoint::format_form_date;
pub use delete_endpoint::delete_entry_endpoint;
pub use edit_page::get_edit_entry_page;
pub use entries_page::get_entries_page;
pub use new_entry_page::get_new_entry_page;
pub use update_endpoint::update_entry_endpoint;
