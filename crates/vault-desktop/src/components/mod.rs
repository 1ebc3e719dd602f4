//! UI Components
//!
//! The single-screen layout: header, upload tabs/form, and the item list.

mod header;
mod item_card;
mod item_list;
mod upload_form;
mod upload_tabs;

pub use header::Header;
pub use item_card::ItemCard;
pub use item_list::ItemList;
pub use upload_form::UploadForm;
pub use upload_tabs::UploadTabs;
