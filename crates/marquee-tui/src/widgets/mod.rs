mod navbar;
mod page;
mod status_bar;

pub use navbar::NavbarWidget;
pub use page::PageWidget;
pub use status_bar::StatusBarWidget;
