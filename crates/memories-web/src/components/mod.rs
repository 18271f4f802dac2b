//! Reusable UI components

pub mod error_banner;
pub mod header;
pub mod memory_card;
pub mod popular_users;
pub mod protected_route;

pub use error_banner::ErrorBanner;
pub use header::Header;
pub use memory_card::MemoryCard;
pub use popular_users::PopularUsers;
pub use protected_route::ProtectedRoute;
