//! Route assembly for the admin pages.

mod admin;
pub use admin::admin_routes;
