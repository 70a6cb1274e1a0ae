pub mod health;
pub mod get_key;
pub mod list_keys;

pub use health::health_handler;
pub use get_key::get_key_handler;
pub use list_keys::list_keys_handler;
