mod link;
mod ping;
mod redirect;

pub use link::{generate_handler, info_handler, update_handler};
pub use ping::ping_handler;
pub use redirect::redirect_handler;
