mod http;

pub use self::http::{Endpoints, UrlError, ValidatedUrl, MAX_URL_LENGTH};

pub use crux_core::render::Render;
pub use crux_http::Http;

#[allow(unused_imports)]
use crate::app::App;
use crate::event::Event;

/// Effects the core asks the shell to perform.
#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
}
