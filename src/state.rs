use crate::client::LinkService;
use crate::console::Console;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn LinkService>,
    pub console: Arc<Mutex<Console>>,
    pub short_link_base: Arc<str>,
}

impl AppState {
    pub fn new(service: Arc<dyn LinkService>, short_link_base: &str) -> Self {
        Self {
            service,
            console: Arc::new(Mutex::new(Console::default())),
            short_link_base: Arc::from(short_link_base),
        }
    }
}
