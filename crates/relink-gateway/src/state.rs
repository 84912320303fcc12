use std::sync::Arc;

use relink_core::Shortener;
use relink_redirector::Redirector;

use crate::render::CodeRenderer;
use crate::target::RedirectTargets;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    redirector: Arc<dyn Redirector>,
    renderer: Arc<dyn CodeRenderer>,
    targets: Arc<RedirectTargets>,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        redirector: Arc<dyn Redirector>,
        renderer: Arc<dyn CodeRenderer>,
        targets: RedirectTargets,
    ) -> Self {
        Self {
            shortener,
            redirector,
            renderer,
            targets: Arc::new(targets),
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }

    pub fn renderer(&self) -> &dyn CodeRenderer {
        self.renderer.as_ref()
    }

    pub fn targets(&self) -> &RedirectTargets {
        &self.targets
    }
}
