//! Opening external links in the user's browser

/// Opens a URL outside the application
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Uses the platform's default handler; returns without waiting for it
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, url: &str) -> std::io::Result<()> {
        tracing::info!("Opening {}", url);
        open::that_detached(url)
    }
}
