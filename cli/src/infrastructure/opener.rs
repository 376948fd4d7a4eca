use std::io;

/// Abre un enlace fuera del proceso (navegador del sistema).
pub trait LinkOpener {
  fn open(&self, url: &str) -> io::Result<()>;
}

/// Delegates to the platform's default handler (`xdg-open`, `open`, `start`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl LinkOpener for SystemBrowser {
  fn open(&self, url: &str) -> io::Result<()> {
    open::that(url)
  }
}
