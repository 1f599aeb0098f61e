use crate::domain::ports::ExternalLauncher;
use url::Url;

/// Prints the link instead of opening it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintLauncher;

impl ExternalLauncher for PrintLauncher {
    fn open_external(&self, url: &Url) {
        println!("🔗 {}", url);
    }
}

/// Opens the link with the platform handler (browser, dialer). Failures are
/// logged and the link is printed so the user can open it by hand.
#[cfg(feature = "cli")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

#[cfg(feature = "cli")]
impl ExternalLauncher for SystemLauncher {
    fn open_external(&self, url: &Url) {
        tracing::debug!("Opening {}", url);
        if let Err(e) = open::that_detached(url.as_str()) {
            let err = crate::utils::error::CareError::LaunchError {
                message: e.to_string(),
            };
            tracing::warn!("{} ({})", err, err.recovery_suggestion());
            PrintLauncher.open_external(url);
        }
    }
}
