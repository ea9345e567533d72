/// Whether the 3D scene can run on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCapability {
    Supported,
    Unsupported { reason: String },
}

impl RenderCapability {
    /// Combine the configuration switch with the host probe result.
    pub fn assess(force_fallback: bool, host: Result<(), String>) -> Self {
        if force_fallback {
            return RenderCapability::Unsupported {
                reason: "fallback forced by configuration".to_string(),
            };
        }
        match host {
            Ok(()) => RenderCapability::Supported,
            Err(reason) => RenderCapability::Unsupported { reason },
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, RenderCapability::Supported)
    }
}

/// The non-3D experience users are sent to instead of a degraded scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub url: String,
    pub reason: String,
}

impl Fallback {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Destination for `path` on the fallback site.
    pub fn destination(&self, path: &str) -> String {
        let base = self.url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_wins_over_a_working_host() {
        let cap = RenderCapability::assess(true, Ok(()));
        assert!(!cap.is_supported());
    }

    #[test]
    fn host_failure_is_unsupported_with_reason() {
        let cap = RenderCapability::assess(false, Err("no display".to_string()));
        assert_eq!(
            cap,
            RenderCapability::Unsupported {
                reason: "no display".to_string()
            }
        );
        assert!(RenderCapability::assess(false, Ok(())).is_supported());
    }

    #[test]
    fn fallback_destination_keeps_path() {
        let fb = Fallback::new("https://studio.example/lite/", "no gpu");
        assert_eq!(fb.destination("/about"), "https://studio.example/lite/about");
        assert_eq!(fb.destination("/"), "https://studio.example/lite");
    }
}
