use super::result::DebugCapture;
use crate::driver::{Driver, bounded};
use ferret_common::SemanticType;
use ferret_common::config::schema::ResolverConfig;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

pub fn capture_name(semantic_type: &SemanticType) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("debug_{}_{}.png", semantic_type, millis)
}

/// Best-effort screenshot after a failed resolution.
///
/// Every failure here (driver, timeout, filesystem) is logged and swallowed.
pub async fn capture_debug<D: Driver + ?Sized>(
    driver: &mut D,
    semantic_type: &SemanticType,
    config: &ResolverConfig,
) -> Option<DebugCapture> {
    if !config.capture_on_failure {
        return None;
    }

    let bytes = match bounded(config.capture_timeout(), driver.screenshot()).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(%semantic_type, "debug screenshot failed: {}", e);
            return None;
        }
    };

    let name = capture_name(semantic_type);
    let mut path = None;
    if let Some(dir) = &config.screenshot_dir {
        let target = dir.join(&name);
        let write = async {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(&target, &bytes).await
        };
        match tokio::time::timeout(config.capture_timeout(), write).await {
            Ok(Ok(())) => {
                debug!(path = %target.display(), "wrote debug screenshot");
                path = Some(target);
            }
            Ok(Err(e)) => {
                warn!(path = %target.display(), "could not write debug screenshot: {}", e)
            }
            Err(_) => warn!(path = %target.display(), "writing debug screenshot timed out"),
        }
    }

    Some(DebugCapture { name, path, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_name_shape() {
        let name = capture_name(&"login_button".into());
        assert!(name.starts_with("debug_login_button_"));
        assert!(name.ends_with(".png"));
    }
}
