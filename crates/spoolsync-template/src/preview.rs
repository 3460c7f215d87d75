//! Active tray preview
//!
//! Evaluates a generated active tray template against a snapshot, giving
//! the composite id Home Assistant would report for it.

use spoolsync_core::CompositeTrayId;
use tracing::debug;

use crate::engine::TemplateEngine;
use crate::error::{TemplateError, TemplateResult};

/// Render an active tray template
///
/// `Ok(None)` when the template reports no active tray (`-1`).
pub fn preview_active_tray(
    engine: &TemplateEngine,
    template: &str,
) -> TemplateResult<Option<CompositeTrayId>> {
    let output = engine.render(template)?;
    let trimmed = output.trim();
    debug!("Active tray template rendered '{}'", trimmed);

    let unexpected = || TemplateError::UnexpectedOutput {
        output: trimmed.to_string(),
    };
    match trimmed.parse::<i64>().map_err(|_| unexpected())? {
        -1 => Ok(None),
        value @ 0..=99 => {
            let value = value as u8;
            CompositeTrayId::encode(value / 10, value % 10)
                .map(Some)
                .map_err(|_| unexpected())
        }
        _ => Err(unexpected()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_parses_ids() {
        let engine = TemplateEngine::new(&[]);
        assert_eq!(preview_active_tray(&engine, "-1").unwrap(), None);
        assert_eq!(
            preview_active_tray(&engine, " 0 ").unwrap(),
            Some(CompositeTrayId::EXTERNAL)
        );
        assert_eq!(
            preview_active_tray(&engine, "{{ 10 + 2 }}").unwrap().map(|id| id.value()),
            Some(12)
        );
    }

    #[test]
    fn test_preview_rejects_garbage() {
        let engine = TemplateEngine::new(&[]);
        for output in ["PLA", "15", "100", "-2"] {
            assert!(matches!(
                preview_active_tray(&engine, output),
                Err(TemplateError::UnexpectedOutput { .. })
            ));
        }
    }
}
