//! Active tray detection
//!
//! The generated template sensor reports which composite tray id is
//! feeding the printer. Its template is built as a list of checks and only
//! turned into template text by [`ActiveTrayTemplate::render`].
//!
//! Priority, first match wins:
//!
//! 1. the external spool, if no AMS tray is flagged active and the external
//!    spool reports a loaded material
//! 2. each AMS tray's `active` flag, in ascending composite id order
//!
//! Nothing active renders `-1`.

use spoolsync_core::{attrs, CompositeTrayId, EntityId, Printer};

use crate::text::jinja_string;

/// Material values that mean "nothing loaded"
const EMPTY_MATERIALS: &[&str] = &["", "unknown", "none"];

/// One branch of the active tray template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveTrayCheck {
    /// External spool with material loaded and no active AMS tray
    External {
        entity_id: EntityId,
        /// AMS trays whose active flag suppresses the external spool
        suppressed_by: Vec<EntityId>,
    },

    /// AMS tray reporting itself active
    AmsTray {
        composite_id: CompositeTrayId,
        entity_id: EntityId,
    },
}

impl ActiveTrayCheck {
    /// Composite id reported when this check matches
    pub fn composite_id(&self) -> CompositeTrayId {
        match self {
            ActiveTrayCheck::External { .. } => CompositeTrayId::EXTERNAL,
            ActiveTrayCheck::AmsTray { composite_id, .. } => *composite_id,
        }
    }

    fn condition(&self) -> String {
        match self {
            ActiveTrayCheck::External {
                entity_id,
                suppressed_by,
            } => {
                let loaded = format!(
                    "(state_attr({}, {}) or '') | string | lower not in [{}]",
                    jinja_string(entity_id.as_str()),
                    jinja_string(attrs::MATERIAL),
                    EMPTY_MATERIALS
                        .iter()
                        .map(|m| jinja_string(m))
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                if suppressed_by.is_empty() {
                    loaded
                } else {
                    let any_active = suppressed_by
                        .iter()
                        .map(is_active)
                        .collect::<Vec<_>>()
                        .join(" or ");
                    format!("not ({}) and {}", any_active, loaded)
                }
            }
            ActiveTrayCheck::AmsTray { entity_id, .. } => is_active(entity_id),
        }
    }
}

fn is_active(entity_id: &EntityId) -> String {
    format!(
        "is_state_attr({}, {}, true)",
        jinja_string(entity_id.as_str()),
        jinja_string(attrs::ACTIVE)
    )
}

/// Ordered checks making up the active tray template
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActiveTrayTemplate {
    pub checks: Vec<ActiveTrayCheck>,
}

impl ActiveTrayTemplate {
    /// Build the checks for one printer
    pub fn for_printer(printer: &Printer) -> Self {
        let mut ams: Vec<(CompositeTrayId, EntityId)> = printer
            .ams_trays()
            .map(|tray| (tray.composite_id, tray.id.clone()))
            .collect();
        ams.sort_by_key(|(composite_id, _)| *composite_id);

        let mut checks = Vec::with_capacity(ams.len() + 1);
        if let Some(external) = &printer.external_spool {
            checks.push(ActiveTrayCheck::External {
                entity_id: external.id.clone(),
                suppressed_by: ams.iter().map(|(_, id)| id.clone()).collect(),
            });
        }
        checks.extend(
            ams.into_iter()
                .map(|(composite_id, entity_id)| ActiveTrayCheck::AmsTray {
                    composite_id,
                    entity_id,
                }),
        );

        Self { checks }
    }

    /// Number of AMS tray checks
    pub fn ams_check_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| matches!(c, ActiveTrayCheck::AmsTray { .. }))
            .count()
    }

    /// Number of external spool checks (0 or 1)
    pub fn external_check_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| matches!(c, ActiveTrayCheck::External { .. }))
            .count()
    }

    /// Render as template text evaluating to a composite id or `-1`
    pub fn render(&self) -> String {
        if self.checks.is_empty() {
            return "-1".to_string();
        }

        let mut lines = Vec::with_capacity(self.checks.len() * 2 + 3);
        for (i, check) in self.checks.iter().enumerate() {
            let keyword = if i == 0 { "if" } else { "elif" };
            lines.push(format!("{{%- {} {} -%}}", keyword, check.condition()));
            lines.push(check.composite_id().to_string());
        }
        lines.push("{%- else -%}".to_string());
        lines.push("-1".to_string());
        lines.push("{%- endif -%}".to_string());
        lines.join("\n")
    }
}
