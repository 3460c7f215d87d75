//! Merging generated output into files the user also edits
//!
//! Two strategies, both idempotent:
//!
//! - [`merge_block`] keeps generated text between two banner comments and
//!   replaces only that region on later runs.
//! - [`merge_automations`] treats the file as a top-level YAML list and
//!   replaces items by `id`, leaving every other item untouched. Home
//!   Assistant rewrites `automations.yaml` from its editor and drops
//!   comments, so banners would not survive there.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// First line of a generated region
pub const BEGIN_BANNER: &str = "# >>> spoolsync generated >>>";

/// Last line of a generated region
pub const END_BANNER: &str = "# <<< spoolsync generated <<<";

/// Automation ids owned by the generator
///
/// An existing automation with this prefix that is no longer generated
/// (for example the usage accumulator after a sensor disappeared) is
/// removed instead of being left behind.
pub const GENERATED_ID_PREFIX: &str = "spoolsync_";

/// How generated text is merged into an existing file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    /// Banner-delimited region
    Block,
    /// Top-level automation list, merged by id
    Automations,
}

impl MergeKind {
    pub fn merge(self, existing: &str, generated: &str) -> ConfigResult<String> {
        match self {
            MergeKind::Block => Ok(merge_block(existing, generated)),
            MergeKind::Automations => merge_automations(existing, generated),
        }
    }
}

fn with_newline(text: &str) -> String {
    if text.is_empty() || text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}\n", text)
    }
}

fn wrap_block(block: &str) -> String {
    format!("{}\n{}{}\n", BEGIN_BANNER, with_newline(block), END_BANNER)
}

/// Replace the banner-delimited region of `existing` with `block`
///
/// Without a region the block is appended after a blank line. A begin
/// banner with no end banner owns everything up to the end of the file.
pub fn merge_block(existing: &str, block: &str) -> String {
    let wrapped = wrap_block(block);
    let lines: Vec<&str> = existing.split_inclusive('\n').collect();

    let begin = lines.iter().position(|line| line.trim_end() == BEGIN_BANNER);
    if let Some(begin) = begin {
        let end = lines[begin + 1..]
            .iter()
            .position(|line| line.trim_end() == END_BANNER)
            .map_or(lines.len(), |offset| begin + 1 + offset + 1);

        let mut merged: String = lines[..begin].concat();
        merged.push_str(&wrapped);
        merged.push_str(&lines[end..].concat());
        return merged;
    }

    if existing.trim().is_empty() {
        return wrapped;
    }

    let mut merged = with_newline(existing);
    if !merged.ends_with("\n\n") {
        merged.push('\n');
    }
    merged.push_str(&wrapped);
    merged
}

/// A top-level list item and its id, if one could be read
///
/// Top-level comments and blank lines belong to the item after them, so
/// they survive when the item before them is replaced or dropped.
struct Item {
    leading: String,
    id: Option<String>,
    body: String,
}

/// A block-style YAML list split into items
struct ItemList {
    preamble: String,
    items: Vec<Item>,
    trailer: String,
}

fn starts_item(line: &str) -> bool {
    line.starts_with("- ") || line.trim_end() == "-"
}

fn is_loose(line: &str) -> bool {
    line.starts_with('#') || line.trim().is_empty()
}

/// Split a YAML list document into its preamble, items and trailing comments
fn split_items(text: &str) -> ItemList {
    let mut preamble = String::new();
    let mut items: Vec<Item> = Vec::new();
    let mut pending = String::new();

    for line in text.split_inclusive('\n') {
        if starts_item(line) {
            items.push(Item {
                leading: std::mem::take(&mut pending),
                id: None,
                body: line.to_string(),
            });
            continue;
        }
        match items.last_mut() {
            None => preamble.push_str(line),
            Some(_) if is_loose(line) => pending.push_str(line),
            Some(item) => {
                item.body.push_str(&std::mem::take(&mut pending));
                item.body.push_str(line);
            }
        }
    }

    for item in &mut items {
        item.id = block_id(&item.body);
    }
    ItemList {
        preamble,
        items,
        trailer: pending,
    }
}

/// Preamble lines that are YAML content rather than comments
fn preamble_content(preamble: &str) -> impl Iterator<Item = &str> {
    preamble
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && *line != "---")
}

/// Bring an existing automation file into block list form
///
/// Flow-style lists such as `[{id: a, ...}]` are re-emitted as a block
/// list, losing their comments. Documents that are not a list are
/// rejected, since appending items to them would produce invalid YAML.
fn block_list(existing: &str) -> ConfigResult<ItemList> {
    let mut list = split_items(existing);
    let content: Vec<&str> = preamble_content(&list.preamble).collect();
    if content.is_empty() {
        return Ok(list);
    }
    if content == ["[]"] && list.items.is_empty() {
        list.preamble = list
            .preamble
            .lines()
            .filter(|line| line.trim() != "[]")
            .map(|line| format!("{}\n", line))
            .collect();
        return Ok(list);
    }

    let invalid = |reason: String| ConfigError::InvalidValue {
        key: "automations".to_string(),
        reason,
    };
    let items = match serde_yaml::from_str::<serde_yaml::Value>(existing) {
        Ok(serde_yaml::Value::Sequence(items)) => items,
        Ok(_) => return Err(invalid("existing file is not a list".to_string())),
        Err(e) => return Err(invalid(e.to_string())),
    };
    warn!("Rewriting flow-style automation list as a block list");
    if items.is_empty() {
        return Ok(split_items(""));
    }
    let text = serde_yaml::to_string(&items).map_err(|e| invalid(e.to_string()))?;
    Ok(split_items(&text))
}

/// Read the `id` key of one list item
fn block_id(item: &str) -> Option<String> {
    item.lines().find_map(|line| {
        let rest = line
            .strip_prefix("- ")
            .or_else(|| line.strip_prefix("  ").filter(|rest| !rest.starts_with(' ')))?;
        let value = rest.strip_prefix("id:")?;
        let id = unquote(value.trim());
        (!id.is_empty()).then(|| id.to_string())
    })
}

fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Merge a generated automation list into an existing one by `id`
///
/// Existing items whose id matches a generated item are replaced in place.
/// Generated items with new ids are appended. Stale items carrying
/// [`GENERATED_ID_PREFIX`] are dropped. Comments between items are kept.
/// The generated document's own preamble (header comments) is not copied.
pub fn merge_automations(existing: &str, generated: &str) -> ConfigResult<String> {
    let existing = block_list(existing)?;
    let generated_items = split_items(generated).items;

    let mut merged = with_newline(&existing.preamble);
    let mut used = vec![false; generated_items.len()];
    let mut emitted = false;

    for item in &existing.items {
        merged.push_str(&item.leading);
        let replacement = item.id.as_ref().and_then(|id| {
            generated_items
                .iter()
                .position(|generated| generated.id.as_ref() == Some(id))
        });
        match replacement {
            Some(index) => {
                debug!("Replacing automation {:?}", item.id);
                used[index] = true;
                emitted = true;
                merged.push_str(&with_newline(&generated_items[index].body));
            }
            None if item
                .id
                .as_deref()
                .is_some_and(|id| id.starts_with(GENERATED_ID_PREFIX)) =>
            {
                debug!("Removing stale automation {:?}", item.id);
            }
            None => {
                emitted = true;
                merged.push_str(&with_newline(&item.body));
            }
        }
    }

    for (item, used) in generated_items.iter().zip(used) {
        if !used {
            debug!("Adding automation {:?}", item.id);
            emitted = true;
            merged.push_str(&with_newline(&item.body));
        }
    }
    merged.push_str(&with_newline(&existing.trailer));

    if !emitted {
        merged.push_str("[]\n");
    }
    Ok(merged)
}

/// Merge generated text into the file at `path` and write it atomically
///
/// A missing file counts as empty; parent directories are created. Returns
/// `false` when the merged content equals what is already on disk.
pub fn apply_to_file(path: &Path, generated: &str, kind: MergeKind) -> ConfigResult<bool> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let merged = kind.merge(&existing, generated)?;
    if merged == existing {
        debug!("{:?} is up to date", path);
        return Ok(false);
    }

    let write_error = |source| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source,
    };
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(write_error)?;

    let mut file = tempfile::NamedTempFile::new_in(parent).map_err(write_error)?;
    file.write_all(merged.as_bytes()).map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    info!("Updated {:?}", path);
    Ok(true)
}
