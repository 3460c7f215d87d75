//! Topology discovery
//!
//! Rebuilds `Printer -> AmsUnit -> Tray` from a full entity snapshot:
//!
//! 1. print status entities define printers and their prefixes
//! 2. per prefix, AMS humidity and tray sensors are grouped by AMS number
//! 3. trays 1..=4 are probed for every unit
//! 4. at most one external spool and the structural sensors are attached
//!
//! Every step that can see several entities for one logical unit goes
//! through [`select_best`]. When the prefix-scoped search finds nothing,
//! a prefix-agnostic search runs over entities that do not belong to any
//! other discovered printer.

use std::collections::{BTreeMap, BTreeSet};

use spoolsync_core::{
    attrs, AmsNumber, AmsUnit, CompositeTrayId, EntityState, Printer, PrinterSensors, Tray,
    MAX_AMS_SLOT, MAX_TRAY_NUMBER,
};
use spoolsync_patterns::{
    extract_printer_prefix, global_patterns, strip_status_label, Concept, EntityPatterns,
};
use tracing::{debug, info, trace, warn};

use crate::select::{select_best, Candidate};

/// Discover every printer in a snapshot
///
/// Printers are returned in order of first appearance of their status
/// entity. Entities that belong to no printer are ignored.
pub fn discover_printers(states: &[EntityState]) -> Vec<Printer> {
    let Some(any) = global_patterns() else {
        return Vec::new();
    };

    let mut statuses: Vec<(String, Vec<Candidate<'_>>)> = Vec::new();
    for state in states {
        let entity_id = state.entity_id.as_str();
        let Some(m) = any.print_status(&entity_id) else {
            continue;
        };
        let prefix = m
            .prefix
            .unwrap_or_else(|| extract_printer_prefix(&entity_id));
        let candidate = Candidate::new(state, m.suffix);
        match statuses.iter_mut().find(|(p, _)| *p == prefix) {
            Some((_, candidates)) => candidates.push(candidate),
            None => statuses.push((prefix, vec![candidate])),
        }
    }

    let prefixes: Vec<String> = statuses.iter().map(|(p, _)| p.clone()).collect();
    let mut printers = Vec::with_capacity(statuses.len());

    for (prefix, candidates) in statuses {
        let Some(status) = pick(&format!("{} print status", prefix), candidates) else {
            continue;
        };
        let scoped = match EntityPatterns::for_prefix(&prefix) {
            Ok(scoped) => scoped,
            Err(e) => {
                warn!("Skipping printer {}: {}", prefix, e);
                continue;
            }
        };
        let scope = PrinterScope {
            prefix: &prefix,
            scoped,
            any,
            others: prefixes.iter().filter(|p| **p != prefix).collect(),
            states,
        };
        let printer = scope.build(status.state);
        info!(
            "Discovered printer {} ({}): {} AMS units, {} trays",
            printer.name,
            printer.prefix,
            printer.ams_units.len(),
            printer.tray_count()
        );
        printers.push(printer);
    }

    printers
}

fn pick<'a, T>(what: &str, candidates: Vec<Candidate<'a, T>>) -> Option<Candidate<'a, T>> {
    let count = candidates.len();
    let best = select_best(candidates)?;
    if count > 1 {
        debug!(
            "Resolved {} candidates for {}: using {}",
            count, what, best.state.entity_id
        );
    }
    Some(best)
}

/// Everything needed to resolve one printer's entities
struct PrinterScope<'a> {
    prefix: &'a str,
    scoped: EntityPatterns,
    any: &'static EntityPatterns,
    others: Vec<&'a String>,
    states: &'a [EntityState],
}

impl<'a> PrinterScope<'a> {
    fn build(&self, status: &EntityState) -> Printer {
        let name = status
            .friendly_name()
            .map(|friendly| strip_status_label(&friendly).unwrap_or(friendly))
            .unwrap_or_else(|| self.prefix.to_string());

        let mut ams_units = self.ams_units(&self.scoped, self.states.iter());
        if ams_units.is_empty() {
            ams_units = self.ams_units(self.any, self.fallback_states());
            if !ams_units.is_empty() {
                debug!(
                    "Printer {}: {} AMS units found without prefix",
                    self.prefix,
                    ams_units.len()
                );
            }
        }

        let external_spool = self
            .sensor(Concept::ExternalSpool)
            .map(|state| tray_from_state(state, 0, CompositeTrayId::EXTERNAL));

        Printer {
            id: status.entity_id.clone(),
            prefix: self.prefix.to_string(),
            name,
            state: status.state.clone(),
            ams_units,
            external_spool,
            sensors: PrinterSensors {
                current_stage: self
                    .sensor(Concept::CurrentStage)
                    .map(|s| s.entity_id.clone()),
                print_weight: self
                    .sensor(Concept::PrintWeight)
                    .map(|s| s.entity_id.clone()),
                print_progress: self
                    .sensor(Concept::PrintProgress)
                    .map(|s| s.entity_id.clone()),
            },
        }
    }

    /// Entities that do not start with another printer's prefix
    fn fallback_states(&self) -> impl Iterator<Item = &'a EntityState> + '_ {
        self.states.iter().filter(move |state| {
            let object_id = state.entity_id.object_id();
            let foreign = self.others.iter().any(|other| {
                object_id
                    .strip_prefix(other.as_str())
                    .is_some_and(|rest| rest.starts_with('_'))
            });
            if foreign {
                trace!("Fallback for {} skips {}", self.prefix, state.entity_id);
            }
            !foreign
        })
    }

    /// Best entity for a single-entity concept, scoped first
    fn sensor(&self, concept: Concept) -> Option<&'a EntityState> {
        let what = format!("{} {}", self.prefix, concept.name());
        let find = |patterns: &EntityPatterns, states: &mut dyn Iterator<Item = &'a EntityState>| {
            let candidates: Vec<Candidate<'a>> = states
                .filter_map(|state| {
                    let m = patterns.sensor(concept, state.entity_id.as_str())?;
                    Some(Candidate::new(state, m.suffix))
                })
                .collect();
            pick(&what, candidates).map(|c| c.state)
        };

        find(&self.scoped, &mut self.states.iter())
            .or_else(|| find(self.any, &mut self.fallback_states()))
    }

    fn ams_units(
        &self,
        patterns: &EntityPatterns,
        states: impl Iterator<Item = &'a EntityState>,
    ) -> Vec<AmsUnit> {
        let mut humidity: BTreeMap<AmsNumber, Vec<Candidate<'a>>> = BTreeMap::new();
        let mut trays: BTreeMap<(AmsNumber, u8), Vec<Candidate<'a>>> = BTreeMap::new();

        for state in states {
            let entity_id = state.entity_id.as_str();
            if let Some(m) = patterns.ams_humidity(&entity_id) {
                humidity
                    .entry(m.number)
                    .or_default()
                    .push(Candidate::new(state, m.suffix));
            } else if let Some(m) = patterns.tray(&entity_id) {
                trays
                    .entry((m.ams, m.tray))
                    .or_default()
                    .push(Candidate::new(state, m.suffix));
            }
        }

        let numbers: BTreeSet<AmsNumber> = humidity
            .keys()
            .copied()
            .chain(trays.keys().map(|(number, _)| *number))
            .collect();
        let slots = allocate_slots(&numbers);

        let mut units = Vec::with_capacity(numbers.len());
        for number in numbers {
            let Some(&slot) = slots.get(&number) else {
                warn!(
                    "Printer {}: no composite slot left for AMS {}, skipping it",
                    self.prefix, number
                );
                continue;
            };

            let mut unit_trays = Vec::new();
            for tray_number in 1..=MAX_TRAY_NUMBER {
                let Some(candidates) = trays.remove(&(number, tray_number)) else {
                    continue;
                };
                let what = format!("{} AMS {} tray {}", self.prefix, number, tray_number);
                let Some(best) = pick(&what, candidates) else {
                    continue;
                };
                match CompositeTrayId::encode(slot, tray_number) {
                    Ok(composite_id) => {
                        unit_trays.push(tray_from_state(best.state, tray_number, composite_id))
                    }
                    Err(e) => warn!("Printer {}: {}", self.prefix, e),
                }
            }

            let what = format!("{} AMS {}", self.prefix, number);
            let id = humidity
                .remove(&number)
                .and_then(|candidates| pick(&what, candidates))
                .map(|best| best.state.entity_id.clone())
                .or_else(|| unit_trays.first().map(|tray| tray.id.clone()));
            let Some(id) = id else {
                continue;
            };

            units.push(AmsUnit {
                id,
                number,
                slot,
                name: number.display_name(),
                trays: unit_trays,
            });
        }

        units.sort_by_key(|unit| unit.slot);
        units
    }
}

/// Assign each AMS number a composite slot in 1..=9
///
/// Indices 1..=9 keep their own number. Everything else (`lite`, `ht`,
/// 128 and up) takes the smallest free slot in AMS order. Numbers left
/// without a slot are absent from the result.
pub fn allocate_slots(numbers: &BTreeSet<AmsNumber>) -> BTreeMap<AmsNumber, u8> {
    let mut slots = BTreeMap::new();
    let mut used = [false; MAX_AMS_SLOT as usize + 1];

    for number in numbers {
        if let AmsNumber::Index(index) = *number {
            if (1..=u16::from(MAX_AMS_SLOT)).contains(&index) {
                slots.insert(*number, index as u8);
                used[index as usize] = true;
            }
        }
    }

    for number in numbers {
        if slots.contains_key(number) {
            continue;
        }
        if let Some(free) = (1..=MAX_AMS_SLOT).find(|slot| !used[*slot as usize]) {
            used[free as usize] = true;
            slots.insert(*number, free);
        }
    }

    slots
}

/// RFID readers report an all-zero serial when no tag is present
fn is_blank_serial(serial: &str) -> bool {
    serial.chars().all(|c| c == '0')
}

fn tray_from_state(state: &EntityState, tray_number: u8, composite_id: CompositeTrayId) -> Tray {
    Tray {
        id: state.entity_id.clone(),
        tray_number,
        composite_id,
        state: state.state.clone(),
        name: state.text_attribute(attrs::NAME),
        color: state.text_attribute(attrs::COLOR),
        material: state.text_attribute(attrs::MATERIAL),
        spool_serial: state
            .text_attribute(attrs::SERIAL)
            .filter(|serial| !is_blank_serial(serial)),
        remaining_weight: state
            .attribute::<f64>(attrs::REMAINING)
            .filter(|remaining| *remaining >= 0.0),
        active: state.attribute::<bool>(attrs::ACTIVE).unwrap_or(false),
    }
}
