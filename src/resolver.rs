//! Pixel range resolution
//!
//! Turns strand configuration into concrete, bounds-checked pixel lists and
//! the animation groups that should run for the selected mode.

use std::collections::HashSet;

use fastrand::Rng;
use log::{info, warn};

use crate::{
    color::{Color, pick_color},
    config::{DeviceConfig, IdList, StrandConfig},
    spec::AnimationSpec,
};

/// Spec text used for entries without an animation in the current mode.
pub const OFF_SPEC: &str = "off";

/// Pixels of one strand sharing one animation spec.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGroup {
    pub name: String,
    /// Index of the strand in the device registry
    pub strand: usize,
    /// Strand pixel indices, in drawing order
    pub pixels: Vec<usize>,
    pub spec_text: String,
    pub spec: AnimationSpec,
}

impl PixelGroup {
    pub fn new(
        name: impl Into<String>,
        strand: usize,
        pixels: Vec<usize>,
        spec_text: impl Into<String>,
    ) -> Self {
        let spec_text = spec_text.into();
        Self {
            name: name.into(),
            strand,
            pixels,
            spec: AnimationSpec::parse(&spec_text),
            spec_text,
        }
    }
}

/// What the configuration says about one pixel, kept for status reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelInfo {
    pub id: usize,
    /// Name of the range or pixel entry owning it
    pub name: String,
    /// Raw spec text for the current mode
    pub spec_text: String,
    /// Starting color picked from the animation spec
    pub color: Color,
}

/// Result of resolving a whole device for one mode.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDevice {
    /// Animated groups to run, pairwise disjoint per strand
    pub groups: Vec<PixelGroup>,
    /// Per strand, per pixel metadata (`None` for unconfigured pixels)
    pub pixels: Vec<Vec<Option<PixelInfo>>>,
}

impl ResolvedDevice {
    /// Add an animated group, dropping pixels an earlier group already owns.
    fn push_group(&mut self, mut group: PixelGroup, claimed: &mut HashSet<(usize, usize)>) {
        let strand = group.strand;
        group.pixels.retain(|&pixel| {
            let free = !claimed.contains(&(strand, pixel));
            if !free {
                warn!(
                    "Pixel {pixel} on strand {strand} is already animated, dropping it from '{}'",
                    group.name
                );
            }
            free
        });
        if group.pixels.is_empty() {
            warn!("Animation group '{}' has no pixels left, skipping", group.name);
            return;
        }
        claimed.extend(group.pixels.iter().map(|&pixel| (strand, pixel)));
        self.groups.push(group);
    }
}

fn push_id(id: usize, limit: usize, ids: &mut Vec<usize>) {
    if id >= limit {
        warn!("Pixel id {id} is outside the strand (size {limit}), skipping");
    } else if !ids.contains(&id) {
        ids.push(id);
    }
}

/// Resolve an id list and/or a half-open `[id_start, id_end)` range into
/// unique pixel indices below `limit`, keeping first-seen order.
pub fn find_ids(
    ids: Option<&IdList>,
    id_start: Option<usize>,
    id_end: Option<usize>,
    limit: usize,
) -> Vec<usize> {
    let mut resolved = Vec::new();

    match ids {
        Some(IdList::Single(id)) => push_id(*id, limit, &mut resolved),
        Some(IdList::List(list)) => {
            for &id in list {
                push_id(id, limit, &mut resolved);
            }
        }
        Some(IdList::Text(text)) => {
            for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                match token.parse::<usize>() {
                    Ok(id) => push_id(id, limit, &mut resolved),
                    Err(_) => warn!("Invalid pixel id '{token}', skipping"),
                }
            }
        }
        None => {}
    }

    if id_start.is_some() || id_end.is_some() {
        let start = id_start.unwrap_or(0);
        let end = id_end.unwrap_or(limit);
        if end > limit {
            warn!("Pixel range {start}..{end} runs past the strand (size {limit}), clipping");
        }
        if start > end {
            warn!("Pixel range {start}..{end} is empty");
        }
        for id in start..end.min(limit) {
            if !resolved.contains(&id) {
                resolved.push(id);
            }
        }
    }

    resolved
}

fn resolve_strand(
    strand_id: usize,
    strand: &StrandConfig,
    mode: &str,
    rng: &mut Rng,
    resolved: &mut ResolvedDevice,
    claimed: &mut HashSet<(usize, usize)>,
) {
    let mut table = vec![None; strand.size];

    for (range_name, range) in &strand.id_ranges {
        let ids = find_ids(range.ids.as_ref(), range.id_start, range.id_end, strand.size);

        let spec_text = range.animations.get(mode).map_or(OFF_SPEC, String::as_str);
        let group = PixelGroup::new(range_name.as_str(), strand_id, ids, spec_text);
        for &id in &group.pixels {
            table[id] = Some(PixelInfo {
                id,
                name: range_name.clone(),
                spec_text: spec_text.to_owned(),
                color: pick_color(&group.spec.colors, 0.0, rng),
            });
        }
        if group.spec.is_animated() {
            resolved.push_group(group, claimed);
        }
    }

    for (&id, pixel) in &strand.ids {
        if id >= strand.size {
            warn!(
                "Pixel '{}' ({id}) is outside the strand (size {}), skipping",
                pixel.name, strand.size
            );
            continue;
        }

        let spec_text = pixel.animations.get(mode).map_or(OFF_SPEC, String::as_str);
        let group = PixelGroup::new(pixel.name.as_str(), strand_id, vec![id], spec_text);
        table[id] = Some(PixelInfo {
            id,
            name: pixel.name.clone(),
            spec_text: spec_text.to_owned(),
            color: pick_color(&group.spec.colors, 0.0, rng),
        });
        if group.spec.is_animated() {
            resolved.push_group(group, claimed);
        }
    }

    resolved.pixels.push(table);
}

/// Resolve every strand of the device for `mode`.
pub fn resolve_device(config: &DeviceConfig, mode: &str, rng: &mut Rng) -> ResolvedDevice {
    let mut resolved = ResolvedDevice::default();
    let mut claimed = HashSet::new();

    for (strand_id, (name, strand)) in config.strands.iter().enumerate() {
        info!("Setting up lights for strand '{name}' in mode '{mode}'");
        resolve_strand(strand_id, strand, mode, rng, &mut resolved, &mut claimed);
    }

    info!(
        "Resolved {} animation groups over {} strands",
        resolved.groups.len(),
        resolved.pixels.len()
    );
    resolved
}
