use crate::geometry::{distance, Point};
use crate::targets::Target;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Index into the slice handed to [`resolve`].
    pub position: usize,
    pub target_index: usize,
    pub distance: f32,
    pub within_radius: bool,
}

/// Nearest target to `pointer` by Euclidean distance.
///
/// Linear scan; on equal distances the first target in slice order wins.
/// Returns `None` for an empty slice. Never mutates anything.
pub fn resolve(pointer: Point, targets: &[Target]) -> Option<Resolution> {
    let mut best: Option<(usize, f32)> = None;
    for (pos, t) in targets.iter().enumerate() {
        let d = distance(pointer, t.position);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            // NaN distances (non-finite input) never replace a candidate
            _ if d.is_nan() => {}
            _ => best = Some((pos, d)),
        }
    }

    best.map(|(pos, d)| {
        let t = &targets[pos];
        Resolution {
            position: pos,
            target_index: t.index,
            distance: d,
            within_radius: t.accepts(pointer, d),
        }
    })
}
