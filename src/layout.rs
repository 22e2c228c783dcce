//! Binary space partition layout.
//!
//! [`compute_tiles`] turns a work-area rectangle and a window count into
//! exactly that many disjoint tiles. The zone is halved recursively along
//! its longer axis; every split leaves a 1-unit gap between the two
//! sub-zones, so no two tiles ever share a boundary coordinate.
//!
//! The function is pure: the layout is fully determined by `(count, zone)`.
//! Zone dimensions are not validated: a zone too small for the requested
//! count degenerates into zero- or negative-extent tiles (see the tests at
//! the bottom pinning that behavior).

use crate::types::Rect;

/// Compute `count` disjoint tiles covering `zone`.
///
/// Tiles are returned in recursion order: all tiles of the first (left or
/// top) sub-zone precede all tiles of the second. For odd counts the second
/// sub-zone receives the extra window.
pub fn compute_tiles(count: usize, zone: Rect) -> Vec<Rect> {
    let mut tiles = Vec::with_capacity(count);
    fill_tiles(count, zone, &mut tiles);
    tiles
}

/// Recursive worker: append the tiles for `count` windows in `zone` to `out`.
fn fill_tiles(count: usize, zone: Rect, out: &mut Vec<Rect>) {
    if count == 0 {
        return;
    }

    // Base case: a single window occupies the whole remaining zone.
    if count == 1 {
        out.push(zone);
        return;
    }

    let half_count = count / 2;
    if zone.width > zone.height {
        // Vertical split. The second sub-zone starts one unit past the
        // first's far edge and gives that unit up, keeping the pair inside
        // the zone: half + 1 + (width - half - 1) == width.
        let half = zone.width / 2;
        let first = Rect::new(zone.left, zone.top, half, zone.height);
        let second = Rect::new(
            zone.left + half + 1,
            zone.top,
            zone.width - half - 1,
            zone.height,
        );
        fill_tiles(half_count, first, out);
        fill_tiles(count - half_count, second, out);
    } else {
        // Horizontal split; a square zone lands here too.
        let half = zone.height / 2;
        let first = Rect::new(zone.left, zone.top, zone.width, half);
        let second = Rect::new(
            zone.left,
            zone.top + half + 1,
            zone.width,
            zone.height - half - 1,
        );
        fill_tiles(half_count, first, out);
        fill_tiles(count - half_count, second, out);
    }
}

//  Tests
