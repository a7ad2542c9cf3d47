// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ear-clipping triangulation with pinch/bridge handling
//!
//! A region arrives as one or more closed loops that share canonical
//! vertices. Loops are spliced into a single walk at a shared vertex
//! (holes reversed first so the walk keeps one net winding), then the
//! walk is clipped ear by ear. The ear with the smallest interior angle
//! goes first to keep slivers down; exact ties fall back to the lowest
//! original index so the output is reproducible. Zero-area left-overs
//! from bridge seams — doubled vertices, zero-width spikes, collinear
//! excursions — are spliced out of the walk without emitting anything,
//! and only once no regular ear remains, so bridged cells keep their
//! own decomposition instead of collapsing into their neighbours.

use nalgebra::Point2;
use rustc_hash::FxHashSet;
use tracing::warn;

use crate::region::Region;
use crate::winding::{
    interior_cos, orient, point_in_contour, point_in_triangle, signed_area_indexed,
};

/// Cosine spread under which two ear angles count as an exact tie.
const ANGLE_TIE: f64 = 1e-9;

/// Triangulate one boundary region. Triangles reference original point
/// indices and wind counter-clockwise in the projected basis.
pub(crate) fn triangulate_region(
    region: &Region,
    points: &[Point2<f64>],
    canon: &[u32],
    area_epsilon: f64,
) -> Vec<[u32; 3]> {
    let loops: Vec<Vec<u32>> = region
        .loops
        .iter()
        .map(|lp| dedup_cycle(lp, canon))
        .filter(|lp| lp.len() >= 3)
        .collect();

    match loops.len() {
        0 => Vec::new(),
        1 => clip_walk(&loops[0], points, canon, area_epsilon),
        _ => splice_loops(loops, points, canon)
            .iter()
            .flat_map(|walk| clip_walk(walk, points, canon, area_epsilon))
            .collect(),
    }
}

/// Drop immediately repeated canonical values from a cycle, wraparound
/// pair included.
fn dedup_cycle(verts: &[u32], canon: &[u32]) -> Vec<u32> {
    let mut out: Vec<u32> = Vec::with_capacity(verts.len());
    for &v in verts {
        let duplicate = out
            .last()
            .is_some_and(|&prev| canon[prev as usize] == canon[v as usize]);
        if !duplicate {
            out.push(v);
        }
    }
    while out.len() > 1 && canon[out[0] as usize] == canon[out[out.len() - 1] as usize] {
        out.pop();
    }
    out
}

/// Smallest projected position of a loop, used to break ties without
/// depending on where the input sequence happened to start.
fn lex_min(lp: &[u32], points: &[Point2<f64>]) -> (f64, f64) {
    let mut best = (f64::INFINITY, f64::INFINITY);
    for &v in lp {
        let p = &points[v as usize];
        if (p.x, p.y) < best {
            best = (p.x, p.y);
        }
    }
    best
}

/// Splice a region's loops into one counter-clockwise walk, joined at
/// shared canonical vertices. Loops that never touch the walk (possible
/// only for malformed regions) come back as extra walks.
fn splice_loops(
    mut loops: Vec<Vec<u32>>,
    points: &[Point2<f64>],
    canon: &[u32],
) -> Vec<Vec<u32>> {
    // Base loop: largest projected area, ties resolved geometrically
    let mut base = 0;
    for i in 1..loops.len() {
        let area_i = signed_area_indexed(&loops[i], points).abs();
        let area_b = signed_area_indexed(&loops[base], points).abs();
        if area_i > area_b
            || (area_i == area_b && lex_min(&loops[i], points) < lex_min(&loops[base], points))
        {
            base = i;
        }
    }

    let mut walk = loops.swap_remove(base);
    if signed_area_indexed(&walk, points) < 0.0 {
        walk.reverse();
    }
    let mut walk_canons: FxHashSet<u32> = walk.iter().map(|&v| canon[v as usize]).collect();

    while !loops.is_empty() {
        // Candidate attaching earliest on the walk
        let mut best: Option<(usize, (f64, f64), usize)> = None;
        for (li, lp) in loops.iter().enumerate() {
            let lp_canons: FxHashSet<u32> = lp.iter().map(|&v| canon[v as usize]).collect();
            let Some(pos) = walk
                .iter()
                .position(|&w| lp_canons.contains(&canon[w as usize]))
            else {
                continue;
            };
            let key = lex_min(lp, points);
            let better = match &best {
                None => true,
                Some((bpos, bkey, _)) => pos < *bpos || (pos == *bpos && key < *bkey),
            };
            if better {
                best = Some((pos, key, li));
            }
        }

        let Some((pos, _, li)) = best else { break };

        let lp = orient_for_walk(loops.swap_remove(li), &walk, &walk_canons, points, canon);
        let target = canon[walk[pos] as usize];
        let mut rotated = lp;
        if let Some(k) = rotated
            .iter()
            .position(|&v| canon[v as usize] == target)
        {
            rotated.rotate_left(k);
        }
        walk_canons.extend(rotated.iter().map(|&v| canon[v as usize]));

        // Insert the rotated loop after the attachment point; the loop's
        // first entry is repeated at the end to close it back onto the walk
        let mut insert = rotated[1..].to_vec();
        insert.push(rotated[0]);
        walk.splice(pos + 1..pos + 1, insert);
    }

    let mut walks = vec![walk];
    if !loops.is_empty() {
        warn!(
            count = loops.len(),
            "boundary loops share no vertex with their region walk; clipping separately"
        );
        for mut lp in loops {
            if signed_area_indexed(&lp, points) < 0.0 {
                lp.reverse();
            }
            walks.push(lp);
        }
    }
    walks
}

/// A loop strictly inside the walk is a hole and winds against it;
/// anything else is a sibling lobe meeting the walk at a pinch.
fn orient_for_walk(
    mut lp: Vec<u32>,
    walk: &[u32],
    walk_canons: &FxHashSet<u32>,
    points: &[Point2<f64>],
    canon: &[u32],
) -> Vec<u32> {
    let rep = lp
        .iter()
        .find(|&&v| !walk_canons.contains(&canon[v as usize]));
    let inside = match rep {
        Some(&v) => {
            let walk_pts: Vec<Point2<f64>> =
                walk.iter().map(|&w| points[w as usize]).collect();
            point_in_contour(&points[v as usize], &walk_pts)
        }
        None => false,
    };

    let area = signed_area_indexed(&lp, points);
    if (inside && area > 0.0) || (!inside && area < 0.0) {
        lp.reverse();
    }
    lp
}

// Rotate so the smallest index leads; winding is unchanged.
#[inline]
fn emit(triangles: &mut Vec<[u32; 3]>, a: u32, b: u32, c: u32) {
    let t = if a <= b && a <= c {
        [a, b, c]
    } else if b <= a && b <= c {
        [b, c, a]
    } else {
        [c, a, b]
    };
    triangles.push(t);
}

#[inline]
fn unlink(next: &mut [usize], prev: &mut [usize], alive: &mut [bool], slot: usize) {
    let (p, n) = (prev[slot], next[slot]);
    next[p] = n;
    prev[n] = p;
    alive[slot] = false;
}

/// Clip one closed walk into triangles.
fn clip_walk(
    walk: &[u32],
    points: &[Point2<f64>],
    canon: &[u32],
    area_epsilon: f64,
) -> Vec<[u32; 3]> {
    if walk.len() < 3 {
        return Vec::new();
    }

    let area = signed_area_indexed(walk, points);
    if area.abs() <= area_epsilon {
        return Vec::new();
    }

    let mut order: Vec<u32> = walk.to_vec();
    if area < 0.0 {
        order.reverse();
    }

    let n = order.len();
    let pt = |slot: usize| points[order[slot] as usize];
    let cn = |slot: usize| canon[order[slot] as usize];

    let mut next: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();
    let mut prev: Vec<usize> = (0..n).map(|i| (i + n - 1) % n).collect();
    let mut alive = vec![true; n];
    let mut alive_count = n;
    let mut triangles: Vec<[u32; 3]> = Vec::with_capacity(n.saturating_sub(2));

    loop {
        if alive_count < 3 {
            break;
        }

        if alive_count == 3 {
            if let Some(b) = (0..n).find(|&i| alive[i]) {
                let (a, c) = (prev[b], next[b]);
                let distinct = cn(a) != cn(b) && cn(b) != cn(c) && cn(a) != cn(c);
                if distinct && orient(&pt(a), &pt(b), &pt(c)) > area_epsilon {
                    emit(&mut triangles, order[a], order[b], order[c]);
                }
            }
            break;
        }

        // Score every clippable ear this round
        let mut best: Option<(f64, u32, usize)> = None;
        for b in 0..n {
            if !alive[b] {
                continue;
            }
            let (a, c) = (prev[b], next[b]);
            let (ca, cb, cc) = (cn(a), cn(b), cn(c));
            if ca == cb || cb == cc || ca == cc {
                continue; // bridge seam, handled by reductions
            }

            let (pa, pb, pc) = (pt(a), pt(b), pt(c));
            let cross = orient(&pa, &pb, &pc);
            if cross <= area_epsilon {
                continue; // reflex or collinear
            }

            let mut blocked = false;
            for w in 0..n {
                if !alive[w] || w == a || w == b || w == c {
                    continue;
                }
                let cw = cn(w);
                if cw == ca || cw == cb || cw == cc {
                    continue; // another occurrence of a corner vertex
                }
                if point_in_triangle(&pa, &pb, &pc, &pt(w), area_epsilon) {
                    blocked = true;
                    break;
                }
            }
            if blocked {
                continue;
            }

            let cos = interior_cos(&pa, &pb, &pc);
            let better = match best {
                None => true,
                Some((best_cos, best_orig, _)) => {
                    cos > best_cos + ANGLE_TIE
                        || ((cos - best_cos).abs() <= ANGLE_TIE && order[b] < best_orig)
                }
            };
            if better {
                best = Some((cos, order[b], b));
            }
        }

        if let Some((_, _, b)) = best {
            let (a, c) = (prev[b], next[b]);
            emit(&mut triangles, order[a], order[b], order[c]);
            unlink(&mut next, &mut prev, &mut alive, b);
            alive_count -= 1;
            continue;
        }

        // No ear left: splice out one zero-area configuration and retry
        let mut reduced = false;
        for b in 0..n {
            if !alive[b] {
                continue;
            }
            let (a, c) = (prev[b], next[b]);
            if cn(b) == cn(c) {
                // zero-length edge
                unlink(&mut next, &mut prev, &mut alive, c);
                alive_count -= 1;
                reduced = true;
                break;
            }
            if cn(a) == cn(c) {
                // zero-width spike
                unlink(&mut next, &mut prev, &mut alive, b);
                unlink(&mut next, &mut prev, &mut alive, c);
                alive_count -= 2;
                reduced = true;
                break;
            }
            if orient(&pt(a), &pt(b), &pt(c)).abs() <= area_epsilon {
                // collinear excursion
                unlink(&mut next, &mut prev, &mut alive, b);
                alive_count -= 1;
                reduced = true;
                break;
            }
        }
        if reduced {
            continue;
        }

        warn!(
            remaining = alive_count,
            "no clippable ear; emitting partial triangulation"
        );
        break;
    }

    triangles
}
