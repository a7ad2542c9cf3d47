// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary-graph partitioning
//!
//! A stage piece is one vertex stream, but its implicit edges can
//! describe several independent shapes: closed sub-loops are spliced
//! into the stream back to back, and loops that share a vertex value
//! belong together (that is how holes stay attached to the boundary
//! they puncture). This module recovers that structure: canonical ids
//! by quantized coordinate, loop splitting, and connected-component
//! grouping of loops into regions.

use nalgebra::Point3;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// One connected boundary component: every loop that shares at least
/// one canonical vertex with the others, in input order.
#[derive(Debug, Clone)]
pub(crate) struct Region {
    /// Closed loops of original point indices, input order preserved.
    pub loops: Vec<Vec<u32>>,
}

#[inline]
fn quantize(p: &Point3<f64>, inv_epsilon: f64) -> (i64, i64, i64) {
    (
        (p.x * inv_epsilon).round() as i64,
        (p.y * inv_epsilon).round() as i64,
        (p.z * inv_epsilon).round() as i64,
    )
}

/// Assign every point a canonical id; points landing in the same
/// quantization cell share one id. Equality by value, not by index —
/// the second occurrence of a coordinate is the same topological vertex.
pub(crate) fn canonical_ids(points: &[Point3<f64>], merge_epsilon: f64) -> Vec<u32> {
    let inv = 1.0 / merge_epsilon;
    let mut cells: FxHashMap<(i64, i64, i64), u32> = FxHashMap::default();
    let mut ids = Vec::with_capacity(points.len());

    for p in points {
        let next = cells.len() as u32;
        let id = *cells.entry(quantize(p, inv)).or_insert(next);
        ids.push(id);
    }

    ids
}

/// Split the vertex stream into closed loops.
///
/// A chain closes when a vertex repeats the chain's starting value; the
/// closing occurrence is consumed and the next vertex starts a fresh
/// chain. The final chain closes implicitly through the wraparound
/// edge. Immediately repeated values collapse into one occurrence.
/// Repeats of a non-start vertex stay in the chain — those are bridge
/// duplicates inside a single loop, resolved later during clipping.
pub(crate) fn split_loops(canon: &[u32]) -> Vec<Vec<u32>> {
    let mut loops: Vec<Vec<u32>> = Vec::new();
    let mut chain: Vec<u32> = Vec::new();
    let mut chain_start = 0u32;

    for (i, &c) in canon.iter().enumerate() {
        match chain.last().copied() {
            None => {
                chain_start = c;
                chain.push(i as u32);
            }
            // zero-length edge
            Some(last) if c == canon[last as usize] => {}
            Some(_) if c == chain_start => loops.push(std::mem::take(&mut chain)),
            Some(_) => chain.push(i as u32),
        }
    }

    if !chain.is_empty() {
        loops.push(chain);
    }

    loops
}

/// Group loops into connected components over shared canonical
/// vertices. Components come back in input order, as do the loops
/// inside each of them.
pub(crate) fn group_regions(mut loops: Vec<Vec<u32>>, canon: &[u32]) -> Vec<Region> {
    let mut by_canon: FxHashMap<u32, SmallVec<[u32; 2]>> = FxHashMap::default();
    for (li, lp) in loops.iter().enumerate() {
        for &v in lp {
            let entry = by_canon.entry(canon[v as usize]).or_default();
            if entry.last() != Some(&(li as u32)) {
                entry.push(li as u32);
            }
        }
    }

    let mut visited = vec![false; loops.len()];
    let mut regions = Vec::new();

    for start in 0..loops.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;

        let mut stack = vec![start];
        let mut members = Vec::new();
        while let Some(li) = stack.pop() {
            members.push(li);
            for &v in &loops[li] {
                if let Some(peers) = by_canon.get(&canon[v as usize]) {
                    for &peer in peers {
                        if !visited[peer as usize] {
                            visited[peer as usize] = true;
                            stack.push(peer as usize);
                        }
                    }
                }
            }
        }

        members.sort_unstable();
        regions.push(Region {
            loops: members
                .into_iter()
                .map(|li| std::mem::take(&mut loops[li]))
                .collect(),
        });
    }

    regions
}
