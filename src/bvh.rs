use rayon::prelude::*;

use crate::aabb::Aabb;
use crate::interval::Interval;
use crate::morton::{self, normalize_centroid};
use crate::sphere::{HitRecord, Sphere};
use crate::vec3::{Point3, Ray};

/// One internal node of the LBVH. `left`/`right` are `ChildRef`s: a value
/// `< primitives.len()` names a primitive (leaf), `>= primitives.len()`
/// names an internal node at `value - primitives.len()`. The root is always
/// internal node 0 — a property of the Karras construction, not asserted
/// explicitly anywhere in the build.
#[derive(Debug, Clone, Copy)]
pub struct InternalNode {
    pub bbox: Aabb,
    pub left: u32,
    pub right: u32,
}

/// A Linear BVH: primitives sorted by Morton code over their centroids, with
/// a binary radix tree of internal nodes built in parallel over that order.
/// Flat, index-addressed, no heap pointers — the whole thing is two `Vec`s.
pub struct Lbvh {
    pub primitives: Vec<Sphere>,
    pub morton: Vec<u32>,
    pub internal: Vec<InternalNode>,
    leaf_bboxes: Vec<Aabb>,
}

const MAX_STACK_DEPTH: usize = 64;

impl Lbvh {
    /// An LBVH over zero primitives; traversal degenerates to always-miss.
    pub fn empty() -> Self {
        Self {
            primitives: Vec::new(),
            morton: Vec::new(),
            internal: Vec::new(),
            leaf_bboxes: Vec::new(),
        }
    }

    /// Builds the tree from scratch. Each step is a data-parallel sweep over
    /// the `N` primitives; determinism requires the sort to be stable, so
    /// ties in Morton code are broken by original index.
    pub fn build(primitives: Vec<Sphere>) -> Self {
        let n = primitives.len();
        if n == 0 {
            return Self::empty();
        }

        let bboxes: Vec<Aabb> = primitives.par_iter().map(Sphere::bounding_box).collect();
        let centroids: Vec<Point3> = bboxes.par_iter().map(Aabb::centroid).collect();

        let (min, max) = centroids
            .par_iter()
            .cloned()
            .map(|c| (c, c))
            .reduce(
                || (Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
                    Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY)),
                |(lo, hi), (clo, chi)| {
                    (
                        Point3::new(lo.x.min(clo.x), lo.y.min(clo.y), lo.z.min(clo.z)),
                        Point3::new(hi.x.max(chi.x), hi.y.max(chi.y), hi.z.max(chi.z)),
                    )
                },
            );

        let morton_unsorted: Vec<u32> = centroids
            .par_iter()
            .map(|&c| morton::encode(normalize_centroid(c, min, max)))
            .collect();

        let mut order: Vec<u32> = (0..n as u32).collect();
        order.sort_by_key(|&i| (morton_unsorted[i as usize], i));

        let sorted_primitives: Vec<Sphere> = order.iter().map(|&i| primitives[i as usize]).collect();
        let sorted_bboxes: Vec<Aabb> = order.iter().map(|&i| bboxes[i as usize]).collect();
        let sorted_morton: Vec<u32> = order.iter().map(|&i| morton_unsorted[i as usize]).collect();

        let mut internal = if n == 1 {
            Vec::new()
        } else {
            build_internal_nodes(&sorted_morton)
        };

        if !internal.is_empty() {
            propagate_bbox(&mut internal, &sorted_bboxes, n, 0);
        }

        Self {
            primitives: sorted_primitives,
            morton: sorted_morton,
            internal,
            leaf_bboxes: sorted_bboxes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    fn bbox_of(&self, child: u32) -> Aabb {
        let n = self.primitives.len();
        if (child as usize) < n {
            self.leaf_bboxes[child as usize]
        } else {
            self.internal[child as usize - n].bbox
        }
    }

    fn entry_t(&self, child: u32, ray: &Ray, window: Interval) -> f32 {
        self.bbox_of(child)
            .hit(ray, window)
            .map(|w| w.min)
            .unwrap_or(f32::INFINITY)
    }

    /// Iterative traversal with an explicit fixed-size stack (depth 64 is
    /// comfortable headroom for any Morton-sorted tree this builder
    /// produces). Pushes the far child before the near one so the near
    /// child pops first and can tighten the window that prunes the far
    /// subtree.
    pub fn closest_hit(&self, ray: &Ray, t_window: Interval) -> Option<HitRecord> {
        let n = self.primitives.len();
        if n == 0 {
            return None;
        }
        if n == 1 {
            return self.primitives[0].hit(ray, t_window);
        }

        let mut stack = [0u32; MAX_STACK_DEPTH];
        let mut sp = 0usize;
        stack[sp] = n as u32; // root: internal node 0, encoded as n + 0
        sp += 1;

        let mut window = t_window;
        let mut closest = None;

        while sp > 0 {
            sp -= 1;
            let node_ref = stack[sp];

            if (node_ref as usize) < n {
                if let Some(hit) = self.primitives[node_ref as usize].hit(ray, window) {
                    window.max = hit.t;
                    closest = Some(hit);
                }
                continue;
            }

            let node = &self.internal[node_ref as usize - n];
            if node.bbox.hit(ray, window).is_none() {
                continue;
            }

            let left_t = self.entry_t(node.left, ray, window);
            let right_t = self.entry_t(node.right, ray, window);
            let (near, far) = if left_t <= right_t {
                (node.left, node.right)
            } else {
                (node.right, node.left)
            };

            debug_assert!(sp + 2 <= MAX_STACK_DEPTH, "LBVH traversal stack overflow");
            if sp + 2 <= MAX_STACK_DEPTH {
                stack[sp] = far;
                sp += 1;
                stack[sp] = near;
                sp += 1;
            }
        }

        closest
    }

    /// Linear scan over every primitive — used to validate `closest_hit`
    /// against brute force, never on the render hot path.
    pub fn closest_hit_brute_force(&self, ray: &Ray, t_window: Interval) -> Option<HitRecord> {
        let mut window = t_window;
        let mut closest = None;
        for prim in &self.primitives {
            if let Some(hit) = prim.hit(ray, window) {
                window.max = hit.t;
                closest = Some(hit);
            }
        }
        closest
    }
}

#[inline]
fn clz(x: u32) -> i64 {
    if x == 0 {
        32
    } else {
        x.leading_zeros() as i64
    }
}

/// Longest common Morton-code prefix of items `i` and `j`, or -1 if `j` is
/// out of range. Returning -1 (rather than panicking) is what lets the
/// direction/range search at the array boundary behave like an infinitely
/// dissimilar neighbor.
fn delta(morton: &[u32], i: i64, j: i64) -> i64 {
    let n = morton.len() as i64;
    if j < 0 || j >= n {
        return -1;
    }
    clz(morton[i as usize] ^ morton[j as usize])
}

/// Direction-walk + exponential/binary search for node `i`'s owned range,
/// following Karras 2012.
fn determine_range(morton: &[u32], i: usize) -> (usize, usize) {
    let ii = i as i64;
    let d = if delta(morton, ii, ii + 1) > delta(morton, ii, ii - 1) {
        1
    } else {
        -1
    };
    let delta_min = delta(morton, ii, ii - d);

    let mut l_max = 2i64;
    while delta(morton, ii, ii + l_max * d) > delta_min {
        l_max *= 2;
    }

    let mut l = 0i64;
    let mut t = l_max / 2;
    while t >= 1 {
        if delta(morton, ii, ii + (l + t) * d) > delta_min {
            l += t;
        }
        t /= 2;
    }

    let j = ii + l * d;
    (ii.min(j) as usize, ii.max(j) as usize)
}

#[inline]
fn clz_xor(morton: &[u32], a: usize, b: usize) -> i64 {
    clz(morton[a] ^ morton[b])
}

fn build_internal_nodes(morton: &[u32]) -> Vec<InternalNode> {
    let n = morton.len();
    (0..n - 1)
        .into_par_iter()
        .map(|i| {
            let (first, last) = determine_range(morton, i);
            let split = split_index(morton, first, last);

            let left = if first == split {
                split as u32
            } else {
                (n + split) as u32
            };
            let right = if last == split + 1 {
                (split + 1) as u32
            } else {
                (n + split + 1) as u32
            };

            InternalNode {
                bbox: Aabb::EMPTY,
                left,
                right,
            }
        })
        .collect()
}

/// Binary search for the split point within `[first, last)`: the largest
/// index whose common Morton prefix with `morton[first]` exceeds the
/// range's own prefix. A fully duplicated range (`morton[first] ==
/// morton[last]`) is bisected by index midpoint instead, since every
/// candidate split would otherwise share the same prefix.
fn split_index(morton: &[u32], first: usize, last: usize) -> usize {
    if morton[first] == morton[last] {
        return (first + last) >> 1;
    }
    let common_prefix = clz_xor(morton, first, last);

    let mut split = first;
    let mut step = last - first;
    loop {
        step = step.div_ceil(2);
        let candidate = split + step;
        if candidate < last && clz_xor(morton, first, candidate) > common_prefix {
            split = candidate;
        }
        if step <= 1 {
            break;
        }
    }
    split
}

fn propagate_bbox(internal: &mut [InternalNode], leaf_bboxes: &[Aabb], num_prims: usize, idx: usize) -> Aabb {
    let (left, right) = (internal[idx].left, internal[idx].right);
    let left_box = child_bbox(internal, leaf_bboxes, num_prims, left);
    let right_box = child_bbox(internal, leaf_bboxes, num_prims, right);
    let bbox = Aabb::union(&left_box, &right_box);
    internal[idx].bbox = bbox;
    bbox
}

fn child_bbox(internal: &mut [InternalNode], leaf_bboxes: &[Aabb], num_prims: usize, child: u32) -> Aabb {
    if (child as usize) < num_prims {
        leaf_bboxes[child as usize]
    } else {
        propagate_bbox(internal, leaf_bboxes, num_prims, child as usize - num_prims)
    }
}
