/*!
Shape-cast oracle: "what geometry is near point P in direction D".

The physics collaborator implements [`SceneQuery`]; the sensing code only ever talks to
[`ShapeCastOracle`], which clears the caller's [`HitBuffer`] before each query and knows
how to filter out the character's own collider.

Results are bounded. A [`HitBuffer`] holds at most `N` hits inline; anything beyond that
is dropped. This is an accepted approximation: the sensing code only needs the handful of
closest surfaces, and a cast with zero hits is a valid "nothing there" answer.
*/

use crate::{
    ids::ColliderId,
    types::{Hit, Vec3},
};

/// Default number of hits kept per query.
pub const DEFAULT_HIT_CAPACITY: usize = 8;

/// Shapes that can be swept through the scene. Always axis-aligned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProbeShape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

/// Narrow contract the core needs from the physics engine's scene queries.
///
/// Implementations push every hit they find into `hits` (self included); they must not
/// clear the buffer. Directions are unit vectors. Zero hits is not an error.
pub trait SceneQuery {
    /// Sweep `shape` from `origin` along `direction` up to `max_distance`.
    fn cast_shape_all<const N: usize>(
        &self,
        origin: Vec3,
        shape: ProbeShape,
        direction: Vec3,
        max_distance: f32,
        hits: &mut HitBuffer<N>,
    );

    /// Cast a ray from `origin` along `direction` up to `max_distance`.
    fn cast_ray_all<const N: usize>(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        hits: &mut HitBuffer<N>,
    );
}

/// Fixed-capacity, inline storage for cast results.
#[derive(Clone, Debug)]
pub struct HitBuffer<const N: usize = DEFAULT_HIT_CAPACITY> {
    hits: [Hit; N],
    len: usize,
    dropped: usize,
}

impl<const N: usize> Default for HitBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> HitBuffer<N> {
    pub fn new() -> Self {
        Self {
            hits: [Hit::default(); N],
            len: 0,
            dropped: 0,
        }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of hits discarded since the last `clear` because the buffer was full.
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.dropped = 0;
    }

    /// Append a hit. Returns `false` (and drops the hit) when the buffer is full.
    pub fn push(&mut self, hit: Hit) -> bool {
        if self.len == N {
            self.dropped += 1;
            return false;
        }
        self.hits[self.len] = hit;
        self.len += 1;
        true
    }

    /// Insert keeping ascending distance order. When full, the farthest hit is dropped
    /// (which may be `hit` itself).
    pub fn insert_by_distance(&mut self, hit: Hit) -> bool {
        let at = self.as_slice().partition_point(|h| h.distance <= hit.distance);
        if at == N {
            self.dropped += 1;
            return false;
        }
        if self.len == N {
            self.dropped += 1;
        } else {
            self.len += 1;
        }
        self.hits.copy_within(at..self.len - 1, at + 1);
        self.hits[at] = hit;
        true
    }

    #[inline]
    pub fn as_slice(&self) -> &[Hit] {
        &self.hits[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Hit> {
        self.as_slice().iter()
    }
}

impl<'a, const N: usize> IntoIterator for &'a HitBuffer<N> {
    type Item = &'a Hit;
    type IntoIter = std::slice::Iter<'a, Hit>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Scene queries bound to one character.
///
/// `self_collider` is `None` when the body has not been bound yet; in that case no hit is
/// treated as self.
pub struct ShapeCastOracle<'a, Q: SceneQuery + ?Sized> {
    scene: &'a Q,
    self_collider: Option<ColliderId>,
}

impl<'a, Q: SceneQuery + ?Sized> ShapeCastOracle<'a, Q> {
    pub fn new(scene: &'a Q, self_collider: Option<ColliderId>) -> Self {
        Self {
            scene,
            self_collider,
        }
    }

    /// Sweep a probe shape. The buffer is cleared first; degenerate requests return no hits.
    pub fn cast_shape<'b, const N: usize>(
        &self,
        origin: Vec3,
        shape: ProbeShape,
        direction: Vec3,
        max_distance: f32,
        hits: &'b mut HitBuffer<N>,
    ) -> &'b [Hit] {
        hits.clear();
        if let Some(dir) = usable_direction(direction, max_distance) {
            self.scene
                .cast_shape_all(origin, shape, dir, max_distance, hits);
            log_dropped("shape", hits);
        }
        hits.as_slice()
    }

    /// Cast a ray. The buffer is cleared first; degenerate requests return no hits.
    pub fn cast_ray<'b, const N: usize>(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        hits: &'b mut HitBuffer<N>,
    ) -> &'b [Hit] {
        hits.clear();
        if let Some(dir) = usable_direction(direction, max_distance) {
            self.scene.cast_ray_all(origin, dir, max_distance, hits);
            log_dropped("ray", hits);
        }
        hits.as_slice()
    }

    #[inline]
    pub fn is_self(&self, hit: &Hit) -> bool {
        self.self_collider == Some(hit.collider)
    }

    /// First hit, in result order, that does not belong to the character.
    pub fn first_non_self_hit(&self, hits: &[Hit]) -> Option<Hit> {
        self.non_self_hits(hits).next().copied()
    }

    /// All hits, in result order, that do not belong to the character.
    pub fn non_self_hits<'h>(&self, hits: &'h [Hit]) -> impl Iterator<Item = &'h Hit> {
        hits.iter().filter(move |h| !self.is_self(h))
    }
}

/// Normalized direction, or `None` for zero/non-finite directions and distances.
fn usable_direction(direction: Vec3, max_distance: f32) -> Option<Vec3> {
    if !(max_distance > 0.0) || !max_distance.is_finite() {
        return None;
    }
    direction.try_normalize(1.0e-6)
}

fn log_dropped<const N: usize>(kind: &str, hits: &HitBuffer<N>) {
    if hits.dropped() > 0 {
        log::trace!(
            "{kind} cast dropped {} hit(s) beyond capacity {}",
            hits.dropped(),
            N
        );
    }
}
