/// Engine-agnostic identifier of a collider seen by scene queries.
///
/// # Why this exists
/// The sensing code must recognise the character's own collider in cast results without
/// depending on the physics engine's handle types. Rapier handles are an `(index, generation)`
/// pair, which is packed into a single `u64`.
///
/// # Bit layout
/// This `u64` is a packed value with the following layout (least-significant bit = bit 0):
///
/// - bits 0..=31  : collider index (u32)
/// - bits 32..=63 : collider generation (u32)
///
/// # Invariants
/// - Two different `(index, generation)` pairs never produce the same `ColliderId`.
pub type ColliderId = u64;

/// Packs a collider `index` and `generation` into a [`ColliderId`].
///
/// # Examples
/// ```text
/// let id = pack_collider_id(7, 2);
/// assert_eq!(unpack_collider_id(id), (7, 2));
/// ```
#[inline]
pub fn pack_collider_id(index: u32, generation: u32) -> ColliderId {
    (index as u64) | ((generation as u64) << u32::BITS)
}

/// Extracts `(index, generation)` from a [`ColliderId`].
#[inline]
pub fn unpack_collider_id(id: ColliderId) -> (u32, u32) {
    const INDEX_MASK: u64 = u32::MAX as u64;
    ((id & INDEX_MASK) as u32, (id >> u32::BITS) as u32)
}
