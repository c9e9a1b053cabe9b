//! Fixed-capacity scratch arena with nested frames.
//!
//! A [`ScratchSpace`] owns one byte buffer allocated up front. Callers reserve
//! a frame of a given size with [`ScratchSpace::push_frame`] and carve typed
//! arrays out of the most recent frame. Frames are released when their
//! [`ScratchFrame`] guard is dropped, so every exit path gives the memory back.
//! The buffer never grows.
//!
//! Every array access is checked against the array's length and against the
//! frame it was carved from. Indexing past the end, or using an array after its
//! frame was released, panics like out-of-bounds slice indexing instead of
//! touching memory owned by another array or frame.

use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicU64, Ordering};

use crate::errors::ScratchError;
use crate::montgomery::{limbs_from_le_bytes, limbs_to_le_bytes};
use crate::{Affine, BaseField, Projective, ScalarField};

/// Maximum number of simultaneously active frames.
pub const MAX_FRAMES: usize = 5;

/// Frame ids are unique across every scratch space in the process.
static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

/// A value that can live in scratch memory as a fixed number of bytes.
pub trait ScratchElement: Sized {
    const ENCODED_SIZE: usize;

    fn encode(&self, out: &mut [u8]);
    fn decode(bytes: &[u8]) -> Self;
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    id: u64,
    start: usize,
    len: usize,
    used: usize,
}

pub struct ScratchSpace {
    buf: Box<[u8]>,
    frames: Vec<Frame>,
}

impl ScratchSpace {
    pub fn new(capacity: usize) -> Self {
        ScratchSpace {
            buf: vec![0u8; capacity].into_boxed_slice(),
            frames: Vec::with_capacity(MAX_FRAMES),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of currently active frames.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    fn top(&self) -> usize {
        self.frames.last().map_or(0, |frame| frame.start + frame.len)
    }

    /// Largest frame that could be pushed right now.
    #[inline]
    pub fn max_frame_size(&self) -> usize {
        self.capacity() - self.top()
    }

    /// Reserves `size` bytes on top of the active frames.
    pub fn push_frame(&mut self, size: usize) -> Result<ScratchFrame<'_>, ScratchError> {
        if self.frames.len() >= MAX_FRAMES {
            return Err(ScratchError::TooManyFrames(MAX_FRAMES));
        }
        let available = self.max_frame_size();
        if size > available {
            return Err(ScratchError::Exhausted {
                requested: size,
                available,
            });
        }

        let start = self.top();
        self.frames.push(Frame {
            id: NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed),
            start,
            len: size,
            used: 0,
        });
        Ok(ScratchFrame { space: self })
    }

    fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Carves an array of `count` elements out of the innermost frame.
    pub fn alloc_array<T: ScratchElement>(
        &mut self,
        count: usize,
    ) -> Result<ScratchArray<T>, ScratchError> {
        let depth = self.frames.len().checked_sub(1).ok_or(ScratchError::NoFrame)?;
        let frame = &mut self.frames[depth];
        let available = frame.len - frame.used;
        let requested = count.saturating_mul(T::ENCODED_SIZE);
        if requested > available {
            return Err(ScratchError::Exhausted {
                requested,
                available,
            });
        }

        let offset = frame.start + frame.used;
        frame.used += requested;
        Ok(ScratchArray {
            frame_id: frame.id,
            depth,
            offset,
            len: count,
            _marker: PhantomData,
        })
    }
}

impl core::fmt::Debug for ScratchSpace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScratchSpace")
            .field("capacity", &self.capacity())
            .field("frames", &self.frames)
            .finish()
    }
}

/// Guard for an active frame. Dropping it releases the frame.
pub struct ScratchFrame<'a> {
    space: &'a mut ScratchSpace,
}

impl Deref for ScratchFrame<'_> {
    type Target = ScratchSpace;

    fn deref(&self) -> &ScratchSpace {
        self.space
    }
}

impl DerefMut for ScratchFrame<'_> {
    fn deref_mut(&mut self) -> &mut ScratchSpace {
        self.space
    }
}

impl Drop for ScratchFrame<'_> {
    fn drop(&mut self) {
        self.space.pop_frame();
    }
}

/// Handle to a typed array inside a scratch frame.
///
/// The handle is only valid while the frame it came from is active. Accesses
/// through a stale handle panic.
pub struct ScratchArray<T> {
    frame_id: u64,
    depth: usize,
    offset: usize,
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ScratchArray<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ScratchArray<T> {}

impl<T: ScratchElement> ScratchArray<T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte range of element `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds or the array's frame is no longer active
    /// in `space`.
    #[inline]
    fn range(&self, space: &ScratchSpace, index: usize) -> core::ops::Range<usize> {
        assert!(
            index < self.len,
            "scratch index {index} out of bounds for length {}",
            self.len
        );
        assert!(
            space.frames.get(self.depth).map(|frame| frame.id) == Some(self.frame_id),
            "scratch array used after its frame was released"
        );
        let start = self.offset + index * T::ENCODED_SIZE;
        start..start + T::ENCODED_SIZE
    }

    #[inline]
    pub fn get(&self, space: &ScratchSpace, index: usize) -> T {
        T::decode(&space.buf[self.range(space, index)])
    }

    #[inline]
    pub fn set(&self, space: &mut ScratchSpace, index: usize, value: &T) {
        let range = self.range(space, index);
        value.encode(&mut space.buf[range]);
    }
}

impl ScratchElement for i8 {
    const ENCODED_SIZE: usize = 1;

    fn encode(&self, out: &mut [u8]) {
        out[0] = *self as u8;
    }

    fn decode(bytes: &[u8]) -> Self {
        bytes[0] as i8
    }
}

impl ScratchElement for ScalarField {
    const ENCODED_SIZE: usize = 32;

    fn encode(&self, out: &mut [u8]) {
        limbs_to_le_bytes(&self.to_raw(), out);
    }

    fn decode(bytes: &[u8]) -> Self {
        ScalarField::from_raw(limbs_from_le_bytes(bytes))
    }
}

impl ScratchElement for BaseField {
    const ENCODED_SIZE: usize = 32;

    fn encode(&self, out: &mut [u8]) {
        limbs_to_le_bytes(&self.to_raw(), out);
    }

    fn decode(bytes: &[u8]) -> Self {
        BaseField::from_raw(limbs_from_le_bytes(bytes))
    }
}

impl ScratchElement for Affine {
    const ENCODED_SIZE: usize = 65;

    fn encode(&self, out: &mut [u8]) {
        self.x.encode(&mut out[..32]);
        self.y.encode(&mut out[32..64]);
        out[64] = self.is_infinity as u8;
    }

    fn decode(bytes: &[u8]) -> Self {
        Affine {
            x: BaseField::decode(&bytes[..32]),
            y: BaseField::decode(&bytes[32..64]),
            is_infinity: bytes[64] != 0,
        }
    }
}

impl ScratchElement for Projective {
    const ENCODED_SIZE: usize = 96;

    fn encode(&self, out: &mut [u8]) {
        self.x.encode(&mut out[..32]);
        self.y.encode(&mut out[32..64]);
        self.z.encode(&mut out[64..96]);
    }

    fn decode(bytes: &[u8]) -> Self {
        Projective::new(
            BaseField::decode(&bytes[..32]),
            BaseField::decode(&bytes[32..64]),
            BaseField::decode(&bytes[64..96]),
        )
    }
}
