//! Out-of-band resource handles: a value that doesn't travel inline in the
//! byte stream, but is pushed/fetched through the `Writer`/`Reader`'s own
//! side channel and referenced on the wire by an integer.
//!
//! Grounded on `examples/original_source/include/nop/types/handle.h`: the
//! C++ `Handle<HandleType, Policy>` wraps a raw handle plus a policy
//! deciding validity and close-on-drop; `UniqueHandle` additionally owns
//! and releases it. The empty-reference special case
//! ([`crate::core::EMPTY_HANDLE_REFERENCE`]) is decided at this layer, not
//! inside `Reader`/`Writer::get_handle`/`push_handle` themselves — see
//! DESIGN.md for why the split sits here.

use crate::core::io::{Reader, Writer};
use crate::core::{EncodingByte, Error, ErrorKind, HandleReference, Status, EMPTY_HANDLE_REFERENCE};
use crate::{read, size, write};

/// Decides whether a resolved handle value is valid, and how to release
/// one that is. A handle's wire form never stores the value inline, so
/// nothing here is `Codec` — only the reference is.
pub trait HandlePolicy {
    /// The resolved resource type this policy governs.
    type Type;

    /// Identifies this policy's resource kind on the wire, written ahead
    /// of the reference so a reader using a different policy can reject
    /// the handle instead of resolving it as the wrong resource type.
    /// Defaults to `0`, matching the original's `DefaultHandlePolicy`.
    fn handle_type() -> u64 {
        0
    }

    /// Whether `handle` is a usable resource (vs. an empty sentinel the
    /// underlying platform returns in place of failure).
    fn is_valid(handle: &Self::Type) -> bool;

    /// Releases `handle`. Called when a [`UniqueHandle`] owning it is
    /// dropped or explicitly released.
    fn release(handle: Self::Type);
}

/// A policy that treats every resolved handle as valid and never releases
/// it — the default when a handle's resource has no close operation
/// relevant to this format (e.g. an opaque integer cookie).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHandlePolicy<T>(core::marker::PhantomData<T>);

impl<T> HandlePolicy for NullHandlePolicy<T> {
    type Type = T;

    fn is_valid(_handle: &T) -> bool {
        true
    }

    fn release(_handle: T) {}
}

/// A borrowed reference to an out-of-band resource, written by reference
/// through the `Writer`'s handle side channel: `Handle` tag, then a signed
/// `SizeType` reference (`-1` for empty, matching
/// [`EMPTY_HANDLE_REFERENCE`]).
///
/// Not a [`crate::Codec`] impl: writing/reading a handle needs the
/// `Writer`/`Reader`'s `Handle` associated type to match `P::Type`
/// exactly, which the generic `Codec` trait (generic only in the stream,
/// not its handle type) cannot express. Structures with handle-typed
/// fields call [`Handle::write`]/[`Handle::read`] directly for those
/// fields rather than going through [`crate::write`]/[`crate::read`].
#[derive(Debug)]
pub struct Handle<P: HandlePolicy> {
    value: Option<P::Type>,
}

impl<P: HandlePolicy> Handle<P> {
    /// An empty handle.
    pub fn empty() -> Self {
        Self { value: None }
    }

    /// A handle wrapping an already-resolved value.
    pub fn new(value: P::Type) -> Self {
        Self { value: Some(value) }
    }

    /// Borrows the resolved value, if any.
    pub fn get(&self) -> Option<&P::Type> {
        self.value.as_ref()
    }

    /// Whether this handle is the empty sentinel.
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Writes the `Handle` tag and pushes the value (if any) to `w`'s
    /// handle side channel. `P::Type` must be `Clone` since the value
    /// stays owned by `self` while a copy travels into the writer's
    /// handle table — true of every handle type in practice (an opaque
    /// descriptor or resource cookie).
    pub fn write<W>(&self, w: &mut W) -> Status<()>
    where
        W: Writer<Handle = P::Type> + ?Sized,
        P::Type: Clone,
    {
        w.write_u8(EncodingByte::HANDLE.byte())?;
        write(&P::handle_type(), w)?;
        match &self.value {
            None => write(&EMPTY_HANDLE_REFERENCE, w),
            Some(v) => {
                let reference = w.push_handle(v.clone())?;
                write(&reference, w)
            }
        }
    }

    /// Expects a `Handle` tag, checks the wire's handle-type marker against
    /// `P::handle_type()`, then resolves the reference (if not empty)
    /// through `r`'s handle side channel.
    pub fn read<R>(r: &mut R) -> Status<Self>
    where
        R: Reader<Handle = P::Type> + ?Sized,
    {
        let byte = r.read_u8()?;
        let tag = EncodingByte::from_raw(byte);
        if tag != EncodingByte::HANDLE {
            return Err(Error::new(ErrorKind::UnexpectedEncodingType));
        }
        let handle_type: u64 = read(r)?;
        if handle_type != P::handle_type() {
            return Err(Error::new(ErrorKind::UnexpectedHandleType));
        }
        let reference: HandleReference = read(r)?;
        if reference == EMPTY_HANDLE_REFERENCE {
            return Ok(Self::empty());
        }
        if reference < 0 {
            return Err(Error::new(ErrorKind::InvalidHandleReference));
        }
        let value = r.get_handle(reference)?;
        if !P::is_valid(&value) {
            return Err(Error::new(ErrorKind::InvalidHandleValue));
        }
        Ok(Self::new(value))
    }

    /// Full wire size this handle would occupy: tag, handle-type marker,
    /// plus the reference integer (the handle value itself never travels
    /// inline).
    pub fn encoded_size_hint(reference: HandleReference) -> usize {
        1 + size(&P::handle_type()) + size(&reference)
    }
}

/// An owning handle: like [`Handle`], but releases its value via
/// `P::release` when dropped, mirroring the original implementation's
/// `UniqueHandle` (RAII ownership) alongside the borrowing `Handle`.
#[derive(Debug)]
pub struct UniqueHandle<P: HandlePolicy> {
    value: Option<P::Type>,
}

impl<P: HandlePolicy> UniqueHandle<P> {
    /// An empty handle.
    pub fn empty() -> Self {
        Self { value: None }
    }

    /// Takes ownership of an already-resolved value.
    pub fn new(value: P::Type) -> Self {
        Self { value: Some(value) }
    }

    /// Borrows the owned value, if any.
    pub fn get(&self) -> Option<&P::Type> {
        self.value.as_ref()
    }

    /// Releases the handle early, leaving it empty.
    pub fn release(&mut self) {
        if let Some(v) = self.value.take() {
            P::release(v);
        }
    }

    /// Relinquishes ownership without releasing, handing the caller the
    /// raw value.
    pub fn into_inner(mut self) -> Option<P::Type> {
        self.value.take()
    }
}

impl<P: HandlePolicy> Drop for UniqueHandle<P> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::{SliceReader, VecWriter};

    struct FdPolicy;
    impl HandlePolicy for FdPolicy {
        type Type = u32;

        fn is_valid(handle: &u32) -> bool {
            *handle != u32::MAX
        }

        fn release(_handle: u32) {}
    }

    #[test]
    fn empty_handle_writes_sentinel_reference() {
        let h: Handle<FdPolicy> = Handle::empty();
        let mut w: VecWriter<u32> = VecWriter::new();
        h.write(&mut w).unwrap();
        // Tag, handle-type marker (0, fix-int), sentinel reference (-1,
        // written as the widened I8 form `0xFF`).
        assert_eq!(w.as_slice(), &[EncodingByte::HANDLE.byte(), 0x00, 0xFF]);
        assert!(w.handles().is_empty());
    }

    #[test]
    fn present_handle_pushes_and_references_by_index() {
        let h: Handle<FdPolicy> = Handle::new(7);
        let mut w: VecWriter<u32> = VecWriter::new();
        h.write(&mut w).unwrap();
        assert_eq!(w.handles(), &[7]);

        let (bytes, handles) = w.into_parts();
        let mut r: SliceReader<'_, u32> = SliceReader::with_handles(&bytes, handles);
        let back: Handle<FdPolicy> = Handle::read(&mut r).unwrap();
        assert_eq!(back.get(), Some(&7));
    }

    #[test]
    fn mismatched_handle_type_is_rejected() {
        struct OtherPolicy;
        impl HandlePolicy for OtherPolicy {
            type Type = u32;
            fn handle_type() -> u64 {
                1
            }
            fn is_valid(handle: &u32) -> bool {
                *handle != u32::MAX
            }
            fn release(_handle: u32) {}
        }

        let h: Handle<OtherPolicy> = Handle::new(7);
        let mut w: VecWriter<u32> = VecWriter::new();
        h.write(&mut w).unwrap();

        let (bytes, handles) = w.into_parts();
        let mut r: SliceReader<'_, u32> = SliceReader::with_handles(&bytes, handles);
        let err = Handle::<FdPolicy>::read(&mut r).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedHandleType);
    }

    #[test]
    fn unique_handle_releases_on_drop() {
        use core::cell::Cell;
        thread_local! {
            static RELEASED: Cell<bool> = Cell::new(false);
        }
        struct TrackingPolicy;
        impl HandlePolicy for TrackingPolicy {
            type Type = u32;
            fn is_valid(_handle: &u32) -> bool {
                true
            }
            fn release(_handle: u32) {
                RELEASED.with(|r| r.set(true));
            }
        }
        {
            let _h: UniqueHandle<TrackingPolicy> = UniqueHandle::new(1);
        }
        RELEASED.with(|r| assert!(r.get()));
    }
}
