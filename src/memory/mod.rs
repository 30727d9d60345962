//! Typed in-memory values as raw transfer buffers.
//!
//! A value takes part in a transfer through three steps: its element datatype and its
//! extents are derived, a raw pointer is handed to the library, and after a read the
//! staged data (if any) is reconciled back into the value. [`Buffer`] covers the write
//! direction, [`BufferMut`] adds the read direction.

use std::fmt::{self, Debug};
use std::ptr;

use crate::internal_prelude::*;

mod impls;

pub use self::impls::{StringSlots, StringStage};

/// A value the library can read bytes out of.
///
/// # Safety
///
/// `as_ptr` must point to `extents().size()` consecutive elements laid out as
/// `element_type()` describes, valid for as long as `staged` and `self` are alive.
pub unsafe trait Buffer {
    /// Intermediate storage used when the value is not a direct view of its wire layout.
    type Staged;

    /// Layout of one element; never depends on an instance.
    fn element_type() -> TypeDescriptor;

    /// Shape of this particular value.
    fn extents(&self) -> Result<Extents>;

    fn stage(&self) -> Result<Self::Staged>;

    fn as_ptr(&self, staged: &Self::Staged) -> *const c_void;
}

/// A value the library can write bytes into.
///
/// # Safety
///
/// `as_mut_ptr` must point to writable storage for `extents().size()` elements laid out as
/// `element_type()` describes; `update` must leave `self` holding exactly what was read.
pub unsafe trait BufferMut: Buffer + Sized {
    /// Storage the library fills during a read.
    type Slots;

    /// A value sized to receive `extents` worth of elements.
    fn create(extents: &Extents) -> Result<Self>;

    fn prepare(&mut self) -> Result<Self::Slots>;

    fn as_mut_ptr(&mut self, slots: &mut Self::Slots) -> *mut c_void;

    /// Moves staged data into `self`; a no-op for direct views.
    fn update(&mut self, slots: Self::Slots) -> Result<()>;
}

/// Mutable bridge over one value for the duration of a read.
///
/// The adapter borrows the value exclusively and is not `Clone`, so at most one writer
/// exists while the library owns the pointer.
pub struct MemoryAdapter<'a, B: BufferMut> {
    value: &'a mut B,
    slots: Option<B::Slots>,
}

impl<'a, B: BufferMut> MemoryAdapter<'a, B> {
    pub fn new(value: &'a mut B) -> Result<Self> {
        let slots = value.prepare()?;
        Ok(Self { value, slots: Some(slots) })
    }

    pub fn datatype(&self) -> Result<Datatype> {
        Datatype::from_descriptor(&B::element_type())
    }

    pub fn extents(&self) -> Result<Extents> {
        self.value.extents()
    }

    pub fn dataspace(&self) -> Result<Dataspace> {
        Dataspace::try_new(self.extents()?)
    }

    /// Raw storage the library reads from or writes into; null once updated.
    pub fn pointer(&mut self) -> *mut c_void {
        match self.slots.as_mut() {
            Some(slots) => self.value.as_mut_ptr(slots),
            None => ptr::null_mut(),
        }
    }

    /// Reconciles staged data into the value after a read. Later calls do nothing.
    pub fn update(&mut self) -> Result<()> {
        match self.slots.take() {
            Some(slots) => self.value.update(slots),
            None => Ok(()),
        }
    }
}

impl<B: BufferMut> Debug for MemoryAdapter<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MemoryAdapter")
            .field("datatype", &B::element_type())
            .field("extents", &self.extents().ok())
            .field("pending", &self.slots.is_some())
            .finish()
    }
}

/// Shorthand for [`MemoryAdapter::new`].
pub fn make_adapter<B: BufferMut>(value: &mut B) -> Result<MemoryAdapter<'_, B>> {
    MemoryAdapter::new(value)
}

/// Read-only bridge over one value for the duration of a write.
pub struct MemoryView<'a, B: Buffer + ?Sized> {
    value: &'a B,
    staged: B::Staged,
}

impl<'a, B: Buffer + ?Sized> MemoryView<'a, B> {
    pub fn new(value: &'a B) -> Result<Self> {
        let staged = value.stage()?;
        Ok(Self { value, staged })
    }

    pub fn datatype(&self) -> Result<Datatype> {
        Datatype::from_descriptor(&B::element_type())
    }

    pub fn extents(&self) -> Result<Extents> {
        self.value.extents()
    }

    pub fn dataspace(&self) -> Result<Dataspace> {
        Dataspace::try_new(self.extents()?)
    }

    pub fn pointer(&self) -> *const c_void {
        self.value.as_ptr(&self.staged)
    }
}

impl<B: Buffer + ?Sized> Debug for MemoryView<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MemoryView")
            .field("datatype", &B::element_type())
            .field("extents", &self.extents().ok())
            .finish()
    }
}
