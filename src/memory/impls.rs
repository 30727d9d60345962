use std::ffi::{CStr, CString};
use std::mem;
use std::ptr;

use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn, OwnedRepr};

use crate::internal_prelude::*;

use super::{Buffer, BufferMut};

fn zeroed_vec<T: H5Type>(len: usize) -> Vec<T> {
    // any bit pattern is a valid H5Type value
    (0..len).map(|_| unsafe { mem::zeroed() }).collect()
}

unsafe impl<T: H5Type> Buffer for T {
    type Staged = ();

    fn element_type() -> TypeDescriptor {
        T::type_descriptor()
    }

    fn extents(&self) -> Result<Extents> {
        Ok(Extents::Scalar)
    }

    fn stage(&self) -> Result<()> {
        Ok(())
    }

    fn as_ptr(&self, _: &()) -> *const c_void {
        (self as *const T).cast()
    }
}

unsafe impl<T: H5Type> BufferMut for T {
    type Slots = ();

    fn create(extents: &Extents) -> Result<Self> {
        ensure!(extents.size() == 1, "expected a single element, got extents {}", extents);
        Ok(unsafe { mem::zeroed() })
    }

    fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    fn as_mut_ptr(&mut self, _: &mut ()) -> *mut c_void {
        (self as *mut T).cast()
    }

    fn update(&mut self, _: ()) -> Result<()> {
        Ok(())
    }
}

unsafe impl<T: H5Type> Buffer for [T] {
    type Staged = ();

    fn element_type() -> TypeDescriptor {
        T::type_descriptor()
    }

    fn extents(&self) -> Result<Extents> {
        Ok(Extents::Simple(vec![self.len()]))
    }

    fn stage(&self) -> Result<()> {
        Ok(())
    }

    fn as_ptr(&self, _: &()) -> *const c_void {
        <[T]>::as_ptr(self).cast()
    }
}

unsafe impl<T: H5Type> Buffer for Vec<T> {
    type Staged = ();

    fn element_type() -> TypeDescriptor {
        T::type_descriptor()
    }

    fn extents(&self) -> Result<Extents> {
        self.as_slice().extents()
    }

    fn stage(&self) -> Result<()> {
        Ok(())
    }

    fn as_ptr(&self, _: &()) -> *const c_void {
        self.as_slice().as_ptr().cast()
    }
}

/// Any extents can be read into a vector, in memory order.
unsafe impl<T: H5Type> BufferMut for Vec<T> {
    type Slots = ();

    fn create(extents: &Extents) -> Result<Self> {
        Ok(zeroed_vec(extents.size()))
    }

    fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    fn as_mut_ptr(&mut self, _: &mut ()) -> *mut c_void {
        self.as_mut_slice().as_mut_ptr().cast()
    }

    fn update(&mut self, _: ()) -> Result<()> {
        Ok(())
    }
}

/// Arrays in standard layout are handed over directly; others go through a copy in
/// logical order.
unsafe impl<A, S, D> Buffer for ArrayBase<S, D>
where
    A: H5Type + Clone,
    S: Data<Elem = A>,
    D: Dimension,
{
    type Staged = Option<Vec<A>>;

    fn element_type() -> TypeDescriptor {
        A::type_descriptor()
    }

    fn extents(&self) -> Result<Extents> {
        Ok(Extents::simple(self.shape()))
    }

    fn stage(&self) -> Result<Self::Staged> {
        Ok(if self.is_standard_layout() { None } else { Some(self.iter().cloned().collect()) })
    }

    fn as_ptr(&self, staged: &Self::Staged) -> *const c_void {
        match staged {
            Some(elements) => elements.as_ptr().cast(),
            None => ArrayBase::as_ptr(self).cast(),
        }
    }
}

unsafe impl<A, D> BufferMut for ArrayBase<OwnedRepr<A>, D>
where
    A: H5Type + Clone,
    D: Dimension,
{
    type Slots = Option<Vec<A>>;

    fn create(extents: &Extents) -> Result<Self> {
        let shape = extents.dims();
        let arr = ArrayD::from_shape_vec(IxDyn(&shape), zeroed_vec(extents.size()))?;
        Ok(arr.into_dimensionality()?)
    }

    fn prepare(&mut self) -> Result<Self::Slots> {
        Ok(if self.is_standard_layout() { None } else { Some(zeroed_vec(self.len())) })
    }

    fn as_mut_ptr(&mut self, slots: &mut Self::Slots) -> *mut c_void {
        match slots {
            Some(elements) => elements.as_mut_ptr().cast(),
            None => ArrayBase::as_mut_ptr(self).cast(),
        }
    }

    fn update(&mut self, slots: Self::Slots) -> Result<()> {
        if let Some(elements) = slots {
            for (dst, src) in self.iter_mut().zip(elements) {
                *dst = src;
            }
        }
        Ok(())
    }
}

/// Rows must all have the same length.
fn nested_shape<T>(rows: &[Vec<T>]) -> Result<(usize, usize)> {
    let ncols = rows.first().map_or(0, Vec::len);
    for (i, row) in rows.iter().enumerate() {
        ensure!(
            row.len() == ncols,
            "jagged rows: row {} has {} elements, expected {}",
            i,
            row.len(),
            ncols
        );
    }
    Ok((rows.len(), ncols))
}

unsafe impl<T: H5Type + Clone> Buffer for Vec<Vec<T>> {
    type Staged = Vec<T>;

    fn element_type() -> TypeDescriptor {
        T::type_descriptor()
    }

    fn extents(&self) -> Result<Extents> {
        let (nrows, ncols) = nested_shape(self)?;
        Ok(Extents::Simple(vec![nrows, ncols]))
    }

    fn stage(&self) -> Result<Vec<T>> {
        nested_shape(self)?;
        Ok(self.iter().flat_map(|row| row.iter().cloned()).collect())
    }

    fn as_ptr(&self, staged: &Vec<T>) -> *const c_void {
        staged.as_ptr().cast()
    }
}

unsafe impl<T: H5Type + Clone> BufferMut for Vec<Vec<T>> {
    type Slots = Vec<T>;

    fn create(extents: &Extents) -> Result<Self> {
        ensure!(extents.ndim() == 2, "expected 2-D extents for nested rows, got {}", extents);
        let dims = extents.dims();
        Ok((0..dims[0]).map(|_| zeroed_vec(dims[1])).collect())
    }

    fn prepare(&mut self) -> Result<Vec<T>> {
        let (nrows, ncols) = nested_shape(self)?;
        Ok(zeroed_vec(nrows * ncols))
    }

    fn as_mut_ptr(&mut self, slots: &mut Vec<T>) -> *mut c_void {
        slots.as_mut_ptr().cast()
    }

    fn update(&mut self, slots: Vec<T>) -> Result<()> {
        let (_, ncols) = nested_shape(self)?;
        if ncols > 0 {
            for (row, chunk) in self.iter_mut().zip(slots.chunks(ncols)) {
                row.clone_from_slice(chunk);
            }
        }
        Ok(())
    }
}

/// Variable-length strings staged for a write: owned C strings plus the pointer slots
/// the library reads.
#[derive(Debug)]
pub struct StringStage {
    _owned: Vec<CString>,
    slots: Vec<*const c_char>,
}

impl StringStage {
    fn new<'a, I: IntoIterator<Item = &'a String>>(strings: I) -> Result<Self> {
        let owned =
            strings.into_iter().map(|s| to_cstring(s.as_str())).collect::<Result<Vec<_>>>()?;
        let slots = owned.iter().map(|s| s.as_ptr()).collect();
        Ok(Self { _owned: owned, slots })
    }

    fn as_ptr(&self) -> *const c_void {
        self.slots.as_ptr().cast()
    }
}

/// Pointer slots filled by the library during a variable-length string read.
///
/// The strings are allocated with `libc::malloc` (see
/// [`DatasetTransfer::with_libc_vlen_manager`]); whatever has not been taken by `update`
/// is released on drop.
#[derive(Debug)]
pub struct StringSlots(Vec<*mut c_char>);

impl StringSlots {
    fn new(len: usize) -> Self {
        Self(vec![ptr::null_mut(); len])
    }

    fn as_mut_ptr(&mut self) -> *mut c_void {
        self.0.as_mut_ptr().cast()
    }

    fn take(&mut self, index: usize) -> String {
        let slot = mem::replace(&mut self.0[index], ptr::null_mut());
        if slot.is_null() {
            String::new()
        } else {
            let string = unsafe { CStr::from_ptr(slot) }.to_string_lossy().into_owned();
            unsafe { libc::free(slot.cast()) };
            string
        }
    }
}

impl Drop for StringSlots {
    fn drop(&mut self) {
        for slot in self.0.iter().filter(|slot| !slot.is_null()) {
            unsafe { libc::free(slot.cast()) };
        }
    }
}

unsafe impl Buffer for String {
    type Staged = StringStage;

    fn element_type() -> TypeDescriptor {
        TypeDescriptor::VarLenUnicode
    }

    fn extents(&self) -> Result<Extents> {
        Ok(Extents::Scalar)
    }

    fn stage(&self) -> Result<StringStage> {
        StringStage::new([self])
    }

    fn as_ptr(&self, staged: &StringStage) -> *const c_void {
        staged.as_ptr()
    }
}

unsafe impl BufferMut for String {
    type Slots = StringSlots;

    fn create(extents: &Extents) -> Result<Self> {
        ensure!(extents.size() == 1, "expected a single element, got extents {}", extents);
        Ok(Self::new())
    }

    fn prepare(&mut self) -> Result<StringSlots> {
        Ok(StringSlots::new(1))
    }

    fn as_mut_ptr(&mut self, slots: &mut StringSlots) -> *mut c_void {
        slots.as_mut_ptr()
    }

    fn update(&mut self, mut slots: StringSlots) -> Result<()> {
        *self = slots.take(0);
        Ok(())
    }
}

unsafe impl Buffer for Vec<String> {
    type Staged = StringStage;

    fn element_type() -> TypeDescriptor {
        TypeDescriptor::VarLenUnicode
    }

    fn extents(&self) -> Result<Extents> {
        Ok(Extents::Simple(vec![self.len()]))
    }

    fn stage(&self) -> Result<StringStage> {
        StringStage::new(self)
    }

    fn as_ptr(&self, staged: &StringStage) -> *const c_void {
        staged.as_ptr()
    }
}

unsafe impl BufferMut for Vec<String> {
    type Slots = StringSlots;

    fn create(extents: &Extents) -> Result<Self> {
        Ok(vec![String::new(); extents.size()])
    }

    fn prepare(&mut self) -> Result<StringSlots> {
        Ok(StringSlots::new(self.len()))
    }

    fn as_mut_ptr(&mut self, slots: &mut StringSlots) -> *mut c_void {
        slots.as_mut_ptr()
    }

    fn update(&mut self, mut slots: StringSlots) -> Result<()> {
        for (i, string) in self.iter_mut().enumerate() {
            *string = slots.take(i);
        }
        Ok(())
    }
}
