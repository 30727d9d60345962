use hdf5_sys::h5d::{H5Dcreate2, H5Dget_create_plist, H5Dget_space, H5Dget_type, H5Dread, H5Dwrite};

use crate::hl::filters::{Availability, Filter};
use crate::hl::plist::dataset_create::Layout;
use crate::internal_prelude::*;
use crate::memory::{Buffer, BufferMut, MemoryAdapter, MemoryView};

/// A multidimensional array of elements stored in a file.
#[repr(transparent)]
#[derive(Clone)]
pub struct Dataset(Handle);

impl_class!(Dataset: "dataset", [H5I_DATASET] => Location {
    fn short_repr(&self) -> Option<String> {
        let extents = self.space().and_then(|s| s.extents()).ok()?;
        let desc = self.dtype().and_then(|t| t.to_descriptor()).ok()?;
        Some(format!("\"{}\": {} {}", self.name(), extents, desc))
    }
});

/// Transfer properties for reading elements of type `desc`; only variable-length data needs
/// the libc memory manager, everything else uses the defaults.
fn transfer_plist(desc: &TypeDescriptor) -> Result<Option<DatasetTransfer>> {
    if desc.is_variable_length() {
        DatasetTransfer::with_libc_vlen_manager().map(Some)
    } else {
        Ok(None)
    }
}

impl Dataset {
    pub fn space(&self) -> Result<Dataspace> {
        Dataspace::from_id(h5try!(H5Dget_space(self.id())))
    }

    pub fn dtype(&self) -> Result<Datatype> {
        Datatype::from_id(h5try!(H5Dget_type(self.id())))
    }

    pub fn shape(&self) -> Vec<Ix> {
        self.space().map(|s| s.shape()).unwrap_or_default()
    }

    pub fn ndim(&self) -> usize {
        self.space().map(|s| s.ndim()).unwrap_or(0)
    }

    /// Total number of elements.
    pub fn size(&self) -> usize {
        self.space().map(|s| s.size()).unwrap_or(0)
    }

    /// Returns a copy of the dataset creation property list.
    pub fn dcpl(&self) -> Result<DatasetCreate> {
        h5lock!(DatasetCreate::from_id(h5try!(H5Dget_create_plist(self.id()))))
    }

    pub fn filters(&self) -> Vec<Filter> {
        self.dcpl().map(|pl| pl.filters()).unwrap_or_default()
    }

    pub fn layout(&self) -> Layout {
        self.dcpl().map_or(Layout::default(), |pl| pl.layout())
    }

    pub fn chunk(&self) -> Option<Vec<Ix>> {
        self.dcpl().ok().and_then(|pl| pl.chunk())
    }

    /// Reads the whole dataset into a freshly created value.
    pub fn read<B: BufferMut>(&self) -> Result<B> {
        let mut value = B::create(&self.space()?.extents()?)?;
        self.read_into(&mut value)?;
        Ok(value)
    }

    /// Reads the whole dataset into an existing value with a matching number of elements.
    pub fn read_into<B: BufferMut>(&self, value: &mut B) -> Result<()> {
        let mut adapter = MemoryAdapter::new(value)?;
        let file_space = self.space()?;
        let mem_space = adapter.dataspace()?;
        ensure!(
            mem_space.size() == file_space.size(),
            "element count mismatch when reading: memory = {}, file = {}",
            mem_space.size(),
            file_space.size()
        );
        let mem_dtype = adapter.datatype()?;
        let xfer = transfer_plist(&B::element_type())?;
        h5try!(H5Dread(
            self.id(),
            mem_dtype.id(),
            mem_space.id(),
            file_space.id(),
            xfer.as_ref().map_or(H5P_DEFAULT, |xfer| xfer.id()),
            adapter.pointer()
        ));
        adapter.update()
    }

    /// Writes the whole dataset; the value must hold as many elements as the dataset.
    pub fn write<B: Buffer + ?Sized>(&self, value: &B) -> Result<()> {
        self.write_view(&MemoryView::new(value)?)
    }

    fn write_view<B: Buffer + ?Sized>(&self, view: &MemoryView<B>) -> Result<()> {
        let file_space = self.space()?;
        let mem_space = view.dataspace()?;
        ensure!(
            mem_space.size() == file_space.size(),
            "element count mismatch when writing: memory = {}, file = {}",
            mem_space.size(),
            file_space.size()
        );
        let mem_dtype = view.datatype()?;
        h5try!(H5Dwrite(
            self.id(),
            mem_dtype.id(),
            mem_space.id(),
            file_space.id(),
            H5P_DEFAULT,
            view.pointer()
        ));
        Ok(())
    }
}

/// Collects everything needed to create a dataset: element type, shape, chunking and
/// the filter pipeline.
#[derive(Clone, Debug)]
pub struct DatasetBuilder {
    parent: Group,
    descriptor: Option<TypeDescriptor>,
    datatype: Option<Datatype>,
    extents: Option<Extents>,
    chunk: Option<Vec<Ix>>,
    filters: Vec<(Filter, Availability)>,
}

impl DatasetBuilder {
    pub fn new(parent: &Group) -> Self {
        Self {
            parent: parent.clone(),
            descriptor: None,
            datatype: None,
            extents: None,
            chunk: None,
            filters: Vec::new(),
        }
    }

    /// Uses the element type of `T`.
    pub fn empty<T: H5Type>(self) -> Self {
        self.empty_as(&T::type_descriptor())
    }

    pub fn empty_as(mut self, desc: &TypeDescriptor) -> Self {
        self.descriptor = Some(desc.clone());
        self.datatype = None;
        self
    }

    /// Uses an existing datatype; a committed one is shared rather than copied.
    pub fn datatype(mut self, datatype: &Datatype) -> Self {
        self.datatype = Some(datatype.clone());
        self.descriptor = None;
        self
    }

    /// Dataset shape; scalar if never set.
    pub fn shape<S: Into<Extents>>(mut self, extents: S) -> Self {
        self.extents = Some(extents.into());
        self
    }

    pub fn chunk<C: Into<Extents>>(mut self, chunk: C) -> Self {
        self.chunk = Some(chunk.into().dims());
        self
    }

    /// Appends a filter to the pipeline, in order.
    pub fn filter(mut self, filter: Filter, availability: Availability) -> Self {
        self.filters.push((filter, availability));
        self
    }

    pub fn fletcher32(self) -> Self {
        self.filter(Filter::fletcher32(), Availability::Mandatory)
    }

    pub fn deflate(self, level: u8) -> Self {
        self.filter(Filter::deflate(level), Availability::Optional)
    }

    pub fn shuffle(self) -> Self {
        self.filter(Filter::shuffle(), Availability::Optional)
    }

    fn compute_chunk(&self, extents: &Extents) -> Result<Option<Vec<Ix>>> {
        let chunk = match (&self.chunk, extents) {
            (Some(chunk), _) => chunk.clone(),
            (None, _) if self.filters.is_empty() => return Ok(None),
            // zero-length dimensions still need a positive chunk
            (None, Extents::Simple(dims)) => dims.iter().map(|&d| d.max(1)).collect(),
            (None, _) => fail!("Filters require a chunked layout, got {} extents", extents),
        };
        let dims = match extents {
            Extents::Simple(dims) => dims,
            _ => fail!("Chunking requires simple extents, got {}", extents),
        };
        ensure!(
            chunk.len() == dims.len(),
            "Expected chunk ndim {}, got {}",
            dims.len(),
            chunk.len()
        );
        ensure!(
            chunk.iter().all(|&c| c > 0),
            "All chunk dimensions must be positive, got {:?}",
            chunk
        );
        // the library lifts the bound when the dataset holds no elements
        let empty = dims.iter().any(|&d| d == 0);
        ensure!(
            empty || chunk.iter().zip(dims).all(|(c, d)| c <= d),
            "Chunk dimensions ({:?}) exceed data shape ({:?})",
            chunk,
            dims
        );
        Ok(Some(chunk))
    }

    fn build_dcpl(&self, extents: &Extents) -> Result<DatasetCreate> {
        let dcpl = DatasetCreate::try_new()?;
        if let Some(chunk) = self.compute_chunk(extents)? {
            dcpl.set_chunk(&chunk)?;
        }
        for (filter, availability) in &self.filters {
            dcpl.add_filter(filter, *availability)?;
        }
        Ok(dcpl)
    }

    fn build_datatype(&self, fallback: Option<TypeDescriptor>) -> Result<Datatype> {
        match (&self.datatype, &self.descriptor, fallback) {
            (Some(datatype), _, _) => Ok(datatype.clone()),
            (None, Some(desc), _) => Datatype::from_descriptor(desc),
            (None, None, Some(desc)) => Datatype::from_descriptor(&desc),
            (None, None, None) => fail!("Dataset element type was never specified"),
        }
    }

    fn create_dataset(&self, name: &str, datatype: &Datatype, extents: &Extents) -> Result<Dataset> {
        h5lock!({
            let dcpl = self.build_dcpl(extents)?;
            let lcpl = LinkCreate::intermediate()?;
            let space = Dataspace::try_new(extents)?;
            let name = to_cstring(name)?;
            Dataset::from_id(h5try!(H5Dcreate2(
                self.parent.id(),
                name.as_ptr(),
                datatype.id(),
                space.id(),
                lcpl.id(),
                dcpl.id(),
                H5P_DEFAULT
            )))
        })
    }

    /// Creates the dataset at `name`, relative to the parent group; intermediate groups are
    /// created as needed.
    pub fn create(&self, name: &str) -> Result<Dataset> {
        let datatype = self.build_datatype(None)?;
        let extents = self.extents.clone().unwrap_or(Extents::Scalar);
        self.create_dataset(name, &datatype, &extents)
    }

    /// Creates the dataset with the element type and shape of `value`, then writes it.
    ///
    /// An explicit element type or shape set on the builder takes precedence.
    pub fn create_with<B: Buffer + ?Sized>(&self, name: &str, value: &B) -> Result<Dataset> {
        let view = MemoryView::new(value)?;
        let datatype = self.build_datatype(Some(B::element_type()))?;
        let extents = match &self.extents {
            Some(extents) => extents.clone(),
            None => view.extents()?,
        };
        let dataset = self.create_dataset(name, &datatype, &extents)?;
        dataset.write_view(&view)?;
        Ok(dataset)
    }
}
