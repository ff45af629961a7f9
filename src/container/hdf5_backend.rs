//! The concrete HDF5 backend, wrapping the `hdf5` crate.

use std::path::{Path, PathBuf};

use hdf5::types::VarLenUnicode;

use super::{AttrValue, ContainerError, NodeHandle, NodeKind, RawArray};
use crate::value::{ArrayData, ArrayDtype};

#[derive(Debug)]
pub struct Hdf5Container {
    file: hdf5::File,
    path: PathBuf,
}

impl Hdf5Container {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ContainerError> {
        let path = path.as_ref().to_path_buf();
        let file = hdf5::File::create(&path).map_err(|source| ContainerError::Create {
            path: path.clone(),
            source,
        })?;
        Ok(Self { file, path })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, ContainerError> {
        let path = path.as_ref().to_path_buf();
        let file = hdf5::File::open(&path).map_err(|source| ContainerError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> Result<NodeHandle, ContainerError> {
        Ok(NodeHandle::Group(self.file.group("/").map_err(|source| {
            ContainerError::Hdf5 {
                path: "/".to_string(),
                source,
            }
        })?))
    }

    fn as_group<'a>(&self, handle: &'a NodeHandle) -> Result<&'a hdf5::Group, ContainerError> {
        match handle {
            NodeHandle::Group(g) => Ok(g),
            NodeHandle::Dataset(d) => Err(ContainerError::WrongKind {
                path: d.name(),
                expected: "group",
                actual: "dataset",
            }),
        }
    }

    pub fn create_group(
        &self,
        parent: &NodeHandle,
        name: &str,
    ) -> Result<NodeHandle, ContainerError> {
        let group = self.as_group(parent)?;
        let child = group
            .create_group(name)
            .map_err(|source| ContainerError::Hdf5 {
                path: format!("{}/{}", group.name(), name),
                source,
            })?;
        Ok(NodeHandle::Group(child))
    }

    pub fn create_soft_link(
        &self,
        parent: &NodeHandle,
        name: &str,
        target_path: &str,
    ) -> Result<(), ContainerError> {
        let group = self.as_group(parent)?;
        group
            .link_soft(target_path, name)
            .map_err(|source| ContainerError::Hdf5 {
                path: format!("{}/{}", group.name(), name),
                source,
            })
    }

    /// Returns the soft link's target path, or `None` if `name` is not a
    /// soft link (an ordinary child, or absent).
    pub fn resolve_soft_link(
        &self,
        parent: &NodeHandle,
        name: &str,
    ) -> Result<Option<String>, ContainerError> {
        let group = self.as_group(parent)?;
        match group.link_type(name) {
            Ok(hdf5::LinkType::Soft) => {
                let target = group
                    .link_value(name)
                    .map_err(|source| ContainerError::Hdf5 {
                        path: format!("{}/{}", group.name(), name),
                        source,
                    })?;
                Ok(Some(target))
            }
            _ => Ok(None),
        }
    }

    pub fn path_exists(&self, path: &str) -> Result<bool, ContainerError> {
        Ok(self.file.link_exists(path))
    }

    pub fn list_children(&self, group: &NodeHandle) -> Result<Vec<String>, ContainerError> {
        let group = self.as_group(group)?;
        group.member_names().map_err(|source| ContainerError::Hdf5 {
            path: group.name(),
            source,
        })
    }

    pub fn open_child(
        &self,
        parent: &NodeHandle,
        name: &str,
    ) -> Result<NodeHandle, ContainerError> {
        let group = self.as_group(parent)?;
        if let Ok(child_group) = group.group(name) {
            return Ok(NodeHandle::Group(child_group));
        }
        let dataset = group
            .dataset(name)
            .map_err(|source| ContainerError::Hdf5 {
                path: format!("{}/{}", group.name(), name),
                source,
            })?;
        Ok(NodeHandle::Dataset(dataset))
    }

    pub fn node_kind(&self, handle: &NodeHandle) -> NodeKind {
        handle.kind()
    }

    pub fn set_attr(
        &self,
        handle: &NodeHandle,
        key: &str,
        value: &AttrValue,
    ) -> Result<(), ContainerError> {
        macro_rules! write_attr {
            ($location:expr, $ty:ty, $val:expr) => {{
                let attr = $location
                    .new_attr::<$ty>()
                    .create(key)
                    .map_err(|source| ContainerError::Hdf5 {
                        path: $location.name(),
                        source,
                    })?;
                attr.write_scalar(&$val)
                    .map_err(|source| ContainerError::Hdf5 {
                        path: $location.name(),
                        source,
                    })
            }};
        }

        match (handle, value) {
            (NodeHandle::Group(g), AttrValue::Str(s)) => {
                let unicode: VarLenUnicode = s.parse().map_err(|_| ContainerError::AttributeType {
                    path: g.name(),
                    name: key.to_string(),
                })?;
                write_attr!(g, VarLenUnicode, unicode)
            }
            (NodeHandle::Group(g), AttrValue::Int(i)) => write_attr!(g, i64, *i),
            (NodeHandle::Group(g), AttrValue::Float(f)) => write_attr!(g, f64, *f),
            (NodeHandle::Group(g), AttrValue::Bool(b)) => write_attr!(g, bool, *b),
            (NodeHandle::Group(g), AttrValue::FloatPair(re, im)) => {
                let attr = g
                    .new_attr::<f64>()
                    .shape(2)
                    .create(key)
                    .map_err(|source| ContainerError::Hdf5 {
                        path: g.name(),
                        source,
                    })?;
                attr.write_raw(&[*re, *im]).map_err(|source| ContainerError::Hdf5 {
                    path: g.name(),
                    source,
                })
            }
            (NodeHandle::Dataset(d), AttrValue::Str(s)) => {
                let unicode: VarLenUnicode = s.parse().map_err(|_| ContainerError::AttributeType {
                    path: d.name(),
                    name: key.to_string(),
                })?;
                write_attr!(d, VarLenUnicode, unicode)
            }
            (NodeHandle::Dataset(d), AttrValue::Int(i)) => write_attr!(d, i64, *i),
            (NodeHandle::Dataset(d), AttrValue::Float(f)) => write_attr!(d, f64, *f),
            (NodeHandle::Dataset(d), AttrValue::Bool(b)) => write_attr!(d, bool, *b),
            (NodeHandle::Dataset(d), AttrValue::FloatPair(re, im)) => {
                let attr = d
                    .new_attr::<f64>()
                    .shape(2)
                    .create(key)
                    .map_err(|source| ContainerError::Hdf5 {
                        path: d.name(),
                        source,
                    })?;
                attr.write_raw(&[*re, *im]).map_err(|source| ContainerError::Hdf5 {
                    path: d.name(),
                    source,
                })
            }
        }
    }

    pub fn get_attr_string(
        &self,
        handle: &NodeHandle,
        key: &str,
    ) -> Result<Option<String>, ContainerError> {
        let result = match handle {
            NodeHandle::Group(g) => g.attr(key).and_then(|a| a.read_scalar::<VarLenUnicode>()),
            NodeHandle::Dataset(d) => d.attr(key).and_then(|a| a.read_scalar::<VarLenUnicode>()),
        };
        match result {
            Ok(unicode) => Ok(Some(unicode.to_string())),
            Err(_) => Ok(None),
        }
    }

    pub fn get_attr_int(&self, handle: &NodeHandle, key: &str) -> Result<Option<i64>, ContainerError> {
        let result = match handle {
            NodeHandle::Group(g) => g.attr(key).and_then(|a| a.read_scalar::<i64>()),
            NodeHandle::Dataset(d) => d.attr(key).and_then(|a| a.read_scalar::<i64>()),
        };
        Ok(result.ok())
    }

    pub fn get_attr_float(&self, handle: &NodeHandle, key: &str) -> Result<Option<f64>, ContainerError> {
        let result = match handle {
            NodeHandle::Group(g) => g.attr(key).and_then(|a| a.read_scalar::<f64>()),
            NodeHandle::Dataset(d) => d.attr(key).and_then(|a| a.read_scalar::<f64>()),
        };
        Ok(result.ok())
    }

    pub fn get_attr_bool(&self, handle: &NodeHandle, key: &str) -> Result<Option<bool>, ContainerError> {
        let result = match handle {
            NodeHandle::Group(g) => g.attr(key).and_then(|a| a.read_scalar::<bool>()),
            NodeHandle::Dataset(d) => d.attr(key).and_then(|a| a.read_scalar::<bool>()),
        };
        Ok(result.ok())
    }

    /// Reads a 2-component float attribute, matching [`AttrValue::FloatPair`].
    pub fn get_attr_float_pair(
        &self,
        handle: &NodeHandle,
        key: &str,
    ) -> Result<Option<(f64, f64)>, ContainerError> {
        let result = match handle {
            NodeHandle::Group(g) => g.attr(key).and_then(|a| a.read_raw::<f64>()),
            NodeHandle::Dataset(d) => d.attr(key).and_then(|a| a.read_raw::<f64>()),
        };
        match result {
            Ok(v) if v.len() == 2 => Ok(Some((v[0], v[1]))),
            _ => Ok(None),
        }
    }

    pub fn write_bytes(
        &self,
        parent: &NodeHandle,
        name: &str,
        data: &[u8],
    ) -> Result<NodeHandle, ContainerError> {
        let group = self.as_group(parent)?;
        let dataset = group
            .new_dataset::<u8>()
            .shape(data.len())
            .deflate(4)
            .create(name)
            .map_err(|source| ContainerError::Hdf5 {
                path: format!("{}/{}", group.name(), name),
                source,
            })?;
        dataset
            .write_raw(data)
            .map_err(|source| ContainerError::Hdf5 {
                path: dataset.name(),
                source,
            })?;
        Ok(NodeHandle::Dataset(dataset))
    }

    pub fn read_bytes(&self, handle: &NodeHandle) -> Result<Vec<u8>, ContainerError> {
        match handle {
            NodeHandle::Dataset(d) => d.read_raw::<u8>().map_err(|source| ContainerError::Hdf5 {
                path: d.name(),
                source,
            }),
            NodeHandle::Group(g) => Err(ContainerError::WrongKind {
                path: g.name(),
                expected: "dataset",
                actual: "group",
            }),
        }
    }

    pub fn write_array(
        &self,
        parent: &NodeHandle,
        name: &str,
        array: &RawArray,
    ) -> Result<NodeHandle, ContainerError> {
        let group = self.as_group(parent)?;
        let dataset = match &array.data {
            ArrayData::F32(v) => self.create_typed_dataset::<f32>(group, name, &array.shape, v)?,
            ArrayData::F64(v) => self.create_typed_dataset::<f64>(group, name, &array.shape, v)?,
            ArrayData::I32(v) => self.create_typed_dataset::<i32>(group, name, &array.shape, v)?,
            ArrayData::I64(v) => self.create_typed_dataset::<i64>(group, name, &array.shape, v)?,
            ArrayData::U8(v) => self.create_typed_dataset::<u8>(group, name, &array.shape, v)?,
        };
        Ok(NodeHandle::Dataset(dataset))
    }

    fn create_typed_dataset<T: hdf5::H5Type>(
        &self,
        group: &hdf5::Group,
        name: &str,
        shape: &[usize],
        data: &[T],
    ) -> Result<hdf5::Dataset, ContainerError> {
        let dataset = group
            .new_dataset::<T>()
            .shape(shape.to_vec())
            .deflate(4)
            .fletcher32()
            .create(name)
            .map_err(|source| ContainerError::Hdf5 {
                path: format!("{}/{}", group.name(), name),
                source,
            })?;
        dataset
            .write_raw(data)
            .map_err(|source| ContainerError::Hdf5 {
                path: dataset.name(),
                source,
            })?;
        Ok(dataset)
    }

    pub fn read_array(&self, handle: &NodeHandle, dtype: ArrayDtype) -> Result<RawArray, ContainerError> {
        let dataset = match handle {
            NodeHandle::Dataset(d) => d,
            NodeHandle::Group(g) => {
                return Err(ContainerError::WrongKind {
                    path: g.name(),
                    expected: "dataset",
                    actual: "group",
                });
            }
        };
        let shape = dataset.shape();
        let data = match dtype {
            ArrayDtype::F32 => ArrayData::F32(self.read_raw_dataset(dataset)?),
            ArrayDtype::F64 => ArrayData::F64(self.read_raw_dataset(dataset)?),
            ArrayDtype::I32 => ArrayData::I32(self.read_raw_dataset(dataset)?),
            ArrayDtype::I64 => ArrayData::I64(self.read_raw_dataset(dataset)?),
            ArrayDtype::U8 => ArrayData::U8(self.read_raw_dataset(dataset)?),
        };
        Ok(RawArray { shape, dtype, data })
    }

    fn read_raw_dataset<T: hdf5::H5Type>(&self, dataset: &hdf5::Dataset) -> Result<Vec<T>, ContainerError> {
        dataset.read_raw::<T>().map_err(|source| ContainerError::Hdf5 {
            path: dataset.name(),
            source,
        })
    }
}
