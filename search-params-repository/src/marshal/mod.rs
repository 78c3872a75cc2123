//! Query-string marshalling.
//!
//! Converts between a [`FlatMap`] decoded from a URL query string and a
//! typed [`Parameters`](crate::Parameters) value, using a
//! [`ConverterRegistry`] for element types and a [`ParameterDescriptor`]
//! for the field layout.

mod descriptor;
mod flat_map;
mod registry;

pub use descriptor::{FieldDescriptor, FieldShape, ParameterDescriptor, ParameterDescriptorBuilder};
pub use flat_map::FlatMap;
pub use registry::{ConverterRegistry, ConverterRegistryBuilder};

use crate::errors::MarshalError;
use crate::parameters::Parameters;

/// Assign the recognised keys of `map` to `target`.
pub fn populate<P: Parameters>(
    map: &FlatMap,
    target: &mut P,
    registry: &ConverterRegistry,
) -> Result<(), MarshalError> {
    P::descriptor().populate(map, target, registry)
}

/// Write the present fields of `source` to a new flat map.
pub fn to_flat_map<P: Parameters>(source: &P, registry: &ConverterRegistry) -> FlatMap {
    P::descriptor().to_flat_map(source, registry)
}
