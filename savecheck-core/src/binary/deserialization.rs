mod deserializer;

pub use deserializer::*;

use std::io::Read;

use super::Error;

/// Implemented by everything deserializable from bytes.
pub trait Deserialize: Sized {
    /// Deserializes the value from bytes.
    fn deserialize(deserializer: &mut Deserializer<impl Read>) -> Result<Self, Error>;
}

macro_rules! deserialize_primitive_le {
    ($T:ty) => {
        impl Deserialize for $T {
            fn deserialize(deserializer: &mut Deserializer<impl Read>) -> Result<Self, Error> {
                let mut buf = [0; std::mem::size_of::<$T>()];
                deserializer.read_bytes(&mut buf)?;
                Ok(<$T>::from_le_bytes(buf))
            }
        }
    };
}

deserialize_primitive_le!(u32);

impl<R> Deserializer<R> {
    /// Convenience function that deserializes a type implementing [`Deserialize`] from the current
    /// stream position.
    pub fn deserialize<T>(&mut self) -> Result<T, Error>
    where
        R: Read,
        T: Deserialize,
    {
        T::deserialize(self)
    }
}

/// Convenience function that deserializes a type implementing [`Deserialize`] from a buffer.
pub fn deserialize<T>(buffer: &[u8]) -> Result<T, Error>
where
    T: Deserialize,
{
    T::deserialize(&mut Deserializer::from_buffer(buffer))
}
