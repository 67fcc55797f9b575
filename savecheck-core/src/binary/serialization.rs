mod serializer;

pub use serializer::*;

use std::io::{Cursor, Write};

use super::Error;

/// Implemented by everything serializable to bytes.
pub trait Serialize {
    fn serialize(&self, serializer: &mut Serializer<impl Write>) -> Result<(), Error>;
}

macro_rules! serialize_primitive_le {
    ($T:ty) => {
        impl Serialize for $T {
            fn serialize(&self, serializer: &mut Serializer<impl Write>) -> Result<(), Error> {
                serializer.write_bytes(&self.to_le_bytes())
            }
        }
    };
}

serialize_primitive_le!(u32);

pub fn serialize(value: &impl Serialize) -> Result<Vec<u8>, Error> {
    let mut buffer = vec![];
    value.serialize(&mut Serializer::new(Cursor::new(&mut buffer)))?;
    Ok(buffer)
}
