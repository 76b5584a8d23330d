use crate::octree::{BoundingBox, NodeKey, Octree, OctreeError, V3c};
use bendy::{
    decoding::{FromBencode, Object},
    encoding::{Error as BencodeError, SingleItemEncoder, ToBencode},
};
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

//####################################################################################
// Node key
//####################################################################################
impl ToBencode for NodeKey {
    const MAX_DEPTH: usize = 0;
    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), BencodeError> {
        encoder.emit_int(self.raw())
    }
}

impl FromBencode for NodeKey {
    fn decode_bencode_object(data: Object) -> Result<Self, bendy::decoding::Error> {
        match data {
            Object::Integer(i) => {
                let raw = i.parse()?;
                NodeKey::from_raw(raw).ok_or_else(|| {
                    bendy::decoding::Error::unexpected_token(
                        "A node key with whole octants after the sentinel bit",
                        format!("the number: {:#b}", raw),
                    )
                })
            }
            _ => Err(bendy::decoding::Error::unexpected_token(
                "int field node key",
                "Something else",
            )),
        }
    }
}

//####################################################################################
// Bounding box
//####################################################################################
// Components are stored as their bit patterns so the bounds are restored exactly
impl ToBencode for BoundingBox {
    const MAX_DEPTH: usize = 1;
    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), BencodeError> {
        encoder.emit_list(|e| {
            for component in [
                self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
            ] {
                e.emit_int(component.to_bits())?;
            }
            Ok(())
        })
    }
}

impl FromBencode for BoundingBox {
    fn decode_bencode_object(data: Object) -> Result<Self, bendy::decoding::Error> {
        match data {
            Object::List(mut list) => {
                let mut components = [0.0_f32; 6];
                for component in components.iter_mut() {
                    *component = match list.next_object()? {
                        Some(Object::Integer(i)) => Ok(f32::from_bits(i.parse()?)),
                        _ => Err(bendy::decoding::Error::unexpected_token(
                            "int field bounding box component",
                            "Something else",
                        )),
                    }?;
                }
                Ok(BoundingBox::new(
                    V3c::new(components[0], components[1], components[2]),
                    V3c::new(components[3], components[4], components[5]),
                ))
            }
            _ => Err(bendy::decoding::Error::unexpected_token("List", "not List")),
        }
    }
}

//####################################################################################
// Octree
//####################################################################################
// Layout: ["#octree", bounds, max depth, payload count, key, payload, key, payload, ...]
// Payloads are written in key order, so equal trees encode to equal bytes.
impl<T> ToBencode for Octree<T>
where
    T: ToBencode,
{
    const MAX_DEPTH: usize = T::MAX_DEPTH + 2;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), BencodeError> {
        let mut keys = self.payloads.keys().copied().collect::<Vec<_>>();
        keys.sort();
        encoder.emit_list(|e| {
            e.emit_str("#octree")?;
            e.emit(self.bounds)?;
            e.emit_int(self.max_depth)?;
            e.emit_int(keys.len())?;
            for key in keys.iter() {
                e.emit(*key)?;
                e.emit(&self.payloads[key])?;
            }
            Ok(())
        })
    }
}

impl<T> FromBencode for Octree<T>
where
    T: FromBencode,
{
    fn decode_bencode_object(data: Object) -> Result<Self, bendy::decoding::Error> {
        match data {
            Object::List(mut list) => {
                match list.next_object()? {
                    Some(Object::Bytes(b)) if b == b"#octree" => Ok(()),
                    _ => Err(bendy::decoding::Error::unexpected_token(
                        "Octree identifier string #octree",
                        "Something else",
                    )),
                }?;
                let bounds = match list.next_object()? {
                    Some(object) => BoundingBox::decode_bencode_object(object),
                    None => Err(bendy::decoding::Error::missing_field("bounds")),
                }?;
                let max_depth = match list.next_object()? {
                    Some(Object::Integer(i)) => Ok(i.parse()?),
                    _ => Err(bendy::decoding::Error::unexpected_token(
                        "int field max depth",
                        "Something else",
                    )),
                }?;
                let payload_count: usize = match list.next_object()? {
                    Some(Object::Integer(i)) => Ok(i.parse()?),
                    _ => Err(bendy::decoding::Error::unexpected_token(
                        "int field payload count",
                        "Something else",
                    )),
                }?;

                let mut tree = Octree::new(bounds, max_depth).map_err(|error| {
                    bendy::decoding::Error::unexpected_token("Valid octree parameters", error)
                })?;
                for _ in 0..payload_count {
                    let key = match list.next_object()? {
                        Some(object) => NodeKey::decode_bencode_object(object),
                        None => Err(bendy::decoding::Error::missing_field("node key")),
                    }?;
                    let data = match list.next_object()? {
                        Some(object) => T::decode_bencode_object(object),
                        None => Err(bendy::decoding::Error::missing_field("payload")),
                    }?;
                    let previous = tree.insert(key, data).map_err(|error| {
                        bendy::decoding::Error::unexpected_token("A node inside the octree", error)
                    })?;
                    if previous.is_some() {
                        return Err(bendy::decoding::Error::unexpected_token(
                            "Each node key only once",
                            format!("the node key {} repeated", key),
                        ));
                    }
                }
                if list.next_object()?.is_some() {
                    return Err(bendy::decoding::Error::unexpected_token(
                        format!("{} payloads", payload_count),
                        "more items in the list",
                    ));
                }
                Ok(tree)
            }
            _ => Err(bendy::decoding::Error::unexpected_token("List", "not List")),
        }
    }
}

impl<T> Octree<T> {
    /// converts the data structure to a byte representation
    pub fn to_bytes(&self) -> Result<Vec<u8>, OctreeError>
    where
        T: ToBencode,
    {
        self.to_bencode()
            .map_err(|error| OctreeError::InvalidStructure(format!("{:?}", error).into()))
    }

    /// parses the data structure from a byte string
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OctreeError>
    where
        T: FromBencode,
    {
        Self::from_bencode(bytes)
            .map_err(|error| OctreeError::InvalidStructure(format!("{:?}", error).into()))
    }

    /// saves the data structure to the given file path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), OctreeError>
    where
        T: ToBencode,
    {
        log::debug!(
            "Saving octree with {} payloads to {}",
            self.len(),
            path.as_ref().display()
        );
        let mut file = File::create(path)?;
        file.write_all(&self.to_bytes()?)?;
        Ok(())
    }

    /// loads the data structure from the given file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, OctreeError>
    where
        T: FromBencode,
    {
        let mut file = File::open(path.as_ref())?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let tree = Self::from_bytes(&bytes)?;
        log::debug!(
            "Loaded octree with {} payloads from {}",
            tree.len(),
            path.as_ref().display()
        );
        Ok(tree)
    }
}
