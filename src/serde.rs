//! Serialization and Deserialization implementation
//!
//! Every engine is represented as a map from prefix to next-hop. Deserializing inserts the
//! entries one by one; a [`MultibitTrie`] is rebuilt with the default stride.

use std::collections::HashMap;

use ::serde::{Deserialize, Deserializer, Serialize, Serializer};
use ipnet::Ipv4Net;

use super::*;

macro_rules! impl_serde {
    ($($engine:ident),* $(,)?) => {
        $(
            impl<T: Serialize> Serialize for $engine<T> {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    let map: HashMap<&Ipv4Net, &T> = HashMap::from_iter(self.iter());
                    map.serialize(serializer)
                }
            }

            impl<'de, T: Deserialize<'de>> Deserialize<'de> for $engine<T> {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    let map: HashMap<Ipv4Net, T> = HashMap::deserialize(deserializer)?;
                    Ok(Self::from_iter(map))
                }
            }
        )*
    };
}

impl_serde!(
    LinearSearchLookup,
    BinaryTrie,
    MultibitTrie,
    PathCompressedTrie,
);
