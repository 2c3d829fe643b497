use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::BucketMap;

impl Serialize for BucketMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut entries = Vec::new();
        self.scan(|_, chain| entries.extend_from_slice(chain));

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in &entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
