use serde::{Deserialize, Serialize};

/// A reference to an object held by the external object store.
///
/// `key` is the store-side identifier and the only field that matters for
/// lifecycle bookkeeping; `image_url` is the display URL handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub key: String,
}
