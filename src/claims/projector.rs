//! Projection of a raw traversal document into [`ClaimsInfo`].

use serde::Deserialize;

use crate::claims::{ClaimsInfo, ItemInfo};
use crate::{ConceptMapError, Result};

/// Top-level traversal response: `{ "item": [ ... ] }`.
#[derive(Deserialize)]
struct TraversalDocument {
    item: Vec<ItemInfo>,
}

/// Split a traversal document into the queried entity's picture and the
/// labels of every related entity.
///
/// Decoding is strict: a missing `item` array or a record lacking `id`,
/// `label` or `picture` fails the whole projection. If the queried id
/// appears more than once, the last picture wins.
pub fn project(raw_document: &str, queried_entity_id: &str) -> Result<ClaimsInfo> {
    let document: TraversalDocument = serde_json::from_str(raw_document)
        .map_err(|e| ConceptMapError::Parse(format!("Invalid traversal document: {}", e)))?;

    let mut claims = ClaimsInfo::default();
    for item in document.item {
        if item.id == queried_entity_id {
            claims.picture_url = item.picture;
        } else {
            claims.item_labels.push(item.label);
        }
    }

    Ok(claims)
}
