//! Assembly of update-document requests.

use crate::{field::FieldSpec, pb};

/// Document ids are the decimal sequence number behind this prefix.
pub const DOC_ID_PREFIX: &str = "doc";
/// Sequence tokens are the decimal sequence number behind this prefix.
pub const SEQ_PREFIX: &str = "seq-";

/// Builds one complete update request for sequence number `seq`.
///
/// The document id and sequence token are deterministic functions of `seq`,
/// so a trial's request stream is fully reproducible from its sequence of
/// issued numbers.
pub fn update_request(
    index: &pb::Index,
    seq: u64,
    fields: Vec<FieldSpec>,
) -> pb::DocumentUpdateRequest {
    pb::DocumentUpdateRequest {
        index: Some(index.clone()),
        id: format!("{}{}", DOC_ID_PREFIX, seq),
        seq: Some(pb::UpdateSeq {
            seq: format!("{}{}", SEQ_PREFIX, seq),
        }),
        fields: fields.into_iter().map(pb::DocumentField::from).collect(),
    }
}
