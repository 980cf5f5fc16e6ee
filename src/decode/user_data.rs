// User-data chunks and the acceptor they attach to.
//
// A user-data chunk carries no reference to its owner: it belongs to the
// most recently decoded layer, cel or slice. With no such entity it is
// dropped.

use std::io::Read;

use crate::document::{CelId, Color, Document, LayerId, SliceId, UserData};
use crate::error::DecodeError;
use crate::format::ByteCursor;
use crate::format::header::UserDataFlags;

/// The entity a following user-data chunk applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserDataTarget {
    Layer(LayerId),
    Cel(CelId),
    Slice(SliceId),
}

pub fn decode_chunk<R: Read>(c: &mut ByteCursor<R>) -> Result<UserData, DecodeError> {
    let flags = UserDataFlags::from_bits_retain(c.read_u32()?);

    let text = if flags.contains(UserDataFlags::TEXT) {
        Some(c.read_prefixed_string()?)
    } else {
        None
    };
    let color = if flags.contains(UserDataFlags::COLOR) {
        Some(Color::from_packed(c.read_u32()?))
    } else {
        None
    };

    Ok(UserData { text, color })
}

/// Merge `data` into the target's user data. Fields absent from `data`
/// keep their previous value.
pub fn apply(doc: &mut Document, target: Option<UserDataTarget>, data: UserData) {
    let slot = match target {
        Some(UserDataTarget::Layer(id)) => doc.layers.get_mut(id.0).map(|l| &mut l.user_data),
        Some(UserDataTarget::Cel(id)) => doc.cels.get_mut(id.0).map(|c| &mut c.user_data),
        Some(UserDataTarget::Slice(id)) => doc.slices.get_mut(id.0).map(|s| &mut s.user_data),
        None => None,
    };

    let Some(slot) = slot else {
        log::debug!("user data with no acceptor dropped");
        return;
    };
    if data.text.is_some() {
        slot.text = data.text;
    }
    if data.color.is_some() {
        slot.color = data.color;
    }
}
