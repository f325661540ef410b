// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tag channels.

use crate::model::TagEntity;

use super::names;
use super::{ChannelSet, MapContext};

/// Maps a tag to its channels.
#[must_use]
pub fn map_tag(tag: &TagEntity, _context: &MapContext<'_>) -> ChannelSet {
    let mut set = ChannelSet::new();
    set.push(names::ID, tag.base.id.value());
    set.push_opt(names::TAG, tag.tag.as_deref());
    set
}
