// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Household channels.

use crate::model::HouseholdEntity;

use super::names;
use super::{ChannelSet, MapContext};

/// Maps a household to its channels.
#[must_use]
pub fn map_household(household: &HouseholdEntity, context: &MapContext<'_>) -> ChannelSet {
    let mut set = ChannelSet::new();
    set.push(names::ID, household.base.id.value());
    set.push_opt(names::NAME, household.name.as_deref());
    set.push_opt(names::TIMEZONE, household.timezone.as_deref());
    #[allow(clippy::cast_possible_wrap)]
    let user_count = household.users.len() as i64;
    set.push(names::USER_COUNT, user_count);
    set.push_opt(names::CREATED_AT, context.zoned_opt(household.base.created_at));
    set.push_opt(names::UPDATED_AT, context.zoned_opt(household.base.updated_at));
    set
}
