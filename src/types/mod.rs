// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the routers and the discovery builder.
//!
//! # Types
//!
//! - [`StateLeaf`] - Leaf names of the retained state topics
//! - [`CommandLeaf`] - Leaf names of the command topics
//! - [`Switch`] - The `on`/`off` payload vocabulary of command topics
//! - [`ChannelRef`] - A live TV channel as the TV identifies it

mod channel;
mod leaf;
mod switch;

pub use channel::ChannelRef;
pub use leaf::{CommandLeaf, StateLeaf};
pub use switch::Switch;
