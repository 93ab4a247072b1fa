// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Routing between the TV and the bus.
//!
//! ```text
//! TvEvent::ForegroundAppChanged({appId})
//!                 ↓
//!         EventRouter.route()
//!                 ↓
//!   publish lgtv2mqtt/tv/foregroundApp (retained)
//!
//! lgtv2mqtt/tv/cmnd/application → "Netflix"
//!                 ↓
//!        CommandRouter.route()
//!                 ↓
//!   strip prefix → "application" → CommandLeaf::Application
//!                 ↓
//!   powered on? → "Netflix" → "netflix" → launch_application
//! ```

mod command_router;
mod event_router;

pub use command_router::{CommandRouter, Dispatch};
pub use event_router::EventRouter;
