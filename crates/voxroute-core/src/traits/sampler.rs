// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource sampling seam between the host platform and the engine.

use std::sync::Arc;

use crate::types::ResourceSnapshot;

/// Source of the device resource snapshot consumed at decision time.
///
/// Implementations must answer from cached state without blocking. The
/// production implementation is fed by platform observers; tests use a
/// fixed snapshot.
pub trait ResourceSampler: Send + Sync {
    /// The latest known snapshot. Fields may have been sampled at different
    /// instants.
    fn current_snapshot(&self) -> ResourceSnapshot;
}

impl<T: ResourceSampler + ?Sized> ResourceSampler for Arc<T> {
    fn current_snapshot(&self) -> ResourceSnapshot {
        (**self).current_snapshot()
    }
}
