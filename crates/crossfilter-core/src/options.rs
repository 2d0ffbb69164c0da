// File: crates/crossfilter-core/src/options.rs
// Summary: Dashboard configuration (volume scaling, quarter boundaries, group scope).

use crate::group::GroupScope;
use crate::keys::QuarterConvention;
use crate::types::VOLUME_SCALE;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashboardOptions {
    /// Divisor applied to volume in the monthly volume group.
    pub volume_scale: f64,
    pub quarter_convention: QuarterConvention,
    /// Scope given to every dashboard group.
    pub group_scope: GroupScope,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            volume_scale: VOLUME_SCALE,
            quarter_convention: QuarterConvention::Calendar,
            group_scope: GroupScope::AllFilters,
        }
    }
}
