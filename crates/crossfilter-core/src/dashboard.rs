// File: crates/crossfilter-core/src/dashboard.rs
// Summary: Stock index dashboard: the dimensions and groups behind the linked charts.

use tracing::info;

use crate::aggregator::Aggregator;
use crate::error::Result;
use crate::filter::Filter;
use crate::keys;
use crate::options::DashboardOptions;
use crate::record::Record;
use crate::reducer::{CountReducer, SumReducer};
use crate::stats::{MonthlyIndexAverage, YearlyPerformance};
use crate::types::{DimensionId, FilterDelta, GroupHandle};

/// One aggregator wired with every dimension and group the dashboard charts read.
/// Handles are plain copies; pass the dashboard (or its aggregator) to consumers.
pub struct StockDashboard {
    aggregator: Aggregator,
    options: DashboardOptions,

    pub year: DimensionId,
    pub date: DimensionId,
    pub month: DimensionId,
    pub gain_or_loss: DimensionId,
    pub fluctuation: DimensionId,
    pub quarter: DimensionId,
    pub day_of_week: DimensionId,

    /// Bubble chart: one bubble per year.
    pub yearly_performance: GroupHandle<YearlyPerformance>,
    /// Stacked move chart, top layer.
    pub monthly_move: GroupHandle<SumReducer>,
    /// Monthly volume bars, scaled down by `volume_scale`.
    pub volume_by_month: GroupHandle<SumReducer>,
    /// Stacked move chart, base layer.
    pub index_avg_by_month: GroupHandle<MonthlyIndexAverage>,
    pub gain_or_loss_count: GroupHandle<CountReducer>,
    /// Histogram of whole-percent daily changes.
    pub fluctuation_count: GroupHandle<CountReducer>,
    pub quarter_volume: GroupHandle<SumReducer>,
    pub day_of_week_count: GroupHandle<CountReducer>,
}

impl StockDashboard {
    pub fn new(records: Vec<Record>, options: DashboardOptions) -> Result<Self> {
        let scope = options.group_scope;
        let convention = options.quarter_convention;
        let mut agg = Aggregator::new(records);

        let year = agg.create_dimension("year", keys::year)?;
        let date = agg.create_dimension("date", keys::date)?;
        let month = agg.create_dimension("month", keys::month)?;
        let gain_or_loss = agg.create_dimension("gain_or_loss", keys::gain_or_loss)?;
        let fluctuation = agg.create_dimension("fluctuation", keys::fluctuation_bucket)?;
        let quarter = agg.create_dimension("quarter", move |r| keys::quarter(r, convention))?;
        let day_of_week = agg.create_dimension("day_of_week", keys::day_of_week)?;

        let yearly_performance = agg.create_group_with_scope(year, YearlyPerformance, scope)?;
        let monthly_move = agg.create_group_with_scope(month, SumReducer::movement(), scope)?;
        let volume_by_month =
            agg.create_group_with_scope(month, SumReducer::scaled_volume(options.volume_scale), scope)?;
        let index_avg_by_month = agg.create_group_with_scope(month, MonthlyIndexAverage, scope)?;
        let gain_or_loss_count = agg.create_group_with_scope(gain_or_loss, CountReducer, scope)?;
        let fluctuation_count = agg.create_group_with_scope(fluctuation, CountReducer, scope)?;
        let quarter_volume = agg.create_group_with_scope(quarter, SumReducer::volume(), scope)?;
        let day_of_week_count = agg.create_group_with_scope(day_of_week, CountReducer, scope)?;

        info!(records = agg.records().len(), ?scope, ?convention, "dashboard ready");

        Ok(Self {
            aggregator: agg,
            options,
            year,
            date,
            month,
            gain_or_loss,
            fluctuation,
            quarter,
            day_of_week,
            yearly_performance,
            monthly_move,
            volume_by_month,
            index_avg_by_month,
            gain_or_loss_count,
            fluctuation_count,
            quarter_volume,
            day_of_week_count,
        })
    }

    pub fn aggregator(&self) -> &Aggregator { &self.aggregator }

    pub fn aggregator_mut(&mut self) -> &mut Aggregator { &mut self.aggregator }

    pub fn options(&self) -> &DashboardOptions { &self.options }

    /// Look up a dimension by the name it was registered under.
    pub fn dimension_named(&self, name: &str) -> Option<DimensionId> {
        self.dimensions().into_iter().find(|&dim| {
            self.aggregator.dimension(dim).is_ok_and(|d| d.name() == name)
        })
    }

    /// Every dimension, in registration order.
    pub fn dimensions(&self) -> [DimensionId; 7] {
        [
            self.year,
            self.date,
            self.month,
            self.gain_or_loss,
            self.fluctuation,
            self.quarter,
            self.day_of_week,
        ]
    }

    pub fn set_filter(&mut self, dim: DimensionId, filter: Option<Filter>) -> Result<FilterDelta> {
        self.aggregator.set_filter(dim, filter)
    }

    pub fn reset_all(&mut self) -> FilterDelta {
        self.aggregator.reset_all()
    }
}
